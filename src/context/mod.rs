//! Context assembly: collaborator traits and per-request data gathering
//!
//! The service never owns user, session, or feedback storage. Everything it
//! knows arrives through the provider traits here, implemented by the data
//! service adapter in production and by the in-memory store in tests.

pub mod assembler;
pub mod http;
pub mod memory;
pub mod providers;

pub use assembler::{ContextAssembler, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS, MIN_WINDOW_DAYS};
pub use http::HttpDataService;
pub use memory::InMemoryDataStore;
pub use providers::{FeedbackStore, IdentityVerifier, ProfileProvider, StatsProvider};
