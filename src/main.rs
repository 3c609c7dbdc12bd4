use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pomocoach::coach::{CoachOrchestrator, FeedbackRecorder};
use pomocoach::config::Config;
use pomocoach::context::{
    ContextAssembler, FeedbackStore, HttpDataService, IdentityVerifier, InMemoryDataStore,
    ProfileProvider, StatsProvider,
};
use pomocoach::gateway::OllamaGateway;
use pomocoach::http::{self, AppContext};
use pomocoach::types::UserContext;

#[derive(Parser)]
#[command(name = "pomocoach", version, about = "AI coaching orchestration service")]
struct Cli {
    /// Path to the TOML config file (default: ~/.pomocoach/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config file
    #[arg(long)]
    bind: Option<String>,
}

struct Collaborators {
    profiles: Arc<dyn ProfileProvider>,
    stats: Arc<dyn StatsProvider>,
    feedback: Arc<dyn FeedbackStore>,
    identity: Arc<dyn IdentityVerifier>,
}

fn wire_collaborators(config: &Config) -> Result<Collaborators> {
    match &config.data.base_url {
        Some(base_url) => {
            info!(base_url, "using HTTP data service");
            let service = Arc::new(
                HttpDataService::new(base_url)
                    .map_err(|e| anyhow::anyhow!("data service setup failed: {}", e))?,
            );
            Ok(Collaborators {
                profiles: service.clone(),
                stats: service.clone(),
                feedback: service.clone(),
                identity: service,
            })
        }
        None => {
            warn!("no data service configured; running with a seeded in-memory store");
            let store = Arc::new(InMemoryDataStore::new());
            store.insert_profile(UserContext {
                user_id: 1,
                first_name: "Demo".to_string(),
                age: None,
                occupation: "Developer".to_string(),
                goal: "Trying out pomocoach".to_string(),
                daily_target_minutes: 120,
            });
            store.insert_token("local-dev-token", 1);
            Ok(Collaborators {
                profiles: store.clone(),
                stats: store.clone(),
                feedback: store.clone(),
                identity: store,
            })
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let gateway = OllamaGateway::new(
        &config.model.base_url,
        &config.model.fast_model,
        &config.model.heavy_model,
    )
    .map_err(|e| anyhow::anyhow!("gateway setup failed: {}", e))?;
    info!(
        base_url = %gateway.base_url(),
        fast = %config.model.fast_model,
        heavy = %config.model.heavy_model,
        "model gateway ready"
    );

    let collaborators = wire_collaborators(&config)?;
    let assembler = ContextAssembler::new(
        collaborators.profiles,
        collaborators.stats,
        collaborators.feedback.clone(),
    );
    let orchestrator = Arc::new(CoachOrchestrator::new(assembler, Arc::new(gateway)));
    let recorder = FeedbackRecorder::new(collaborators.feedback, orchestrator.clone());

    let ctx = Arc::new(AppContext {
        orchestrator,
        recorder,
        identity: collaborators.identity,
    });

    let bind = cli.bind.unwrap_or(config.server.bind);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind))?;

    http::serve(ctx, addr).await
}
