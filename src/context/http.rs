//! HTTP adapter for the data-service collaborator
//!
//! Thin reqwest client over the internal data API that owns users,
//! sessions, feedback rows, and token verification. Transport failures and
//! unexpected statuses surface as DataUnavailable; 404 becomes None so the
//! assembler can attach the precise message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::context::providers::{FeedbackStore, IdentityVerifier, ProfileProvider, StatsProvider};
use crate::errors::{CoachError, Result};
use crate::types::{FeedbackRecord, SessionRecord, UserContext};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the internal data service
#[derive(Clone)]
pub struct HttpDataService {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for HttpDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDataService")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpDataService {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                CoachError::DataUnavailable(format!("failed to create data client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoachError::DataUnavailable(format!("data service unreachable: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.json::<T>().await.map_err(|e| {
                    CoachError::DataUnavailable(format!("data service sent malformed body: {}", e))
                })?;
                Ok(Some(body))
            }
            status => Err(CoachError::DataUnavailable(format!(
                "data service answered {} for {}",
                status, path
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user_id: i64,
}

#[async_trait]
impl ProfileProvider for HttpDataService {
    async fn profile(&self, user_id: i64) -> Result<Option<UserContext>> {
        self.get_json(&format!("/internal/users/{}", user_id)).await
    }
}

#[async_trait]
impl StatsProvider for HttpDataService {
    async fn sessions_in_window(&self, user_id: i64, days: u32) -> Result<Vec<SessionRecord>> {
        let path = format!("/internal/users/{}/sessions?days={}", user_id, days);
        // A user with no sessions is an empty list, not a 404
        Ok(self.get_json(&path).await?.unwrap_or_default())
    }

    async fn session_by_id(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> Result<Option<SessionRecord>> {
        self.get_json(&format!(
            "/internal/users/{}/sessions/{}",
            user_id, session_id
        ))
        .await
    }
}

#[async_trait]
impl FeedbackStore for HttpDataService {
    async fn save(&self, record: &FeedbackRecord) -> Result<()> {
        let url = format!("{}/internal/feedback", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| CoachError::DataUnavailable(format!("data service unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(CoachError::DataUnavailable(format!(
                "data service rejected feedback: {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn recent_for_user(&self, user_id: i64, limit: usize) -> Result<Vec<FeedbackRecord>> {
        let path = format!("/internal/users/{}/feedback?limit={}", user_id, limit);
        Ok(self.get_json(&path).await?.unwrap_or_default())
    }
}

#[async_trait]
impl IdentityVerifier for HttpDataService {
    async fn verify(&self, token: &str) -> Result<Option<i64>> {
        let url = format!("{}/internal/auth/verify", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| CoachError::DataUnavailable(format!("auth service unreachable: {}", e)))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.json::<VerifyResponse>().await.map_err(|e| {
                    CoachError::DataUnavailable(format!("auth service sent malformed body: {}", e))
                })?;
                Ok(Some(body.user_id))
            }
            status => Err(CoachError::DataUnavailable(format!(
                "auth service answered {}",
                status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_404_is_none() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/internal/users/9")
            .with_status(404)
            .create_async()
            .await;

        let service = HttpDataService::new(&server.url()).unwrap();
        let profile = service.profile(9).await.unwrap();
        assert!(profile.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_profile_decodes_body() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "user_id": 9,
            "first_name": "Deniz",
            "age": 21,
            "occupation": "University student",
            "goal": "Final exams",
            "daily_target_minutes": 120
        });
        let _mock = server
            .mock("GET", "/internal/users/9")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let service = HttpDataService::new(&server.url()).unwrap();
        let profile = service.profile(9).await.unwrap().unwrap();
        assert_eq!(profile.first_name, "Deniz");
        assert_eq!(profile.daily_target_minutes, 120);
    }

    #[tokio::test]
    async fn test_server_error_is_data_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/internal/users/9")
            .with_status(500)
            .create_async()
            .await;

        let service = HttpDataService::new(&server.url()).unwrap();
        let err = service.profile(9).await.unwrap_err();
        assert!(matches!(err, CoachError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_verify_unauthorized_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/internal/auth/verify")
            .with_status(401)
            .create_async()
            .await;

        let service = HttpDataService::new(&server.url()).unwrap();
        assert_eq!(service.verify("expired").await.unwrap(), None);
    }
}
