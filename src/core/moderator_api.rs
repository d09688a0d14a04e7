/// Moderator API client
///
/// Every call goes to one endpoint; the operation is picked by the `action`
/// query parameter. Mutations POST a JSON body naming the target id and answer
/// with `{ "success": true }`.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::error::ApiError;
use crate::core::models::{ModeratorProfile, Report, Stats};
use crate::utils::constants::actions;

/// A moderation mutation and its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModAction {
    Approve(i64),
    Reject(i64),
    ResolveReport(i64),
    DismissReport(i64),
}

impl ModAction {
    /// Wire name, sent as the `action` query parameter
    pub fn name(&self) -> &'static str {
        match self {
            ModAction::Approve(_) => actions::APPROVE,
            ModAction::Reject(_) => actions::REJECT,
            ModAction::ResolveReport(_) => actions::RESOLVE_REPORT,
            ModAction::DismissReport(_) => actions::DISMISS_REPORT,
        }
    }

    pub fn target_id(&self) -> i64 {
        match *self {
            ModAction::Approve(id)
            | ModAction::Reject(id)
            | ModAction::ResolveReport(id)
            | ModAction::DismissReport(id) => id,
        }
    }

    /// True for approve/reject, false for report actions
    pub fn targets_profile(&self) -> bool {
        matches!(self, ModAction::Approve(_) | ModAction::Reject(_))
    }

    pub fn body(&self) -> Value {
        if self.targets_profile() {
            json!({ "profile_id": self.target_id() })
        } else {
            json!({ "report_id": self.target_id() })
        }
    }

    /// Confirmation shown after the server accepted the action
    pub fn success_message(&self) -> &'static str {
        match self {
            ModAction::Approve(_) => "Profile approved",
            ModAction::Reject(_) => "Profile rejected",
            ModAction::ResolveReport(_) => "Report resolved",
            ModAction::DismissReport(_) => "Report dismissed",
        }
    }
}

/// Everything the dashboard shows, fetched together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub profiles: Vec<ModeratorProfile>,
    pub reports: Vec<Report>,
    pub stats: Stats,
}

#[derive(Deserialize)]
struct ProfilesResponse {
    profiles: Vec<ModeratorProfile>,
}

#[derive(Deserialize)]
struct ReportsResponse {
    reports: Vec<Report>,
}

#[derive(Deserialize)]
struct ActionResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct ModeratorApi {
    client: Client,
    base_url: String,
}

impl ModeratorApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, action: &'static str) -> Result<T, ApiError> {
        debug!(action, url = %self.base_url, "GET");

        let response = self.client
            .get(&self.base_url)
            .query(&[("action", action)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", action, e)))
    }

    pub async fn pending_profiles(&self) -> Result<Vec<ModeratorProfile>, ApiError> {
        let response: ProfilesResponse = self.get_json(actions::PENDING_PROFILES).await?;
        Ok(response.profiles)
    }

    pub async fn reports(&self) -> Result<Vec<Report>, ApiError> {
        let response: ReportsResponse = self.get_json(actions::REPORTS).await?;
        Ok(response.reports)
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get_json(actions::STATS).await
    }

    /// Fetch pending profiles, reports and stats concurrently. Any failure fails the whole load.
    pub async fn snapshot(&self) -> Result<Snapshot, ApiError> {
        let (profiles, reports, stats) =
            tokio::try_join!(self.pending_profiles(), self.reports(), self.stats())?;

        Ok(Snapshot { profiles, reports, stats })
    }

    /// POST a moderation action. Ok only when the server answers `success: true`.
    pub async fn perform(&self, action: ModAction) -> Result<(), ApiError> {
        debug!(action = action.name(), target = action.target_id(), "POST");

        let response = self.client
            .post(&self.base_url)
            .query(&[("action", action.name())])
            .json(&action.body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let reply: ActionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", action.name(), e)))?;

        if reply.success {
            Ok(())
        } else {
            let message = reply.error.unwrap_or_else(|| "success=false".to_string());
            warn!(action = action.name(), target = action.target_id(), %message, "action rejected by server");
            Err(ApiError::Rejected { action: action.name(), message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn api(server: &Server) -> ModeratorApi {
        ModeratorApi::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_action_bodies() {
        assert_eq!(ModAction::Approve(5).body(), json!({ "profile_id": 5 }));
        assert_eq!(ModAction::Reject(6).body(), json!({ "profile_id": 6 }));
        assert_eq!(ModAction::ResolveReport(7).body(), json!({ "report_id": 7 }));
        assert_eq!(ModAction::DismissReport(8).body(), json!({ "report_id": 8 }));
        assert_eq!(ModAction::DismissReport(8).name(), "dismiss_report");
    }

    #[tokio::test]
    async fn test_pending_profiles_uses_action_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("action".into(), "pending_profiles".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "profiles": [{
                    "id": 1, "telegram_id": 100, "username": "olya", "name": "Оля",
                    "age": 15, "city": "Москва", "gender": "female",
                    "photo_url": null, "bio": null, "created_at": null
                }] })
                .to_string(),
            )
            .create_async()
            .await;

        let profiles = api(&server).pending_profiles().await.unwrap();

        mock.assert_async().await;
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].username.as_deref(), Some("olya"));
    }

    #[tokio::test]
    async fn test_stats_read_directly() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("action".into(), "stats".into()))
            .with_status(200)
            .with_body(json!({ "total_profiles": 10, "approved": 6, "pending": 3, "rejected": 1 }).to_string())
            .create_async()
            .await;

        let stats = api(&server).stats().await.unwrap();
        assert_eq!(stats.total_profiles, 10);
        assert_eq!(stats.matches, 0);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("action".into(), "reports".into()))
            .with_status(500)
            .with_body(json!({ "error": "Database not configured" }).to_string())
            .create_async()
            .await;

        let err = api(&server).reports().await.unwrap_err();
        assert!(matches!(err, ApiError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("action".into(), "reports".into()))
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = api(&server).reports().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_perform_posts_body_and_reads_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_query(Matcher::UrlEncoded("action".into(), "approve".into()))
            .match_body(Matcher::Json(json!({ "profile_id": 42 })))
            .with_status(200)
            .with_body(json!({ "success": true, "telegram_id": 100 }).to_string())
            .create_async()
            .await;

        api(&server).perform(ModAction::Approve(42)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_perform_error_reply_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .match_query(Matcher::UrlEncoded("action".into(), "reject".into()))
            .with_status(200)
            .with_body(json!({ "error": "Profile not found" }).to_string())
            .create_async()
            .await;

        let err = api(&server).perform(ModAction::Reject(9)).await.unwrap_err();
        match err {
            ApiError::Rejected { action, message } => {
                assert_eq!(action, "reject");
                assert_eq!(message, "Profile not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let api = ModeratorApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.stats().await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }
}
