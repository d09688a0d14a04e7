/// Product constants shared by the swipe screen and the moderator dashboard

/// Application name, used for config and log directories
pub const APP_NAME: &str = "teenmatch-cli";

/// Likes available per day
pub const DAILY_LIKE_LIMIT: u32 = 15;

/// A demo like counts as mutual when the uniform draw exceeds this value (~30%)
pub const MUTUAL_LIKE_THRESHOLD: f64 = 0.7;

/// Age bounds shown as the input hint; not enforced
pub const MIN_AGE_HINT: u32 = 13;
pub const MAX_AGE_HINT: u32 = 19;

/// Longest age input accepted by the form
pub const MAX_AGE_DIGITS: usize = 3;

/// Fallback moderator API endpoint when nothing else is configured
pub const FALLBACK_API_URL: &str = "http://localhost:8080/moderator";

/// Request timeout for moderator API calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Compiled-in API URL, taken from MODERATOR_API_URL at build time
pub fn build_time_api_url() -> &'static str {
    option_env!("MODERATOR_API_URL").unwrap_or(FALLBACK_API_URL)
}

/// Moderator API actions, sent as the `action` query parameter
pub mod actions {
    pub const PENDING_PROFILES: &str = "pending_profiles";
    pub const REPORTS: &str = "reports";
    pub const STATS: &str = "stats";
    pub const APPROVE: &str = "approve";
    pub const REJECT: &str = "reject";
    pub const RESOLVE_REPORT: &str = "resolve_report";
    pub const DISMISS_REPORT: &str = "dismiss_report";
}
