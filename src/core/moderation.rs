/// Moderator dashboard state
///
/// Holds the three data slices shown by the dashboard and applies load and
/// action results to them. After every accepted action the screen refetches
/// all three slices; the local removal only covers the time until that refetch
/// lands, since another moderator may have changed the same lists meanwhile.
///
/// Loads are numbered. Only the newest started load may replace the slices or
/// clear the loading flag.

use tracing::{debug, info, warn};

use crate::core::error::ApiError;
use crate::core::models::{ModeratorProfile, Report, Stats};
use crate::core::moderator_api::{ModAction, ModeratorApi, Snapshot};
use crate::core::notice::Notice;

pub struct ModerationDesk {
    api: ModeratorApi,
    profiles: Vec<ModeratorProfile>,
    reports: Vec<Report>,
    stats: Option<Stats>,
    loading: bool,
    load_generation: u64,
    notices: Vec<Notice>,
}

impl ModerationDesk {
    pub fn new(api: ModeratorApi) -> Self {
        Self {
            api,
            profiles: Vec::new(),
            reports: Vec::new(),
            stats: None,
            loading: false,
            load_generation: 0,
            notices: Vec::new(),
        }
    }

    pub fn api(&self) -> &ModeratorApi {
        &self.api
    }

    pub fn profiles(&self) -> &[ModeratorProfile] {
        &self.profiles
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of the newest started load
    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain queued notices (oldest first)
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Mark a new load as started and return its number
    pub fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.loading = true;
        self.load_generation
    }

    /// Fold a joint load result into the desk. Results of superseded loads are
    /// dropped. On failure prior data stays.
    pub fn apply_snapshot(&mut self, generation: u64, result: Result<Snapshot, ApiError>) {
        if generation < self.load_generation {
            debug!(generation, latest = self.load_generation, "dropping superseded load");
            return;
        }

        self.loading = false;

        match result {
            Ok(snapshot) => {
                info!(
                    generation,
                    profiles = snapshot.profiles.len(),
                    reports = snapshot.reports.len(),
                    "moderation data loaded"
                );
                self.profiles = snapshot.profiles;
                self.reports = snapshot.reports;
                self.stats = Some(snapshot.stats);
            }
            Err(e) => {
                warn!(error = %e, "failed to load moderation data");
                self.notices.push(Notice::error("Error", "Failed to load data"));
            }
        }
    }

    /// Fold a settled action into the desk. Returns true when a refetch is due.
    pub fn apply_action(&mut self, action: ModAction, result: Result<(), ApiError>) -> bool {
        match result {
            Ok(()) => {
                info!(action = action.name(), target = action.target_id(), "moderation action applied");
                let id = action.target_id();
                if action.targets_profile() {
                    self.profiles.retain(|p| p.id != id);
                } else {
                    self.reports.retain(|r| r.id != id);
                }
                self.notices.push(Notice::success("Done", action.success_message()));
                true
            }
            Err(e) => {
                warn!(action = action.name(), target = action.target_id(), error = %e, "moderation action failed");
                self.notices.push(Notice::error("Error", "Action failed"));
                false
            }
        }
    }
}
