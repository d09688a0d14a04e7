pub mod models;
pub mod notice;
pub mod sample;
pub mod onboarding;
pub mod swipe;
pub mod error;
pub mod moderator_api;
pub mod moderation;

pub use error::ApiError;
pub use moderation::ModerationDesk;
pub use moderator_api::{ModAction, ModeratorApi, Snapshot};
pub use notice::{Notice, NoticeKind};
pub use onboarding::{FormError, FormField, ProfileForm};
pub use swipe::{DemoCoinFlip, LikeBudget, MatchDecider, SwipeSession};
