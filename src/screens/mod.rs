pub mod swipe;
pub mod moderation;

// Two full-screen interfaces:
// - swipe: onboarding form, then Browse / Mutual / Profile / Help tabs
// - moderation: pending profiles, reports and stats from the moderator API
//
// Both show a help or detail overlay and a one-line notice footer.

pub use moderation::run_moderation_tui;
