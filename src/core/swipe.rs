/// Browse flow: candidate cursor, daily like budget and the match list

use chrono::{Local, NaiveDate};
use rand::Rng;
use tracing::{debug, info};

use crate::core::models::{Match, Profile};
use crate::core::notice::Notice;
use crate::utils::constants::{DAILY_LIKE_LIMIT, MUTUAL_LIKE_THRESHOLD};

/// Decides whether a like is reciprocated.
///
/// There is no reciprocal-like backend behind the swipe screen yet, so the
/// only implementation is [`DemoCoinFlip`], which flags itself as simulated.
#[cfg_attr(test, mockall::automock)]
pub trait MatchDecider {
    fn is_mutual(&mut self, candidate: &Profile) -> bool;

    /// True when the answer is made up on the client
    fn is_simulated(&self) -> bool;
}

/// Demo matching: a uniform draw above the threshold counts as mutual (~30%)
pub struct DemoCoinFlip<R: Rng> {
    rng: R,
}

impl DemoCoinFlip<rand::rngs::ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::thread_rng() }
    }
}

impl Default for DemoCoinFlip<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DemoCoinFlip<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn draw_is_mutual(draw: f64) -> bool {
        draw > MUTUAL_LIKE_THRESHOLD
    }
}

impl<R: Rng> MatchDecider for DemoCoinFlip<R> {
    fn is_mutual(&mut self, _candidate: &Profile) -> bool {
        let draw: f64 = self.rng.gen();
        Self::draw_is_mutual(draw)
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Likes left for the day, restored to the limit when the local date changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeBudget {
    remaining: u32,
    limit: u32,
    day: NaiveDate,
}

impl LikeBudget {
    pub fn new(limit: u32, day: NaiveDate) -> Self {
        Self { remaining: limit, limit, day }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn used(&self) -> u32 {
        self.limit - self.remaining
    }

    /// Start a fresh day's budget if `today` is later than the seeded day
    pub fn roll_over(&mut self, today: NaiveDate) {
        if today > self.day {
            debug!("like budget reset for {}", today);
            self.day = today;
            self.remaining = self.limit;
        }
    }

    /// Take one like. Returns false (and changes nothing) when exhausted.
    pub fn try_spend(&mut self, today: NaiveDate) -> bool {
        self.roll_over(today);
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Swipe session over a fixed candidate list
pub struct SwipeSession {
    candidates: Vec<Profile>,
    index: usize,
    budget: LikeBudget,
    matches: Vec<Match>,
    decider: Box<dyn MatchDecider>,
}

impl SwipeSession {
    /// `candidates` must not be empty
    pub fn new(candidates: Vec<Profile>, decider: Box<dyn MatchDecider>, today: NaiveDate) -> Self {
        assert!(!candidates.is_empty(), "swipe session needs at least one candidate");
        Self {
            candidates,
            index: 0,
            budget: LikeBudget::new(DAILY_LIKE_LIMIT, today),
            matches: Vec::new(),
            decider,
        }
    }

    pub fn current(&self) -> &Profile {
        &self.candidates[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn candidates(&self) -> &[Profile] {
        &self.candidates
    }

    pub fn budget(&self) -> &LikeBudget {
        &self.budget
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn is_simulated(&self) -> bool {
        self.decider.is_simulated()
    }

    /// Share of today's likes already used, 0.0..=1.0
    pub fn progress(&self) -> f64 {
        if self.budget.limit() == 0 {
            return 0.0;
        }
        self.budget.used() as f64 / self.budget.limit() as f64
    }

    /// Restore the budget when the day changed while the screen stayed open
    pub fn refresh_day(&mut self, today: NaiveDate) {
        self.budget.roll_over(today);
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.candidates.len();
    }

    pub fn skip(&mut self) {
        self.advance();
    }

    pub fn like(&mut self) -> Notice {
        self.like_on(Local::now().date_naive())
    }

    /// Like the current candidate as of `today`
    pub fn like_on(&mut self, today: NaiveDate) -> Notice {
        if !self.budget.try_spend(today) {
            return Notice::error(
                "Like limit reached",
                format!("{} likes are available per day. Come back tomorrow!", self.budget.limit()),
            );
        }

        let candidate = self.candidates[self.index].clone();
        let mutual = self.decider.is_mutual(&candidate);
        info!(profile_id = candidate.id, mutual, remaining = self.budget.remaining(), "like sent");

        let notice = if mutual {
            self.matches.push(Match {
                profile_id: candidate.id,
                mutual_like: true,
                username: Some(format!("@{}", candidate.name.to_lowercase())),
            });
            Notice::success("💜 It's mutual!", format!("You can message {}", candidate.name))
        } else {
            self.matches.push(Match {
                profile_id: candidate.id,
                mutual_like: false,
                username: None,
            });
            Notice::info("Like sent", "If they like you back, you'll find out")
        };

        self.advance();
        notice
    }

    /// Acknowledge a report. Nothing is captured or sent.
    pub fn report(&self) -> Notice {
        Notice::info("Report sent", "A moderator will review it shortly")
    }

    /// Mutual matches joined with their candidate, in like order
    pub fn mutual_matches(&self) -> Vec<(&Match, &Profile)> {
        self.matches
            .iter()
            .filter(|m| m.mutual_like)
            .filter_map(|m| {
                self.candidates
                    .iter()
                    .find(|p| p.id == m.profile_id)
                    .map(|p| (m, p))
            })
            .collect()
    }
}
