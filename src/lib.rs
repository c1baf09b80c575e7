//! Round-based football match statistics collection pipeline.
//!
//! Fetches a round's match list and per-match detail from a SofaScore-shaped
//! REST API, normalizes per-player, per-team and card records, appends them
//! to an analytical store and recomputes the per-season team caches.

pub mod api;
pub mod cache;
pub mod collector;
pub mod config;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod persistence;

pub use config::AppConfig;
pub use error::{MatchdayError, Result};
