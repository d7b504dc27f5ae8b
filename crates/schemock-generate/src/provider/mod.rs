//! Value provider seam.
//!
//! The engine asks a [`ValueProvider`] for every random decision, so a
//! seeded provider makes a whole generation pass reproducible.

mod faker;
mod locales;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use faker::FakerProvider;
pub use locales::LocaleKey;

/// UUID flavor requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidVersion {
    Any,
    V4,
    V6,
    V7,
}

/// A pattern the provider could not synthesize strings for.
#[derive(Debug, Clone, Error)]
#[error("invalid pattern `{pattern}`: {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

/// Source of primitive sample values.
pub trait ValueProvider {
    /// A single lowercase word.
    fn word(&mut self) -> String;
    /// Filler text of exactly `len` characters.
    fn text(&mut self, len: usize) -> String;
    fn email(&mut self) -> String;
    fn url(&mut self) -> String;
    fn jwt(&mut self) -> String;
    fn emoji(&mut self) -> String;
    fn uuid(&mut self, version: UuidVersion) -> String;
    fn nanoid(&mut self) -> String;
    fn ulid(&mut self) -> String;
    fn ipv4(&mut self) -> String;
    fn ipv6(&mut self) -> String;
    /// Instant in `[min, max]`.
    fn date(&mut self, min: DateTime<Utc>, max: DateTime<Utc>) -> DateTime<Utc>;
    /// Integer in `[min, max]`.
    fn int(&mut self, min: i64, max: i64) -> i64;
    /// Float in `[min, max]`.
    fn float(&mut self, min: f64, max: f64) -> f64;
    /// Big integer in `[min, max]`.
    fn big_int(&mut self, min: i128, max: i128) -> i128;
    /// `true` with the given probability.
    fn boolean(&mut self, probability: f64) -> bool;
    /// Index in `[0, len)`; `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;
    /// String matching a regular expression.
    fn matching(&mut self, pattern: &str) -> Result<String, PatternError>;
}
