//! # Credence-RS: Naive-Bayes Scoring and Pearson Correlation
//!
//! A small statistical library crate providing two independent, stateless
//! modules of pure numeric functions:
//!
//! - **Bayes scoring**: posterior likelihoods, joint probabilities, evidence
//!   denominators, normalized scores, and an aggregate multi-item
//!   classification routine with a ≈ 1.0 score checksum
//! - **Pearson correlation**: sums, sums of squares, sum of products, and
//!   the correlation coefficient between two equal-length sequences
//!
//! Every function is referentially transparent; the only side channel is a
//! `tracing` diagnostic emitted by the aggregate Bayes calculation, which is
//! inert without a subscriber. There is no persistence, no concurrency, and
//! no I/O surface.
//!
//! ## Quick Start
//!
//! ```rust
//! use credence_rs::{bayes, correlation, Item};
//!
//! fn main() -> credence_rs::Result<()> {
//!     let items = vec![
//!         Item::new("spam", 0.5)
//!             .with_selection(["love", "deal"])
//!             .with_feature("love", 0.1)
//!             .with_feature("deal", 0.8),
//!         Item::new("ham", 0.5)
//!             .with_selection(["love", "deal"])
//!             .with_feature("love", 0.5)
//!             .with_feature("deal", 0.2),
//!     ];
//!
//!     let results = bayes::calculate(&items, 4)?;
//!     assert_eq!(results.items["spam"].score, 0.4444);
//!     assert_eq!(results.checksum, 1.0);
//!
//!     let r = correlation::calculate(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0])?;
//!     assert_eq!(r, 1.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core statistical modules
pub mod core {
    //! Core statistical algorithms and data structures.

    pub mod bayes;
    pub mod correlation;
    pub mod errors;
    pub mod rounding;
}

// Re-export the stats modules and primary types for convenience
pub use crate::core::bayes::{self, BayesResults, Item, ItemScore, PosteriorMode};
pub use crate::core::correlation;
pub use crate::core::errors::{CredenceError, Result, ResultExt};
pub use crate::core::rounding::round_to;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
