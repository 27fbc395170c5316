//! Naive-Bayes posterior, joint probability, and evidence calculations.
//!
//! The functions here are stateless: every call takes caller-owned feature
//! maps and selections and returns freshly built values. The aggregate
//! [`calculate`] routine composes them into a three-phase scoring pipeline
//! whose normalized scores sum to a checksum of ≈ 1.0.
//!
//! Two reduction modes are supported for the posterior, selected via
//! [`PosteriorMode`]. The default `Legacy` mode preserves the exact
//! reduction order of the reference scoring tables, including its
//! degenerate behavior for selections longer than two names; `Product` is
//! the plain left-to-right product over the whole selection.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{CredenceError, Result};
use crate::core::rounding::round_to;

/// Module identity used to prefix validation error messages.
pub const NAME: &str = "bayes";

/// Reduction strategy for [`posterior_with_mode`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PosteriorMode {
    /// Reference reduction: combines the feature values of consecutive
    /// selection *names*. After the first step the running value is a
    /// number, its lookup as a name misses, and selections longer than two
    /// names collapse to `NaN`. A single name returns its feature value;
    /// two names return their product.
    #[default]
    Legacy,

    /// Mathematically complete product of every selected feature value,
    /// left to right.
    Product,
}

/// A named classification candidate: a feature selection, the likelihood
/// map to resolve it against, and a prior probability in (0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Name the scored entry is keyed under in [`BayesResults`]
    pub name: String,

    /// Ordered feature names to multiply; duplicates allowed, length ≥ 1
    pub selected: Vec<String>,

    /// Feature name → likelihood in [0, 1]
    pub features: HashMap<String, f64>,

    /// Prior probability of this candidate
    pub prior: f64,
}

impl Item {
    /// Create a new item with an empty selection and feature map
    pub fn new(name: impl Into<String>, prior: f64) -> Self {
        Self {
            name: name.into(),
            selected: Vec::new(),
            features: HashMap::new(),
            prior,
        }
    }

    /// Set the ordered feature selection
    pub fn with_selection<S: Into<String>>(mut self, selected: impl IntoIterator<Item = S>) -> Self {
        self.selected = selected.into_iter().map(Into::into).collect();
        self
    }

    /// Add a single feature likelihood
    pub fn with_feature(mut self, name: impl Into<String>, likelihood: f64) -> Self {
        self.features.insert(name.into(), likelihood);
        self
    }

    /// Replace the whole feature map
    pub fn with_features(mut self, features: HashMap<String, f64>) -> Self {
        self.features = features;
        self
    }
}

/// Rounded joint probability and normalized score for one item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ItemScore {
    /// Joint probability (posterior × prior), rounded to the requested precision
    pub joint: f64,

    /// Normalized score (joint / evidence), rounded to the requested precision
    pub score: f64,
}

/// Output of the aggregate calculation.
///
/// `items` preserves the arrival order of the input; an item that reuses an
/// earlier name overwrites that entry in place while its joint still counts
/// toward the evidence sum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BayesResults {
    /// Item name → rounded joint and score, in arrival order
    pub items: IndexMap<String, ItemScore>,

    /// Sum of the rounded scores, itself rounded; ≈ 1.0 for well-formed input
    pub checksum: f64,
}

/// Feature lookup with `NaN` for missing names, so malformed selections
/// poison the arithmetic instead of erroring.
fn feature_value(features: &HashMap<String, f64>, name: &str) -> f64 {
    features.get(name).copied().unwrap_or(f64::NAN)
}

/// Running state of the legacy reduction: a name before the first combine,
/// a number afterwards.
enum Reduced<'a> {
    Name(&'a str),
    Value(f64),
}

/// Posterior likelihood of `selected` under `features`, in [`PosteriorMode::Legacy`].
///
/// Returns a validation error for an empty selection. Missing feature names
/// propagate as `NaN`.
pub fn posterior<S: AsRef<str>>(selected: &[S], features: &HashMap<String, f64>) -> Result<f64> {
    posterior_with_mode(selected, features, PosteriorMode::default())
}

/// Posterior likelihood of `selected` under `features` with an explicit
/// reduction mode.
pub fn posterior_with_mode<S: AsRef<str>>(
    selected: &[S],
    features: &HashMap<String, f64>,
    mode: PosteriorMode,
) -> Result<f64> {
    let (first, rest) = selected.split_first().ok_or_else(|| {
        CredenceError::validation_field(
            format!("{NAME}: selection must contain at least one feature name"),
            "selected",
        )
    })?;

    match mode {
        PosteriorMode::Product => Ok(rest.iter().fold(
            feature_value(features, first.as_ref()),
            |acc, name| acc * feature_value(features, name.as_ref()),
        )),
        PosteriorMode::Legacy => {
            let mut acc = Reduced::Name(first.as_ref());
            for name in rest {
                // The combiner resolves the *previous* element again; once
                // the accumulator is a number that lookup misses.
                let prev = match acc {
                    Reduced::Name(n) => feature_value(features, n),
                    Reduced::Value(_) => f64::NAN,
                };
                acc = Reduced::Value(prev * feature_value(features, name.as_ref()));
            }

            Ok(match acc {
                Reduced::Name(n) => feature_value(features, n),
                Reduced::Value(value) => value,
            })
        }
    }
}

/// Joint probability: `posterior × prior`, in [`PosteriorMode::Legacy`].
pub fn joint<S: AsRef<str>>(
    selected: &[S],
    features: &HashMap<String, f64>,
    prior: f64,
) -> Result<f64> {
    joint_with_mode(selected, features, prior, PosteriorMode::default())
}

/// Joint probability with an explicit reduction mode.
pub fn joint_with_mode<S: AsRef<str>>(
    selected: &[S],
    features: &HashMap<String, f64>,
    prior: f64,
    mode: PosteriorMode,
) -> Result<f64> {
    Ok(posterior_with_mode(selected, features, mode)? * prior)
}

/// Evidence: the sum of the competing joint probabilities.
///
/// Returns a validation error for an empty sequence.
pub fn denominator(joints: &[f64]) -> Result<f64> {
    if joints.is_empty() {
        return Err(CredenceError::validation_field(
            format!("{NAME}: evidence requires at least one joint probability"),
            "joints",
        ));
    }

    Ok(joints.iter().sum())
}

/// Normalized score: `numerator / denominator`.
///
/// A zero denominator is not guarded here; the division propagates
/// `inf`/`NaN` per IEEE 754.
pub fn normalize(numerator: f64, denominator: f64) -> f64 {
    numerator / denominator
}

/// Score a set of competing items at the given decimal precision, in
/// [`PosteriorMode::Legacy`].
pub fn calculate(items: &[Item], decimal_places: u32) -> Result<BayesResults> {
    calculate_with_mode(items, decimal_places, PosteriorMode::default())
}

/// Score a set of competing items with an explicit reduction mode.
///
/// Three phases:
/// 1. each item's joint probability is computed, rounded, and stored under
///    the item name; the unrounded joints are collected in arrival order;
/// 2. the evidence denominator is summed over the *unrounded* joints;
/// 3. each rounded joint is normalized against the evidence and rounded,
///    and the rounded scores accumulate into the checksum, which is itself
///    rounded at the end.
///
/// Missing feature names surface as `NaN` joints and scores rather than
/// errors; an empty selection on any item aborts the whole call.
pub fn calculate_with_mode(
    items: &[Item],
    decimal_places: u32,
    mode: PosteriorMode,
) -> Result<BayesResults> {
    let mut rounded_joints: IndexMap<String, f64> = IndexMap::with_capacity(items.len());
    let mut joints = Vec::with_capacity(items.len());

    for item in items {
        let joint = joint_with_mode(&item.selected, &item.features, item.prior, mode)?;
        rounded_joints.insert(item.name.clone(), round_to(joint, decimal_places));
        joints.push(joint);
    }

    let evidence = denominator(&joints)?;
    debug!(denominator = evidence, "evidence denominator computed");

    let mut results = BayesResults {
        items: IndexMap::with_capacity(rounded_joints.len()),
        checksum: 0.0,
    };

    for (name, rounded_joint) in rounded_joints {
        let score = round_to(normalize(rounded_joint, evidence), decimal_places);
        results.checksum += score;
        results.items.insert(
            name,
            ItemScore {
                joint: rounded_joint,
                score,
            },
        );
    }

    results.checksum = round_to(results.checksum, decimal_places);

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spam_features() -> HashMap<String, f64> {
        HashMap::from([
            ("love".to_string(), 0.1),
            ("deal".to_string(), 0.8),
            ("life".to_string(), 0.1),
        ])
    }

    fn ham_features() -> HashMap<String, f64> {
        HashMap::from([
            ("love".to_string(), 0.5),
            ("deal".to_string(), 0.2),
            ("life".to_string(), 0.3),
        ])
    }

    #[test]
    fn test_posterior_two_names() {
        let p = posterior(&["love", "deal"], &spam_features()).unwrap();
        assert_eq!(round_to(p, 4), 0.08);

        let p = posterior(&["love", "deal"], &ham_features()).unwrap();
        assert_eq!(round_to(p, 4), 0.10);
    }

    #[test]
    fn test_posterior_single_name_returns_feature_value() {
        let p = posterior(&["deal"], &spam_features()).unwrap();
        assert_relative_eq!(p, 0.8);

        // Product mode agrees for a single name
        let p = posterior_with_mode(&["deal"], &spam_features(), PosteriorMode::Product).unwrap();
        assert_relative_eq!(p, 0.8);
    }

    #[test]
    fn test_posterior_legacy_three_names_degrades_to_nan() {
        let p = posterior(&["love", "deal", "life"], &spam_features()).unwrap();
        assert!(p.is_nan());
    }

    #[test]
    fn test_posterior_product_three_names() {
        let p = posterior_with_mode(
            &["love", "deal", "life"],
            &spam_features(),
            PosteriorMode::Product,
        )
        .unwrap();
        assert_relative_eq!(p, 0.008, max_relative = 1e-12);
    }

    #[test]
    fn test_posterior_duplicate_names() {
        let p = posterior(&["deal", "deal"], &spam_features()).unwrap();
        assert_relative_eq!(p, 0.64, max_relative = 1e-12);
    }

    #[test]
    fn test_posterior_missing_feature_is_nan() {
        let p = posterior(&["love", "unknown"], &spam_features()).unwrap();
        assert!(p.is_nan());
    }

    #[test]
    fn test_posterior_empty_selection_is_validation_error() {
        let selected: Vec<&str> = Vec::new();
        let err = posterior(&selected, &spam_features()).unwrap_err();
        assert!(matches!(err, CredenceError::Validation { .. }));
    }

    #[test]
    fn test_joint_applies_prior() {
        let j = joint(&["love", "deal"], &spam_features(), 0.5).unwrap();
        assert_eq!(round_to(j, 4), 0.04);

        let j = joint(&["love", "deal"], &ham_features(), 0.5).unwrap();
        assert_eq!(round_to(j, 4), 0.05);
    }

    #[test]
    fn test_denominator_sums_joints() {
        let d = denominator(&[0.04, 0.05]).unwrap();
        assert_relative_eq!(d, 0.09, max_relative = 1e-12);
    }

    #[test]
    fn test_denominator_empty_is_validation_error() {
        let err = denominator(&[]).unwrap_err();
        assert!(matches!(err, CredenceError::Validation { .. }));
    }

    #[test]
    fn test_normalize_scores_sum_to_one() {
        let a = round_to(normalize(0.04, 0.09), 4);
        let b = round_to(normalize(0.05, 0.09), 4);
        assert_eq!(a, 0.4444);
        assert_eq!(b, 0.5556);
        assert_eq!(round_to(a + b, 4), 1.0);
    }

    #[test]
    fn test_normalize_zero_denominator_propagates() {
        assert_eq!(normalize(0.04, 0.0), f64::INFINITY);
        assert!(normalize(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_calculate_reference_scenario() {
        let items = vec![
            Item::new("Chris", 0.5)
                .with_selection(["love", "deal"])
                .with_features(spam_features()),
            Item::new("Mary", 0.5)
                .with_selection(["love", "deal"])
                .with_features(ham_features()),
        ];

        let results = calculate(&items, 4).unwrap();

        let chris = &results.items["Chris"];
        assert_eq!(chris.joint, 0.04);
        assert_eq!(chris.score, 0.4444);

        let mary = &results.items["Mary"];
        assert_eq!(mary.joint, 0.05);
        assert_eq!(mary.score, 0.5556);

        assert_eq!(results.checksum, 1.0);
    }

    #[test]
    fn test_calculate_preserves_arrival_order() {
        let items = vec![
            Item::new("zeta", 0.5)
                .with_selection(["love", "deal"])
                .with_features(spam_features()),
            Item::new("alpha", 0.5)
                .with_selection(["love", "deal"])
                .with_features(ham_features()),
        ];

        let results = calculate(&items, 4).unwrap();
        let names: Vec<&str> = results.items.keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn test_calculate_duplicate_names_overwrite_but_count_in_evidence() {
        let items = vec![
            Item::new("Chris", 0.5)
                .with_selection(["love", "deal"])
                .with_features(spam_features()),
            Item::new("Chris", 0.5)
                .with_selection(["love", "deal"])
                .with_features(ham_features()),
        ];

        let results = calculate(&items, 4).unwrap();
        assert_eq!(results.items.len(), 1);

        // Evidence still covers both joints, so the surviving entry scores
        // against 0.09, not against its own joint alone.
        assert_eq!(results.items["Chris"].joint, 0.05);
        assert_eq!(results.items["Chris"].score, 0.5556);
    }

    #[test]
    fn test_calculate_missing_feature_poisons_scores_not_errors() {
        let items = vec![
            Item::new("Chris", 0.5)
                .with_selection(["love", "unknown"])
                .with_features(spam_features()),
            Item::new("Mary", 0.5)
                .with_selection(["love", "deal"])
                .with_features(ham_features()),
        ];

        let results = calculate(&items, 4).unwrap();
        assert!(results.items["Chris"].joint.is_nan());
        assert!(results.items["Chris"].score.is_nan());
        assert!(results.checksum.is_nan());
    }

    #[test]
    fn test_calculate_empty_selection_aborts() {
        let items = vec![Item::new("Chris", 0.5).with_features(spam_features())];
        assert!(calculate(&items, 4).is_err());
    }

    #[test]
    fn test_calculate_idempotent() {
        let items = vec![
            Item::new("Chris", 0.5)
                .with_selection(["life", "deal"])
                .with_features(spam_features()),
            Item::new("Mary", 0.5)
                .with_selection(["life", "deal"])
                .with_features(ham_features()),
        ];

        let first = calculate(&items, 4).unwrap();
        let second = calculate(&items, 4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_posterior_mode_default_is_legacy() {
        assert_eq!(PosteriorMode::default(), PosteriorMode::Legacy);
    }

    #[test]
    fn test_item_builder() {
        let item = Item::new("Chris", 0.5)
            .with_selection(["love", "deal"])
            .with_feature("love", 0.1)
            .with_feature("deal", 0.8);

        assert_eq!(item.name, "Chris");
        assert_eq!(item.prior, 0.5);
        assert_eq!(item.selected, ["love", "deal"]);
        assert_eq!(item.features["deal"], 0.8);
    }
}
