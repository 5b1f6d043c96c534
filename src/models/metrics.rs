use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::utils::IntentName;

pub const DEFAULT_NB_FOLDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub nb_folds: usize,
    pub training_utterances: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            nb_folds: DEFAULT_NB_FOLDS,
            training_utterances: None,
            seed: None,
        }
    }
}

/// Raw classification counts of a single intent
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

pub type IntentCounters = BTreeMap<IntentName, IntentCounts>;

impl IntentCounts {
    pub fn true_positive() -> Self {
        IntentCounts {
            true_positive: 1,
            ..Default::default()
        }
    }

    pub fn false_positive() -> Self {
        IntentCounts {
            false_positive: 1,
            ..Default::default()
        }
    }

    pub fn false_negative() -> Self {
        IntentCounts {
            false_negative: 1,
            ..Default::default()
        }
    }

    /// tp / (tp + fp), or 0 when nothing was predicted for the intent
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// tp / (tp + fn), or 0 when the intent was never expected
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Add for IntentCounts {
    type Output = IntentCounts;

    fn add(self, other: IntentCounts) -> IntentCounts {
        IntentCounts {
            true_positive: self.true_positive + other.true_positive,
            false_positive: self.false_positive + other.false_positive,
            false_negative: self.false_negative + other.false_negative,
        }
    }
}

impl AddAssign for IntentCounts {
    fn add_assign(&mut self, other: IntentCounts) {
        *self = *self + other;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentMetrics {
    #[serde(flatten)]
    pub counts: IntentCounts,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub intent_utterances: usize,
}

pub type Metrics = BTreeMap<IntentName, IntentMetrics>;

/// Outcome of a metrics computation
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsOutcome {
    /// Nothing was attempted, typically because the dataset is too small
    Skipped { reason: String },
    /// Training or inference failed on one of the splits
    Failed { reason: String },
    Succeeded(Metrics),
}

impl MetricsOutcome {
    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            MetricsOutcome::Succeeded(metrics) => Some(metrics),
            MetricsOutcome::Skipped { .. } | MetricsOutcome::Failed { .. } => None,
        }
    }

    pub fn training_info(&self) -> Option<&str> {
        match self {
            MetricsOutcome::Skipped { reason } | MetricsOutcome::Failed { reason } => {
                Some(reason.as_str())
            }
            MetricsOutcome::Succeeded(_) => None,
        }
    }
}

/// Mismatch between the expected and the detected intent of a test utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsingError {
    pub input: String,
    pub expected_intent: Option<IntentName>,
    pub detected_intent: Option<IntentName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidationMetrics {
    pub config: MetricsConfig,
    pub outcome: MetricsOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestMetrics {
    pub outcome: MetricsOutcome,
    /// Only filled in verbose mode
    pub parsing_errors: Vec<ParsingError>,
}

impl Serialize for CrossValidationMetrics {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let training_info = self.outcome.training_info();
        let nb_fields = if training_info.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("CrossValidationMetrics", nb_fields)?;
        state.serialize_field("config", &self.config)?;
        state.serialize_field("metrics", &self.outcome.metrics())?;
        if let Some(info) = training_info {
            state.serialize_field("training_info", info)?;
        }
        state.end()
    }
}

impl Serialize for TrainTestMetrics {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let training_info = self.outcome.training_info();
        let nb_fields = 1
            + training_info.map(|_| 1).unwrap_or(0)
            + if self.parsing_errors.is_empty() { 0 } else { 1 };
        let mut state = serializer.serialize_struct("TrainTestMetrics", nb_fields)?;
        state.serialize_field("metrics", &self.outcome.metrics())?;
        if let Some(info) = training_info {
            state.serialize_field("training_info", info)?;
        }
        if !self.parsing_errors.is_empty() {
            state.serialize_field("parsing_errors", &self.parsing_errors)?;
        }
        state.end()
    }
}
