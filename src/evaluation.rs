use log::debug;

use crate::aggregation::aggregate_metrics;
use crate::engine::InferenceEngine;
use crate::errors::*;
use crate::models::{IntentCounters, IntentCounts, ParsingError};
use crate::splits::LabeledUtterance;
use crate::utils::{error_chain_message, IntentName};

/// Outcome of the intent classification of a single utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionOutcome {
    TruePositive {
        intent: IntentName,
    },
    /// Counts as a false negative for the expected intent and as a false
    /// positive for the detected one
    Misclassification {
        expected: IntentName,
        detected: IntentName,
    },
    /// An intent was expected but none was detected
    FalseNegative {
        expected: IntentName,
    },
    /// No intent was expected but one was detected
    FalsePositive {
        detected: IntentName,
    },
    TrueNegative,
}

impl PredictionOutcome {
    pub fn new(expected_intent: Option<&str>, detected_intent: Option<&str>) -> Self {
        match (expected_intent, detected_intent) {
            (Some(expected), Some(detected)) if expected == detected => {
                PredictionOutcome::TruePositive {
                    intent: expected.to_string(),
                }
            }
            (Some(expected), Some(detected)) => PredictionOutcome::Misclassification {
                expected: expected.to_string(),
                detected: detected.to_string(),
            },
            (Some(expected), None) => PredictionOutcome::FalseNegative {
                expected: expected.to_string(),
            },
            (None, Some(detected)) => PredictionOutcome::FalsePositive {
                detected: detected.to_string(),
            },
            (None, None) => PredictionOutcome::TrueNegative,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            PredictionOutcome::TruePositive { .. } | PredictionOutcome::TrueNegative => false,
            _ => true,
        }
    }

    pub fn counters(&self) -> IntentCounters {
        let mut counters = IntentCounters::new();
        match self {
            PredictionOutcome::TruePositive { intent } => {
                counters.insert(intent.clone(), IntentCounts::true_positive());
            }
            PredictionOutcome::Misclassification { expected, detected } => {
                counters.insert(expected.clone(), IntentCounts::false_negative());
                counters.insert(detected.clone(), IntentCounts::false_positive());
            }
            PredictionOutcome::FalseNegative { expected } => {
                counters.insert(expected.clone(), IntentCounts::false_negative());
            }
            PredictionOutcome::FalsePositive { detected } => {
                counters.insert(detected.clone(), IntentCounts::false_positive());
            }
            PredictionOutcome::TrueNegative => {}
        }
        counters
    }
}

/// Raw counts produced by the evaluation of an engine on a test set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineEvaluation {
    pub counters: IntentCounters,
    pub parsing_errors: Vec<ParsingError>,
}

/// Runs the engine on every test utterance and counts the outcomes per intent.
///
/// In verbose mode, each misprediction is also recorded as a `ParsingError`.
/// Parsing failures of the engine are reported as `NluMetricsError::Inference`.
pub fn compute_engine_metrics<I: InferenceEngine>(
    engine: &I,
    test_utterances: &[LabeledUtterance],
    verbose: bool,
) -> Result<EngineEvaluation> {
    let mut evaluation = EngineEvaluation::default();
    for (intent_name, utterance) in test_utterances {
        let input = utterance.text();
        let parsing = engine.parse(&input).map_err(|error| {
            failure::Error::from(NluMetricsError::Inference(format!(
                "cannot parse '{}': {}",
                input,
                error_chain_message(&error)
            )))
        })?;
        let outcome =
            PredictionOutcome::new(Some(intent_name.as_str()), parsing.detected_intent());
        if outcome.is_error() {
            debug!(
                "Wrong prediction for '{}': expected {:?}, found {:?}",
                input,
                intent_name,
                parsing.detected_intent()
            );
            if verbose {
                evaluation.parsing_errors.push(ParsingError {
                    input: input.clone(),
                    expected_intent: Some(intent_name.clone()),
                    detected_intent: parsing.intent.intent_name.clone(),
                });
            }
        }
        evaluation.counters = aggregate_metrics(evaluation.counters, outcome.counters());
    }
    Ok(evaluation)
}
