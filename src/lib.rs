mod aggregation;
mod engine;
pub mod errors;
mod evaluation;
mod lookup_engine;
mod metrics;
pub mod models;
mod splits;
#[cfg(test)]
mod testutils;
mod utils;

pub use crate::aggregation::{aggregate_metrics, compute_precision_recall};
pub use crate::engine::{train_and_load, InferenceEngine, TrainableEngine};
pub use crate::errors::*;
pub use crate::evaluation::{compute_engine_metrics, EngineEvaluation, PredictionOutcome};
pub use crate::lookup_engine::{LookupEngineConfig, LookupInferenceEngine, LookupTrainableEngine};
pub use crate::metrics::{compute_cross_val_metrics, compute_train_test_metrics};
pub use crate::models::*;
pub use crate::splits::{create_k_fold_batches, get_stratified_utterances, Fold, LabeledUtterance};
pub use crate::utils::{normalize_utterance, tokenize_light, EntityName, IntentName, SlotName};
