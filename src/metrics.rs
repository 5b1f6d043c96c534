use failure::ResultExt;
use log::{info, warn};

use crate::aggregation::{aggregate_metrics, compute_precision_recall};
use crate::engine::{train_and_load, InferenceEngine, TrainableEngine};
use crate::errors::*;
use crate::evaluation::compute_engine_metrics;
use crate::models::{
    CrossValidationMetrics, Dataset, IntentCounters, MetricsConfig, MetricsOutcome,
    TrainTestMetrics,
};
use crate::splits::{create_k_fold_batches, get_stratified_utterances};

/// Computes the intent classification metrics of an engine on `dataset` using
/// k-fold cross validation.
///
/// A fresh engine is trained on each fold and loaded back from its serialized
/// model. The run is all or nothing: the first training or inference failure
/// ends it with a `MetricsOutcome::Failed`, and datasets which are too small
/// for the requested configuration yield a `MetricsOutcome::Skipped`.
///
/// Errors are only returned for malformed datasets and invalid configurations.
pub fn compute_cross_val_metrics<T, I>(
    dataset: &Dataset,
    training_config: &T::Config,
    config: MetricsConfig,
) -> Result<CrossValidationMetrics>
where
    T: TrainableEngine,
    I: InferenceEngine,
{
    dataset.validate()?;
    let outcome = cross_val_outcome::<T, I>(dataset, training_config, config)?;
    Ok(CrossValidationMetrics { config, outcome })
}

fn cross_val_outcome<T, I>(
    dataset: &Dataset,
    training_config: &T::Config,
    config: MetricsConfig,
) -> Result<MetricsOutcome>
where
    T: TrainableEngine,
    I: InferenceEngine,
{
    let total_utterances = dataset.total_utterances();
    let folds = match create_k_fold_batches(
        dataset,
        config.nb_folds,
        config.training_utterances,
        config.seed,
    ) {
        Ok(folds) => folds,
        Err(error) => match error.downcast::<NluMetricsError>() {
            Ok(NluMetricsError::NotEnoughUtterances(nb_utterances)) => {
                warn!(
                    "Skipping dataset because number of utterances is too low ({})",
                    total_utterances
                );
                return Ok(MetricsOutcome::Skipped {
                    reason: format!("not enough utterances for training ({})", nb_utterances),
                });
            }
            Ok(other) => return Err(other.into()),
            Err(error) => return Err(error),
        },
    };

    let nb_folds = folds.len();
    let mut counters = IntentCounters::new();
    for (fold_index, fold) in folds.into_iter().enumerate() {
        info!("Processing fold {}/{} ...", fold_index + 1, nb_folds);
        let engine = match train_and_load::<T, I>(&fold.train_dataset, training_config) {
            Ok(engine) => engine,
            Err(error) => return Ok(failed_outcome("training error", &error)),
        };
        let evaluation = match compute_engine_metrics(&engine, &fold.test_utterances, false) {
            Ok(evaluation) => evaluation,
            Err(error) => return Ok(failed_outcome("inference error", &error)),
        };
        counters = aggregate_metrics(counters, evaluation.counters);
    }

    Ok(MetricsOutcome::Succeeded(compute_precision_recall(
        counters,
        &dataset.nb_utterances(),
    )))
}

/// Computes the intent classification metrics of an engine trained on
/// `train_dataset` and evaluated on `test_dataset`.
///
/// Training is always attempted. Test utterances are evaluated in the
/// deterministic stratified order of `test_dataset`, and in verbose mode every
/// misprediction is reported in `TrainTestMetrics::parsing_errors`.
pub fn compute_train_test_metrics<T, I>(
    train_dataset: &Dataset,
    test_dataset: &Dataset,
    training_config: &T::Config,
    verbose: bool,
) -> Result<TrainTestMetrics>
where
    T: TrainableEngine,
    I: InferenceEngine,
{
    train_dataset
        .validate()
        .with_context(|_| "Invalid training dataset")?;
    test_dataset
        .validate()
        .with_context(|_| "Invalid test dataset")?;

    let engine = match train_and_load::<T, I>(train_dataset, training_config) {
        Ok(engine) => engine,
        Err(error) => {
            return Ok(TrainTestMetrics {
                outcome: failed_outcome("training error", &error),
                parsing_errors: vec![],
            })
        }
    };
    let test_utterances = get_stratified_utterances(test_dataset, None, false, None);
    info!("Evaluating engine on {} utterances ...", test_utterances.len());
    let evaluation = match compute_engine_metrics(&engine, &test_utterances, verbose) {
        Ok(evaluation) => evaluation,
        Err(error) => {
            return Ok(TrainTestMetrics {
                outcome: failed_outcome("inference error", &error),
                parsing_errors: vec![],
            })
        }
    };
    let metrics = compute_precision_recall(evaluation.counters, &test_dataset.nb_utterances());
    Ok(TrainTestMetrics {
        outcome: MetricsOutcome::Succeeded(metrics),
        parsing_errors: evaluation.parsing_errors,
    })
}

fn failed_outcome(stage: &str, error: &failure::Error) -> MetricsOutcome {
    let message = match error.downcast_ref::<NluMetricsError>() {
        Some(NluMetricsError::Training(message)) | Some(NluMetricsError::Inference(message)) => {
            message.clone()
        }
        _ => error.to_string(),
    };
    warn!("Aborting metrics computation because of {}: {}", stage, message);
    MetricsOutcome::Failed {
        reason: format!("{}: {}", stage, message),
    }
}
