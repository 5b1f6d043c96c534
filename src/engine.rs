use failure::ResultExt;
use log::info;

use crate::errors::*;
use crate::models::{Dataset, IntentParserResult};
use crate::utils::error_chain_message;

/// Engine which can be trained on a dataset and exported as a model
pub trait TrainableEngine: Sized {
    /// Training parameters used to build a fresh engine
    type Config;

    fn from_config(config: &Self::Config) -> Result<Self>;

    fn fit(&mut self, dataset: &Dataset) -> Result<()>;

    /// Serialized form of the trained model, as it would be persisted
    fn to_model(&self) -> Result<serde_json::Value>;
}

/// Engine which parses inputs using a previously exported model
pub trait InferenceEngine: Sized {
    fn from_model(language: &str, model: serde_json::Value) -> Result<Self>;

    fn parse(&self, input: &str) -> Result<IntentParserResult>;
}

/// Trains a fresh engine on `train_dataset` and loads an inference engine from
/// its serialized model.
///
/// Any error raised while building, fitting, exporting or loading is reported
/// as a `NluMetricsError::Training`, whose message contains the whole chain
/// of causes.
pub fn train_and_load<T, I>(train_dataset: &Dataset, training_config: &T::Config) -> Result<I>
where
    T: TrainableEngine,
    I: InferenceEngine,
{
    build_inference_engine::<T, I>(train_dataset, training_config).map_err(|error| {
        NluMetricsError::Training(error_chain_message(&error)).into()
    })
}

fn build_inference_engine<T, I>(train_dataset: &Dataset, training_config: &T::Config) -> Result<I>
where
    T: TrainableEngine,
    I: InferenceEngine,
{
    info!(
        "Training engine on {} utterances ...",
        train_dataset.total_utterances()
    );
    let mut trainable_engine = T::from_config(training_config)?;
    trainable_engine.fit(train_dataset)?;
    let model = trainable_engine.to_model()?;
    let inference_engine = I::from_model(&train_dataset.language, model)
        .with_context(|_| "Cannot load inference engine from trained model")?;
    info!("Inference engine loaded");
    Ok(inference_engine)
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;

    use super::*;
    use crate::testutils::*;

    #[test]
    fn test_train_and_load_round_trips_model() {
        // Given
        let dataset = build_dataset(btreemap![
            "intent1" => vec!["foo bar"],
            "intent2" => vec!["foo baz"],
        ]);
        let config = OracleEngineConfig::from_dataset(&dataset);

        // When
        let engine =
            train_and_load::<OracleTrainableEngine, OracleInferenceEngine>(&dataset, &config)
                .unwrap();

        // Then
        let parsing = engine.parse("foo baz").unwrap();
        assert_eq!(Some("intent2"), parsing.detected_intent());
        assert_eq!("en", engine.language);
    }

    #[test]
    fn test_train_and_load_reports_training_failure() {
        // Given
        let dataset = build_dataset(btreemap!["intent1" => vec!["foo bar"]]);
        let config = FailingEngineConfig {
            message: "unsupported language".to_string(),
        };

        // When
        let error =
            train_and_load::<FailingTrainableEngine, NullInferenceEngine>(&dataset, &config)
                .err()
                .unwrap();

        // Then
        match error.downcast_ref::<NluMetricsError>() {
            Some(NluMetricsError::Training(message)) => {
                assert!(message.contains("unsupported language"))
            }
            _ => panic!("expected a training error, found: {}", error),
        }
    }
}
