use std::collections::BTreeMap;

use failure::format_err;
use serde_json::json;

use crate::engine::{InferenceEngine, TrainableEngine};
use crate::errors::*;
use crate::models::{Dataset, Intent, IntentParserResult, Utterance};
use crate::utils::IntentName;

pub fn epsilon_eq(a: f64, b: f64, epsilon: f64) -> bool {
    let diff = a - b;
    diff < epsilon && diff > -epsilon
}

pub fn build_dataset(intents: BTreeMap<&str, Vec<&str>>) -> Dataset {
    Dataset {
        language: "en".to_string(),
        intents: intents
            .into_iter()
            .map(|(intent_name, utterances)| {
                let intent = Intent {
                    utterances: utterances.into_iter().map(Utterance::from_text).collect(),
                };
                (intent_name.to_string(), intent)
            })
            .collect(),
        entities: BTreeMap::new(),
    }
}

/// Dataset whose utterances are all distinct, e.g. "A utterance 3"
pub fn build_numbered_dataset(nb_utterances: BTreeMap<&str, usize>) -> Dataset {
    let texts: BTreeMap<&str, Vec<String>> = nb_utterances
        .into_iter()
        .map(|(intent_name, count)| {
            let texts = (0..count)
                .map(|index| format!("{} utterance {}", intent_name, index))
                .collect();
            (intent_name, texts)
        })
        .collect();
    build_dataset(
        texts
            .iter()
            .map(|(intent_name, texts)| (*intent_name, texts.iter().map(|t| &**t).collect()))
            .collect(),
    )
}

/// Ground truth which the oracle engine exports as its model, so that it
/// predicts the right intent of any utterance of the dataset
#[derive(Debug, Clone, Default)]
pub struct OracleEngineConfig {
    pub ground_truth: BTreeMap<String, IntentName>,
}

impl OracleEngineConfig {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let ground_truth = dataset
            .intents
            .iter()
            .flat_map(|(intent_name, intent)| {
                intent
                    .utterances
                    .iter()
                    .map(move |utterance| (utterance.text(), intent_name.clone()))
            })
            .collect();
        OracleEngineConfig { ground_truth }
    }
}

pub struct OracleTrainableEngine {
    ground_truth: BTreeMap<String, IntentName>,
    language: Option<String>,
}

impl TrainableEngine for OracleTrainableEngine {
    type Config = OracleEngineConfig;

    fn from_config(config: &OracleEngineConfig) -> Result<Self> {
        Ok(OracleTrainableEngine {
            ground_truth: config.ground_truth.clone(),
            language: None,
        })
    }

    fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        self.language = Some(dataset.language.clone());
        Ok(())
    }

    fn to_model(&self) -> Result<serde_json::Value> {
        Ok(json!({
            "language": self.language,
            "ground_truth": self.ground_truth,
        }))
    }
}

pub struct OracleInferenceEngine {
    pub language: String,
    ground_truth: BTreeMap<String, IntentName>,
}

impl OracleInferenceEngine {
    pub fn new(ground_truth: BTreeMap<&str, &str>) -> Self {
        OracleInferenceEngine {
            language: "en".to_string(),
            ground_truth: ground_truth
                .into_iter()
                .map(|(text, intent)| (text.to_string(), intent.to_string()))
                .collect(),
        }
    }
}

impl InferenceEngine for OracleInferenceEngine {
    fn from_model(language: &str, model: serde_json::Value) -> Result<Self> {
        let ground_truth = serde_json::from_value(model["ground_truth"].clone())?;
        Ok(OracleInferenceEngine {
            language: language.to_string(),
            ground_truth,
        })
    }

    fn parse(&self, input: &str) -> Result<IntentParserResult> {
        let mut result = IntentParserResult::empty(input, 1.0);
        result.intent.intent_name = self.ground_truth.get(input).cloned();
        Ok(result)
    }
}

/// Engine which never detects any intent
pub struct NullTrainableEngine;

impl TrainableEngine for NullTrainableEngine {
    type Config = ();

    fn from_config(_config: &()) -> Result<Self> {
        Ok(NullTrainableEngine)
    }

    fn fit(&mut self, _dataset: &Dataset) -> Result<()> {
        Ok(())
    }

    fn to_model(&self) -> Result<serde_json::Value> {
        Ok(json!({}))
    }
}

pub struct NullInferenceEngine;

impl InferenceEngine for NullInferenceEngine {
    fn from_model(_language: &str, _model: serde_json::Value) -> Result<Self> {
        Ok(NullInferenceEngine)
    }

    fn parse(&self, input: &str) -> Result<IntentParserResult> {
        Ok(IntentParserResult::empty(input, 0.0))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FailingEngineConfig {
    pub message: String,
}

/// Engine whose training always fails with the configured message
pub struct FailingTrainableEngine {
    message: String,
}

impl TrainableEngine for FailingTrainableEngine {
    type Config = FailingEngineConfig;

    fn from_config(config: &FailingEngineConfig) -> Result<Self> {
        Ok(FailingTrainableEngine {
            message: config.message.clone(),
        })
    }

    fn fit(&mut self, _dataset: &Dataset) -> Result<()> {
        Err(format_err!("{}", self.message))
    }

    fn to_model(&self) -> Result<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }
}

pub struct FailingInferenceEngine;

impl InferenceEngine for FailingInferenceEngine {
    fn from_model(_language: &str, _model: serde_json::Value) -> Result<Self> {
        Ok(FailingInferenceEngine)
    }

    fn parse(&self, _input: &str) -> Result<IntentParserResult> {
        Err(format_err!("inference engine crashed"))
    }
}
