use std::collections::{HashMap, HashSet};

use failure::{bail, format_err, ResultExt};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::engine::{InferenceEngine, TrainableEngine};
use crate::errors::*;
use crate::models::{Dataset, IntentClassifierResult, IntentParserResult};
use crate::utils::{normalize_utterance, IntentName};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupEngineConfig {
    pub ignore_stop_words: bool,
    pub stop_words: Vec<String>,
}

/// Serialized form of a trained lookup engine. The normalized form of each
/// training utterance is mapped to the index of its intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupEngineModel {
    pub language_code: String,
    pub intents_names: Vec<IntentName>,
    pub map: HashMap<String, usize>,
    pub config: LookupEngineConfig,
}

/// Baseline engine memorizing the training utterances
pub struct LookupTrainableEngine {
    config: LookupEngineConfig,
    model: Option<LookupEngineModel>,
}

impl TrainableEngine for LookupTrainableEngine {
    type Config = LookupEngineConfig;

    fn from_config(config: &LookupEngineConfig) -> Result<Self> {
        Ok(LookupTrainableEngine {
            config: config.clone(),
            model: None,
        })
    }

    fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        let stop_words = stop_words(&self.config);
        let intents_names: Vec<IntentName> = dataset.intents.keys().cloned().collect();
        let mut map: HashMap<String, usize> = HashMap::new();
        let mut ambiguous_keys: HashSet<String> = HashSet::new();
        for (intent_index, intent) in dataset.intents.values().enumerate() {
            for utterance in &intent.utterances {
                let key = normalize_utterance(&utterance.text(), &stop_words);
                if key.is_empty() {
                    continue;
                }
                match map.get(&key) {
                    Some(existing_index) if *existing_index != intent_index => {
                        ambiguous_keys.insert(key);
                    }
                    Some(_) => {}
                    None => {
                        map.insert(key, intent_index);
                    }
                }
            }
        }
        for key in &ambiguous_keys {
            debug!("Ignoring ambiguous utterance '{}'", key);
            map.remove(key);
        }
        info!(
            "Lookup engine fitted with {} utterances ({} ambiguous)",
            map.len(),
            ambiguous_keys.len()
        );
        self.model = Some(LookupEngineModel {
            language_code: dataset.language.clone(),
            intents_names,
            map,
            config: self.config.clone(),
        });
        Ok(())
    }

    fn to_model(&self) -> Result<serde_json::Value> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| format_err!("Lookup engine must be fitted before being exported"))?;
        Ok(serde_json::to_value(model)?)
    }
}

pub struct LookupInferenceEngine {
    model: LookupEngineModel,
    stop_words: HashSet<String>,
}

impl InferenceEngine for LookupInferenceEngine {
    fn from_model(language: &str, model: serde_json::Value) -> Result<Self> {
        let model: LookupEngineModel = serde_json::from_value(model)
            .with_context(|_| "Cannot deserialize lookup engine model")?;
        if model.language_code != language {
            bail!(
                "Lookup engine was trained for language '{}' and cannot be used for '{}'",
                model.language_code,
                language
            );
        }
        if let Some(index) = model
            .map
            .values()
            .find(|index| **index >= model.intents_names.len())
        {
            bail!("Invalid intent index in lookup engine model: {}", index);
        }
        let stop_words = stop_words(&model.config);
        Ok(LookupInferenceEngine { model, stop_words })
    }

    fn parse(&self, input: &str) -> Result<IntentParserResult> {
        let key = normalize_utterance(input, &self.stop_words);
        Ok(match self.model.map.get(&key) {
            Some(intent_index) => IntentParserResult {
                input: input.to_string(),
                intent: IntentClassifierResult {
                    intent_name: Some(self.model.intents_names[*intent_index].clone()),
                    confidence_score: 1.0,
                },
                slots: vec![],
            },
            None => IntentParserResult::empty(input, 1.0),
        })
    }
}

fn stop_words(config: &LookupEngineConfig) -> HashSet<String> {
    if config.ignore_stop_words {
        config
            .stop_words
            .iter()
            .map(|stop_word| stop_word.to_lowercase())
            .collect()
    } else {
        HashSet::new()
    }
}
