use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use failure::ResultExt;
use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::utils::{EntityName, IntentName, SlotName};

/// Labeled NLU dataset, in the Snips dataset format
///
/// Intents are kept in an ordered map so that any split performed without
/// shuffling is reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub language: String,
    pub intents: BTreeMap<IntentName, Intent>,
    #[serde(default)]
    pub entities: BTreeMap<EntityName, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Intent {
    pub utterances: Vec<Utterance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub data: Vec<Chunk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_name: Option<SlotName>,
}

impl Chunk {
    pub fn text<T: Into<String>>(text: T) -> Self {
        Chunk {
            text: text.into(),
            entity: None,
            slot_name: None,
        }
    }

    pub fn slot<T, E, S>(text: T, entity: E, slot_name: S) -> Self
    where
        T: Into<String>,
        E: Into<EntityName>,
        S: Into<SlotName>,
    {
        Chunk {
            text: text.into(),
            entity: Some(entity.into()),
            slot_name: Some(slot_name.into()),
        }
    }
}

impl Utterance {
    pub fn new(data: Vec<Chunk>) -> Self {
        Utterance { data }
    }

    pub fn from_text<T: Into<String>>(text: T) -> Self {
        Utterance {
            data: vec![Chunk::text(text)],
        }
    }

    /// Full text of the utterance, obtained by concatenating its chunks
    pub fn text(&self) -> String {
        self.data.iter().map(|chunk| &*chunk.text).collect()
    }
}

impl Dataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let dataset_file = File::open(path.as_ref()).with_context(|_| {
            format!("Could not open dataset file {:?}", path.as_ref())
        })?;
        let dataset = Self::from_reader(dataset_file)
            .with_context(|_| format!("Invalid dataset file {:?}", path.as_ref()))?;
        Ok(dataset)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let dataset: Dataset = serde_json::from_reader(reader)
            .with_context(|_| "Cannot deserialize dataset json data")?;
        Ok(dataset)
    }

    /// Builds a dataset sharing the language and entities of `self`, with the
    /// same intent keys, filled with the provided labeled utterances
    pub fn with_utterances<I>(&self, utterances: I) -> Dataset
    where
        I: IntoIterator<Item = (IntentName, Utterance)>,
    {
        let mut intents: BTreeMap<IntentName, Intent> = self
            .intents
            .keys()
            .map(|intent| (intent.clone(), Intent::default()))
            .collect();
        for (intent, utterance) in utterances {
            intents.entry(intent).or_default().utterances.push(utterance);
        }
        Dataset {
            language: self.language.clone(),
            intents,
            entities: self.entities.clone(),
        }
    }

    pub fn nb_utterances(&self) -> BTreeMap<IntentName, usize> {
        self.intents
            .iter()
            .map(|(name, intent)| (name.clone(), intent.utterances.len()))
            .collect()
    }

    pub fn total_utterances(&self) -> usize {
        self.intents
            .values()
            .map(|intent| intent.utterances.len())
            .sum()
    }

    /// Checks the structural preconditions every evaluation relies on.
    ///
    /// Intents without utterances are accepted, they simply account for zero
    /// utterances.
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(
                NluMetricsError::InvalidDataset("missing dataset language".to_string()).into(),
            );
        }
        if self.intents.is_empty() {
            return Err(
                NluMetricsError::InvalidDataset("dataset has no intents".to_string()).into(),
            );
        }
        Ok(())
    }
}
