use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::utils::{EntityName, IntentName, SlotName};

/// Output of an inference engine for a single input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentParserResult {
    pub input: String,
    pub intent: IntentClassifierResult,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentClassifierResult {
    pub intent_name: Option<IntentName>,
    pub confidence_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub raw_value: String,
    pub value: serde_json::Value,
    pub range: Range<usize>,
    pub entity: EntityName,
    pub slot_name: SlotName,
}

impl IntentParserResult {
    pub fn empty<T: Into<String>>(input: T, confidence_score: f32) -> Self {
        IntentParserResult {
            input: input.into(),
            intent: IntentClassifierResult {
                intent_name: None,
                confidence_score,
            },
            slots: vec![],
        }
    }

    pub fn detected_intent(&self) -> Option<&str> {
        self.intent.intent_name.as_ref().map(|name| &**name)
    }
}
