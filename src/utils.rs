use std::collections::HashSet;

use itertools::Itertools;

pub type IntentName = String;
pub type SlotName = String;
pub type EntityName = String;

/// Splits the input on whitespace and punctuation, without any normalization
pub fn tokenize_light(input: &str) -> Vec<&str> {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Canonical form of an utterance: lowercased tokens joined by single spaces,
/// with the provided stop words removed
pub fn normalize_utterance(input: &str, stop_words: &HashSet<String>) -> String {
    tokenize_light(input)
        .into_iter()
        .map(|token| token.to_lowercase())
        .filter(|token| !stop_words.contains(token))
        .join(" ")
}

/// Renders a failure error along with all its causes, e.g. "outer: inner"
pub fn error_chain_message(error: &failure::Error) -> String {
    error.iter_chain().map(|cause| cause.to_string()).join(": ")
}

#[cfg(test)]
mod tests {
    use failure::{format_err, ResultExt};

    use super::*;
    use crate::errors::*;

    #[test]
    fn test_tokenize_light_works() {
        // Given
        let input = "Hey, what's the weather   in Paris?";

        // When
        let tokens = tokenize_light(input);

        // Then
        let expected_tokens = vec!["Hey", "what", "s", "the", "weather", "in", "Paris"];
        assert_eq!(expected_tokens, tokens);
    }

    #[test]
    fn test_normalize_utterance_works() {
        // Given
        let stop_words = vec!["the".to_string(), "please".to_string()]
            .into_iter()
            .collect();

        // When
        let normalized = normalize_utterance("Turn ON the  Lights, please!", &stop_words);

        // Then
        assert_eq!("turn on lights", normalized);
    }

    #[test]
    fn test_error_chain_message_includes_causes() {
        // Given
        let result: Result<()> = Err(format_err!("invalid utterance"));

        // When
        let error = result
            .with_context(|_| "cannot fit engine")
            .map_err(failure::Error::from)
            .unwrap_err();

        // Then
        assert_eq!("cannot fit engine: invalid utterance", error_chain_message(&error));
    }
}
