use std::collections::BTreeMap;

use crate::models::{IntentCounters, IntentMetrics, Metrics};
use crate::utils::IntentName;

/// Sums the counts of both arguments intent by intent, an intent missing on
/// one side counting as zero. The merge is associative and commutative.
pub fn aggregate_metrics(mut accumulated: IntentCounters, batch: IntentCounters) -> IntentCounters {
    for (intent, counts) in batch {
        *accumulated.entry(intent).or_default() += counts;
    }
    accumulated
}

/// Derives precision, recall and f1 from the accumulated counts, attaching the
/// number of utterances of each intent in the reference dataset
pub fn compute_precision_recall(
    counters: IntentCounters,
    intent_utterances: &BTreeMap<IntentName, usize>,
) -> Metrics {
    counters
        .into_iter()
        .map(|(intent, counts)| {
            let metrics = IntentMetrics {
                precision: counts.precision(),
                recall: counts.recall(),
                f1: counts.f1(),
                intent_utterances: intent_utterances.get(&intent).cloned().unwrap_or(0),
                counts,
            };
            (intent, metrics)
        })
        .collect()
}
