use std::cmp::Ordering;

use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::errors::*;
use crate::models::{Dataset, Utterance};
use crate::utils::IntentName;

pub type LabeledUtterance = (IntentName, Utterance);

/// One train/test split of a k-fold cross validation
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    pub train_dataset: Dataset,
    pub test_utterances: Vec<LabeledUtterance>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    seed.map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy)
}

/// Returns the utterances of the dataset in a stratified order: intents are
/// interleaved proportionally to their sizes, so that any prefix of the
/// returned sequence preserves the intents distribution.
///
/// When `max_utterances` is provided, each intent contributes a quota of
/// utterances proportional to its size. Without shuffling the output only
/// depends on the dataset.
pub fn get_stratified_utterances(
    dataset: &Dataset,
    seed: Option<u64>,
    shuffle: bool,
    max_utterances: Option<usize>,
) -> Vec<LabeledUtterance> {
    let mut rng = if shuffle { Some(build_rng(seed)) } else { None };
    stratified_utterances(dataset, rng.as_mut(), max_utterances)
}

fn stratified_utterances(
    dataset: &Dataset,
    mut rng: Option<&mut StdRng>,
    max_utterances: Option<usize>,
) -> Vec<LabeledUtterance> {
    let groups = dataset
        .intents
        .iter()
        .map(|(intent_name, intent)| {
            let mut utterances = intent.utterances.clone();
            if let Some(rng) = rng.as_mut() {
                utterances.shuffle(&mut **rng);
            }
            (intent_name.clone(), utterances)
        })
        .collect_vec();
    let sizes = groups
        .iter()
        .map(|(_, utterances)| utterances.len())
        .collect_vec();
    let quotas = match max_utterances {
        Some(max_utterances) => compute_quotas(&sizes, max_utterances),
        None => sizes,
    };

    // (rank within intent, intent quota, intent index, utterance)
    let mut ranked_utterances = groups
        .into_iter()
        .zip(quotas)
        .enumerate()
        .flat_map(|(intent_index, ((intent_name, utterances), quota))| {
            utterances
                .into_iter()
                .take(quota)
                .enumerate()
                .map(move |(rank, utterance)| {
                    (rank, quota, intent_index, (intent_name.clone(), utterance))
                })
        })
        .collect_vec();
    ranked_utterances
        .sort_by(|lhs, rhs| compare_positions((lhs.0, lhs.1, lhs.2), (rhs.0, rhs.1, rhs.2)));
    ranked_utterances
        .into_iter()
        .map(|(_, _, _, labeled_utterance)| labeled_utterance)
        .collect()
}

/// Utterance `rank` of an intent with `quota` utterances sits at relative
/// position (2 * rank + 1) / (2 * quota)
fn compare_positions(lhs: (usize, usize, usize), rhs: (usize, usize, usize)) -> Ordering {
    let (lhs_rank, lhs_quota, lhs_intent) = lhs;
    let (rhs_rank, rhs_quota, rhs_intent) = rhs;
    let lhs_position = (2 * lhs_rank as u128 + 1) * rhs_quota as u128;
    let rhs_position = (2 * rhs_rank as u128 + 1) * lhs_quota as u128;
    lhs_position
        .cmp(&rhs_position)
        .then(lhs_intent.cmp(&rhs_intent))
}

/// Largest remainder apportionment of `max_utterances` among intents of the
/// given sizes. A quota never exceeds the size of its intent.
fn compute_quotas(sizes: &[usize], max_utterances: usize) -> Vec<usize> {
    let total: usize = sizes.iter().sum();
    if max_utterances >= total {
        return sizes.to_vec();
    }
    let shares = sizes
        .iter()
        .map(|size| max_utterances as u128 * *size as u128)
        .collect_vec();
    let mut quotas = shares
        .iter()
        .map(|share| (share / total as u128) as usize)
        .collect_vec();
    let remaining = max_utterances - quotas.iter().sum::<usize>();
    let by_remainder = shares
        .iter()
        .enumerate()
        .sorted_by(|(lhs_index, lhs_share), (rhs_index, rhs_share)| {
            let lhs_remainder = *lhs_share % total as u128;
            let rhs_remainder = *rhs_share % total as u128;
            rhs_remainder
                .cmp(&lhs_remainder)
                .then(lhs_index.cmp(rhs_index))
        })
        .map(|(index, _)| index)
        .collect_vec();
    for index in by_remainder.into_iter().take(remaining) {
        quotas[index] += 1;
    }
    quotas
}

/// Splits the dataset into `nb_folds` train/test pairs.
///
/// Utterances are grouped by intent, shuffled within each intent and dealt
/// to the folds in a round robin fashion, so that the test sets partition the
/// dataset and each of them preserves the intents distribution. When
/// `training_utterances` is provided, each training set is subsampled to that
/// size in a stratified way.
pub fn create_k_fold_batches(
    dataset: &Dataset,
    nb_folds: usize,
    training_utterances: Option<usize>,
    seed: Option<u64>,
) -> Result<Vec<Fold>> {
    if nb_folds < 2 {
        return Err(NluMetricsError::InvalidConfig(format!(
            "at least 2 folds are required, found {}",
            nb_folds
        ))
        .into());
    }
    let total_utterances = dataset.total_utterances();
    let too_few_for_training = training_utterances
        .map(|max_utterances| total_utterances < max_utterances)
        .unwrap_or(false);
    if total_utterances < nb_folds || too_few_for_training {
        return Err(NluMetricsError::NotEnoughUtterances(total_utterances).into());
    }

    let mut rng = build_rng(seed);
    let mut assignments: Vec<(usize, LabeledUtterance)> = Vec::with_capacity(total_utterances);
    for (intent_name, intent) in &dataset.intents {
        let mut utterances = intent.utterances.clone();
        utterances.shuffle(&mut rng);
        for utterance in utterances {
            let fold_index = assignments.len() % nb_folds;
            assignments.push((fold_index, (intent_name.clone(), utterance)));
        }
    }

    let mut folds = Vec::with_capacity(nb_folds);
    for fold_index in 0..nb_folds {
        let (test_assignments, train_assignments): (Vec<_>, Vec<_>) = assignments
            .iter()
            .cloned()
            .partition(|(index, _)| *index == fold_index);
        let test_utterances = test_assignments
            .into_iter()
            .map(|(_, labeled_utterance)| labeled_utterance)
            .collect_vec();
        let mut train_dataset = dataset.with_utterances(
            train_assignments
                .into_iter()
                .map(|(_, labeled_utterance)| labeled_utterance),
        );
        if let Some(max_utterances) = training_utterances {
            let subsampled =
                stratified_utterances(&train_dataset, Some(&mut rng), Some(max_utterances));
            train_dataset = dataset.with_utterances(subsampled);
        }
        debug!(
            "Fold {}: {} training utterances, {} test utterances",
            fold_index,
            train_dataset.total_utterances(),
            test_utterances.len()
        );
        folds.push(Fold {
            train_dataset,
            test_utterances,
        });
    }
    Ok(folds)
}
