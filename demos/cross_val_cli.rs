use clap::{App, Arg};
use snips_nlu_metrics::{
    compute_cross_val_metrics, compute_train_test_metrics, Dataset, LookupEngineConfig,
    LookupInferenceEngine, LookupTrainableEngine, MetricsConfig, DEFAULT_NB_FOLDS,
};

fn main() {
    env_logger::Builder::from_default_env()
        .default_format_timestamp_nanos(true)
        .init();

    let matches = App::new("snips-nlu-metrics")
        .about("Computes NLU metrics of the lookup baseline engine on a Snips dataset")
        .arg(
            Arg::with_name("DATASET")
                .required(true)
                .takes_value(true)
                .index(1)
                .help("path to the dataset json file used for training"),
        )
        .arg(
            Arg::with_name("test_dataset")
                .short("t")
                .long("test-dataset")
                .takes_value(true)
                .help("path to a test dataset, switches to train/test evaluation"),
        )
        .arg(
            Arg::with_name("nb_folds")
                .short("k")
                .long("nb-folds")
                .takes_value(true)
                .help("number of folds used for cross validation"),
        )
        .arg(
            Arg::with_name("training_utterances")
                .short("u")
                .long("training-utterances")
                .takes_value(true)
                .help("maximum number of utterances used for training in each fold"),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .takes_value(true)
                .help("seed used to shuffle the dataset before splitting it"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("report prediction errors in train/test mode"),
        )
        .get_matches();

    let dataset = Dataset::from_path(matches.value_of("DATASET").unwrap()).unwrap();
    let engine_config = LookupEngineConfig::default();

    let result_json = if let Some(test_dataset_path) = matches.value_of("test_dataset") {
        let test_dataset = Dataset::from_path(test_dataset_path).unwrap();
        let metrics = compute_train_test_metrics::<LookupTrainableEngine, LookupInferenceEngine>(
            &dataset,
            &test_dataset,
            &engine_config,
            matches.is_present("verbose"),
        )
        .unwrap();
        serde_json::to_string_pretty(&metrics).unwrap()
    } else {
        let config = MetricsConfig {
            nb_folds: matches
                .value_of("nb_folds")
                .map(|v| v.parse::<usize>().unwrap())
                .unwrap_or(DEFAULT_NB_FOLDS),
            training_utterances: matches
                .value_of("training_utterances")
                .map(|v| v.parse::<usize>().unwrap()),
            seed: matches.value_of("seed").map(|v| v.parse::<u64>().unwrap()),
        };
        let metrics = compute_cross_val_metrics::<LookupTrainableEngine, LookupInferenceEngine>(
            &dataset,
            &engine_config,
            config,
        )
        .unwrap();
        serde_json::to_string_pretty(&metrics).unwrap()
    };
    println!("{}", result_json);
}
