use failure::Fail;

#[derive(Debug, Fail)]
pub enum NluMetricsError {
    #[fail(display = "Invalid dataset: {}", _0)]
    InvalidDataset(String),
    #[fail(display = "Invalid metrics configuration: {}", _0)]
    InvalidConfig(String),
    #[fail(display = "Not enough utterances for training ({})", _0)]
    NotEnoughUtterances(usize),
    #[fail(display = "Training error: {}", _0)]
    Training(String),
    #[fail(display = "Inference error: {}", _0)]
    Inference(String),
}

pub type Result<T> = ::std::result::Result<T, ::failure::Error>;
