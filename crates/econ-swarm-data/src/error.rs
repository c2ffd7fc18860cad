use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid observation for {series}: {value:?}")]
    InvalidObservation { series: String, value: String },

    #[error("No observations for series {0}")]
    NoObservations(String),
}
