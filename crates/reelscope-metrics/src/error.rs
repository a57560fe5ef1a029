use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error writing export: {0}")]
    Io(#[from] std::io::Error),
}
