use thiserror::Error;

pub type PineResult<T> = Result<T, PineError>;

#[derive(Error, Debug)]
pub enum PineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
