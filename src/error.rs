use thiserror::Error;

/// Errors that abort a run before any page or model request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} not set; export it or set `llm.model` in the config file")]
    MissingModel { var: &'static str },
}
