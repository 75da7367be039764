use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Passport(#[from] passport::PassportError),

    #[error("invalid JSON in {what}: {source}")]
    BadJson {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Rejected(String),
}

impl CliError {
    pub fn bad_json(what: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| CliError::BadJson { what, source }
    }
}
