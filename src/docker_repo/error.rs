// Typed failures of container runtime calls

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("docker api: {0}")]
    Api(#[from] bollard::errors::Error),
    #[error("malformed payload for container {id}: {reason}")]
    MalformedPayload { id: String, reason: String },
    #[error("stats stream for container {id} ended without a sample")]
    EmptyStatsStream { id: String },
}

impl RuntimeError {
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        RuntimeError::MalformedPayload {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
