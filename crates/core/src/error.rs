use chartdesk_types::TextError;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read patient records: {0}")]
    LoadRead(std::io::Error),
    #[error("failed to parse patient records: {0}")]
    LoadSchema(String),

    #[error("no patient found with ID {0}")]
    NotFound(String),
    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),
    #[error("patient ID {0} already exists")]
    DuplicateIdentifier(String),

    #[error("invalid text: {0}")]
    Text(#[from] TextError),
}

impl PatientError {
    /// Whether this error came from reading or parsing the bulk record source.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::LoadRead(_) | Self::LoadSchema(_))
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
