#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("missing personal number")]
    MissingPersonalNumber,
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("document not found: {collection}/{id}")]
    DocumentNotFound { collection: String, id: String },
    #[error("no registration found for personal number {0}")]
    PatientNotFound(String),
    #[error("failed to create collection directory: {0}")]
    CollectionDirCreation(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete record file: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),

    #[error("failed to read credentials file: {0}")]
    CredentialRead(std::io::Error),
    #[error("failed to decode base64 credentials: {0}")]
    CredentialDecode(base64::DecodeError),
    #[error("failed to parse service account JSON: {0}")]
    CredentialParse(serde_json::Error),
    #[error("no credentials available: provide a base64 blob or a credentials file")]
    CredentialsUnavailable,
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
