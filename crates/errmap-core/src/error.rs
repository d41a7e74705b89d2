use thiserror::Error;

/// Defects detected while assembling a [`crate::Catalog`].
///
/// These are authoring mistakes in the catalog definition. They surface at
/// startup (or in tests), never while handling a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("error code '{0}' is declared more than once")]
    DuplicateCode(String),

    #[error("entry '{code}' maps sentinel '{sentinel}' which is not in the registry")]
    UnregisteredSentinel { code: String, sentinel: String },

    #[error("sentinel '{sentinel}' is mapped by both '{first}' and '{second}'")]
    DuplicateMapping {
        sentinel: String,
        first: String,
        second: String,
    },

    #[error("sentinel '{0}' has no catalog entry")]
    UnmappedSentinel(String),

    #[error("entry '{code}' has invalid transport status {status}")]
    InvalidStatus { code: String, status: u16 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("invalid value for {var}: '{value}' (expected true/false, 1/0, yes/no, on/off)")]
    InvalidBool { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
