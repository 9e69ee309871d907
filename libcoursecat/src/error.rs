//! Error types for Coursecat

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoursecatError>;

#[derive(Error, Debug)]
pub enum CoursecatError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not logged in")]
    NotAuthenticated,
}

impl CoursecatError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CoursecatError::InvalidInput(_) => 3,
            CoursecatError::NotAuthenticated => 2,
            CoursecatError::Catalog(_) => 1,
            CoursecatError::Config(_) => 1,
            CoursecatError::Storage(_) => 1,
        }
    }

    /// True when the error is a catalog lookup for an id that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoursecatError::Catalog(CatalogError::NotFound(_)))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database operation failed: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to encode value for key '{key}': {message}")]
    Encode { key: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Course not found: {0}")]
    NotFound(u32),

    #[error("Failed to fetch courses: {0}")]
    Fetch(String),

    #[error("Invalid course dataset: {0}")]
    Dataset(String),
}
