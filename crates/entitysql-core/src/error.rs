//! Error types for statement generation.
//!
//! Every failure is raised while a statement is being assembled, before any
//! SQL text exists. Callers never see a half-built statement.

use std::fmt;

/// The primary error type for all EntitySQL operations.
#[derive(Debug)]
pub enum Error {
    /// The entity type is not (or cannot be) registered
    Registration(RegistrationError),
    /// A property, column or relationship could not be resolved
    Mapping(MappingError),
    /// Literal arguments do not fit the operation
    Argument(ArgumentError),
    /// Configuration errors
    Config(ConfigError),
}

#[derive(Debug)]
pub struct RegistrationError {
    pub kind: RegistrationErrorKind,
    /// Simple name of the entity type involved
    pub entity: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationErrorKind {
    /// Operation requested against a type that was never registered
    NotRegistered,
    /// Table, alias, column or property name is not a valid identifier
    InvalidIdentifier,
    /// Two properties map to the same column
    DuplicateColumn,
    /// The same property is declared twice
    DuplicateProperty,
    /// Foreign key reference is not of the form `TABLE.COLUMN`
    InvalidForeignKey,
}

#[derive(Debug)]
pub struct MappingError {
    pub kind: MappingErrorKind,
    pub entity: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingErrorKind {
    /// Property name is not declared on the entity
    UnknownProperty,
    /// No column of the child entity references the parent
    UnresolvedForeignKey,
    /// Operation needs a primary key and the entity declares none
    MissingPrimaryKey,
}

#[derive(Debug)]
pub struct ArgumentError {
    pub kind: ArgumentErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentErrorKind {
    /// A single literal id was given for a composite primary key
    IdArity,
    /// Increase/decrease amount is not a number
    NonNumericAmount,
    /// Increase/decrease amount is NULL
    NullAmount,
    /// Caller-supplied alias is not a plain identifier
    InvalidAlias,
    /// INSERT or UPDATE would write no column
    NoColumns,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a "type not registered" error.
    pub fn not_registered(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Error::Registration(RegistrationError {
            kind: RegistrationErrorKind::NotRegistered,
            message: format!("entity type '{entity}' is not registered"),
            entity,
        })
    }

    /// Create an "unknown property" error.
    pub fn unknown_property(entity: impl Into<String>, property: &str) -> Self {
        let entity = entity.into();
        Error::Mapping(MappingError {
            kind: MappingErrorKind::UnknownProperty,
            message: format!("entity '{entity}' has no property '{property}'"),
            entity,
        })
    }

    /// Create a "missing primary key" error.
    pub fn missing_primary_key(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Error::Mapping(MappingError {
            kind: MappingErrorKind::MissingPrimaryKey,
            message: format!("entity '{entity}' declares no primary key"),
            entity,
        })
    }

    /// Is this a registration error?
    pub fn is_registration_error(&self) -> bool {
        matches!(self, Error::Registration(_))
    }

    /// Is this a mapping error?
    pub fn is_mapping_error(&self) -> bool {
        matches!(self, Error::Mapping(_))
    }

    /// Is this an argument error?
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Error::Argument(_))
    }

    /// Get the entity name involved, if the error names one.
    pub fn entity(&self) -> Option<&str> {
        match self {
            Error::Registration(e) => Some(&e.entity),
            Error::Mapping(e) => Some(&e.entity),
            Error::Argument(_) | Error::Config(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Registration(e) => write!(f, "Registration error: {}", e.message),
            Error::Mapping(e) => write!(f, "Mapping error: {}", e.message),
            Error::Argument(e) => write!(f, "Argument error: {}", e.message),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<RegistrationError> for Error {
    fn from(err: RegistrationError) -> Self {
        Error::Registration(err)
    }
}

impl From<MappingError> for Error {
    fn from(err: MappingError) -> Self {
        Error::Mapping(err)
    }
}

impl From<ArgumentError> for Error {
    fn from(err: ArgumentError) -> Self {
        Error::Argument(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(ConfigError {
            message: format!("invalid configuration: {err}"),
            source: Some(Box::new(err)),
        })
    }
}

/// Result type alias for EntitySQL operations.
pub type Result<T> = std::result::Result<T, Error>;
