use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IndexAlreadyExists,
    IndexNotFound,
    DocumentNotFound,
    SchemaMismatch,
    UnknownAnalyzer,
    UnknownField,
    NonComparableField,
    InvalidInput,
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Every failure in the engine is one of these. `kind` is what callers match
/// on, `context` is for humans.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn index_not_found(name: &str) -> Self {
        Error::new(ErrorKind::IndexNotFound, format!("no such index [{}]", name))
    }

    pub fn document_not_found(index: &str, id: impl fmt::Display) -> Self {
        Error::new(
            ErrorKind::DocumentNotFound,
            format!("document [{}] not found in index [{}]", id, index),
        )
    }

    pub fn unknown_field(field: &str) -> Self {
        Error::new(ErrorKind::UnknownField, format!("field [{}] is not mapped", field))
    }

    pub fn invalid_input(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidInput, context.into())
    }

    pub fn parse(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::Parse, context.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
