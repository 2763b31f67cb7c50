use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GreenwallError>;

#[derive(Error, Debug)]
pub enum GreenwallError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Nothing to encode: {0}")]
    EmptyInput(String),
    #[error("Invalid date '{date}': {reason}")]
    DateParse { date: String, reason: String },
    #[error(transparent)]
    Importer(#[from] ImporterError),
    #[error("Malformed stream at byte {offset}: {reason}")]
    MalformedStream { offset: usize, reason: String },
    #[error("Config error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
}

/// Failure reported by the external importer (or any git command run on its behalf).
#[derive(Error, Debug)]
#[error("{command} failed ({status}): {diagnostic}")]
pub struct ImporterError {
    pub command: String,
    pub status: String,
    pub diagnostic: String,
}

impl GreenwallError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GreenwallError::Validation(msg.into())
    }

    pub fn date_parse(date: &str, reason: impl ToString) -> Self {
        GreenwallError::DateParse {
            date: date.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        GreenwallError::MalformedStream {
            offset,
            reason: reason.into(),
        }
    }
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::discover::Error> for GreenwallError {
    fn from(err: gix::discover::Error) -> Self {
        GreenwallError::GitDiscover(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for GreenwallError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        GreenwallError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GreenwallError {
    fn from(err: gix::object::commit::Error) -> Self {
        GreenwallError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for GreenwallError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GreenwallError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for GreenwallError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        GreenwallError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GreenwallError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GreenwallError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GreenwallError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GreenwallError::ObjectDecode(Box::new(err))
    }
}
