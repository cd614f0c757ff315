use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The note the link was followed from is not in the index.
    #[error("Source note unavailable: {path}")]
    SourceNoteUnavailable { path: String },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
