/// Errors that can occur during board operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("no ward at index {0}")]
    UnknownWard(usize),

    #[error("unit not found: {0}")]
    UnknownUnit(String),

    #[error("unit already exists: {0}")]
    DuplicateUnit(String),
}
