pub type BloodlineResult<T> = Result<T, BloodlineError>;

#[derive(thiserror::Error, Debug)]
/// Crate-wide error type.
pub enum BloodlineError {
    /// A caller-supplied argument is out of range (e.g. negative generations).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The pedigree data could not be read or interpreted.
    #[error("data error: {0}")]
    Data(String),

    /// A slot could not be computed for the requested generation count.
    #[error("layout error: {0}")]
    Layout(String),

    /// A chart could not be produced.
    #[error("render error: {0}")]
    Render(String),

    /// Frames could not be encoded into an animation.
    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BloodlineError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
