pub type PurikuraResult<T> = Result<T, PurikuraError>;

/// Error taxonomy for the composition/export pipeline.
///
/// All variants are non-fatal from the caller's point of view: the layer stack
/// stays interactive after any of them. `ExportBusy` is the re-entrancy guard
/// for the one-shot export operation.
#[derive(thiserror::Error, Debug)]
pub enum PurikuraError {
    #[error("input rejected: {0}")]
    InputRejected(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("resample error: {0}")]
    Resample(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("export already in progress")]
    ExportBusy,

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PurikuraError {
    pub fn input_rejected(msg: impl Into<String>) -> Self {
        Self::InputRejected(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn resample(msg: impl Into<String>) -> Self {
        Self::Resample(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
