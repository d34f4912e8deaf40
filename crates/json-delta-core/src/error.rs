use thiserror::Error;

/// Errors surfaced by the diff and patch operations.
///
/// Failures are reported whole: no operation returns a partially built
/// document alongside an error.
#[derive(Debug, Error)]
pub enum Error {
    /// A text input was not valid JSON.
    #[error("input is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A text input exceeded the configured size cap.
    #[error("input exceeds the maximum accepted size")]
    InputTooLarge,

    /// Diff or patch recursion hit the depth bound.
    #[error("maximum recursion depth exceeded")]
    RecursionExceeded,

    /// An allocation failed, either at the arena cap or on arithmetic
    /// overflow in a size computation.
    #[error("allocation failed")]
    OutOfMemory,

    /// A diff entry at a numeric index was neither a recognized wire shape
    /// nor a nested sub-diff.
    #[error("diff entry at a numeric index is not a recognized shape")]
    InvalidDiffShape,

    /// A nested sub-diff addressed an index past the end of the array being
    /// patched.
    #[error("diff entry addresses an index past the end of the array")]
    IndexOutOfRange,
}
