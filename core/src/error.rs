//! Icon materialization error types.

/// Errors produced while turning an [`crate::Icon`] into a file on disk.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encode error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to keep temporary icon file: {0}")]
    Persist(#[from] tempfile::PathPersistError),
}
