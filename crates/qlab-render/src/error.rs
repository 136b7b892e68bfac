//! Error types for the rendering crate.

use thiserror::Error;

/// Errors that can occur while rendering or exporting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// PNG encoding failed.
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// A route references a component that does not exist.
    #[error("Route endpoint {index} out of range for {num_components} components")]
    InvalidRoute {
        /// The offending component index.
        index: usize,
        /// Number of components in the layout.
        num_components: usize,
    },

    /// Component kind name not recognized.
    #[error("Unknown component kind: '{0}'")]
    UnknownComponent(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
