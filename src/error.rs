//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the viewcube crate.
#[derive(Debug)]
pub enum ViewCubeError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// WGSL composition or validation failure.
    Shader(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
    /// Browser DOM lookup or binding failure.
    Web(String),
}

impl fmt::Display for ViewCubeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::Web(msg) => write!(f, "web error: {msg}"),
        }
    }
}

impl std::error::Error for ViewCubeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for ViewCubeError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for ViewCubeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn display_prefixes_variant() {
        let err = ViewCubeError::OptionsParse("bad key".into());
        assert_eq!(err.to_string(), "options parse error: bad key");

        let err = ViewCubeError::Gpu(RenderContextError::UnsupportedSurface);
        assert!(err.to_string().starts_with("GPU error:"));
    }

    #[test]
    fn io_error_is_exposed_as_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ViewCubeError::from(io);
        assert!(err.source().is_some());
        assert!(ViewCubeError::Shader("x".into()).source().is_none());
    }
}
