use thiserror::Error;

/// Errors surfaced by every conversion stage.
///
/// Each variant names the stage that failed: load, parameter validation,
/// encode, write, or config.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input image missing, unreadable or corrupt.
    #[error("Chargement impossible de {path} : {reason}")]
    Load {
        /// Path of the source image.
        path: String,
        /// Decoder or filesystem message.
        reason: String,
    },

    /// A caller-supplied parameter is out of its valid domain.
    #[error("Paramètre invalide : {0}")]
    InvalidParameter(String),

    /// The output image could not be encoded.
    #[error("Encodage impossible vers {path} : {reason}")]
    Encode {
        /// Output path.
        path: String,
        /// Encoder message.
        reason: String,
    },

    /// The output file could not be written.
    #[error("Écriture impossible de {path}")]
    Io {
        /// Output path.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}

impl ConvertError {
    /// Shorthand for [`ConvertError::InvalidParameter`].
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, ConvertError>;
