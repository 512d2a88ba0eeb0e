use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContrastError {
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        parameter: &'static str,
        message: String,
    },

    #[error("Internal invariant violated: {0}")]
    Invariant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid PNM file: {0}")]
    InvalidPnm(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ContrastError {
    /// `parameter must be in interval [from; to], got value`
    pub(crate) fn out_of_range<T: std::fmt::Display>(
        parameter: &'static str,
        from: T,
        to: T,
        value: T,
    ) -> Self {
        Self::InvalidArgument {
            parameter,
            message: format!("{parameter} must be in interval [{from}; {to}], got {value}"),
        }
    }

    pub(crate) fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter,
            message: message.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Name of the offending parameter for `InvalidArgument` errors.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContrastError>;
