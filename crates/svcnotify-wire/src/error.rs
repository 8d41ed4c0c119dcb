/// Errors that can occur while converting or decoding notification data.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A value is not a scalar (array, object or JSON null).
    #[error("value is not a scalar ({kind})")]
    NonScalar { kind: &'static str },

    /// A payload line has no `=` separator or an empty key.
    #[error("malformed payload line {line}: expected KEY=VALUE")]
    MalformedLine { line: usize },

    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, WireError>;
