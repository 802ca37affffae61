use thiserror::Error;

/// 单条链接转换失败的原因
///
/// 所有错误都在单行范围内恢复，不会中断整个批次。
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("policy rejection: {0}")]
    PolicyRejection(String),
}

impl ConvertError {
    /// Get the kind/category of this error.
    pub fn kind(&self) -> ConvertErrorKind {
        match self {
            ConvertError::UnsupportedScheme(_) => ConvertErrorKind::UnsupportedScheme,
            ConvertError::Decode(_) => ConvertErrorKind::Decode,
            ConvertError::MissingField(_) => ConvertErrorKind::MissingField,
            ConvertError::PolicyRejection(_) => ConvertErrorKind::PolicyRejection,
        }
    }
}

/// Lightweight error category for pattern matching without borrowing the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertErrorKind {
    UnsupportedScheme,
    Decode,
    MissingField,
    PolicyRejection,
}

impl ConvertErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConvertErrorKind::UnsupportedScheme => "UNSUPPORTED_SCHEME",
            ConvertErrorKind::Decode => "DECODE",
            ConvertErrorKind::MissingField => "MISSING_FIELD",
            ConvertErrorKind::PolicyRejection => "POLICY_REJECTION",
        }
    }
}
