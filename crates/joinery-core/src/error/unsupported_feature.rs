use super::Error;

/// Error when the target dialect does not support a requested feature.
///
/// This occurs when:
/// - The dialect's pagination style has no generic mapping (`TOP`)
/// - A row lock is requested on a dialect without row locks
/// - A right join is requested on a dialect without `RIGHT JOIN`
#[derive(Debug)]
pub(super) struct UnsupportedFeature {
    message: Box<str>,
}

impl std::error::Error for UnsupportedFeature {}

impl core::fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported feature: {}", self.message)
    }
}

impl Error {
    /// Creates an unsupported feature error.
    pub fn unsupported_feature(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedFeature(UnsupportedFeature {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if the root cause of this error is an unsupported
    /// feature error.
    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnsupportedFeature(_))
    }
}
