use super::Error;

/// Error when a relationship declaration is invalid.
///
/// This occurs when:
/// - Two associations on the same model share an alias
/// - A self-referential many-to-many association has no explicit alias
/// - An association references an unknown model or key attribute
/// - An alias collides with an attribute of the source model
///
/// These errors are raised while the schema is built, before any query can
/// be compiled.
#[derive(Debug)]
pub(super) struct AssociationError {
    message: Box<str>,
}

impl std::error::Error for AssociationError {}

impl core::fmt::Display for AssociationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid association: {}", self.message)
    }
}

impl Error {
    /// Creates an association error.
    pub fn association(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Association(AssociationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if the root cause of this error is an association error.
    pub fn is_association(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Association(_))
    }
}
