use super::Error;

/// Error when a query descriptor is malformed.
///
/// This occurs when:
/// - An include path does not resolve to a declared association
/// - An order or filter column is ambiguous or unknown
/// - An attribute resolves to an empty identifier
/// - A grouped limit is declared on an association that cannot produce
///   multiple rows
///
/// Query errors are never retried.
#[derive(Debug)]
pub(super) struct QueryError {
    message: Box<str>,
}

impl std::error::Error for QueryError {}

impl core::fmt::Display for QueryError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid query: {}", self.message)
    }
}

impl Error {
    /// Creates a query error.
    pub fn query(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Query(QueryError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if the root cause of this error is a query error.
    pub fn is_query(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Query(_))
    }
}
