use joinery::Value;
use std::sync::{Arc, Mutex};

/// A statement sent to a [`LoggingConnection`](crate::LoggingConnection).
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedQuery {
    pub sql: String,
    pub binds: Vec<Value>,
}

/// A wrapper around the query log that provides a clean API for tests
pub struct ExecLog {
    queries: Arc<Mutex<Vec<LoggedQuery>>>,
}

impl ExecLog {
    pub(crate) fn new(queries: Arc<Mutex<Vec<LoggedQuery>>>) -> Self {
        Self { queries }
    }

    /// Get the number of logged queries
    pub fn len(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.lock().unwrap().is_empty()
    }

    /// Remove and return the first query from the log
    pub fn pop(&mut self) -> Option<LoggedQuery> {
        let mut queries = self.queries.lock().unwrap();
        if queries.is_empty() {
            None
        } else {
            Some(queries.remove(0))
        }
    }
}
