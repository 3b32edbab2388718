use crate::{ExecLog, LoggedQuery};
use joinery::{Capability, Connection, Result, Row, Value};
use std::sync::{Arc, Mutex};

/// A connection that records every statement and answers with canned rows.
#[derive(Debug)]
pub struct LoggingConnection {
    capability: Capability,

    /// Returned for every query
    rows: Vec<Row>,

    /// Using Arc<Mutex> so the log stays readable while the connection is
    /// borrowed by the code under test
    log: Arc<Mutex<Vec<LoggedQuery>>>,
}

impl LoggingConnection {
    pub fn new(capability: Capability, rows: Vec<Row>) -> (LoggingConnection, ExecLog) {
        let log = Arc::new(Mutex::new(vec![]));

        let connection = LoggingConnection {
            capability,
            rows,
            log: log.clone(),
        };

        (connection, ExecLog::new(log))
    }
}

#[async_trait::async_trait]
impl Connection for LoggingConnection {
    fn capability(&self) -> &Capability {
        &self.capability
    }

    async fn query_sql(&mut self, sql: &str, binds: &[Value]) -> Result<Vec<Row>> {
        self.log.lock().unwrap().push(LoggedQuery {
            sql: sql.to_string(),
            binds: binds.to_vec(),
        });

        Ok(self.rows.clone())
    }
}
