#[macro_use]
mod macros;

mod exec_log;
pub use exec_log::{ExecLog, LoggedQuery};

pub mod fixtures;

mod logging_connection;
pub use logging_connection::LoggingConnection;

mod joinery_test;

// Re-export for use in macros - needs to be public for macro expansion
pub use joinery_test::JoineryTest;

use joinery::{db, Capability, Db, Dialect};

pub use std_util::*;

/// Per-test handle on one dialect.
pub struct DbTest {
    dialect: Dialect,
}

impl DbTest {
    pub fn new(dialect: Dialect) -> DbTest {
        DbTest { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn capability(&self) -> Capability {
        Capability::for_dialect(self.dialect)
    }

    /// How this dialect writes `alias` after a table: ` AS "alias"` or, on
    /// dialects that reject `AS` there, ` "alias"`.
    pub fn table_alias(&self, alias: &str) -> String {
        let capability = self.capability();
        let quote = capability.quote;
        let keyword = if capability.table_alias_as { " AS " } else { " " };

        format!("{keyword}{}{alias}{}", quote.open, quote.close)
    }

    /// Resolves the schema declared on `builder` for this dialect.
    pub fn setup_db(&self, builder: &mut db::Builder) -> Db {
        builder.dialect(self.dialect).build().unwrap()
    }

    /// A connection speaking this dialect that answers every query with
    /// `rows`.
    pub fn connection(&self, rows: Vec<joinery::Row>) -> (LoggingConnection, ExecLog) {
        LoggingConnection::new(self.capability(), rows)
    }
}
