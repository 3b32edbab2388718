mod builder;
pub use builder::Builder;

use crate::{engine::Engine, Fragment, Result};
use joinery_core::{
    bail,
    driver::{Capability, Connection, Row},
    stmt::FindOptions,
    Schema,
};

use std::sync::Arc;

/// A resolved schema bound to a dialect.
///
/// `Db` is cheap to clone and can be shared across threads. Compiling a
/// query never touches a connection; [`Db::exec`] compiles and then hands
/// the statement to the caller's connection.
#[derive(Debug, Clone)]
pub struct Db {
    engine: Arc<Engine>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.engine.schema
    }

    pub fn capability(&self) -> &Capability {
        &self.engine.capability
    }

    /// Compiles `find` to SQL and its bound values.
    pub fn compile(&self, find: &FindOptions) -> Result<Fragment> {
        self.engine.compile(find)
    }

    /// Compiles `find` and runs it on `connection`.
    pub async fn exec(&self, connection: &mut impl Connection, find: &FindOptions) -> Result<Vec<Row>> {
        let dialect = connection.capability().dialect;

        if dialect != self.capability().dialect {
            bail!(
                "connection speaks {dialect:?} but queries are compiled for {:?}",
                self.capability().dialect
            );
        }

        let fragment = self.compile(find)?;
        connection.query_sql(&fragment.sql, &fragment.binds).await
    }
}
