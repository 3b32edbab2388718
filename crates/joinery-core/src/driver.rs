mod capability;
pub use capability::{
    BinaryLiteral, BindStyle, BoolLiteral, Capability, Dialect, IdentifierCase, Pagination, Quote,
};

use crate::{async_trait, stmt::Value};

use indexmap::IndexMap;

/// A connection that can execute compiled SQL.
///
/// Joinery never opens connections itself; an application hands one in
/// when executing a compiled query.
#[async_trait]
pub trait Connection: Send {
    /// Describes the connection's dialect, which informs the compiler.
    fn capability(&self) -> &Capability;

    /// Execute a SQL statement with its bound parameters.
    async fn query_sql(&mut self, sql: &str, binds: &[Value]) -> crate::Result<Vec<Row>>;
}

/// A single result row, keyed by output column name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Row {
        Row::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Row {
        Row {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
