use joinery_core::stmt::Value;

/// Compiled SQL text and the values bound to its placeholders, in
/// placeholder order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub binds: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, binds: Vec<Value>) -> Fragment {
        Fragment {
            sql: sql.into(),
            binds,
        }
    }

    /// Appends `other`. Its placeholders must have been numbered starting
    /// after this fragment's binds, see [`Binds::with_offset`].
    ///
    /// [`Binds::with_offset`]: crate::Binds::with_offset
    pub fn push(&mut self, other: Fragment) {
        self.sql.push_str(&other.sql);
        self.binds.extend(other.binds);
    }

    pub fn push_str(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
}
