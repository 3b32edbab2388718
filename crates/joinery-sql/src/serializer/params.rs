use super::{Formatter, ToSql};

use joinery_core::{driver::BindStyle, stmt, Result};

/// Collects bound values as they are emitted.
pub trait Params {
    /// Records `value` and returns the placeholder referring to it.
    fn push(&mut self, value: &stmt::Value) -> Placeholder;

    /// Number of values recorded so far, including any start offset.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 1-based position of a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

/// The bind collector.
///
/// Placeholders are numbered from `offset + 1`, so a fragment compiled on
/// its own can be appended to another one that already holds `offset`
/// values.
#[derive(Debug, Default, Clone)]
pub struct Binds {
    values: Vec<stmt::Value>,
    offset: usize,
}

impl Binds {
    pub fn new() -> Binds {
        Binds::default()
    }

    pub fn with_offset(offset: usize) -> Binds {
        Binds {
            values: vec![],
            offset,
        }
    }

    pub fn values(&self) -> &[stmt::Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<stmt::Value> {
        self.values
    }
}

impl Params for Binds {
    fn push(&mut self, value: &stmt::Value) -> Placeholder {
        self.values.push(value.clone());
        Placeholder(self.offset + self.values.len())
    }

    fn len(&self) -> usize {
        self.offset + self.values.len()
    }
}

impl Params for Vec<stmt::Value> {
    fn push(&mut self, value: &stmt::Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match f.serializer.capability.bind_style {
            BindStyle::Dollar => f.write(format_args!("${}", self.0)),
            BindStyle::Colon => f.write(format_args!(":{}", self.0)),
            BindStyle::At => f.write(format_args!("@{}", self.0)),
            BindStyle::Question => f.dst.push('?'),
        }
        Ok(())
    }
}
