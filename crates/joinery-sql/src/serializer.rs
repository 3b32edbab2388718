#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod ident;
use ident::{Alias, Ident, TableAlias};

mod params;
pub use params::{Binds, Params, Placeholder};

// Fragment serializers
mod expr;
mod grouped_limit;
mod join;
mod pagination;
mod select;
mod value;

use crate::Fragment;

use joinery_core::{driver::Capability, stmt, Result};

/// Compiles canonical select descriptors to SQL for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    /// What the target dialect supports.
    capability: &'a Capability,

    /// Emit placeholders and collect values instead of inlining literals.
    bind_params: bool,

    /// Quote every identifier. When false, only identifiers that need it
    /// are quoted.
    quote_identifiers: bool,
}

struct Formatter<'a, P> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut P,
}

impl<'a> Serializer<'a> {
    pub fn new(capability: &'a Capability) -> Serializer<'a> {
        Serializer {
            capability,
            bind_params: true,
            quote_identifiers: true,
        }
    }

    pub fn bind_params(mut self, bind_params: bool) -> Self {
        self.bind_params = bind_params;
        self
    }

    pub fn quote_identifiers(mut self, quote_identifiers: bool) -> Self {
        self.quote_identifiers = quote_identifiers;
        self
    }

    pub fn capability(&self) -> &'a Capability {
        self.capability
    }

    /// Compiles `select` to a terminated statement and its bound values.
    pub fn serialize(&self, select: &stmt::Select) -> Result<Fragment> {
        let mut binds = Binds::new();
        let sql = self.serialize_with(select, &mut binds)?;

        tracing::trace!(sql = %sql, binds = binds.len(), "compiled select");
        Ok(Fragment::new(sql, binds.into_values()))
    }

    /// Compiles `select`, collecting bound values into `params`.
    pub fn serialize_with(&self, select: &stmt::Select, params: &mut impl Params) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        select.to_sql(&mut fmt)?;

        ret.push(';');
        Ok(ret)
    }

    /// Quotes `name` for the target dialect.
    ///
    /// Identifiers that are already wrapped in the dialect's quote
    /// characters are returned unchanged. Unless `force` is set, quoting is
    /// skipped when identifier quoting is disabled and `name` would mean the
    /// same thing unquoted.
    pub fn quote_identifier(&self, name: &str, force: bool) -> Result<String> {
        ident::quote(self, name, force)
    }

    /// Renders `value` as an SQL literal.
    pub fn escape_literal(&self, value: &stmt::Value) -> Result<String> {
        value::literal(self.capability, value)
    }
}

impl<'a, P> Formatter<'a, P> {
    fn capability(&self) -> &'a Capability {
        self.serializer.capability
    }

    fn write(&mut self, args: std::fmt::Arguments<'_>) {
        use std::fmt::Write;

        // Writing to a `String` cannot fail.
        let _ = self.dst.write_fmt(args);
    }
}

#[cfg(test)]
mod tests;
