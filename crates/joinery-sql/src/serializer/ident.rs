use super::{Formatter, Params, Serializer, ToSql};

use joinery_core::{driver::IdentifierCase, Error, Result};

/// An identifier, quoted when the serializer's settings call for it.
pub(super) struct Ident<S>(pub(super) S);

/// A column alias. Always quoted, since aliases carry include paths.
pub(super) struct Alias<S>(pub(super) S);

/// ` AS <alias>` after a table or derived table, or just ` <alias>` on
/// dialects that reject `AS` there.
pub(super) struct TableAlias<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let quoted = quote(f.serializer, self.0.as_ref(), false)?;
        f.dst.push_str(&quoted);
        Ok(())
    }
}

impl<S: AsRef<str>> ToSql for Alias<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let quoted = quote(f.serializer, self.0.as_ref(), true)?;
        f.dst.push_str(&quoted);
        Ok(())
    }
}

impl<S: AsRef<str>> ToSql for TableAlias<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let keyword = if f.capability().table_alias_as { " AS " } else { " " };
        fmt!(f, keyword Ident(self.0));
        Ok(())
    }
}

pub(super) fn quote(serializer: &Serializer<'_>, name: &str, force: bool) -> Result<String> {
    if name.is_empty() {
        return Err(Error::query("empty identifier"));
    }

    let quote = serializer.capability.quote;

    if name.len() >= 2 && name.starts_with(quote.open) && name.ends_with(quote.close) {
        return Ok(name.to_string());
    }

    if !force && !serializer.quote_identifiers && is_plain(serializer, name) {
        return Ok(name.to_string());
    }

    let mut ret = String::with_capacity(name.len() + 2);
    ret.push(quote.open);

    for ch in name.chars() {
        if ch == quote.close {
            ret.push(ch);
        }

        ret.push(ch);
    }

    ret.push(quote.close);
    Ok(ret)
}

/// True if `name` reads the same quoted or not.
fn is_plain(serializer: &Serializer<'_>, name: &str) -> bool {
    let capability = serializer.capability;

    let starts_ok = name
        .chars()
        .next()
        .is_some_and(|ch| !ch.is_ascii_digit());

    let chars_ok = name.chars().all(|ch| {
        let case_ok = match capability.default_case {
            IdentifierCase::Lower => !ch.is_ascii_uppercase(),
            IdentifierCase::Upper => !ch.is_ascii_lowercase(),
            IdentifierCase::Preserve => true,
        };

        (ch.is_ascii_alphanumeric() || ch == '_') && case_ok
    });

    starts_ok && chars_ok && !capability.is_reserved(name)
}
