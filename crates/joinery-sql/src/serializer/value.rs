use super::{Comma, Formatter, Params, ToSql};

use joinery_core::{
    driver::{BinaryLiteral, BoolLiteral, Capability},
    stmt, Error, Result,
};

impl ToSql for &stmt::Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            stmt::Value::List(values) => {
                fmt!(f, "(" Comma(values) ")");
            }
            // NULL is always inlined so comparisons can be rewritten
            stmt::Value::Null => f.dst.push_str("NULL"),
            value if f.serializer.bind_params => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder);
            }
            value => {
                let literal = literal(f.capability(), value)?;
                f.dst.push_str(&literal);
            }
        }

        Ok(())
    }
}

pub(super) fn literal(capability: &Capability, value: &stmt::Value) -> Result<String> {
    Ok(match value {
        stmt::Value::Null => "NULL".to_string(),
        stmt::Value::Bool(value) => match (capability.bool_literal, value) {
            (BoolLiteral::Numeric, true) => "1".to_string(),
            (BoolLiteral::Numeric, false) => "0".to_string(),
            (BoolLiteral::Keyword, value) => value.to_string(),
        },
        stmt::Value::I64(value) => value.to_string(),
        stmt::Value::F64(value) if !value.is_finite() => {
            return Err(Error::query(format!("`{value}` has no SQL literal form")));
        }
        stmt::Value::F64(value) => value.to_string(),
        stmt::Value::String(value) => string_literal(capability, value),
        stmt::Value::Bytes(value) => {
            let hex: String = value.iter().map(|byte| format!("{byte:02x}")).collect();

            match capability.binary_literal {
                BinaryLiteral::Hex => format!("X'{hex}'"),
                BinaryLiteral::HexPrefix => format!("0x{hex}"),
                BinaryLiteral::Bytea => format!("E'\\\\x{hex}'"),
            }
        }
        stmt::Value::List(values) => {
            let items = values
                .iter()
                .map(|value| literal(capability, value))
                .collect::<Result<Vec<_>>>()?;
            format!("({})", items.join(", "))
        }
    })
}

fn string_literal(capability: &Capability, value: &str) -> String {
    let mut ret = String::with_capacity(value.len() + 2);
    ret.push('\'');

    for ch in value.chars() {
        match ch {
            '\'' => ret.push_str("''"),
            '\\' if capability.backslash_escape => ret.push_str("\\\\"),
            ch => ret.push(ch),
        }
    }

    ret.push('\'');
    ret
}
