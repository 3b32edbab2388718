use super::{Comma, Delimited, Formatter, Ident, Params, ToSql};

use joinery_core::{stmt, Error, Result};

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        use stmt::Expr::*;

        match self {
            And(expr) if expr.operands.is_empty() => f.dst.push_str("1 = 1"),
            And(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand), " AND "));
            }
            BinaryOp(expr) => match (expr.op, &*expr.rhs) {
                (stmt::BinaryOp::Eq, stmt::Expr::Value(stmt::Value::Null)) => {
                    fmt!(f, &*expr.lhs " IS NULL");
                }
                (stmt::BinaryOp::Ne, stmt::Expr::Value(stmt::Value::Null)) => {
                    fmt!(f, &*expr.lhs " IS NOT NULL");
                }
                (op, rhs) => {
                    fmt!(f, &*expr.lhs " " op " " rhs);
                }
            },
            Column(expr) => {
                fmt!(f, expr);
            }
            InList(expr) if expr.list.is_empty() => {
                // Nothing is in an empty list
                if expr.negate {
                    f.dst.push_str("1 = 1");
                } else {
                    fmt!(f, &*expr.expr " IN (NULL)");
                }
            }
            InList(expr) => {
                let op = if expr.negate { " NOT IN (" } else { " IN (" };
                fmt!(f, &*expr.expr op Comma(&expr.list) ")");
            }
            IsNull(expr) => {
                let op = if expr.negate { " IS NOT NULL" } else { " IS NULL" };
                fmt!(f, &*expr.expr op);
            }
            Like(expr) => {
                let op = if expr.negate { " NOT LIKE " } else { " LIKE " };
                let pattern = &*expr.pattern;
                fmt!(f, &*expr.expr op pattern);
            }
            Not(expr) => {
                let operand = &*expr.expr;
                fmt!(f, "NOT (" operand ")");
            }
            Or(expr) if expr.operands.is_empty() => f.dst.push_str("1 = 0"),
            Or(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand), " OR "));
            }
            Raw(expr) => {
                if expr.sql.contains(';') {
                    return Err(Error::query(format!(
                        "raw SQL fragment contains a statement terminator: {:?}",
                        expr.sql
                    )));
                }

                f.dst.push_str(&expr.sql);
            }
            Value(value) => {
                fmt!(f, value);
            }
        }

        Ok(())
    }
}

/// An operand of `AND` / `OR`, parenthesized when it is itself a boolean
/// list.
pub(super) struct Operand<'a>(pub(super) &'a stmt::Expr);

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self.0 {
            stmt::Expr::And(expr) if expr.operands.len() > 1 => {
                fmt!(f, "(" self.0 ")");
            }
            stmt::Expr::Or(expr) if expr.operands.len() > 1 => {
                fmt!(f, "(" self.0 ")");
            }
            expr => {
                fmt!(f, expr);
            }
        }

        Ok(())
    }
}

impl ToSql for &stmt::ExprColumn {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        if let Some(table) = &self.table {
            fmt!(f, Ident(table) ".");
        }

        fmt!(f, Ident(&self.name));
        Ok(())
    }
}

impl ToSql for stmt::BinaryOp {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        f.write(format_args!("{self}"));
        Ok(())
    }
}
