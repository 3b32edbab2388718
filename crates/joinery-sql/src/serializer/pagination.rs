use super::{Comma, Formatter, Params, ToSql};

use joinery_core::{
    driver::Pagination,
    stmt::{self, Direction, Expr, ExprColumn, KeyColumn, Lock},
    Error, Result,
};

/// One `ORDER BY` term.
pub(super) struct OrderTerm<'a> {
    pub(super) expr: std::borrow::Cow<'a, Expr>,
    pub(super) direction: Option<Direction>,
}

impl<'a> OrderTerm<'a> {
    pub(super) fn new(expr: &'a Expr, direction: Option<Direction>) -> OrderTerm<'a> {
        OrderTerm {
            expr: std::borrow::Cow::Borrowed(expr),
            direction,
        }
    }

    fn owned(expr: Expr) -> OrderTerm<'a> {
        OrderTerm {
            expr: std::borrow::Cow::Owned(expr),
            direction: None,
        }
    }
}

impl ToSql for &OrderTerm<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let expr: &Expr = &self.expr;
        fmt!(f, expr);

        if let Some(direction) = self.direction {
            f.write(format_args!(" {direction}"));
        }

        Ok(())
    }
}

/// Primary key order terms, qualified with `qualifier`. `output` selects the
/// name the key is exposed under rather than its column.
pub(super) fn key_order<'a>(
    keys: &[KeyColumn],
    qualifier: Option<&str>,
    output: bool,
) -> Vec<OrderTerm<'a>> {
    keys.iter()
        .map(|key| {
            let name = if output { &key.output } else { &key.column };
            let column = ExprColumn {
                table: qualifier.map(str::to_string),
                name: name.clone(),
            };
            OrderTerm::owned(column.into())
        })
        .collect()
}

impl<P: Params> Formatter<'_, P> {
    /// True when the dialect rejects this page without an `ORDER BY`.
    pub(super) fn needs_order(&self, limit: Option<u64>, offset: Option<u64>) -> bool {
        let capability = self.capability();

        capability.pagination == Pagination::Fetch
            && capability.fetch_requires_order
            && (limit.is_some() || offset.is_some())
    }

    /// Writes ` ORDER BY ...`. When `terms` is empty and the page requires
    /// an order, `fallback` is used, and failing that `(SELECT NULL)`.
    pub(super) fn order_by<'t>(
        &mut self,
        mut terms: Vec<OrderTerm<'t>>,
        fallback: Vec<OrderTerm<'t>>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<()> {
        if terms.is_empty() && self.needs_order(limit, offset) {
            terms = fallback;

            if terms.is_empty() {
                terms.push(OrderTerm::owned(Expr::raw("(SELECT NULL)")));
            }
        }

        if !terms.is_empty() {
            fmt!(self, " ORDER BY " Comma(&terms));
        }

        Ok(())
    }

    pub(super) fn pagination(&mut self, limit: Option<u64>, offset: Option<u64>) -> Result<()> {
        let offset = offset.filter(|offset| *offset > 0);

        match self.capability().pagination {
            Pagination::Limit => match (limit, offset) {
                (Some(limit), Some(offset)) => {
                    fmt!(self, " LIMIT " limit " OFFSET " offset);
                }
                (Some(limit), None) => {
                    fmt!(self, " LIMIT " limit);
                }
                (None, Some(offset)) => {
                    let prefix = self.capability().offset_without_limit;
                    fmt!(self, " " prefix);

                    if prefix.is_some() {
                        self.dst.push(' ');
                    }

                    fmt!(self, "OFFSET " offset);
                }
                (None, None) => {}
            },
            Pagination::Fetch => {
                if limit.is_none() && offset.is_none() {
                    return Ok(());
                }

                fmt!(self, " OFFSET " offset.unwrap_or(0) " ROWS");

                if let Some(limit) = limit {
                    fmt!(self, " FETCH NEXT " limit " ROWS ONLY");
                }
            }
            Pagination::Top => {
                if limit.is_some() || offset.is_some() {
                    return Err(Error::unsupported_feature(format!(
                        "{:?} does not have a generic pagination mapping",
                        self.capability().dialect
                    )));
                }
            }
        }

        Ok(())
    }

    pub(super) fn lock(&mut self, lock: Option<Lock>) -> Result<()> {
        let capability = self.capability();

        match lock {
            None => {}
            Some(Lock::Update) if capability.select_for_update => self.dst.push_str(" FOR UPDATE"),
            Some(Lock::Share) if capability.select_for_share => self.dst.push_str(" FOR SHARE"),
            Some(lock) => {
                return Err(Error::unsupported_feature(format!(
                    "{:?} does not support {lock:?} row locks",
                    capability.dialect
                )));
            }
        }

        Ok(())
    }
}

/// Builds order terms from resolved orderings.
pub(super) fn terms<'a>(
    orderings: impl IntoIterator<Item = &'a stmt::Ordering>,
    outer: bool,
) -> Vec<OrderTerm<'a>> {
    orderings
        .into_iter()
        .map(|ordering| {
            let expr = if outer { &ordering.outer } else { &ordering.expr };
            OrderTerm::new(expr, ordering.direction)
        })
        .collect()
}
