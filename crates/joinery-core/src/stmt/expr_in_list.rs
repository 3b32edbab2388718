use super::{Expr, Value};

/// `expr IN (list)` or `expr NOT IN (list)`.
///
/// An empty list never matches; a negated empty list always matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Value>,
    pub negate: bool,
}

impl Expr {
    pub fn in_list<T: Into<Value>>(expr: impl Into<Expr>, list: impl IntoIterator<Item = T>) -> Expr {
        ExprInList {
            expr: Box::new(expr.into()),
            list: list.into_iter().map(Into::into).collect(),
            negate: false,
        }
        .into()
    }

    pub fn not_in_list<T: Into<Value>>(
        expr: impl Into<Expr>,
        list: impl IntoIterator<Item = T>,
    ) -> Expr {
        ExprInList {
            expr: Box::new(expr.into()),
            list: list.into_iter().map(Into::into).collect(),
            negate: true,
        }
        .into()
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Expr {
        Expr::InList(value)
    }
}
