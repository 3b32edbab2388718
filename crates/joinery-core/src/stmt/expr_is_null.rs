use super::Expr;

/// Tests whether an expression is null.
///
/// # Examples
///
/// ```text
/// is_null(x)      // x IS NULL
/// is_not_null(x)  // x IS NOT NULL
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExprIsNull {
    /// When `true`, this is an "is not null" check.
    pub negate: bool,

    pub expr: Box<Expr>,
}

impl Expr {
    pub fn is_null(expr: impl Into<Expr>) -> Expr {
        ExprIsNull {
            negate: false,
            expr: Box::new(expr.into()),
        }
        .into()
    }

    pub fn is_not_null(expr: impl Into<Expr>) -> Expr {
        ExprIsNull {
            negate: true,
            expr: Box::new(expr.into()),
        }
        .into()
    }
}

impl From<ExprIsNull> for Expr {
    fn from(value: ExprIsNull) -> Expr {
        Expr::IsNull(value)
    }
}
