use super::Expr;

/// A caller-supplied SQL fragment.
///
/// Raw fragments are not escaped. The compiler only rejects fragments that
/// contain a statement terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprRaw {
    pub sql: String,
}

impl Expr {
    pub fn raw(sql: impl Into<String>) -> Expr {
        ExprRaw { sql: sql.into() }.into()
    }
}

impl From<ExprRaw> for Expr {
    fn from(value: ExprRaw) -> Expr {
        Expr::Raw(value)
    }
}
