use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprOr {
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn or(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        let mut operands = match lhs.into() {
            Expr::Or(or) => or.operands,
            expr => vec![expr],
        };

        match rhs.into() {
            Expr::Or(or) => operands.extend(or.operands),
            expr => operands.push(expr),
        }

        ExprOr { operands }.into()
    }

    pub fn or_from_vec(operands: Vec<Expr>) -> Expr {
        ExprOr { operands }.into()
    }
}

impl From<ExprOr> for Expr {
    fn from(value: ExprOr) -> Expr {
        Expr::Or(value)
    }
}
