use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprAnd {
    pub operands: Vec<Expr>,
}

impl Expr {
    /// ANDs two expressions, flattening nested ANDs.
    pub fn and(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        let mut operands = lhs.into().into_conjuncts();
        operands.extend(rhs.into().into_conjuncts());
        Expr::and_from_vec(operands)
    }

    pub fn and_from_vec(operands: Vec<Expr>) -> Expr {
        let mut operands = operands;
        if operands.len() == 1 {
            if let Some(operand) = operands.pop() {
                return operand;
            }
        }

        ExprAnd { operands }.into()
    }
}

impl From<ExprAnd> for Expr {
    fn from(value: ExprAnd) -> Expr {
        Expr::And(value)
    }
}
