use super::*;

/// A node of a where-predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(ExprAnd),

    /// Binary comparison
    BinaryOp(ExprBinaryOp),

    /// References a column, optionally through an include path
    Column(ExprColumn),

    /// In list
    InList(ExprInList),

    /// Whether an expression is (or is not) null
    IsNull(ExprIsNull),

    /// `LIKE` pattern match
    Like(ExprLike),

    /// Negates an expression
    Not(ExprNot),

    /// OR a set of expressions
    Or(ExprOr),

    /// Caller-supplied SQL, emitted as-is
    Raw(ExprRaw),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Expr {
        Expr::Value(Value::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Expr::Value(_))
    }

    /// Splits a top-level AND into its operands.
    pub fn into_conjuncts(self) -> Vec<Expr> {
        match self {
            Expr::And(and) => and.operands,
            expr => vec![expr],
        }
    }

    /// Calls `f` for every column referenced by the expression.
    pub fn for_each_column(&self, f: &mut impl FnMut(&ExprColumn)) {
        match self {
            Expr::And(ExprAnd { operands }) | Expr::Or(ExprOr { operands }) => {
                for operand in operands {
                    operand.for_each_column(f);
                }
            }
            Expr::BinaryOp(expr) => {
                expr.lhs.for_each_column(f);
                expr.rhs.for_each_column(f);
            }
            Expr::Column(column) => f(column),
            Expr::InList(expr) => expr.expr.for_each_column(f),
            Expr::IsNull(expr) => expr.expr.for_each_column(f),
            Expr::Like(expr) => {
                expr.expr.for_each_column(f);
                expr.pattern.for_each_column(f);
            }
            Expr::Not(expr) => expr.expr.for_each_column(f),
            Expr::Raw(_) | Expr::Value(_) => {}
        }
    }

    /// Rewrites every column referenced by the expression in place.
    pub fn try_for_each_column_mut<E>(
        &mut self,
        f: &mut impl FnMut(&mut ExprColumn) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Expr::And(ExprAnd { operands }) | Expr::Or(ExprOr { operands }) => {
                for operand in operands {
                    operand.try_for_each_column_mut(f)?;
                }
            }
            Expr::BinaryOp(expr) => {
                expr.lhs.try_for_each_column_mut(f)?;
                expr.rhs.try_for_each_column_mut(f)?;
            }
            Expr::Column(column) => f(column)?,
            Expr::InList(expr) => expr.expr.try_for_each_column_mut(f)?,
            Expr::IsNull(expr) => expr.expr.try_for_each_column_mut(f)?,
            Expr::Like(expr) => {
                expr.expr.try_for_each_column_mut(f)?;
                expr.pattern.try_for_each_column_mut(f)?;
            }
            Expr::Not(expr) => expr.expr.try_for_each_column_mut(f)?,
            Expr::Raw(_) | Expr::Value(_) => {}
        }
        Ok(())
    }
}

macro_rules! impl_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Expr {
                    Expr::Value(value.into())
                }
            }
        )*
    };
}

impl_from_value!(bool, i32, i64, u32, f64, &str, String, Vec<u8>);

impl From<Value> for Expr {
    fn from(value: Value) -> Expr {
        Expr::Value(value)
    }
}
