use super::{Direction, Expr, ExprColumn, IncludeNode, Lock, TableRef, Value};

/// The canonical query descriptor.
///
/// Produced by the normalizer with every name resolved: columns carry the
/// SQL alias they are qualified with and their database column name, and
/// the include tree carries its join conditions. The compiler only decides
/// how to lay the pieces out for the target dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// The root table and the alias rows are exposed under.
    pub table: TableRef,

    pub columns: Vec<SelectColumn>,
    pub filter: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<Ordering>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub grouped_limit: Option<GroupedLimitPlan>,

    /// Paginate the root inside a derived table and join multi-row
    /// includes outside of it.
    pub sub_query: bool,

    pub includes: Vec<IncludeNode>,
    pub lock: Option<Lock>,

    /// Root primary key, used when the dialect or a grouped limit needs a
    /// deterministic order and none was requested.
    pub primary_key: Vec<KeyColumn>,
}

/// One entry of a select list: `expr [AS alias]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    pub expr: Expr,
    pub alias: Option<String>,
}

/// An ordering term in every shape the compiler may need.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    /// The term as written in a flat query, a paginated subquery, or a
    /// grouped-limit branch.
    pub expr: Expr,

    /// The term as written outside a derived table aliased to the root.
    pub outer: Expr,

    pub direction: Option<Direction>,

    /// The term can be evaluated inside the paginated subquery.
    pub in_subquery: bool,
}

/// A root key column: its database name and the name the root exposes it
/// under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumn {
    pub column: String,
    pub output: String,
}

/// A resolved grouped limit.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedLimitPlan {
    pub limit: u64,

    /// Distinct partition values, in first-seen order.
    pub values: Vec<Value>,

    pub scope: GroupScope,
}

/// How a branch is restricted to one partition value.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupScope {
    /// `WHERE <column> = <value>` on the root table.
    Column(ExprColumn),

    /// Inner join the junction table and compare its key with the value.
    Through(GroupThrough),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupThrough {
    pub table: TableRef,

    /// `<root>.<target key> = <through>.<other key>`
    pub on: JoinOn,

    /// Junction column compared with the partition value.
    pub key: ExprColumn,

    pub filter: Option<Expr>,

    /// The junction key, selected so rows can be mapped back to their
    /// partition.
    pub column: SelectColumn,
}

/// An equality join condition between two columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOn {
    pub lhs: ExprColumn,
    pub rhs: ExprColumn,
}

impl Select {
    pub fn has_includes(&self) -> bool {
        !self.includes.is_empty()
    }

    /// Iterates the include tree depth first.
    pub fn includes_recursive(&self) -> impl Iterator<Item = &IncludeNode> {
        let mut stack: Vec<&IncludeNode> = self.includes.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

impl SelectColumn {
    pub fn new(expr: impl Into<Expr>) -> SelectColumn {
        SelectColumn {
            expr: expr.into(),
            alias: None,
        }
    }

    pub fn aliased(expr: impl Into<Expr>, alias: impl Into<String>) -> SelectColumn {
        SelectColumn {
            expr: expr.into(),
            alias: Some(alias.into()),
        }
    }
}
