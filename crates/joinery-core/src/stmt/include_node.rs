use super::{Expr, ExprColumn, JoinOn, SelectColumn, TableRef};

/// One resolved eager load.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeNode {
    /// Dotted include path (`Posts.Comments`), used to prefix column
    /// aliases and in error messages.
    pub path: String,

    /// Target table, aliased with the arrow-joined path (`Posts->Comments`).
    pub table: TableRef,

    pub join: JoinKind,

    pub required: bool,

    /// The association can produce more than one row per parent.
    pub multiple: bool,

    /// Selected columns, already aliased with the include path.
    pub columns: Vec<SelectColumn>,

    /// `<parent>.<key> = <this>.<key>`. For many-to-many includes the right
    /// hand side is the junction table.
    pub on: JoinOn,

    /// Association scope and caller filter, qualified with the include's
    /// alias.
    pub filter: Option<Expr>,

    pub through: Option<ThroughNode>,

    pub children: Vec<IncludeNode>,

    /// Joined inside the paginated subquery rather than on the derived
    /// table.
    pub in_subquery: bool,

    /// When set, the paginated subquery keeps only root rows with a
    /// matching row in this include. The column is the parent side of the
    /// correlation, as visible inside the subquery.
    pub subquery_filter: Option<ExprColumn>,
}

/// The junction table of a many-to-many include.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughNode {
    /// Junction table, aliased `<include alias>-><through model>`.
    pub table: TableRef,

    pub columns: Vec<SelectColumn>,

    /// `<target>.<target key> = <through>.<other key>`
    pub on: JoinOn,

    pub filter: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl IncludeNode {
    /// True when a required descendant must be wrapped together with this
    /// outer-joined include.
    pub fn has_required_children(&self) -> bool {
        self.children.iter().any(|child| child.required)
    }
}
