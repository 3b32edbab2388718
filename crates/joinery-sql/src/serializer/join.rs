use super::{Formatter, Ident, Params, TableAlias, ToSql};

use joinery_core::{
    stmt::{IncludeNode, JoinKind, JoinOn, SelectColumn, TableRef},
    Error, Result,
};

/// Which part of the include tree a clause covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Placement {
    /// Every include
    All,

    /// Includes joined inside the paginated subquery
    Subquery,

    /// Includes joined onto the derived root table
    Outer,

    /// Required includes only, stopping at the first optional one
    Required,
}

impl Placement {
    fn covers(self, node: &IncludeNode) -> bool {
        match self {
            Placement::All => true,
            Placement::Subquery => node.in_subquery,
            Placement::Outer => !node.in_subquery,
            Placement::Required => node.required,
        }
    }
}

/// Join clauses for a list of sibling includes.
pub(super) struct Joins<'a>(pub(super) &'a [IncludeNode], pub(super) Placement);

impl ToSql for Joins<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let Joins(nodes, placement) = self;

        for node in nodes {
            if placement.covers(node) {
                join(node, placement, f)?;
            } else if placement == Placement::Outer {
                // Children of a subquery include may still join outside
                fmt!(f, Joins(&node.children, placement));
            }
        }

        Ok(())
    }
}

fn join<P: Params>(node: &IncludeNode, placement: Placement, f: &mut Formatter<'_, P>) -> Result<()> {
    let kind = join_kind(node, f)?;

    // An optional include with required children joins them as one unit so
    // they cannot drop the parent row.
    let wrap_children = !node.required && node.has_required_children();

    if node.through.is_some() || wrap_children {
        fmt!(f, " " kind " JOIN (");

        match &node.through {
            Some(through) => {
                let (table, on) = (&node.table, &through.on);
                fmt!(f, &through.table " INNER JOIN " table " ON " on);

                if let Some(filter) = &through.filter {
                    fmt!(f, " AND " filter);
                }
            }
            None => {
                fmt!(f, &node.table);
            }
        }

        if wrap_children {
            let required: Vec<_> = node
                .children
                .iter()
                .filter(|child| child.required && placement.covers(child))
                .collect();

            for child in required {
                join(child, placement, f)?;
            }
        }

        let on = &node.on;
        fmt!(f, ") ON " on);
    } else {
        let (table, on) = (&node.table, &node.on);
        fmt!(f, " " kind " JOIN " table " ON " on);
    }

    if let Some(filter) = &node.filter {
        fmt!(f, " AND " filter);
    }

    for child in &node.children {
        if wrap_children && child.required {
            continue;
        }

        let siblings = std::slice::from_ref(child);
        fmt!(f, Joins(siblings, placement));
    }

    Ok(())
}

fn join_kind<P>(node: &IncludeNode, f: &Formatter<'_, P>) -> Result<&'static str> {
    Ok(match node.join {
        JoinKind::Inner => "INNER",
        JoinKind::Left => "LEFT OUTER",
        JoinKind::Right if f.capability().right_join => "RIGHT OUTER",
        JoinKind::Right => {
            return Err(Error::unsupported_feature(format!(
                "{:?} does not support RIGHT JOIN; requested by include `{}`",
                f.capability().dialect,
                node.path
            )));
        }
    })
}

/// The columns an include contributes to a select list, depth first.
pub(super) fn include_columns<'a>(
    nodes: &'a [IncludeNode],
    placement: Placement,
    out: &mut Vec<&'a SelectColumn>,
) {
    for node in nodes {
        if placement.covers(node) {
            out.extend(&node.columns);

            if let Some(through) = &node.through {
                out.extend(&through.columns);
            }

            include_columns(&node.children, placement, out);
        } else if placement == Placement::Outer {
            include_columns(&node.children, placement, out);
        }
    }
}

impl ToSql for &TableRef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        fmt!(f, Ident(&self.name));

        if let Some(alias) = &self.alias {
            fmt!(f, TableAlias(alias));
        }

        Ok(())
    }
}

impl ToSql for &JoinOn {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let rhs = &self.rhs;
        fmt!(f, &self.lhs " = " rhs);
        Ok(())
    }
}
