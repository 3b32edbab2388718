use super::{
    expr::Operand,
    join::{include_columns, Joins, Placement},
    pagination::{key_order, terms},
    Alias, Comma, Delimited, Formatter, Ident, Params, TableAlias, ToSql,
};

use joinery_core::{
    stmt::{Expr, IncludeNode, Select, SelectColumn},
    Result,
};

impl ToSql for &Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        if let Some(plan) = &self.grouped_limit {
            tracing::debug!(table = %self.table.name, groups = plan.values.len(), "grouped limit");
            super::grouped_limit::grouped(self, plan, f)?;
        } else if self.sub_query {
            tracing::debug!(table = %self.table.name, "paginating root in a subquery");
            subquery(self, f)?;
        } else {
            flat(self, f)?;
        }

        f.lock(self.lock)
    }
}

/// `SELECT ... FROM <root> <joins> WHERE ... ORDER BY ... <page>`
fn flat<P: Params>(select: &Select, f: &mut Formatter<'_, P>) -> Result<()> {
    let mut columns: Vec<_> = select.columns.iter().collect();
    include_columns(&select.includes, Placement::All, &mut columns);

    let table = &select.table;
    let list = SelectList::new(None, columns);
    fmt!(f, "SELECT " list " FROM " table Joins(&select.includes, Placement::All));

    f.where_clause(select.filter.as_ref(), &[])?;
    f.group_by_having(select)?;

    let root = select.table.qualifier();
    f.order_by(
        terms(&select.order_by, false),
        key_order(&select.primary_key, Some(root), false),
        select.limit,
        select.offset,
    )?;

    f.pagination(select.limit, select.offset)
}

/// Paginates the root rows in a derived table and joins multi-row includes
/// onto it.
fn subquery<P: Params>(select: &Select, f: &mut Formatter<'_, P>) -> Result<()> {
    let root = select.table.qualifier();

    let mut outer_columns = vec![];
    include_columns(&select.includes, Placement::Outer, &mut outer_columns);

    let list = SelectList::new(Some(root), outer_columns);
    fmt!(f, "SELECT " list " FROM (");

    let mut inner_columns: Vec<_> = select.columns.iter().collect();
    include_columns(&select.includes, Placement::Subquery, &mut inner_columns);

    let table = &select.table;
    let list = SelectList::new(None, inner_columns);
    fmt!(f, "SELECT " list " FROM " table Joins(&select.includes, Placement::Subquery));

    let exists: Vec<_> = select
        .includes_recursive()
        .filter(|node| node.subquery_filter.is_some())
        .collect();

    f.where_clause(select.filter.as_ref(), &exists)?;
    f.group_by_having(select)?;

    f.order_by(
        terms(select.order_by.iter().filter(|ordering| ordering.in_subquery), false),
        key_order(&select.primary_key, Some(root), false),
        select.limit,
        select.offset,
    )?;
    f.pagination(select.limit, select.offset)?;

    fmt!(f, ")" TableAlias(root) Joins(&select.includes, Placement::Outer));

    // The page was taken in key order, so the joined rows keep it
    let mut order = terms(&select.order_by, true);
    if order.is_empty() && f.needs_order(select.limit, select.offset) {
        order = key_order(&select.primary_key, Some(root), true);
    }

    f.order_by(order, vec![], None, None)
}

/// A select list, optionally led by `<table>.*`. Empty lists select `*`.
pub(super) struct SelectList<'a> {
    star: Option<&'a str>,
    columns: Vec<&'a SelectColumn>,
}

impl<'a> SelectList<'a> {
    pub(super) fn new(star: Option<&'a str>, columns: Vec<&'a SelectColumn>) -> SelectList<'a> {
        SelectList { star, columns }
    }
}

impl ToSql for SelectList<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self.star {
            Some(table) => {
                fmt!(f, Ident(table) ".*");

                for column in self.columns {
                    fmt!(f, ", " column);
                }
            }
            None if self.columns.is_empty() => f.dst.push('*'),
            None => {
                fmt!(f, Comma(self.columns));
            }
        }

        Ok(())
    }
}

impl ToSql for &SelectColumn {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let expr = &self.expr;
        fmt!(f, expr);

        if let Some(alias) = &self.alias {
            fmt!(f, " AS " Alias(alias));
        }

        Ok(())
    }
}

/// A `WHERE` conjunct.
enum Conjunct<'a> {
    Expr(&'a Expr),

    /// Keeps root rows with at least one matching include row.
    Exists(&'a IncludeNode),
}

impl ToSql for Conjunct<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            Conjunct::Expr(expr) => fmt!(f, Operand(expr)),
            Conjunct::Exists(node) => fmt!(f, Exists(node)),
        }

        Ok(())
    }
}

struct Exists<'a>(&'a IncludeNode);

impl ToSql for Exists<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let node = self.0;

        let Some(parent) = &node.subquery_filter else {
            return Ok(());
        };

        f.dst.push_str("EXISTS (SELECT 1 FROM ");

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

        let rhs = &node.on.rhs;
        fmt!(f, Joins(&node.children, Placement::Required) " WHERE " parent " = " rhs);

        if let Some(filter) = &node.filter {
            fmt!(f, " AND " filter);
        }

        f.dst.push(')');
        Ok(())
    }
}

impl<P: Params> Formatter<'_, P> {
    pub(super) fn where_clause(&mut self, filter: Option<&Expr>, exists: &[&IncludeNode]) -> Result<()> {
        let mut conjuncts = vec![];

        match filter {
            Some(Expr::And(and)) => conjuncts.extend(and.operands.iter().map(Conjunct::Expr)),
            Some(expr) => conjuncts.push(Conjunct::Expr(expr)),
            None => {}
        }

        conjuncts.extend(exists.iter().map(|node| Conjunct::Exists(*node)));

        if conjuncts.len() == 1 {
            // A lone predicate is written without parentheses
            match conjuncts.pop() {
                Some(Conjunct::Expr(expr)) => fmt!(self, " WHERE " expr),
                Some(exists) => fmt!(self, " WHERE " exists),
                None => {}
            }
        } else if !conjuncts.is_empty() {
            fmt!(self, " WHERE " Delimited(conjuncts, " AND "));
        }

        Ok(())
    }

    pub(super) fn group_by_having(&mut self, select: &Select) -> Result<()> {
        if !select.group_by.is_empty() {
            fmt!(self, " GROUP BY " Comma(&select.group_by));
        }

        if let Some(having) = &select.having {
            fmt!(self, " HAVING " having);
        }

        Ok(())
    }
}
