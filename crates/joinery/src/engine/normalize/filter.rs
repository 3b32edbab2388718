use super::{field, include, output_name, Normalize, Planned};

use indexmap::IndexMap;
use joinery_core::{
    schema::{Field, Model},
    stmt::{Expr, ExprColumn, IncludeNode, SelectColumn},
    Error, Result,
};

/// Resolved filters of one include: its own and its junction's.
type IncludeFilters = (Option<Expr>, Option<Expr>);

impl<'a> Normalize<'a> {
    /// Moves each conjunct of the root filter that only references a single
    /// include (`$Posts.title$ = ..`) into that include's filter. Returns
    /// what remains for the root.
    pub(super) fn route_filter(&self, planned: &mut [Planned<'a>]) -> Result<Option<Expr>> {
        let Some(filter) = self.find.filter.clone() else {
            return Ok(None);
        };

        let mut remaining = vec![];

        for conjunct in filter.into_conjuncts() {
            let Some(path) = self.single_include_path(&conjunct) else {
                remaining.push(conjunct);
                continue;
            };

            let include = include::find_mut(planned, &path).ok_or_else(|| {
                Error::query(format!("filter references `{path}`, which is not included"))
            })?;

            tracing::debug!(include = %path, "routing root filter conjunct into include");

            include.filter = Some(match include.filter.take() {
                Some(existing) => Expr::and(existing, conjunct),
                None => conjunct,
            });
        }

        Ok((!remaining.is_empty()).then(|| Expr::and_from_vec(remaining)))
    }

    /// The include path every column of `expr` references, if there is
    /// exactly one and it is not the root.
    fn single_include_path(&self, expr: &Expr) -> Option<String> {
        let mut path: Option<String> = None;
        let mut single = true;

        expr.for_each_column(&mut |column| match column.table.as_deref() {
            Some(table) if !self.is_root(table) => match &path {
                Some(existing) if existing != table => single = false,
                Some(_) => {}
                None => path = Some(table.to_string()),
            },
            _ => single = false,
        });

        path.filter(|_| single)
    }

    pub(super) fn resolve_root_expr(&self, mut expr: Expr, planned: &[Planned<'a>]) -> Result<Expr> {
        expr.try_for_each_column_mut(&mut |column| self.resolve_root_column(column, planned))?;
        Ok(expr)
    }

    /// Resolves a column of a root-level clause (`WHERE`, `GROUP BY`,
    /// `HAVING`).
    pub(super) fn resolve_root_column(&self, column: &mut ExprColumn, planned: &[Planned<'a>]) -> Result<()> {
        match column.table.as_deref() {
            Some(path) if !self.is_root(path) => {
                let include = include::find(planned, path).ok_or_else(|| {
                    Error::query(format!("`{path}` is not an included association"))
                })?;

                if self.grouped || (self.sub_query && !include.node.in_subquery) {
                    return Err(Error::query(format!(
                        "`{path}.{}` is not available where the root rows are paginated; filter the include instead",
                        column.name
                    )));
                }

                let field = field(include.target, &column.name)?;
                *column = ExprColumn::qualified(include.node.table.qualifier(), &field.column);
            }
            _ => {
                let name = match self.model {
                    Some(model) => field(model, &column.name)?.column.clone(),
                    None => column.name.clone(),
                };

                *column = ExprColumn::qualified(self.table.qualifier(), name);
            }
        }

        Ok(())
    }

    /// Like a root filter, except bare names may also refer to select-list
    /// aliases such as aggregates.
    pub(super) fn resolve_having(
        &self,
        mut expr: Expr,
        columns: &[SelectColumn],
        planned: &[Planned<'a>],
    ) -> Result<Expr> {
        expr.try_for_each_column_mut(&mut |column| {
            let is_alias = column.table.is_none()
                && self
                    .model
                    .map_or(true, |model| model.field(&column.name).is_none())
                && columns
                    .iter()
                    .any(|selected| output_name(selected) == Some(column.name.as_str()));

            if is_alias {
                Ok(())
            } else {
                self.resolve_root_column(column, planned)
            }
        })?;

        Ok(expr)
    }

    /// Resolves include filters and builds the final join tree.
    pub(super) fn finalize_includes(
        &self,
        planned: Vec<Planned<'a>>,
        root_keys: &mut Vec<&'a Field>,
    ) -> Result<Vec<IncludeNode>> {
        let mut filters = IndexMap::new();
        self.resolve_include_filters(&planned, &planned, &mut filters, root_keys)?;

        Ok(into_nodes(planned, &mut filters))
    }

    fn resolve_include_filters(
        &self,
        all: &[Planned<'a>],
        level: &[Planned<'a>],
        out: &mut IndexMap<String, IncludeFilters>,
        root_keys: &mut Vec<&'a Field>,
    ) -> Result<()> {
        for include in level {
            let alias = include.node.table.qualifier();
            let mut filter = vec![];

            if let Some(scope) = &include.association.scope {
                filter.push(self.resolve_include_expr(scope.clone(), include, include.target, alias, all, root_keys)?);
            }

            if let Some(caller) = &include.filter {
                filter.push(self.resolve_include_expr(caller.clone(), include, include.target, alias, all, root_keys)?);
            }

            let mut through_filter = vec![];

            if let (Some(junction), Some(through)) = (include.through, &include.node.through) {
                let through_alias = through.table.qualifier();

                let scope = include
                    .association
                    .as_belongs_to_many()
                    .and_then(|rel| rel.through_scope.as_ref());

                for expr in scope.into_iter().chain(&include.through_filter) {
                    through_filter.push(self.resolve_include_expr(
                        expr.clone(),
                        include,
                        junction,
                        through_alias,
                        all,
                        root_keys,
                    )?);
                }
            }

            out.insert(
                include.node.path.clone(),
                (conjunction(filter), conjunction(through_filter)),
            );

            self.resolve_include_filters(all, &include.children, out, root_keys)?;
        }

        Ok(())
    }

    /// Bare names refer to `model` under `alias`; qualified names are
    /// include paths from the root.
    fn resolve_include_expr(
        &self,
        mut expr: Expr,
        include: &Planned<'a>,
        model: &Model,
        alias: &str,
        all: &[Planned<'a>],
        root_keys: &mut Vec<&'a Field>,
    ) -> Result<Expr> {
        expr.try_for_each_column_mut(&mut |column: &mut ExprColumn| -> Result<()> {
            match column.table.as_deref() {
                None => {
                    let field = field(model, &column.name)?;
                    *column = ExprColumn::qualified(alias, &field.column);
                }
                Some(table) if self.is_root(table) => {
                    let Some(root) = self.model else {
                        return Err(Error::query("includes need a root model"));
                    };

                    let field = field(root, &column.name)?;

                    *column = if self.grouped || (self.sub_query && !include.node.in_subquery) {
                        root_keys.push(field);
                        ExprColumn::qualified(self.table.qualifier(), &field.name)
                    } else {
                        ExprColumn::qualified(self.table.qualifier(), &field.column)
                    };
                }
                Some(path) => {
                    let other = include::find(all, path).ok_or_else(|| {
                        Error::query(format!("`{path}` is not an included association"))
                    })?;

                    let field = field(other.target, &column.name)?;
                    *column = ExprColumn::qualified(other.node.table.qualifier(), &field.column);
                }
            }

            Ok(())
        })?;

        Ok(expr)
    }

    /// Resolves bare names in `expr` against `model` under `alias`.
    pub(super) fn qualify_expr(&self, mut expr: Expr, model: &Model, alias: &str) -> Result<Expr> {
        expr.try_for_each_column_mut(&mut |column: &mut ExprColumn| -> Result<()> {
            if let Some(table) = &column.table {
                return Err(Error::query(format!(
                    "`{table}.{}` cannot be referenced here; use an attribute of `{}`",
                    column.name, model.name
                )));
            }

            let field = field(model, &column.name)?;
            *column = ExprColumn::qualified(alias, &field.column);
            Ok(())
        })?;

        Ok(expr)
    }
}

fn conjunction(operands: Vec<Expr>) -> Option<Expr> {
    (!operands.is_empty()).then(|| Expr::and_from_vec(operands))
}

fn into_nodes(planned: Vec<Planned<'_>>, filters: &mut IndexMap<String, IncludeFilters>) -> Vec<IncludeNode> {
    planned
        .into_iter()
        .map(|include| {
            let mut node = include.node;

            if let Some((filter, through_filter)) = filters.swap_remove(&node.path) {
                node.filter = filter;

                if let Some(through) = &mut node.through {
                    through.filter = through_filter;
                }
            }

            node.children = into_nodes(include.children, filters);
            node
        })
        .collect()
}
