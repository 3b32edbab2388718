use super::{field, include, output_name, Normalize, Planned};

use joinery_core::{
    schema::Field,
    stmt::{Direction, Expr, ExprColumn, OrderBy, OrderTarget, Ordering, SelectColumn},
    Error, Result,
};

impl<'a> Normalize<'a> {
    /// Resolves the requested ordering.
    ///
    /// A bare name refers to a selected alias first, then to a root
    /// attribute, and finally to the attribute of the one include that
    /// declares it. Columns the outer query orders by are added to the
    /// select lists they are read from.
    pub(super) fn order_by(
        &self,
        columns: &mut Vec<SelectColumn>,
        planned: &mut [Planned<'a>],
    ) -> Result<Vec<Ordering>> {
        self.find
            .order_by
            .iter()
            .map(|order_by| self.ordering(order_by, columns, planned))
            .collect()
    }

    fn ordering(
        &self,
        order_by: &OrderBy,
        columns: &mut Vec<SelectColumn>,
        planned: &mut [Planned<'a>],
    ) -> Result<Ordering> {
        let direction = order_by.direction;

        let name = match &order_by.target {
            OrderTarget::Raw(sql) => {
                return Ok(Ordering {
                    expr: Expr::raw(sql),
                    outer: Expr::raw(sql),
                    direction,
                    in_subquery: true,
                })
            }
            OrderTarget::Column(name) => name,
        };

        let column = ExprColumn::parse(name);

        match column.table.as_deref() {
            None => {
                let root_field = self.model.and_then(|model| model.field(&column.name));
                let selected = columns
                    .iter()
                    .any(|selected| output_name(selected) == Some(column.name.as_str()));

                if selected && root_field.is_none() {
                    return Ok(self.alias_ordering(&column.name, direction));
                }

                if let Some(field) = root_field {
                    return Ok(self.root_ordering(field, columns, direction));
                }

                if self.model.is_none() {
                    return Ok(self.alias_ordering(&column.name, direction));
                }

                let path = self.unique_include_path(planned, &column.name)?;
                self.include_ordering(&path, &column.name, planned, direction)
            }
            Some(table) if self.is_root(table) => match self.model {
                Some(model) => {
                    let field = field(model, &column.name)?;
                    Ok(self.root_ordering(field, columns, direction))
                }
                None => Ok(self.alias_ordering(&column.name, direction)),
            },
            Some(path) => self.include_ordering(path, &column.name, planned, direction),
        }
    }

    /// Orders by a select-list entry, referenced by its output name.
    fn alias_ordering(&self, name: &str, direction: Option<Direction>) -> Ordering {
        let expr = Expr::Column(ExprColumn::bare(name));

        let outer = if self.sub_query || self.grouped {
            Expr::Column(ExprColumn::qualified(self.table.qualifier(), name))
        } else {
            expr.clone()
        };

        Ordering {
            expr,
            outer,
            direction,
            in_subquery: true,
        }
    }

    fn root_ordering(
        &self,
        field: &Field,
        columns: &mut Vec<SelectColumn>,
        direction: Option<Direction>,
    ) -> Ordering {
        let expr = self.root_column(field, &field.name).expr;

        let outer = if self.sub_query || self.grouped {
            self.ensure_root_column(columns, field);
            Expr::Column(ExprColumn::qualified(self.table.qualifier(), &field.name))
        } else {
            expr.clone()
        };

        Ordering {
            expr,
            outer,
            direction,
            in_subquery: true,
        }
    }

    fn include_ordering(
        &self,
        path: &str,
        name: &str,
        planned: &mut [Planned<'a>],
        direction: Option<Direction>,
    ) -> Result<Ordering> {
        let include = include::find_mut(planned, path).ok_or_else(|| {
            Error::query(format!("cannot order by `{path}.{name}`; `{path}` is not included"))
        })?;

        let field = field(include.target, name)?;
        let expr = Expr::Column(ExprColumn::qualified(
            include.node.table.qualifier(),
            &field.column,
        ));

        if self.grouped || (self.sub_query && !include.node.in_subquery) {
            return Ok(Ordering {
                outer: expr.clone(),
                expr,
                direction,
                in_subquery: false,
            });
        }

        let outer = if self.sub_query {
            include::ensure_column(&mut include.node, field);
            Expr::Column(ExprColumn::qualified(
                self.table.qualifier(),
                format!("{path}.{}", field.name),
            ))
        } else {
            expr.clone()
        };

        Ok(Ordering {
            expr,
            outer,
            direction,
            in_subquery: true,
        })
    }

    fn unique_include_path(&self, planned: &[Planned<'a>], name: &str) -> Result<String> {
        let mut paths = vec![];
        collect_paths_with(planned, name, &mut paths);

        match paths.as_slice() {
            [path] => Ok(path.clone()),
            [] => Err(Error::query(format!(
                "cannot order by unknown attribute `{name}`"
            ))),
            _ => Err(Error::query(format!(
                "cannot order by `{name}`; it is ambiguous between {}",
                paths.join(", ")
            ))),
        }
    }
}

fn collect_paths_with(planned: &[Planned<'_>], name: &str, out: &mut Vec<String>) {
    for include in planned {
        if include.target.field(name).is_some() {
            out.push(include.node.path.clone());
        }

        collect_paths_with(&include.children, name, out);
    }
}
