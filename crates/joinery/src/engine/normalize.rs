mod filter;
mod grouped_limit;

mod include;
use include::Planned;

mod order;


use joinery_core::{
    schema::{Field, Model},
    stmt::{
        Attribute, Expr, ExprColumn, FindOptions, FindSource, GroupScope, IncludeNode, KeyColumn,
        Select, SelectColumn, TableRef,
    },
    Error, Result, Schema,
};

/// Resolves a find request against the schema into the canonical select
/// descriptor: every name checked, includes expanded into a join tree, and
/// the pagination layout decided.
pub(super) fn apply(schema: &Schema, find: &FindOptions) -> Result<Select> {
    let (model, table) = match &find.source {
        FindSource::Model(name) => {
            let model = schema.resolve_model(name)?;
            (Some(model), TableRef::aliased(&model.table_name, &model.name))
        }
        FindSource::Table(name) => (None, TableRef::new(name)),
    };

    Normalize {
        schema,
        find,
        model,
        table,
        grouped: find.grouped_limit.is_some(),
        sub_query: false,
        qualify: false,
    }
    .apply()
}

struct Normalize<'a> {
    schema: &'a Schema,

    find: &'a FindOptions,

    /// Root model. `None` when a table is queried directly.
    model: Option<&'a Model>,

    /// Root table, aliased with the model name.
    table: TableRef,

    /// Rows are fetched one partition at a time.
    grouped: bool,

    /// Root rows are paginated in a derived table.
    sub_query: bool,

    /// Root columns are qualified with the root alias. Needed as soon as
    /// another table joins the root.
    qualify: bool,
}

impl<'a> Normalize<'a> {
    fn apply(mut self) -> Result<Select> {
        let find = self.find;

        if self.grouped && find.limit.is_some() {
            return Err(Error::query(
                "`limit` cannot be combined with a grouped limit; the grouped limit already caps each partition",
            ));
        }

        let mut includes = match self.model {
            Some(model) => self.plan_includes(model, None, &find.include)?,
            None if find.include.is_empty() => vec![],
            None => {
                return Err(Error::query(format!(
                    "table `{}` has no model; includes need declared associations",
                    self.table.name
                )))
            }
        };

        let filter = self.route_filter(&mut includes)?;
        include::decide_joins(&mut includes);

        let grouped_limit = match &find.grouped_limit {
            Some(grouped_limit) => Some(self.grouped_limit(grouped_limit)?),
            None => None,
        };

        self.sub_query = !self.grouped
            && find.sub_query.unwrap_or_else(|| {
                include::has_multiple(&includes) && (find.limit.is_some() || find.offset.is_some())
            });

        if self.sub_query {
            include::place(&mut includes, true);
            tracing::debug!(model = %self.table.qualifier(), "paginating root rows in a subquery");
        }

        self.qualify = !includes.is_empty()
            || matches!(
                grouped_limit.as_ref().map(|plan| &plan.scope),
                Some(GroupScope::Through(_))
            );

        let mut columns = self.root_columns()?;

        let mut root_keys = vec![];
        self.link(&mut includes, None, &mut root_keys);

        let filter = match filter {
            Some(filter) => Some(self.resolve_root_expr(filter, &includes)?),
            None => None,
        };

        let group_by = find
            .group_by
            .iter()
            .map(|column| {
                let mut column = ExprColumn::parse(column);
                self.resolve_root_column(&mut column, &includes)?;
                Ok(Expr::Column(column))
            })
            .collect::<Result<Vec<_>>>()?;

        let having = match &find.having {
            Some(having) => Some(self.resolve_having(having.clone(), &columns, &includes)?),
            None => None,
        };

        let order_by = self.order_by(&mut columns, &mut includes)?;
        let includes = self.finalize_includes(includes, &mut root_keys)?;

        let mut primary_key = vec![];

        if let Some(model) = self.model {
            if self.sub_query || self.grouped {
                for field in root_keys {
                    self.ensure_root_column(&mut columns, field);
                }
            }

            for field in model.primary_key_fields() {
                if self.grouped {
                    self.ensure_root_column(&mut columns, field);
                }

                primary_key.push(KeyColumn {
                    column: field.column.clone(),
                    output: field.name.clone(),
                });
            }
        }

        Ok(Select {
            table: self.table,
            columns,
            filter,
            group_by,
            having,
            order_by,
            limit: find.limit,
            offset: find.offset,
            grouped_limit,
            sub_query: self.sub_query,
            includes,
            lock: find.lock,
            primary_key,
        })
    }

    /// The root select list.
    fn root_columns(&self) -> Result<Vec<SelectColumn>> {
        let Some(model) = self.model else {
            return self.table_columns();
        };

        let Some(attributes) = &self.find.attributes else {
            return Ok(model
                .fields
                .values()
                .map(|field| self.root_column(field, &field.name))
                .collect());
        };

        attributes
            .iter()
            .map(|attribute| match attribute {
                Attribute::Name(name) => Ok(self.root_column(field(model, name)?, name)),
                Attribute::Aliased { name, alias } => Ok(self.root_column(field(model, name)?, alias)),
                Attribute::Raw { sql, alias } => Ok(SelectColumn::aliased(Expr::raw(sql), alias)),
            })
            .collect()
    }

    /// Without a model, attributes name columns directly.
    fn table_columns(&self) -> Result<Vec<SelectColumn>> {
        let Some(attributes) = &self.find.attributes else {
            return Ok(vec![]);
        };

        let column = |name: &str| {
            if self.qualify {
                ExprColumn::qualified(self.table.qualifier(), name)
            } else {
                ExprColumn::bare(name)
            }
        };

        Ok(attributes
            .iter()
            .map(|attribute| match attribute {
                Attribute::Name(name) => SelectColumn::new(column(name)),
                Attribute::Aliased { name, alias } => SelectColumn::aliased(column(name), alias),
                Attribute::Raw { sql, alias } => SelectColumn::aliased(Expr::raw(sql), alias),
            })
            .collect())
    }

    fn root_column(&self, field: &Field, output: &str) -> SelectColumn {
        let column = if self.qualify {
            ExprColumn::qualified(self.table.qualifier(), &field.column)
        } else {
            ExprColumn::bare(&field.column)
        };

        if field.column == output {
            SelectColumn::new(column)
        } else {
            SelectColumn::aliased(column, output)
        }
    }

    fn ensure_root_column(&self, columns: &mut Vec<SelectColumn>, field: &Field) {
        if columns
            .iter()
            .any(|column| output_name(column) == Some(field.name.as_str()))
        {
            return;
        }

        columns.push(self.root_column(field, &field.name));
    }

    /// Columns of an included model, aliased `<path>.<attribute>`.
    fn attribute_columns(
        &self,
        model: &Model,
        attributes: Option<&[Attribute]>,
        alias: &str,
        path: &str,
    ) -> Result<Vec<SelectColumn>> {
        let column = |field: &Field, output: &str| {
            SelectColumn::aliased(
                ExprColumn::qualified(alias, &field.column),
                format!("{path}.{output}"),
            )
        };

        let Some(attributes) = attributes else {
            return Ok(model
                .fields
                .values()
                .map(|field| column(field, &field.name))
                .collect());
        };

        attributes
            .iter()
            .map(|attribute| match attribute {
                Attribute::Name(name) => Ok(column(field(model, name)?, name)),
                Attribute::Aliased { name, alias } => Ok(column(field(model, name)?, alias)),
                Attribute::Raw { sql, alias } => Ok(SelectColumn::aliased(
                    Expr::raw(sql),
                    format!("{path}.{alias}"),
                )),
            })
            .collect()
    }

    /// Points every join at the parent columns visible where it is emitted.
    ///
    /// Joins outside the paginated subquery see the root through the
    /// derived table, which exposes attribute names, and see includes
    /// joined inside it through their column aliases. Root fields that must
    /// be exposed for that are collected into `root_keys`.
    fn link(
        &self,
        planned: &mut [Planned<'a>],
        mut parent: Option<&mut IncludeNode>,
        root_keys: &mut Vec<&'a Field>,
    ) {
        for include in planned.iter_mut() {
            let key = include.parent_key;

            let (inside, parent_alias) = match parent.as_deref() {
                None => (true, self.table.qualifier().to_string()),
                Some(node) => (node.in_subquery, node.table.qualifier().to_string()),
            };

            let inner_key = ExprColumn::qualified(parent_alias, &key.column);

            // Grouped rows are unioned into a derived table the includes join onto
            let split = (self.grouped && parent.is_none())
                || (self.sub_query && inside && !include.node.in_subquery);

            if split {
                let root = self.table.qualifier();

                include.node.on.lhs = match parent.as_deref_mut() {
                    None => {
                        root_keys.push(key);
                        ExprColumn::qualified(root, &key.name)
                    }
                    Some(node) => {
                        include::ensure_column(node, key);
                        ExprColumn::qualified(root, format!("{}.{}", node.path, key.name))
                    }
                };

                if self.sub_query && include.node.required && include.node.multiple {
                    include.node.subquery_filter = Some(inner_key);
                }
            } else {
                include.node.on.lhs = inner_key;
            }

            self.link(&mut include.children, Some(&mut include.node), root_keys);
        }
    }

    /// True if `table` names the root in a column reference.
    fn is_root(&self, table: &str) -> bool {
        table == self.table.qualifier() || table == self.table.name
    }
}

/// Looks up an attribute, failing with a query error naming the model.
fn field<'m>(model: &'m Model, name: &str) -> Result<&'m Field> {
    model.field(name).ok_or_else(|| {
        Error::query(format!("`{}` has no attribute `{name}`", model.name))
    })
}

/// The name a select-list entry is exposed under.
fn output_name(column: &SelectColumn) -> Option<&str> {
    match (&column.alias, &column.expr) {
        (Some(alias), _) => Some(alias),
        (None, Expr::Column(column)) => Some(&column.name),
        _ => None,
    }
}
