use super::{field, Normalize};

use joinery_core::{
    schema::AssociationKind,
    stmt::{
        Expr, ExprColumn, GroupScope, GroupThrough, GroupedLimit, GroupedLimitPlan, JoinOn,
        SelectColumn, TableRef, Value,
    },
    Error, Result,
};

impl Normalize<'_> {
    /// Resolves a grouped limit: which column partitions the root rows and
    /// the distinct partition values.
    pub(super) fn grouped_limit(&self, grouped_limit: &GroupedLimit) -> Result<GroupedLimitPlan> {
        let Some(root) = self.model else {
            return Err(Error::query("a grouped limit needs a model to query"));
        };

        let owner = self.schema.resolve_model(&grouped_limit.model)?;
        let association = owner.association(&grouped_limit.on).ok_or_else(|| {
            Error::query(format!(
                "`{}` has no association `{}`",
                owner.name, grouped_limit.on
            ))
        })?;

        if association.target != root.id {
            return Err(Error::query(format!(
                "association `{}.{}` does not target `{}`",
                owner.name, association.alias, root.name
            )));
        }

        let mut values: Vec<Value> = vec![];
        for value in &grouped_limit.values {
            if !values.contains(value) {
                values.push(value.clone());
            }
        }

        if values.is_empty() {
            return Err(Error::query("grouped limit has no values"));
        }

        let scope = match &association.kind {
            AssociationKind::HasMany(rel) => {
                let foreign_key = field(root, &rel.foreign_key)?;
                GroupScope::Column(ExprColumn::qualified(
                    self.table.qualifier(),
                    &foreign_key.column,
                ))
            }
            AssociationKind::BelongsToMany(rel) => {
                let junction = self.schema.model(rel.through);
                let alias = &junction.name;

                let foreign_key = field(junction, &rel.foreign_key)?;
                let other_key = field(junction, &rel.other_key)?;
                let target_key = field(root, &rel.target_key)?;

                let mut filter = vec![];
                for expr in rel.through_scope.iter().chain(&grouped_limit.through) {
                    filter.push(self.qualify_expr(expr.clone(), junction, alias)?);
                }

                let key = ExprColumn::qualified(alias, &foreign_key.column);

                GroupScope::Through(GroupThrough {
                    table: TableRef::aliased(&junction.table_name, alias),
                    on: JoinOn {
                        lhs: ExprColumn::qualified(self.table.qualifier(), &target_key.column),
                        rhs: ExprColumn::qualified(alias, &other_key.column),
                    },
                    column: SelectColumn::aliased(
                        key.clone(),
                        format!("{alias}.{}", foreign_key.name),
                    ),
                    key,
                    filter: (!filter.is_empty()).then(|| Expr::and_from_vec(filter)),
                })
            }
            kind => {
                return Err(Error::query(format!(
                    "grouped limit on `{}.{}` needs a multi-row association, found {}",
                    owner.name,
                    association.alias,
                    kind.name()
                )))
            }
        };

        tracing::debug!(
            association = %association.alias,
            partitions = values.len(),
            "resolved grouped limit"
        );

        Ok(GroupedLimitPlan {
            limit: grouped_limit.limit,
            values,
            scope,
        })
    }
}
