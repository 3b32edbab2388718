use super::{field, Normalize};

use joinery_core::{
    schema::{Association, AssociationKind, Field, Model},
    stmt::{
        Expr, ExprColumn, Include, IncludeNode, IncludeTarget, JoinKind, JoinOn, SelectColumn,
        TableRef, ThroughNode,
    },
    Error, Result,
};

/// An include being planned. Filters are kept as written until the whole
/// tree is known, since they may reference other includes by path.
#[derive(Debug)]
pub(super) struct Planned<'a> {
    pub(super) node: IncludeNode,

    pub(super) association: &'a Association,
    pub(super) target: &'a Model,

    /// Junction model of a many-to-many include
    pub(super) through: Option<&'a Model>,

    /// Field on the parent model the join compares
    pub(super) parent_key: &'a Field,

    /// Filter supplied by the caller, including conjuncts routed from the
    /// root filter.
    pub(super) filter: Option<Expr>,

    /// Junction filter supplied by the caller
    pub(super) through_filter: Option<Expr>,

    pub(super) explicit_required: Option<bool>,
    pub(super) right: bool,

    pub(super) children: Vec<Planned<'a>>,
}

impl<'a> Normalize<'a> {
    pub(super) fn plan_includes(
        &self,
        parent: &'a Model,
        parent_node: Option<&IncludeNode>,
        includes: &[Include],
    ) -> Result<Vec<Planned<'a>>> {
        let mut planned: Vec<Planned<'a>> = vec![];

        for include in includes {
            let association = self.resolve_association(parent, &include.target)?;

            if planned
                .iter()
                .any(|sibling| sibling.association.alias == association.alias)
            {
                return Err(Error::query(format!(
                    "association `{}` of `{}` is included more than once",
                    association.alias, parent.name
                )));
            }

            planned.push(self.plan_include(parent, parent_node, association, include)?);
        }

        Ok(planned)
    }

    fn plan_include(
        &self,
        parent: &'a Model,
        parent_node: Option<&IncludeNode>,
        association: &'a Association,
        include: &Include,
    ) -> Result<Planned<'a>> {
        let target = self.schema.model(association.target);

        let (path, alias, parent_alias) = match parent_node {
            None => (
                association.alias.clone(),
                association.alias.clone(),
                self.table.qualifier().to_string(),
            ),
            Some(node) => (
                format!("{}.{}", node.path, association.alias),
                format!("{}->{}", node.table.qualifier(), association.alias),
                node.table.qualifier().to_string(),
            ),
        };

        let columns = self.attribute_columns(target, include.attributes.as_deref(), &alias, &path)?;

        let (parent_key, rhs, through) = match &association.kind {
            AssociationKind::BelongsTo(rel) => {
                let target_key = field(target, &rel.target_key)?;
                (
                    field(parent, &rel.foreign_key)?,
                    ExprColumn::qualified(&alias, &target_key.column),
                    None,
                )
            }
            AssociationKind::HasOne(rel) => {
                let foreign_key = field(target, &rel.foreign_key)?;
                (
                    field(parent, &rel.source_key)?,
                    ExprColumn::qualified(&alias, &foreign_key.column),
                    None,
                )
            }
            AssociationKind::HasMany(rel) => {
                let foreign_key = field(target, &rel.foreign_key)?;
                (
                    field(parent, &rel.source_key)?,
                    ExprColumn::qualified(&alias, &foreign_key.column),
                    None,
                )
            }
            AssociationKind::BelongsToMany(rel) => {
                let junction = self.schema.model(rel.through);
                let through_alias = format!("{alias}->{}", junction.name);

                let foreign_key = field(junction, &rel.foreign_key)?;
                let other_key = field(junction, &rel.other_key)?;
                let target_key = field(target, &rel.target_key)?;

                let attributes = include
                    .through
                    .as_ref()
                    .and_then(|through| through.attributes.as_deref());

                let through_node = ThroughNode {
                    table: TableRef::aliased(&junction.table_name, &through_alias),
                    columns: self.attribute_columns(
                        junction,
                        attributes,
                        &through_alias,
                        &format!("{path}.{}", junction.name),
                    )?,
                    on: JoinOn {
                        lhs: ExprColumn::qualified(&alias, &target_key.column),
                        rhs: ExprColumn::qualified(&through_alias, &other_key.column),
                    },
                    filter: None,
                };

                (
                    field(parent, &rel.source_key)?,
                    ExprColumn::qualified(&through_alias, &foreign_key.column),
                    Some((junction, through_node)),
                )
            }
        };

        let (through, through_node) = match through {
            Some((junction, node)) => (Some(junction), Some(node)),
            None => (None, None),
        };

        let node = IncludeNode {
            path,
            table: TableRef::aliased(&target.table_name, &alias),
            join: JoinKind::Left,
            required: false,
            multiple: association.is_multiple(),
            columns,
            on: JoinOn {
                lhs: ExprColumn::qualified(parent_alias, &parent_key.column),
                rhs,
            },
            filter: None,
            through: through_node,
            children: vec![],
            in_subquery: false,
            subquery_filter: None,
        };

        let children = self.plan_includes(target, Some(&node), &include.include)?;

        Ok(Planned {
            node,
            association,
            target,
            through,
            parent_key,
            filter: include.filter.clone(),
            through_filter: include
                .through
                .as_ref()
                .and_then(|through| through.filter.clone()),
            explicit_required: include.required,
            right: include.right,
            children,
        })
    }

    fn resolve_association(&self, parent: &'a Model, target: &IncludeTarget) -> Result<&'a Association> {
        match target {
            IncludeTarget::Alias(alias) => parent.association(alias).ok_or_else(|| {
                Error::query(format!("`{}` has no association `{alias}`", parent.name))
            }),
            IncludeTarget::Model {
                model,
                alias: Some(alias),
            } => {
                let association = parent.association(alias).ok_or_else(|| {
                    Error::query(format!("`{}` has no association `{alias}`", parent.name))
                })?;

                if self.schema.model(association.target).name != *model {
                    return Err(Error::query(format!(
                        "association `{alias}` of `{}` does not target `{model}`",
                        parent.name
                    )));
                }

                Ok(association)
            }
            IncludeTarget::Model { model, alias: None } => {
                let mut candidates = parent
                    .associations
                    .values()
                    .filter(|association| self.schema.model(association.target).name == *model);

                match (candidates.next(), candidates.next()) {
                    (Some(association), None) => Ok(association),
                    (None, _) => Err(Error::query(format!(
                        "`{model}` is not associated to `{}`",
                        parent.name
                    ))),
                    (Some(_), Some(_)) => Err(Error::query(format!(
                        "`{model}` is associated to `{}` more than once; name the association to include",
                        parent.name
                    ))),
                }
            }
        }
    }
}

/// Decides joins once every caller filter has been routed.
pub(super) fn decide_joins(planned: &mut [Planned<'_>]) {
    for include in planned {
        let node = &mut include.node;
        node.required = include
            .explicit_required
            .unwrap_or(include.filter.is_some());

        node.join = if node.required {
            JoinKind::Inner
        } else if include.right {
            JoinKind::Right
        } else {
            JoinKind::Left
        };

        decide_joins(&mut include.children);
    }
}

/// Marks the includes that can be joined inside the paginated subquery:
/// required single-row includes whose ancestors are all inside as well.
pub(super) fn place(planned: &mut [Planned<'_>], parent_inside: bool) {
    for include in planned {
        let node = &mut include.node;
        node.in_subquery = parent_inside && node.required && !node.multiple;

        let inside = node.in_subquery;
        place(&mut include.children, inside);
    }
}

pub(super) fn has_multiple(planned: &[Planned<'_>]) -> bool {
    planned
        .iter()
        .any(|include| include.node.multiple || has_multiple(&include.children))
}

pub(super) fn find<'p, 'a>(planned: &'p [Planned<'a>], path: &str) -> Option<&'p Planned<'a>> {
    planned.iter().find_map(|include| {
        if include.node.path == path {
            Some(include)
        } else {
            find(&include.children, path)
        }
    })
}

pub(super) fn find_mut<'p, 'a>(planned: &'p mut [Planned<'a>], path: &str) -> Option<&'p mut Planned<'a>> {
    for include in planned {
        if include.node.path == path {
            return Some(include);
        }

        if let Some(found) = find_mut(&mut include.children, path) {
            return Some(found);
        }
    }

    None
}

/// Adds `field` to the include's select list unless it is already there.
pub(super) fn ensure_column(node: &mut IncludeNode, field: &Field) {
    let output = format!("{}.{}", node.path, field.name);

    if node.columns.iter().any(|column| column.alias.as_deref() == Some(&output)) {
        return;
    }

    let column = ExprColumn::qualified(node.table.qualifier(), &field.column);
    node.columns.push(SelectColumn::aliased(column, output));
}
