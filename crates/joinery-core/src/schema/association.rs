use super::{Accessors, ModelId, ReferentialAction, ThroughSpec};
use crate::stmt::Expr;

/// A resolved relationship between two models.
#[derive(Debug, Clone)]
pub struct Association {
    /// Name the association is included and accessed under. Unique among
    /// the associations of the source model.
    pub alias: String,

    pub source: ModelId,

    pub target: ModelId,

    pub kind: AssociationKind,

    /// Filter applied to the target whenever the association is included.
    pub scope: Option<Expr>,

    pub accessors: Accessors,

    pub is_self_association: bool,
}

#[derive(Debug, Clone)]
pub enum AssociationKind {
    BelongsTo(BelongsTo),
    HasOne(HasOne),
    HasMany(HasMany),
    BelongsToMany(BelongsToMany),
}

/// The source holds a foreign key referencing the target.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Field on the source model
    pub foreign_key: String,

    /// Referenced field on the target model
    pub target_key: String,
}

/// The target holds a foreign key referencing the source; at most one
/// target row per source row.
#[derive(Debug, Clone)]
pub struct HasOne {
    /// Field on the target model
    pub foreign_key: String,

    /// Referenced field on the source model
    pub source_key: String,
}

/// The target holds a foreign key referencing the source.
#[derive(Debug, Clone)]
pub struct HasMany {
    /// Field on the target model
    pub foreign_key: String,

    /// Referenced field on the source model
    pub source_key: String,
}

/// Source and target are linked through a junction model.
#[derive(Debug, Clone)]
pub struct BelongsToMany {
    /// The junction model
    pub through: ModelId,

    /// Junction field referencing the source
    pub foreign_key: String,

    /// Junction field referencing the target
    pub other_key: String,

    pub source_key: String,

    pub target_key: String,

    /// Alias of the many-to-many association declared in the opposite
    /// direction through the same junction model, if any.
    pub paired: Option<String>,

    /// Filter applied to the junction whenever the association is included.
    pub through_scope: Option<Expr>,
}

/// Options accepted when declaring an association.
#[derive(Debug, Default, Clone)]
pub struct AssociationOptions {
    pub alias: Option<String>,
    pub foreign_key: Option<String>,
    pub other_key: Option<String>,
    pub source_key: Option<String>,
    pub target_key: Option<String>,
    pub through: ThroughSpec,

    /// Adds a unique key over the two junction columns. Defaults to true.
    pub unique: Option<bool>,

    /// `Some(false)` skips foreign-key references entirely; `Some(true)`
    /// defaults many-to-many referential actions to `CASCADE`.
    pub constraints: Option<bool>,

    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    pub scope: Option<Expr>,
    pub through_scope: Option<Expr>,

    /// Promote a self-referential has-many to a many-to-many backed by a
    /// junction table.
    pub use_junction_table: bool,
}

impl Association {
    pub fn is_multiple(&self) -> bool {
        matches!(
            self.kind,
            AssociationKind::HasMany(_) | AssociationKind::BelongsToMany(_)
        )
    }

    pub fn is_single(&self) -> bool {
        !self.is_multiple()
    }

    pub fn as_belongs_to_many(&self) -> Option<&BelongsToMany> {
        match &self.kind {
            AssociationKind::BelongsToMany(btm) => Some(btm),
            _ => None,
        }
    }

    /// The foreign-key field name, on whichever side holds it.
    pub fn foreign_key(&self) -> &str {
        self.kind.foreign_key()
    }
}

impl AssociationKind {
    pub fn foreign_key(&self) -> &str {
        match self {
            AssociationKind::BelongsTo(rel) => &rel.foreign_key,
            AssociationKind::HasOne(rel) => &rel.foreign_key,
            AssociationKind::HasMany(rel) => &rel.foreign_key,
            AssociationKind::BelongsToMany(rel) => &rel.foreign_key,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssociationKind::BelongsTo(_) => "belongs_to",
            AssociationKind::HasOne(_) => "has_one",
            AssociationKind::HasMany(_) => "has_many",
            AssociationKind::BelongsToMany(_) => "belongs_to_many",
        }
    }
}

impl AssociationOptions {
    pub fn new() -> AssociationOptions {
        AssociationOptions::default()
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn other_key(mut self, other_key: impl Into<String>) -> Self {
        self.other_key = Some(other_key.into());
        self
    }

    pub fn source_key(mut self, source_key: impl Into<String>) -> Self {
        self.source_key = Some(source_key.into());
        self
    }

    pub fn target_key(mut self, target_key: impl Into<String>) -> Self {
        self.target_key = Some(target_key.into());
        self
    }

    pub fn through(mut self, through: ThroughSpec) -> Self {
        self.through = through;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    pub fn constraints(mut self, constraints: bool) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    pub fn scope(mut self, scope: impl Into<Expr>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn through_scope(mut self, scope: impl Into<Expr>) -> Self {
        self.through_scope = Some(scope.into());
        self
    }

    pub fn use_junction_table(mut self) -> Self {
        self.use_junction_table = true;
        self
    }
}
