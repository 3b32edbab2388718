use super::{Attribute, Expr};

/// A requested eager load.
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub target: IncludeTarget,

    /// Forces an inner (`true`) or outer (`false`) join. When unset, the
    /// include is required exactly when it carries a filter.
    pub required: Option<bool>,

    /// Requests a right outer join.
    pub right: bool,

    /// Subset of the target's attributes to select. `None` selects all.
    pub attributes: Option<Vec<Attribute>>,

    pub filter: Option<Expr>,

    /// Options for the junction table of a many-to-many include.
    pub through: Option<IncludeThrough>,

    pub include: Vec<Include>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IncludeTarget {
    /// The association's alias on the parent model.
    Alias(String),

    /// The target model, optionally narrowed by alias when the parent has
    /// several associations to it.
    Model { model: String, alias: Option<String> },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct IncludeThrough {
    pub attributes: Option<Vec<Attribute>>,
    pub filter: Option<Expr>,
}

impl Include {
    pub fn alias(alias: impl Into<String>) -> Include {
        Include::new(IncludeTarget::Alias(alias.into()))
    }

    pub fn model(model: impl Into<String>) -> Include {
        Include::new(IncludeTarget::Model {
            model: model.into(),
            alias: None,
        })
    }

    pub fn model_as(model: impl Into<String>, alias: impl Into<String>) -> Include {
        Include::new(IncludeTarget::Model {
            model: model.into(),
            alias: Some(alias.into()),
        })
    }

    fn new(target: IncludeTarget) -> Include {
        Include {
            target,
            required: None,
            right: false,
            attributes: None,
            filter: None,
            through: None,
            include: vec![],
        }
    }

    pub fn required(mut self, required: bool) -> Include {
        self.required = Some(required);
        self
    }

    pub fn right(mut self) -> Include {
        self.right = true;
        self
    }

    pub fn attributes<A: Into<Attribute>>(mut self, attributes: impl IntoIterator<Item = A>) -> Include {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, filter: impl Into<Expr>) -> Include {
        self.filter = Some(match self.filter.take() {
            Some(existing) => Expr::and(existing, filter),
            None => filter.into(),
        });
        self
    }

    pub fn through(mut self, through: IncludeThrough) -> Include {
        self.through = Some(through);
        self
    }

    pub fn include(mut self, include: impl Into<Include>) -> Include {
        self.include.push(include.into());
        self
    }
}

impl IncludeThrough {
    pub fn attributes<A: Into<Attribute>>(mut self, attributes: impl IntoIterator<Item = A>) -> IncludeThrough {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn filter(mut self, filter: impl Into<Expr>) -> IncludeThrough {
        self.filter = Some(filter.into());
        self
    }
}

impl From<&str> for Include {
    fn from(value: &str) -> Include {
        Include::alias(value)
    }
}
