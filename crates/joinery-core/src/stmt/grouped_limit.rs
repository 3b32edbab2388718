use super::{Expr, Value};

/// Caps the number of rows returned per partition value.
///
/// `on` names a multi-row association, declared on `model`, whose target is
/// the queried model. One branch is compiled per distinct value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedLimit {
    pub limit: u64,
    pub model: String,
    pub on: String,
    pub values: Vec<Value>,

    /// Filter applied to the junction table of a many-to-many `on`.
    pub through: Option<Expr>,
}

impl GroupedLimit {
    pub fn new<T: Into<Value>>(
        limit: u64,
        model: impl Into<String>,
        on: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> GroupedLimit {
        GroupedLimit {
            limit,
            model: model.into(),
            on: on.into(),
            values: values.into_iter().map(Into::into).collect(),
            through: None,
        }
    }

    pub fn through(mut self, filter: impl Into<Expr>) -> GroupedLimit {
        self.through = Some(filter.into());
        self
    }
}
