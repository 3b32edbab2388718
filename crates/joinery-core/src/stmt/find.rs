use super::{Attribute, Expr, GroupedLimit, Include, Lock, OrderBy};

/// A raw query request, as written by the caller.
///
/// ```
/// use joinery_core::stmt::{col, Direction, Expr, FindOptions};
///
/// let find = FindOptions::model("User")
///     .filter(Expr::eq(col("email"), "a@b.com"))
///     .order_by(("email", Direction::Desc))
///     .limit(10);
/// assert_eq!(find.limit, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FindOptions {
    pub source: FindSource,
    pub attributes: Option<Vec<Attribute>>,
    pub filter: Option<Expr>,
    pub include: Vec<Include>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub grouped_limit: Option<GroupedLimit>,

    /// Overrides whether the root is paginated inside a derived table.
    pub sub_query: Option<bool>,

    pub group_by: Vec<String>,
    pub having: Option<Expr>,
    pub lock: Option<Lock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindSource {
    /// A model registered in the schema.
    Model(String),

    /// A table with no model. Attributes name columns directly.
    Table(String),
}

impl FindOptions {
    pub fn model(name: impl Into<String>) -> FindOptions {
        FindOptions::new(FindSource::Model(name.into()))
    }

    pub fn table(name: impl Into<String>) -> FindOptions {
        FindOptions::new(FindSource::Table(name.into()))
    }

    fn new(source: FindSource) -> FindOptions {
        FindOptions {
            source,
            attributes: None,
            filter: None,
            include: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
            grouped_limit: None,
            sub_query: None,
            group_by: vec![],
            having: None,
            lock: None,
        }
    }

    pub fn attributes<A: Into<Attribute>>(mut self, attributes: impl IntoIterator<Item = A>) -> FindOptions {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// ANDs `filter` with any filter already set.
    pub fn filter(mut self, filter: impl Into<Expr>) -> FindOptions {
        self.filter = Some(match self.filter.take() {
            Some(existing) => Expr::and(existing, filter),
            None => filter.into(),
        });
        self
    }

    pub fn include(mut self, include: impl Into<Include>) -> FindOptions {
        self.include.push(include.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<OrderBy>) -> FindOptions {
        self.order_by.push(order_by.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> FindOptions {
        self.offset = Some(offset);
        self
    }

    pub fn grouped_limit(mut self, grouped_limit: GroupedLimit) -> FindOptions {
        self.grouped_limit = Some(grouped_limit);
        self
    }

    pub fn sub_query(mut self, sub_query: bool) -> FindOptions {
        self.sub_query = Some(sub_query);
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> FindOptions {
        self.group_by.push(column.into());
        self
    }

    pub fn having(mut self, having: impl Into<Expr>) -> FindOptions {
        self.having = Some(having.into());
        self
    }

    pub fn lock(mut self, lock: Lock) -> FindOptions {
        self.lock = Some(lock);
        self
    }
}
