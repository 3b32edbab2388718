use super::Direction;

/// One requested ordering term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub target: OrderTarget,
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderTarget {
    /// An attribute name, a selected alias, or an include-qualified path
    /// such as `Posts.title`.
    Column(String),

    /// Caller-supplied SQL.
    Raw(String),
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> OrderBy {
        OrderBy {
            target: OrderTarget::Column(column.into()),
            direction: Some(Direction::Asc),
        }
    }

    pub fn desc(column: impl Into<String>) -> OrderBy {
        OrderBy {
            target: OrderTarget::Column(column.into()),
            direction: Some(Direction::Desc),
        }
    }

    pub fn raw(sql: impl Into<String>) -> OrderBy {
        OrderBy {
            target: OrderTarget::Raw(sql.into()),
            direction: None,
        }
    }
}

impl From<&str> for OrderBy {
    fn from(value: &str) -> OrderBy {
        OrderBy {
            target: OrderTarget::Column(value.to_string()),
            direction: None,
        }
    }
}

impl From<(&str, Direction)> for OrderBy {
    fn from((column, direction): (&str, Direction)) -> OrderBy {
        OrderBy {
            target: OrderTarget::Column(column.to_string()),
            direction: Some(direction),
        }
    }
}
