use super::Expr;

/// A column reference.
///
/// Before normalization `table` holds the include path written by the
/// caller (`Posts.Comments` for `$Posts.Comments.body$`). Once the query is
/// normalized it holds the SQL alias the column is qualified with, and
/// `name` holds the database column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprColumn {
    pub table: Option<String>,
    pub name: String,
}

impl ExprColumn {
    /// Parses `name`, `Posts.title` or `$Posts.title$`.
    pub fn parse(src: &str) -> ExprColumn {
        let src = src
            .strip_prefix('$')
            .and_then(|s| s.strip_suffix('$'))
            .unwrap_or(src);

        match src.rsplit_once('.') {
            Some((path, name)) => ExprColumn {
                table: Some(path.to_string()),
                name: name.to_string(),
            },
            None => ExprColumn {
                table: None,
                name: src.to_string(),
            },
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> ExprColumn {
        ExprColumn {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    pub fn bare(name: impl Into<String>) -> ExprColumn {
        ExprColumn {
            table: None,
            name: name.into(),
        }
    }
}

/// Shorthand for [`ExprColumn::parse`].
pub fn col(src: &str) -> ExprColumn {
    ExprColumn::parse(src)
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Expr {
        Expr::Column(value)
    }
}
