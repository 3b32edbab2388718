use serde::Deserialize;

/// The relational back ends SQL can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Sqlite,
    Postgres,
    Mysql,
    Mariadb,
    Mssql,
    Oracle,
    Db2,
    Snowflake,
}

/// Describes what the target database's SQL dialect supports. The compiler
/// consults this instead of branching on the dialect name.
#[derive(Debug, Clone, Copy)]
pub struct Capability {
    pub dialect: Dialect,

    /// How row limits and offsets are written.
    pub pagination: Pagination,

    /// Supports `UNION ALL`. When false, grouped-limit branches are combined
    /// with `UNION`.
    pub union_all: bool,

    /// Supports `RIGHT OUTER JOIN`.
    pub right_join: bool,

    /// Identifier quote characters.
    pub quote: Quote,

    /// Words that must be quoted even when identifier quoting is disabled.
    /// Stored lowercase.
    pub reserved_words: &'static [&'static str],

    /// The case unquoted identifiers fold to.
    pub default_case: IdentifierCase,

    /// Placeholder syntax for bound parameters.
    pub bind_style: BindStyle,

    /// How boolean literals are written when values are inlined.
    pub bool_literal: BoolLiteral,

    /// How binary literals are written when values are inlined.
    pub binary_literal: BinaryLiteral,

    /// The dialect treats `\` inside string literals as an escape character.
    pub backslash_escape: bool,

    /// What to emit in place of `LIMIT n` when only an offset is requested.
    /// `None` means a bare `OFFSET m` is accepted.
    pub offset_without_limit: Option<&'static str>,

    /// `FETCH`/`OFFSET` clauses are only valid after an `ORDER BY`.
    pub fetch_requires_order: bool,

    /// Supports `SELECT ... FOR UPDATE`.
    pub select_for_update: bool,

    /// Supports `SELECT ... FOR SHARE`.
    pub select_for_share: bool,

    /// Accepts `AS` between a table and its alias.
    pub table_alias_as: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `LIMIT n OFFSET m`
    Limit,

    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    Fetch,

    /// `SELECT TOP n`
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub open: char,
    pub close: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCase {
    Lower,
    Upper,
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStyle {
    /// `$1`, `$2`, ...
    Dollar,

    /// `:1`, `:2`, ...
    Colon,

    /// `@1`, `@2`, ...
    At,

    /// `?` for every parameter; the order of the binds is the only link.
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolLiteral {
    /// `1` / `0`
    Numeric,

    /// `true` / `false`
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryLiteral {
    /// `X'0a0b'`
    Hex,

    /// `0x0a0b`
    HexPrefix,

    /// `E'\\x0a0b'`
    Bytea,
}

const ANSI_RESERVED: &[&str] = &[
    "all", "and", "as", "asc", "between", "by", "case", "check", "column", "constraint", "create",
    "cross", "default", "delete", "desc", "distinct", "drop", "else", "end", "exists", "for",
    "foreign", "from", "full", "group", "having", "in", "inner", "insert", "into", "is", "join",
    "key", "left", "like", "limit", "not", "null", "offset", "on", "or", "order", "outer",
    "primary", "references", "right", "select", "set", "table", "then", "to", "union", "unique",
    "update", "user", "using", "values", "when", "where", "with",
];

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        dialect: Dialect::Sqlite,
        pagination: Pagination::Limit,
        union_all: true,
        right_join: false,
        quote: Quote::DOUBLE,
        reserved_words: ANSI_RESERVED,
        default_case: IdentifierCase::Preserve,
        bind_style: BindStyle::Dollar,
        bool_literal: BoolLiteral::Numeric,
        binary_literal: BinaryLiteral::Hex,
        backslash_escape: false,
        offset_without_limit: Some("LIMIT -1"),
        fetch_requires_order: false,
        select_for_update: false,
        select_for_share: false,
        table_alias_as: true,
    };

    /// PostgreSQL capabilities.
    pub const POSTGRESQL: Self = Self {
        dialect: Dialect::Postgres,
        right_join: true,
        default_case: IdentifierCase::Lower,
        bool_literal: BoolLiteral::Keyword,
        binary_literal: BinaryLiteral::Bytea,
        offset_without_limit: None,
        select_for_update: true,
        select_for_share: true,
        ..Self::SQLITE
    };

    /// MySQL capabilities.
    pub const MYSQL: Self = Self {
        dialect: Dialect::Mysql,
        right_join: true,
        quote: Quote::BACKTICK,
        bind_style: BindStyle::Question,
        bool_literal: BoolLiteral::Keyword,
        backslash_escape: true,
        offset_without_limit: Some("LIMIT 18446744073709551615"),
        select_for_update: true,
        select_for_share: true,
        ..Self::SQLITE
    };

    /// MariaDB capabilities.
    pub const MARIADB: Self = Self {
        dialect: Dialect::Mariadb,
        ..Self::MYSQL
    };

    /// Microsoft SQL Server capabilities.
    pub const MSSQL: Self = Self {
        dialect: Dialect::Mssql,
        pagination: Pagination::Fetch,
        right_join: true,
        quote: Quote::BRACKET,
        bind_style: BindStyle::At,
        binary_literal: BinaryLiteral::HexPrefix,
        offset_without_limit: None,
        fetch_requires_order: true,
        ..Self::SQLITE
    };

    /// Oracle capabilities.
    pub const ORACLE: Self = Self {
        dialect: Dialect::Oracle,
        pagination: Pagination::Fetch,
        right_join: true,
        default_case: IdentifierCase::Upper,
        bind_style: BindStyle::Colon,
        offset_without_limit: None,
        fetch_requires_order: true,
        select_for_update: true,
        table_alias_as: false,
        ..Self::SQLITE
    };

    /// IBM Db2 capabilities.
    pub const DB2: Self = Self {
        dialect: Dialect::Db2,
        pagination: Pagination::Fetch,
        right_join: true,
        default_case: IdentifierCase::Upper,
        bind_style: BindStyle::Question,
        offset_without_limit: None,
        select_for_update: true,
        ..Self::SQLITE
    };

    /// Snowflake capabilities.
    pub const SNOWFLAKE: Self = Self {
        dialect: Dialect::Snowflake,
        right_join: true,
        default_case: IdentifierCase::Upper,
        bind_style: BindStyle::Question,
        bool_literal: BoolLiteral::Keyword,
        offset_without_limit: Some("LIMIT NULL"),
        ..Self::SQLITE
    };

    pub const fn for_dialect(dialect: Dialect) -> Capability {
        match dialect {
            Dialect::Sqlite => Self::SQLITE,
            Dialect::Postgres => Self::POSTGRESQL,
            Dialect::Mysql => Self::MYSQL,
            Dialect::Mariadb => Self::MARIADB,
            Dialect::Mssql => Self::MSSQL,
            Dialect::Oracle => Self::ORACLE,
            Dialect::Db2 => Self::DB2,
            Dialect::Snowflake => Self::SNOWFLAKE,
        }
    }

    /// Returns true if `word` must be quoted regardless of settings.
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved_words
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(word))
    }
}

impl Quote {
    pub const DOUBLE: Quote = Quote {
        open: '"',
        close: '"',
    };

    pub const BACKTICK: Quote = Quote {
        open: '`',
        close: '`',
    };

    pub const BRACKET: Quote = Quote {
        open: '[',
        close: ']',
    };
}
