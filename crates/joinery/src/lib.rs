pub mod db;
pub use db::Db;

mod engine;

mod options;
pub use options::Options;

pub use joinery_core::{
    driver::{self, Capability, Connection, Dialect, Row},
    schema::{self, AssociationOptions, Field, ModelDef, ReferentialAction, ThroughSpec, Type},
    stmt::{
        self, col, Attribute, Direction, Expr, FindOptions, GroupedLimit, Include, IncludeThrough,
        Lock, OrderBy, Value,
    },
    Error, Result, Schema,
};
pub use joinery_sql::Fragment;
