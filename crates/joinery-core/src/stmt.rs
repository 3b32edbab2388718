mod attribute;
pub use attribute::Attribute;

mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_column;
pub use expr_column::{col, ExprColumn};

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_like;
pub use expr_like::ExprLike;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_raw;
pub use expr_raw::ExprRaw;

mod find;
pub use find::{FindOptions, FindSource};

mod grouped_limit;
pub use grouped_limit::GroupedLimit;

mod include;
pub use include::{Include, IncludeTarget, IncludeThrough};

mod include_node;
pub use include_node::{IncludeNode, JoinKind, ThroughNode};

mod lock;
pub use lock::Lock;

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by;
pub use order_by::{OrderBy, OrderTarget};

mod select;
pub use select::{
    GroupScope, GroupThrough, GroupedLimitPlan, JoinOn, KeyColumn, Ordering, Select, SelectColumn,
};

mod table_ref;
pub use table_ref::TableRef;

mod value;
pub use value::Value;
