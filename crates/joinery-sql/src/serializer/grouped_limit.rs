use super::{
    join::{include_columns, Joins, Placement},
    pagination::{key_order, terms},
    select::SelectList,
    Binds, Formatter, Params, TableAlias, ToSql,
};
use crate::Fragment;

use joinery_core::{
    stmt::{Expr, GroupScope, GroupedLimitPlan, Select, Value},
    Error, Result,
};

/// One limited select per partition value, unioned into a derived table
/// aliased to the root. Includes join onto the union and a single outer
/// `ORDER BY` fixes the final order.
pub(super) fn grouped<P: Params>(
    select: &Select,
    plan: &GroupedLimitPlan,
    f: &mut Formatter<'_, P>,
) -> Result<()> {
    if plan.values.is_empty() {
        return Err(Error::query(format!(
            "grouped limit on `{}` has no values",
            select.table.name
        )));
    }

    let root = select.table.qualifier();

    let mut columns = vec![];
    include_columns(&select.includes, Placement::All, &mut columns);

    let list = SelectList::new(Some(root), columns);
    fmt!(f, "SELECT " list " FROM (");

    let union = if f.capability().union_all {
        " UNION ALL "
    } else {
        " UNION "
    };

    for (i, value) in plan.values.iter().enumerate() {
        if i > 0 {
            f.dst.push_str(union);
        }

        let fragment = branch(select, plan, value, f)?;

        for value in &fragment.binds {
            f.params.push(value);
        }

        f.dst.push_str(&fragment.sql);
    }

    fmt!(f, ")" TableAlias(root) Joins(&select.includes, Placement::All));

    let mut order = terms(&select.order_by, true);

    if order.is_empty() {
        order = key_order(&select.primary_key, Some(root), true);
    }

    f.order_by(order, vec![], None, None)
}

/// `SELECT * FROM (SELECT ... WHERE <scope> ... LIMIT n) AS sub`
///
/// Compiled on its own, numbering placeholders after the binds already
/// collected by `f`.
fn branch<P: Params>(
    select: &Select,
    plan: &GroupedLimitPlan,
    value: &Value,
    f: &Formatter<'_, P>,
) -> Result<Fragment> {
    let mut sql = String::new();
    let mut binds = Binds::with_offset(f.params.len());

    let mut branch = Formatter {
        serializer: f.serializer,
        dst: &mut sql,
        params: &mut binds,
    };

    let mut columns: Vec<_> = select.columns.iter().collect();

    if let GroupScope::Through(through) = &plan.scope {
        columns.push(&through.column);
    }

    let table = &select.table;
    let list = SelectList::new(None, columns);
    fmt!(&mut branch, "SELECT * FROM (SELECT " list " FROM " table);

    let mut filter = vec![];

    match &plan.scope {
        GroupScope::Column(column) => {
            filter.push(Expr::eq(column.clone(), value.clone()));
        }
        GroupScope::Through(through) => {
            let (table, on) = (&through.table, &through.on);
            let key = Expr::eq(through.key.clone(), value.clone());
            let key = &key;
            fmt!(&mut branch, " INNER JOIN " table " ON " on " AND " key);

            if let Some(through_filter) = &through.filter {
                fmt!(&mut branch, " AND " through_filter);
            }
        }
    }

    if let Some(root_filter) = &select.filter {
        filter.extend(root_filter.clone().into_conjuncts());
    }

    let filter = Expr::and_from_vec(filter);

    branch.where_clause(Some(&filter), &[])?;
    branch.group_by_having(select)?;

    let root = select.table.qualifier();
    branch.order_by(
        terms(select.order_by.iter().filter(|ordering| ordering.in_subquery), false),
        key_order(&select.primary_key, Some(root), false),
        Some(plan.limit),
        select.offset,
    )?;
    branch.pagination(Some(plan.limit), select.offset)?;

    fmt!(&mut branch, ")" TableAlias("sub"));

    Ok(Fragment::new(sql, binds.into_values()))
}
