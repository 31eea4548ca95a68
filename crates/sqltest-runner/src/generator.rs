//! Test SQL generation
//!
//! Predicate builders select the rows violating an assertion. The envelope
//! functions turn a predicate into the final statement, which always yields
//! exactly one row with a `failures` column.
//!
//! Identifiers and expressions are emitted verbatim. String literals are
//! single-quoted without escaping; configuration is trusted.

use crate::params::{
    AcceptedRange, AcceptedValues, AggValue, Bit, ColumnCombination, ExpressionIsTrue, RegexpLike,
    Relationships, ValueEquals,
};
use sqltest_core::{ModelTest, ParamValue};

/// Pattern used by the `uuid` test, matched case-insensitively
pub const UUID_PATTERN: &str = "^[a-f0-9]{8}-([a-f0-9]{4}-){3}[a-f0-9]{12}$";

/// Output of a test function, before the envelope is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Selects the violating rows; the envelope counts them
    Rows(String),
    /// Already yields a single `failures` row
    Failures(String),
}

impl Predicate {
    /// Produce the final, executable statement
    pub fn into_sql(self) -> String {
        match self {
            Predicate::Rows(sql) => wrap_failures(&sql),
            Predicate::Failures(sql) => sql,
        }
    }
}

/// Wrap `inner_sql` as a subquery under a single-expression select.
pub fn envelope(select_expr: &str, inner_sql: &str) -> String {
    format!(
        "select\n  {select_expr}\nfrom (\n\n{}\n\n)",
        indent(inner_sql.trim(), 2)
    )
}

/// Count the rows selected by a predicate as `failures`.
pub fn wrap_failures(predicate_sql: &str) -> String {
    envelope("count(*) as failures", predicate_sql)
}

/// Prefix every non-blank line with `width` spaces. Blank lines become empty.
pub fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-quote a string literal verbatim.
pub fn quote_string(value: &str) -> String {
    if value.contains('\'') {
        log::warn!(
            "String literal {:?} contains a single quote and is not escaped; the generated SQL may be invalid",
            value
        );
    }
    format!("'{value}'")
}

/// Parameters each built-in test emits as quoted string literals
const QUOTED_PARAMS: &[(&str, &[&str])] = &[
    ("accepted_values", &["values"]),
    ("regexp_like", &["expression", "flags"]),
    ("bit", &["yes", "no"]),
    ("value_equals", &["value"]),
];

/// Names of a test's quoted parameters whose strings contain a single quote.
///
/// Those values are emitted without escaping and break the generated SQL.
pub fn unescaped_quote_params(test: &ModelTest) -> Vec<&str> {
    let Some((_, keys)) = QUOTED_PARAMS.iter().find(|(name, _)| *name == test.name) else {
        return Vec::new();
    };
    keys.iter()
        .copied()
        .filter(|key| test.kwargs.get(*key).is_some_and(contains_quote))
        .collect()
}

fn contains_quote(value: &ParamValue) -> bool {
    match value {
        ParamValue::String(s) => s.contains('\''),
        ParamValue::List(items) => items.iter().any(contains_quote),
        _ => false,
    }
}

/// Render a parameter as a SQL literal: strings quoted, everything else as-is.
pub fn sql_literal(value: &ParamValue) -> String {
    match value {
        ParamValue::String(s) => quote_string(s),
        other => other.to_raw_sql(),
    }
}

/// Append a filter as an additional AND-ed condition on its own line.
fn and_where(sql: String, where_clause: Option<&str>) -> String {
    match where_clause {
        Some(clause) => format!("{sql} and\n  ({clause})"),
        None => sql,
    }
}

/// Rows whose value in `column` appears more than once.
pub fn unique_sql(relation: &str, column: &str) -> String {
    format!(
        "select\n  {column},\n  count(*) as records\nfrom {relation}\ngroup by {column}\n  having count(*) > 1"
    )
}

/// Rows where `column` is null.
pub fn not_null_sql(relation: &str, column: &str) -> String {
    format!("select {column}\nfrom {relation}\nwhere\n  {column} is null")
}

/// Non-null rows whose value is outside the accepted set.
pub fn accepted_values_sql(relation: &str, column: &str, params: &AcceptedValues<'_>) -> String {
    let values = params
        .values
        .iter()
        .map(sql_literal)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "select {column}\nfrom {relation}\nwhere\n  {column} is not null and\n  {column} not in ({values})"
    )
}

/// Rows for which the expression does not hold.
pub fn expression_is_true_sql(relation: &str, params: &ExpressionIsTrue<'_>) -> String {
    let sql = format!(
        "select *\nfrom {relation}\nwhere\n  not({})",
        params.expression
    );
    and_where(sql, params.where_clause)
}

/// Non-null rows with no matching row in the referenced relation.
pub fn relationships_sql(relation: &str, column: &str, params: &Relationships<'_>) -> String {
    let Relationships { to, field, .. } = params;
    let sql = format!(
        "select a.{column}\nfrom {relation} a\n  left join {to} b on a.{column} = b.{field}\nwhere\n  a.{column} is not null and\n  b.{field} is null"
    );
    and_where(sql, params.where_clause)
}

/// Combinations of the listed columns that occur more than once.
pub fn unique_combination_sql(relation: &str, params: &ColumnCombination<'_>) -> String {
    let columns = params.columns.join(", ");
    format!(
        "select\n  {columns},\n  count(*) as records\nfrom {relation}\ngroup by {columns}\n  having count(*) > 1"
    )
}

/// One row: `failures` is 1 when `column` has no non-null value, else 0.
pub fn at_least_one_sql(relation: &str, column: &str) -> String {
    let inner =
        format!("select\n  count(*) as records\nfrom {relation}\nwhere\n  {column} is not null");
    envelope("case when records = 0 then 1 else 0 end as failures", &inner)
}

/// Non-null rows not matching a regular expression.
///
/// Uses DuckDB's `regexp_matches`, which matches anywhere in the value
/// unless the pattern is anchored. Flags are passed as its options string.
pub fn regexp_like_sql(relation: &str, column: &str, params: &RegexpLike<'_>) -> String {
    let mut args = vec![column.to_string(), quote_string(params.expression)];
    if !params.flags.is_empty() {
        args.push(quote_string(params.flags));
    }
    format!(
        "select {column}\nfrom {relation}\nwhere\n  {column} is not null and\n  not(regexp_matches({}))",
        args.join(", ")
    )
}

/// Non-null rows that are not formatted as a UUID.
pub fn uuid_sql(relation: &str, column: &str) -> String {
    regexp_like_sql(
        relation,
        column,
        &RegexpLike {
            expression: UUID_PATTERN,
            flags: "i",
        },
    )
}

/// Non-null rows outside the accepted range.
///
/// Bounds are emitted verbatim so they may be SQL expressions.
pub fn accepted_range_sql(relation: &str, column: &str, params: &AcceptedRange<'_>) -> String {
    let (min_op, max_op) = if params.inclusive {
        ("<", ">")
    } else {
        ("<=", ">=")
    };

    let mut bounds = Vec::with_capacity(2);
    if let Some(min) = params.min_value {
        bounds.push(format!("{column} {min_op} {}", min.to_raw_sql()));
    }
    if let Some(max) = params.max_value {
        bounds.push(format!("{column} {max_op} {}", max.to_raw_sql()));
    }
    let condition = match bounds.as_slice() {
        [single] => single.clone(),
        _ => format!("({})", bounds.join(" or ")),
    };

    let sql = format!("select {column}\nfrom {relation}\nwhere\n  {column} is not null and\n  {condition}");
    and_where(sql, params.where_clause)
}

/// Non-null rows holding neither of the two sentinel values.
pub fn bit_sql(relation: &str, column: &str, params: &Bit) -> String {
    format!(
        "select {column}\nfrom {relation}\nwhere\n  {column} is not null and\n  {column} not in ({}, {})",
        sql_literal(&params.yes),
        sql_literal(&params.no)
    )
}

/// Rows matching the filter whose value differs from the expected one.
pub fn value_equals_sql(relation: &str, column: &str, params: &ValueEquals<'_>) -> String {
    format!(
        "select {column}\nfrom {relation}\nwhere\n  ({}) and\n  not({column} = {})",
        params.where_clause,
        sql_literal(params.value)
    )
}

/// Groups whose aggregate does not satisfy `agg_expression op value`.
pub fn agg_value_sql(relation: &str, params: &AggValue<'_>) -> String {
    let AggValue {
        agg_expression, op, ..
    } = params;
    let select_groups = params
        .group_by
        .iter()
        .map(|g| format!("  {g},\n"))
        .collect::<String>();
    let where_block = params
        .where_clause
        .map(|w| format!("where\n  {w}\n"))
        .unwrap_or_default();
    format!(
        "select\n{select_groups}  {agg_expression} as agg_value\nfrom {relation}\n{where_block}group by\n  {}\nhaving\n  not({agg_expression} {op} {})",
        params.group_by.join(", "),
        params.value.to_raw_sql()
    )
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
