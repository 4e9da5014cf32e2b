use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::value::Value;

/// A single record: column name to value, keys in schema order.
pub type Row = IndexMap<String, Value>;

/// Conjunction of `column = value` equalities, keyed in sorted order.
pub type Conditions = BTreeMap<String, Value>;

/// Returns true when `row` satisfies every condition.
///
/// Comparison is exact on both type and value: `Int(28)` never matches
/// `Text("28")`, and a row without the column never matches. An empty
/// condition set matches every row.
pub fn matches(row: &Row, conditions: &Conditions) -> bool {
    conditions
        .iter()
        .all(|(column, expected)| row.get(column) == Some(expected))
}

/// Builds a [Row] from `(column, value)` pairs, keeping their order.
pub fn row<K, V, I>(pairs: I) -> Row
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Builds [Conditions] from `(column, value)` pairs.
pub fn conditions<K, V, I>(pairs: I) -> Conditions
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Key/value pairs of `row` sorted by column name.
pub fn sorted_pairs(row: &Row) -> Vec<(String, Value)> {
    let mut pairs: Vec<(String, Value)> = row
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    pairs
}
