//! Row-level operations over a table's row collection.
//!
//! Every function takes the current rows and returns the new collection; the
//! caller decides when to persist it. Nothing here touches storage, so a
//! failed operation leaves nothing half-applied.

use bitvec::prelude::*;
use tracing::debug;

use crate::cache::{Fingerprint, QueryCache};
use crate::catalog::Catalog;
use crate::coerce::coerce;
use crate::error::{Error, Result};
use crate::row::{Conditions, Row, matches};
use crate::value::Value;

/// Column assignments of an `update`.
pub type Assignments = Conditions;

/// Appends a row built from positional literals and returns the new collection.
///
/// Literals map onto the schema's non-identifier columns in declaration
/// order and are coerced to each column's type. The identifier is
/// `1 + max(existing integer IDs)`, or `1` for an empty table. Because it is
/// derived from the rows passed in, deleting the highest row and inserting
/// again reuses its ID.
///
/// # Errors
/// - [Error::UnknownTable] if the table is not in the catalog.
/// - [Error::ArityMismatch] if the literal count differs from the column count.
/// - [Error::TypeCoercion] for the first literal that does not fit its column.
/// - [Error::IdExhausted] if the highest existing ID is `i64::MAX`.
///
/// # Example
/// ```
/// # use flatdb::{Catalog, Value};
/// # use flatdb::engine::insert;
/// let mut catalog = Catalog::new();
/// catalog.create_table("users", &["name:str", "age:int"]).unwrap();
///
/// let rows = insert(&catalog, "users", &[], &["'Alice'", "28"]).unwrap();
/// let rows = insert(&catalog, "users", &rows, &["\"Bob\"", "31"]).unwrap();
///
/// assert_eq!(rows[1]["ID"], Value::Int(2));
/// assert_eq!(rows[1]["name"], Value::Text("Bob".into()));
/// ```
pub fn insert<S: AsRef<str>>(
    catalog: &Catalog,
    table: &str,
    rows: &[Row],
    literals: &[S],
) -> Result<Vec<Row>> {
    let schema = catalog.schema(table)?;
    let expected = schema.value_columns().count();

    if literals.len() != expected {
        return Err(Error::ArityMismatch {
            expected,
            found: literals.len(),
        });
    }

    let identifier = schema.identifier();
    let id = next_id(rows, identifier).ok_or_else(|| Error::IdExhausted(table.to_string()))?;

    let mut literals = literals.iter();
    let mut row = Row::with_capacity(schema.columns.len() + 1);
    for column in &schema.columns {
        let value = if column.is_identifier() {
            Value::Int(id)
        } else {
            let Some(literal) = literals.next() else {
                break;
            };
            coerce(&column.name, literal.as_ref(), column.data_type)?
        };
        row.insert(column.name.clone(), value);
    }
    if !row.contains_key(identifier) {
        row.shift_insert(0, identifier.to_string(), Value::Int(id));
    }

    debug!(table, id, "row built");
    let mut new_rows = Vec::with_capacity(rows.len() + 1);
    new_rows.extend_from_slice(rows);
    new_rows.push(row);
    Ok(new_rows)
}

/// Next surrogate identifier for a table currently holding `rows`, or
/// `None` when the highest ID is already `i64::MAX`.
/// Identifier values that are not integers are ignored.
pub fn next_id(rows: &[Row], identifier: &str) -> Option<i64> {
    rows.iter()
        .filter_map(|row| row.get(identifier).and_then(Value::as_int))
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

/// Returns the rows matching `conditions`, or every row when there are none.
///
/// Results are memoized in `cache` under a content fingerprint of the rows and
/// conditions, so repeating a query over unchanged data skips the scan while
/// any change to the data is seen immediately.
pub fn select(cache: &mut QueryCache, rows: &[Row], conditions: Option<&Conditions>) -> Vec<Row> {
    let key = Fingerprint::select(rows, conditions);
    cache.get_or_compute(key, || match conditions {
        None => rows.to_vec(),
        Some(conditions) => rows
            .iter()
            .filter(|row| matches(row, conditions))
            .cloned()
            .collect(),
    })
}

/// Overwrites `assignments` on every row matching `conditions`.
///
/// Returns the full collection and the number of rows matched. Assigned
/// columns are added if a row lacks them; values are stored as given.
pub fn update(
    mut rows: Vec<Row>,
    assignments: &Assignments,
    conditions: &Conditions,
) -> (Vec<Row>, usize) {
    let hits = match_mask(&rows, conditions);

    for (row, _) in rows
        .iter_mut()
        .zip(hits.iter().by_vals())
        .filter(|(_, hit)| *hit)
    {
        for (column, value) in assignments {
            row.insert(column.clone(), value.clone());
        }
    }

    let matched = hits.count_ones();
    debug!(matched, "rows updated");
    (rows, matched)
}

/// Drops every row matching `conditions`; the rest are kept in order.
pub fn delete(rows: Vec<Row>, conditions: &Conditions) -> Vec<Row> {
    let hits = match_mask(&rows, conditions);
    let kept: Vec<Row> = rows
        .into_iter()
        .zip(hits.iter().by_vals())
        .filter_map(|(row, hit)| (!hit).then_some(row))
        .collect();
    debug!(removed = hits.count_ones(), "rows deleted");
    kept
}

fn match_mask(rows: &[Row], conditions: &Conditions) -> BitVec {
    rows.iter().map(|row| matches(row, conditions)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{conditions, row};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .create_table("users", &["name:str", "age:int", "active:bool"])
            .unwrap();
        catalog
    }

    fn people() -> Vec<Row> {
        let catalog = catalog();
        let rows = insert(&catalog, "users", &[], &["'Alice'", "28", "true"]).unwrap();
        let rows = insert(&catalog, "users", &rows, &["'Bob'", "35", "false"]).unwrap();
        insert(&catalog, "users", &rows, &["'Carol'", "28", "true"]).unwrap()
    }

    // ─────────────────────────────────────────────────────────────
    // insert
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_insert_assigns_sequential_ids() {
        let catalog = catalog();
        let rows = insert(&catalog, "users", &[], &["'Alice'", "28", "true"]).unwrap();
        assert_eq!(rows[0]["ID"], Value::Int(1));

        let rows = insert(&catalog, "users", &rows, &["'Bob'", "35", "false"]).unwrap();
        assert_eq!(rows[1]["ID"], Value::Int(2));
        assert_eq!(
            rows[1],
            row([
                ("ID", Value::Int(2)),
                ("name", Value::from("Bob")),
                ("age", Value::Int(35)),
                ("active", Value::Bool(false)),
            ])
        );
    }

    #[test]
    fn test_insert_after_max_id() {
        let catalog = catalog();
        let existing = vec![
            row([("ID", Value::Int(5))]),
            row([("ID", Value::Int(2))]),
        ];
        let rows = insert(&catalog, "users", &existing, &["x", "1", "true"]).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["ID"], Value::Int(6));
        // the input collection is not modified
        assert_eq!(existing.len(), 2);
    }

    #[test]
    fn test_insert_reuses_id_after_deleting_max() {
        let catalog = catalog();
        let rows = delete(people(), &conditions([("ID", Value::Int(3))]));
        let rows = insert(&catalog, "users", &rows, &["'Dan'", "40", "false"]).unwrap();

        assert_eq!(rows[2]["ID"], Value::Int(3));
    }

    #[test]
    fn test_insert_keeps_schema_column_order() {
        let rows = people();
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ID", "name", "age", "active"]);
    }

    #[test]
    fn test_insert_when_ids_are_exhausted() {
        let catalog = catalog();
        let existing = vec![row([("ID", Value::Int(i64::MAX))])];

        assert_eq!(next_id(&existing, "ID"), None);
        let err = insert(&catalog, "users", &existing, &["'Dan'", "40", "false"]).unwrap_err();
        assert!(matches!(err, Error::IdExhausted(ref table) if table == "users"));
    }

    #[test]
    fn test_insert_unknown_table() {
        let err = insert(&catalog(), "ghosts", &[], &["1"]).unwrap_err();
        assert!(matches!(err, Error::UnknownTable(_)));
    }

    #[test]
    fn test_insert_arity_mismatch() {
        let catalog = catalog();
        for literals in [vec!["'Alice'", "28"], vec!["'Alice'", "28", "true", "x"]] {
            let err = insert(&catalog, "users", &[], &literals).unwrap_err();
            assert!(matches!(err, Error::ArityMismatch { expected: 3, .. }));
        }
    }

    #[test]
    fn test_insert_type_error_adds_nothing() {
        let catalog = catalog();
        let rows = people();

        let err = insert(&catalog, "users", &rows, &["'Dan'", "old", "true"]).unwrap_err();
        assert!(matches!(err, Error::TypeCoercion { ref column, .. } if column == "age"));

        let err = insert(&catalog, "users", &rows, &["'Dan'", "40", "maybe"]).unwrap_err();
        assert!(matches!(err, Error::TypeCoercion { ref column, .. } if column == "active"));
    }

    #[test]
    fn test_insert_with_caller_identifier() {
        let mut catalog = Catalog::new();
        catalog.create_table("tags", &["label:str", "id:int"]).unwrap();

        let rows = insert(&catalog, "tags", &[], &["'red'"]).unwrap();
        assert_eq!(rows[0], row([("label", Value::from("red")), ("id", Value::Int(1))]));
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["label", "id"]);
    }

    // ─────────────────────────────────────────────────────────────
    // select
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_select_all() {
        let mut cache = QueryCache::new();
        assert_eq!(select(&mut cache, &people(), None), people());
    }

    #[test]
    fn test_select_with_condition() {
        let mut cache = QueryCache::new();
        let rows = people();

        let found = select(&mut cache, &rows, Some(&conditions([("name", "Alice")])));
        assert_eq!(found, vec![rows[0].clone()]);

        let found = select(&mut cache, &rows, Some(&conditions([("age", Value::Int(28))])));
        assert_eq!(found.len(), 2);

        // typed comparison: the text "28" is not the integer 28
        let found = select(&mut cache, &rows, Some(&conditions([("age", "28")])));
        assert!(found.is_empty());
    }

    #[test]
    fn test_select_excludes_rows_missing_column() {
        let mut cache = QueryCache::new();
        let rows = vec![
            row([("ID", Value::Int(1)), ("name", Value::from("Alice"))]),
            row([("ID", Value::Int(2))]),
        ];
        let found = select(&mut cache, &rows, Some(&conditions([("name", "Alice")])));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_select_repeated_is_cached_and_fresh() {
        let mut cache = QueryCache::new();
        let rows = people();
        let cond = conditions([("active", Value::Bool(true))]);

        let first = select(&mut cache, &rows, Some(&cond));
        let second = select(&mut cache, &rows, Some(&cond));
        assert_eq!(first, second);
        assert_eq!(rows, people());
        assert_eq!(cache.stats().hits, 1);

        let (rows, _) = update(rows, &conditions([("active", false)]), &conditions([("ID", Value::Int(1))]));
        let third = select(&mut cache, &rows, Some(&cond));
        assert_eq!(third.len(), 1);
        assert_eq!(third[0]["name"], Value::from("Carol"));
    }

    // ─────────────────────────────────────────────────────────────
    // update
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_update_single_row() {
        let (rows, matched) = update(
            people(),
            &conditions([("age", Value::Int(30))]),
            &conditions([("ID", Value::Int(1))]),
        );

        assert_eq!(matched, 1);
        assert_eq!(rows[0]["age"], Value::Int(30));
        assert_eq!(rows[1]["age"], Value::Int(35));
        assert_eq!(rows[2]["age"], Value::Int(28));
    }

    #[test]
    fn test_update_no_match() {
        let rows = delete(people(), &conditions([("ID", Value::Int(1))]));
        let before = rows.clone();

        let (rows, matched) = update(rows, &conditions([("age", Value::Int(30))]), &conditions([("ID", Value::Int(1))]));
        assert_eq!(matched, 0);
        assert_eq!(rows, before);
    }

    #[test]
    fn test_update_multiple_rows_adds_missing_key() {
        let (rows, matched) = update(
            people(),
            &conditions([("email", "n/a")]),
            &conditions([("age", Value::Int(28))]),
        );

        assert_eq!(matched, 2);
        assert_eq!(rows[0]["email"], Value::from("n/a"));
        assert!(!rows[1].contains_key("email"));
        assert_eq!(rows[2]["email"], Value::from("n/a"));
    }

    // ─────────────────────────────────────────────────────────────
    // delete
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_delete_one_row() {
        let rows = delete(people(), &conditions([("ID", Value::Int(2))]));

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["ID"] != Value::Int(2)));
    }

    #[test]
    fn test_delete_no_match() {
        let rows = delete(people(), &conditions([("ID", Value::Int(99))]));
        assert_eq!(rows, people());
    }

    #[test]
    fn test_delete_many() {
        let rows = delete(people(), &conditions([("active", true)]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], Value::from("Bob"));
    }
}
