#[cfg(test)]
mod tests {
    use crate::heap_table::HeapTable;
    use common::error::StorageError;
    use common::schema::Schema;
    use common::value::{ColumnType, Row, Value};
    use common::testutil::init;
    use tempfile::TempDir;

    fn ab_schema() -> Schema {
        Schema::from_pairs(vec![("a", ColumnType::Int), ("b", ColumnType::Text)])
    }

    fn row(a: i32, b: &str) -> Row {
        let mut r = Row::new();
        r.insert("a".to_string(), Value::Int(a));
        r.insert("b".to_string(), Value::text(b));
        r
    }

    #[test]
    fn round_trip_insert_select_project() {
        init();
        let dir = TempDir::new().unwrap();
        let mut table = HeapTable::new(dir.path().join("t.db"), ab_schema());
        table.create().unwrap();

        let handle = table.insert(&row(12, "Hello!")).unwrap();
        let handles = table.select(None).unwrap();
        assert_eq!(handles, vec![handle]);

        let projected = table.project(handle).unwrap();
        assert_eq!(projected, row(12, "Hello!"));

        table.drop_table().unwrap();
    }

    #[test]
    fn validate_rejects_unknown_column() {
        init();
        let dir = TempDir::new().unwrap();
        let mut table = HeapTable::new(dir.path().join("t.db"), ab_schema());
        table.create().unwrap();

        let mut r = row(1, "x");
        r.insert("c".to_string(), Value::Int(9));
        let err = table.validate(&r).unwrap_err();
        assert!(matches!(err, StorageError::Schema(_)));
    }

    #[test]
    fn validate_rejects_missing_column() {
        init();
        let dir = TempDir::new().unwrap();
        let mut table = HeapTable::new(dir.path().join("t.db"), ab_schema());
        table.create().unwrap();

        let mut r = Row::new();
        r.insert("a".to_string(), Value::Int(1));
        let err = table.validate(&r).unwrap_err();
        assert!(matches!(err, StorageError::Schema(_)));
    }

    #[test]
    fn validate_rejects_type_mismatch() {
        init();
        let dir = TempDir::new().unwrap();
        let mut table = HeapTable::new(dir.path().join("t.db"), ab_schema());
        table.create().unwrap();

        let mut r = Row::new();
        r.insert("a".to_string(), Value::text("not an int"));
        r.insert("b".to_string(), Value::text("fine"));
        let err = table.validate(&r).unwrap_err();
        assert!(matches!(err, StorageError::Schema(_)));
    }

    #[test]
    fn insert_many_rows_spans_multiple_pages() {
        init();
        let dir = TempDir::new().unwrap();
        let mut table = HeapTable::new(dir.path().join("t.db"), ab_schema());
        table.create().unwrap();

        let big = "x".repeat(500);
        let mut handles = Vec::new();
        for i in 0..50 {
            handles.push(table.insert(&row(i, &big)).unwrap());
        }

        let selected = table.select(None).unwrap();
        assert_eq!(selected.len(), 50);
        for (i, handle) in handles.iter().enumerate() {
            let projected = table.project(*handle).unwrap();
            assert_eq!(projected.get("a"), Some(&Value::Int(i as i32)));
        }
    }

    #[test]
    fn project_columns_restricts_output() {
        init();
        let dir = TempDir::new().unwrap();
        let mut table = HeapTable::new(dir.path().join("t.db"), ab_schema());
        table.create().unwrap();

        let handle = table.insert(&row(7, "partial")).unwrap();
        let projected = table.project_columns(handle, &["b"]).unwrap();
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.get("b"), Some(&Value::text("partial")));
    }

    #[test]
    fn create_if_not_exists_opens_existing_table() {
        init();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.db");
        {
            let mut table = HeapTable::new(&path, ab_schema());
            table.create().unwrap();
            table.insert(&row(1, "x")).unwrap();
            table.close();
        }
        let mut table = HeapTable::new(&path, ab_schema());
        table.create_if_not_exists().unwrap();
        assert_eq!(table.select(None).unwrap().len(), 1);
    }
}
