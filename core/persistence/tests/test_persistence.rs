//! FILENAME: tests/test_persistence.rs
//! Integration tests for layout persistence and record set import.

use persistence::{
    parse_csv_records, read_csv_file, FileStore, KeyValueStore, LayoutStore, MemoryStore,
    PersistenceError, LAYOUT_STORAGE_KEY,
};
use pivot_engine::{calculate_pivot, export_csv, Area, FilterSelections, Layout};

const UPLOAD: &str = "\
Name,Course,Status,GPA
Asha,Physics,Active,8.5
Ben,Physics,Graduated,7
Chen,Math,Active,9.0
Dara,Math,Active,
";

// ============================================================================
// LAYOUT PERSISTENCE
// ============================================================================

#[test]
fn test_layout_survives_sessions_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let mut layout = Layout::new();
    layout.assign("Course", Area::Rows);
    layout.assign("Status", Area::Cols);
    layout.assign("GPA", Area::Values);

    {
        let mut session = LayoutStore::new(FileStore::new(dir.path()));
        // Initial render with an empty layout must not clobber anything.
        assert!(!session.save(&Layout::new()).unwrap());
        assert!(session.save(&layout).unwrap());
    }

    let session = LayoutStore::new(FileStore::new(dir.path()));
    assert_eq!(session.load_or_default(), layout);

    // A fresh empty layout on startup leaves the saved one untouched.
    let mut session = session;
    session.save(&Layout::new()).unwrap();
    assert_eq!(session.load(), Some(layout));
}

#[test]
fn test_corrupt_file_falls_back_to_empty_layout() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pivot_layout.json"), "[1, 2").unwrap();

    let session = LayoutStore::new(FileStore::new(dir.path()));
    assert_eq!(session.load(), None);
    assert!(session.load_or_default().is_empty());
}

#[test]
fn test_custom_storage_key() {
    let mut layout = Layout::new();
    layout.assign("City", Area::Rows);

    let mut session = LayoutStore::with_key(MemoryStore::new(), "reports_pivot");
    session.save(&layout).unwrap();

    let backend = session.into_inner();
    assert_eq!(backend.get(LAYOUT_STORAGE_KEY).unwrap(), None);
    assert!(backend.get("reports_pivot").unwrap().is_some());
}

#[test]
fn test_stale_saved_fields_still_aggregate() {
    let mut backend = MemoryStore::new();
    backend
        .set(
            LAYOUT_STORAGE_KEY,
            r#"{"rows":["Department"],"cols":[],"values":["GPA"],"filters":[]}"#,
        )
        .unwrap();
    let layout = LayoutStore::new(backend).load_or_default();

    let records = parse_csv_records(UPLOAD).unwrap();
    let result = calculate_pivot(&records, &layout, &FilterSelections::new());
    assert_eq!(result.row_keys, vec!["(Blank)"]);
    assert_eq!(result.cell("(Blank)", "Totals").unwrap().sum, 24.5);
}

// ============================================================================
// IMPORT
// ============================================================================

#[test]
fn test_upload_to_export() {
    let records = parse_csv_records(UPLOAD).unwrap();
    assert_eq!(records.len(), 4);

    let mut layout = Layout::new();
    layout.assign("Course", Area::Rows);
    layout.assign("Status", Area::Cols);
    layout.assign("GPA", Area::Values);

    let result = calculate_pivot(&records, &layout, &FilterSelections::new());
    let csv = export_csv(&result).unwrap();

    let expected = "\
\"Course \\ Status\",Active,Graduated,Total
\"Math\",9,,9
\"Physics\",8.5,7,15.5";
    assert_eq!(csv, expected);

    // Dara's blank GPA still counts.
    assert_eq!(result.cell("Math", "Active").unwrap().count, 2);
}

#[test]
fn test_read_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.csv");
    std::fs::write(&path, UPLOAD).unwrap();

    assert_eq!(read_csv_file(&path).unwrap().len(), 4);

    let missing = dir.path().join("missing.csv");
    assert!(matches!(read_csv_file(&missing), Err(PersistenceError::Io(_))));
}
