//! Integration tests for the mattertime library
//!
//! These exercise settings, the stamper and the file system together on
//! temporary vaults.

use mattertime::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn test_update_all_vault() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(root, "plain.md", "# Plain\n");
    write(root, "with_fm.md", "---\ntitle: Kept\nnested:\n  a: 1\n---\nbody\n");
    write(root, "templates/daily.md", "# Template\n");
    write(root, "art/sketch.excalidraw.md", "drawing data\n");
    write(root, "notes.txt", "not markdown\n");
    write(root, ".obsidian/workspace.md", "# app state\n");
    write(root, "broken.md", "---\ntitle: [oops\n---\n");

    let mut settings = Settings::default();
    settings.add_ignore_folder("templates");
    settings.min_minutes_between_saves = 30;
    let stamper = Stamper::new(settings).unwrap();

    let report = stamper.update_all(root, &AtomicBool::new(false)).unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(report.changed, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].0, "broken.md");
    assert!(!report.cancelled);

    let plain = read(root, "plain.md");
    assert!(plain.starts_with("---\ncreated: "));
    assert!(plain.contains("\nupdated: "));
    assert!(plain.ends_with("\n---\n# Plain\n"));

    let with_fm = read(root, "with_fm.md");
    assert!(with_fm.starts_with("---\ntitle: Kept\nnested:\n  a: 1\ncreated: "));
    assert!(with_fm.ends_with("\n---\nbody\n"));

    assert_eq!(read(root, "templates/daily.md"), "# Template\n");
    assert_eq!(read(root, "art/sketch.excalidraw.md"), "drawing data\n");
    assert_eq!(read(root, "notes.txt"), "not markdown\n");
    assert_eq!(read(root, ".obsidian/workspace.md"), "# app state\n");
    assert_eq!(read(root, "broken.md"), "---\ntitle: [oops\n---\n");

    // Everything is fresh now
    let again = stamper.update_all(root, &AtomicBool::new(false)).unwrap();
    assert_eq!(again.changed, 0);
}

#[test]
fn test_update_all_cancelled() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "a.md", "# A\n");

    let stamper = Stamper::new(Settings::default()).unwrap();
    let report = stamper
        .update_all(temp_dir.path(), &AtomicBool::new(true))
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.processed, 0);
    assert_eq!(read(temp_dir.path(), "a.md"), "# A\n");
}

#[cfg(unix)]
#[test]
fn test_update_all_stops_on_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "locked/a.md", "# A\n");
    write(root, "z.md", "# Z\n");

    let locked = root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
    // Privileged users write through read-only directories
    if fs::write(locked.join("writable-check"), "").is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let stamper = Stamper::new(Settings::default()).unwrap();
    let result = stamper.update_all(root, &AtomicBool::new(false));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    match result {
        Err(MatterTimeError::Io(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied)
        }
        other => panic!("expected a permission error, got {:?}", other),
    }
    assert_eq!(read(root, "locked/a.md"), "# A\n");
    assert_eq!(read(root, "z.md"), "# Z\n");
}

#[test]
fn test_stamp_file_returns_written_content() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "a.md", "# A\n");
    write(temp_dir.path(), "b.txt", "text\n");

    let stamper = Stamper::new(Settings::default()).unwrap();
    let stamped = stamper
        .stamp_file(temp_dir.path(), &temp_dir.path().join("a.md"), TriggerSource::Modify)
        .unwrap();
    assert_eq!(stamped.content.as_deref(), Some(read(temp_dir.path(), "a.md").as_str()));

    let ignored = stamper
        .stamp_file(temp_dir.path(), &temp_dir.path().join("b.txt"), TriggerSource::Modify)
        .unwrap();
    assert_eq!(ignored.status, FileChangeStatus::Ignored(IgnoreReason::NotMarkdown));
    assert_eq!(ignored.content, None);
}

#[test]
fn test_dry_run_leaves_files_alone() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "a.md", "# A\n");
    let path = temp_dir.path().join("a.md");

    let stamper = Stamper::new(Settings::default()).unwrap().with_dry_run(true);
    let stamped = stamper
        .stamp_file(temp_dir.path(), &path, TriggerSource::Modify)
        .unwrap();

    assert!(matches!(stamped.status, FileChangeStatus::Ok { ref changes } if changes.len() == 2));
    assert_eq!(stamped.content.as_deref(), Some("# A\n"));
    assert_eq!(read(temp_dir.path(), "a.md"), "# A\n");
}

#[test]
fn test_created_ignored_folder_and_custom_keys() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.json");
    fs::write(
        &settings_path,
        r#"{
            "headerUpdated": "modified",
            "headerCreated": "born",
            "dateFormat": "%Y-%m-%d",
            "ignoreGlobalFolder": "private",
            "ignoreCreatedFolder": ["journal/"]
        }"#,
    )
    .unwrap();

    let vault = temp_dir.path().join("vault");
    write(&vault, "journal/today.md", "entry\n");
    write(&vault, "private/secret.md", "shh\n");

    let stamper = Stamper::new(Settings::load(&settings_path).unwrap()).unwrap();
    let report = stamper.update_all(&vault, &AtomicBool::new(false)).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.changed, 1);

    let today = read(&vault, "journal/today.md");
    let front_matter = FrontMatter::parse(&today).unwrap().unwrap();
    assert!(!front_matter.contains_key("born"));
    let modified = front_matter
        .get("modified")
        .and_then(|value| value.as_str())
        .unwrap();
    assert!(DateFormat::new("%Y-%m-%d").unwrap().parse_str(modified).is_some());
    assert_eq!(read(&vault, "private/secret.md"), "shh\n");
}

#[test]
fn test_stale_updated_value_is_refreshed() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "old.md",
        "---\ncreated: 2001-01-01T00:00\nupdated: 2001-01-01T00:00\n---\ntext\n",
    );
    let path = temp_dir.path().join("old.md");

    let stamper = Stamper::new(Settings::default()).unwrap();
    let status = stamper.handle_file_change(temp_dir.path(), &path, TriggerSource::Modify);

    match status {
        FileChangeStatus::Ok { changes } => {
            assert_eq!(changes.len(), 1);
            assert_eq!(changes[0].key, "updated");
            assert_eq!(changes[0].old.as_deref(), Some("2001-01-01T00:00"));
        }
        other => panic!("expected a change, got {:?}", other),
    }

    let content = read(temp_dir.path(), "old.md");
    assert!(content.starts_with("---\ncreated: 2001-01-01T00:00\nupdated: "));
    assert!(!content.contains("updated: 2001"));
}

#[test]
fn test_error_handling() {
    let temp_dir = TempDir::new().unwrap();

    let err = Settings::load(temp_dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, MatterTimeError::FileNotFound { .. }));

    let bad_json = temp_dir.path().join("bad.json");
    fs::write(&bad_json, "{ not json").unwrap();
    assert!(matches!(
        Settings::load(&bad_json).unwrap_err(),
        MatterTimeError::Json(_)
    ));

    let stamper = Stamper::new(Settings::default()).unwrap();
    let err = stamper
        .update_all(&temp_dir.path().join("nowhere"), &AtomicBool::new(false))
        .unwrap_err();
    assert!(matches!(err, MatterTimeError::FileNotFound { .. }));
}
