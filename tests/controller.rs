use contact_sheet::controller::{
    DELETED, GONE, LOAD_FAILED, SAVE_FAILED, SAVED, SHARE_FAILED, SHARE_UNAVAILABLE, UPDATED,
};
use contact_sheet::downloader::XLSX_MIME;
use contact_sheet::error::ShareError;
use contact_sheet::share::{NoShare, Share};
use contact_sheet::validation::EMAIL_INVALID;
use contact_sheet::{
    Controller, EntryFields, Field, Mode, NoticeKind, Outcome, RecordStore,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn alice() -> EntryFields {
    EntryFields {
        name: "Alice".to_string(),
        phone: "9876543210".to_string(),
        email: "alice@x.com".to_string(),
        details: String::new(),
        city: "Pune".to_string(),
    }
}

fn started(dir: &TempDir) -> Controller {
    let mut controller = Controller::new(RecordStore::new(dir.path()), Box::new(NoShare));
    assert_eq!(controller.start(), Outcome::Loaded);
    controller
}

fn on_disk(dir: &TempDir) -> Vec<contact_sheet::Entry> {
    RecordStore::new(dir.path()).load_all().unwrap()
}

#[test]
fn start_creates_the_workbook_with_a_header_only() {
    let dir = TempDir::new().unwrap();
    let controller = started(&dir);
    assert!(dir.path().join("data.xlsx").exists());
    assert!(controller.entries().is_empty());
    assert_eq!(controller.mode(), &Mode::Creating);
    assert!(!controller.state().busy);
}

#[test]
fn new_entry_is_stored_with_id_and_stamps() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);

    controller.set_form(alice());
    assert_eq!(controller.submit(), Outcome::Saved);

    let stored = on_disk(&dir);
    assert_eq!(stored.len(), 1);
    let entry = &stored[0];
    assert!(!entry.id.is_empty());
    assert!(!entry.date.is_empty());
    assert!(!entry.time.is_empty());
    assert!(entry.timestamp.ends_with('Z'));
    assert_eq!(entry.name, "Alice");
    assert_eq!(controller.entries(), stored.as_slice());

    // form reset after a successful write
    assert_eq!(controller.state().form, EntryFields::default());
    let notice = controller.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, SAVED);
}

#[test]
fn each_creation_adds_one_row_with_a_fresh_id() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);

    for i in 0..5 {
        let mut fields = alice();
        fields.name = format!("Person {}", i);
        controller.set_form(fields);
        assert_eq!(controller.submit(), Outcome::Saved);
        assert_eq!(on_disk(&dir).len(), i + 1);
    }

    let ids: HashSet<String> = on_disk(&dir).into_iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 5);
}

#[test]
fn editing_changes_fields_but_not_id_or_count() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    controller.set_form(alice());
    controller.submit();
    let id = controller.entries()[0].id.clone();

    assert!(controller.begin_edit(&id));
    assert_eq!(controller.mode().editing_id(), Some(id.as_str()));
    assert_eq!(controller.state().form, alice());

    controller.set_field(Field::City, "Mumbai");
    assert_eq!(controller.submit(), Outcome::Updated);

    let stored = on_disk(&dir);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].city, "Mumbai");
    assert_eq!(controller.mode(), &Mode::Creating);
    assert_eq!(controller.take_notice().unwrap().message, UPDATED);
}

#[test]
fn invalid_submit_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    let before = fs::read(dir.path().join("data.xlsx")).unwrap();

    let mut fields = alice();
    fields.email = "not-an-email".to_string();
    controller.set_form(fields.clone());
    assert_eq!(controller.submit(), Outcome::Rejected);

    assert_eq!(controller.state().errors.email, EMAIL_INVALID);
    assert_eq!(controller.state().errors.name, "");
    assert_eq!(controller.state().form, fields);
    assert!(controller.take_notice().is_none());
    assert_eq!(fs::read(dir.path().join("data.xlsx")).unwrap(), before);
}

#[test]
fn invalid_submit_keeps_edit_mode() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    controller.set_form(alice());
    controller.submit();
    let id = controller.entries()[0].id.clone();

    controller.begin_edit(&id);
    controller.set_field(Field::Phone, "123");
    assert_eq!(controller.submit(), Outcome::Rejected);
    assert_eq!(controller.mode().editing_id(), Some(id.as_str()));
    assert_eq!(on_disk(&dir)[0].phone, "9876543210");
}

#[test]
fn cancel_returns_to_an_empty_create_form() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    controller.set_form(alice());
    controller.submit();
    let id = controller.entries()[0].id.clone();

    controller.begin_edit(&id);
    controller.cancel_edit();
    assert_eq!(controller.mode(), &Mode::Creating);
    assert_eq!(controller.state().form, EntryFields::default());
    assert_eq!(on_disk(&dir).len(), 1);
}

#[test]
fn begin_edit_rejects_unknown_ids() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    assert!(!controller.begin_edit("nope"));
    assert_eq!(controller.mode(), &Mode::Creating);
}

#[test]
fn delete_removes_one_row_and_clears_the_cursor() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    for name in ["Alice", "Bob"] {
        let mut fields = alice();
        fields.name = name.to_string();
        controller.set_form(fields);
        controller.submit();
    }
    let alice_id = controller.entries()[0].id.clone();
    let bob_id = controller.entries()[1].id.clone();

    // editing Alice, deleting Bob still resets the form
    controller.begin_edit(&alice_id);
    assert_eq!(controller.delete(&bob_id), Outcome::Deleted);
    assert_eq!(controller.mode(), &Mode::Creating);
    assert_eq!(controller.state().form, EntryFields::default());
    assert_eq!(controller.take_notice().unwrap().message, DELETED);

    let stored = on_disk(&dir);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, alice_id);
}

#[test]
fn deleting_an_absent_id_leaves_storage_unchanged() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    controller.set_form(alice());
    controller.submit();
    let before = fs::read(dir.path().join("data.xlsx")).unwrap();

    assert_eq!(controller.delete("missing"), Outcome::Missing);
    assert_eq!(controller.take_notice().unwrap().message, GONE);
    assert_eq!(controller.entries().len(), 1);
    assert_eq!(fs::read(dir.path().join("data.xlsx")).unwrap(), before);
}

#[test]
fn update_of_an_entry_deleted_elsewhere_resyncs() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    controller.set_form(alice());
    controller.submit();
    let id = controller.entries()[0].id.clone();

    controller.begin_edit(&id);
    RecordStore::new(dir.path()).remove(&id).unwrap();
    assert_eq!(controller.submit(), Outcome::Missing);
    assert!(controller.entries().is_empty());
    assert_eq!(controller.mode(), &Mode::Creating);
}

#[test]
fn failed_write_keeps_list_and_form() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    controller.set_form(alice());
    controller.submit();
    let listed = controller.entries().to_vec();

    fs::write(dir.path().join("data.xlsx"), b"corrupted").unwrap();
    let mut fields = alice();
    fields.name = "Bob".to_string();
    controller.set_form(fields.clone());

    assert_eq!(controller.submit(), Outcome::Failed);
    assert_eq!(controller.entries(), listed.as_slice());
    assert_eq!(controller.state().form, fields);
    assert!(!controller.state().busy);
    let notice = controller.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, SAVE_FAILED);
}

#[test]
fn unreadable_file_on_start_reports_a_load_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.xlsx"), b"corrupted").unwrap();
    let mut controller = Controller::new(RecordStore::new(dir.path()), Box::new(NoShare));
    assert_eq!(controller.start(), Outcome::Failed);
    assert!(!controller.state().busy);
    assert_eq!(controller.take_notice().unwrap().message, LOAD_FAILED);
}

#[test]
fn restart_sees_previous_entries() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    controller.set_form(alice());
    controller.submit();
    drop(controller);

    let controller = started(&dir);
    assert_eq!(controller.entries().len(), 1);
    assert_eq!(controller.entries()[0].name, "Alice");
}

#[derive(Clone, Default)]
struct RecordingShare {
    calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
    fail: bool,
}

impl Share for RecordingShare {
    fn is_available(&self) -> bool {
        true
    }

    fn share(&self, path: &Path, mime: &str) -> Result<(), ShareError> {
        self.calls.lock().unwrap().push((path.to_path_buf(), mime.to_string()));
        if self.fail {
            return Err(ShareError::Failed {
                path: path.to_path_buf(),
                reason: "cancelled".to_string(),
            });
        }
        Ok(())
    }
}

#[test]
fn share_hands_over_the_workbook_path_and_mime() {
    let dir = TempDir::new().unwrap();
    let sharer = RecordingShare::default();
    let mut controller = Controller::new(RecordStore::new(dir.path()), Box::new(sharer.clone()));
    controller.start();

    assert_eq!(controller.share(), Outcome::Shared);
    let calls = sharer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, dir.path().join("data.xlsx"));
    assert_eq!(calls[0].1, XLSX_MIME);
}

#[test]
fn share_failures_become_notices() {
    let dir = TempDir::new().unwrap();
    let mut controller = started(&dir);
    assert_eq!(controller.share(), Outcome::Failed);
    assert_eq!(controller.take_notice().unwrap().message, SHARE_UNAVAILABLE);

    let sharer = RecordingShare {
        fail: true,
        ..Default::default()
    };
    let mut controller = Controller::new(RecordStore::new(dir.path()), Box::new(sharer));
    controller.start();
    assert_eq!(controller.share(), Outcome::Failed);
    assert_eq!(controller.take_notice().unwrap().message, SHARE_FAILED);
}
