use crate::downloader::XLSX_MIME;
use crate::entry::{Entry, EntryFields, Field, Stamp};
use crate::error::{ShareError, StoreError};
use crate::share::Share;
use crate::store::RecordStore;
use crate::validation::{FieldErrors, validate};
use log::{error, info, warn};
use serde::Serialize;

pub const LOAD_FAILED: &str = "Failed to load data from Excel file";
pub const SAVE_FAILED: &str = "Failed to save data to Excel file";
pub const DELETE_FAILED: &str = "Failed to delete entry";
pub const SHARE_FAILED: &str = "Failed to share the Excel file";
pub const SHARE_UNAVAILABLE: &str = "Sharing not available on this platform";
pub const SAVED: &str = "Data saved successfully";
pub const UPDATED: &str = "Data updated successfully";
pub const DELETED: &str = "Entry deleted successfully";
pub const GONE: &str = "Entry no longer exists";

/// Whether the form creates a new entry or edits the one under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Mode {
    Creating,
    Editing { id: String },
}

impl Mode {
    pub fn editing_id(&self) -> Option<&str> {
        match self {
            Mode::Creating => None,
            Mode::Editing { id } => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Last message for the user, shown once by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.to_string(),
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerState {
    pub form: EntryFields,
    pub errors: FieldErrors,
    #[serde(flatten)]
    pub mode: Mode,
    pub entries: Vec<Entry>,
    pub busy: bool,
    pub notice: Option<Notice>,
}

impl Default for ControllerState {
    fn default() -> Self {
        ControllerState {
            form: EntryFields::default(),
            errors: FieldErrors::default(),
            mode: Mode::Creating,
            entries: Vec::new(),
            busy: false,
            notice: None,
        }
    }
}

/// What a user action resulted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Loaded,
    Saved,
    Updated,
    Deleted,
    /// Validation failed; nothing was written.
    Rejected,
    /// The edited or deleted entry was gone from the file.
    Missing,
    Shared,
    Failed,
}

/// Owns the form, edit cursor and list mirror, and drives the store.
pub struct Controller {
    store: RecordStore,
    sharer: Box<dyn Share>,
    state: ControllerState,
}

impl Controller {
    pub fn new(store: RecordStore, sharer: Box<dyn Share>) -> Self {
        Controller {
            store,
            sharer,
            state: ControllerState::default(),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn entries(&self) -> &[Entry] {
        &self.state.entries
    }

    pub fn mode(&self) -> &Mode {
        &self.state.mode
    }

    /// Clear and return the pending notice
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.state.notice.take()
    }

    /// Create the file if needed and fill the list mirror.
    pub fn start(&mut self) -> Outcome {
        self.state.form.clear();
        self.state.errors = FieldErrors::default();
        self.state.mode = Mode::Creating;

        self.state.busy = true;
        let result = self
            .store
            .initialize()
            .and_then(|_| self.store.load_all());
        self.state.busy = false;

        match result {
            Ok(entries) => {
                info!("loaded {} entries", entries.len());
                self.state.entries = entries;
                Outcome::Loaded
            }
            Err(e) => {
                error!("Error loading Excel file: {}", e);
                self.state.notice = Some(Notice::error(LOAD_FAILED));
                Outcome::Failed
            }
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.state.form.set(field, value);
    }

    pub fn set_form(&mut self, fields: EntryFields) {
        self.state.form = fields;
    }

    /// Load a listed entry into the form and put the cursor on it.
    ///
    /// Returns `false` if `id` is not in the list mirror.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        let Some(entry) = self.state.entries.iter().find(|e| e.id == id) else {
            warn!("edit requested for unknown id {:?}", id);
            return false;
        };

        self.state.form = entry.fields();
        self.state.errors = FieldErrors::default();
        self.state.mode = Mode::Editing { id: entry.id.clone() };
        true
    }

    /// Back to an empty create form; storage is not touched.
    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    /// Validate the form, then append or update depending on the mode.
    pub fn submit(&mut self) -> Outcome {
        let result = validate(&self.state.form);
        self.state.errors = result.errors;
        if !result.valid {
            return Outcome::Rejected;
        }

        let stamp = Stamp::now();
        self.state.busy = true;
        let (write, done) = match &self.state.mode {
            Mode::Creating => {
                let entry = Entry::create(&self.state.form, stamp);
                (self.store.append(entry), Outcome::Saved)
            }
            Mode::Editing { id } => {
                let patch = Entry::with_id(id.clone(), &self.state.form, stamp);
                (self.store.update(id, &patch), Outcome::Updated)
            }
        };
        self.state.busy = false;

        match write {
            Ok(entries) => {
                self.state.entries = entries;
                self.reset_form();
                let message = if done == Outcome::Updated { UPDATED } else { SAVED };
                self.state.notice = Some(Notice::success(message));
                done
            }
            Err(StoreError::EntryNotFound(id)) => self.entry_gone(&id),
            Err(e) => {
                error!("Error saving to Excel: {}", e);
                self.state.notice = Some(Notice::error(SAVE_FAILED));
                Outcome::Failed
            }
        }
    }

    /// Remove an entry. The form and cursor are cleared whichever entry it was.
    pub fn delete(&mut self, id: &str) -> Outcome {
        self.state.busy = true;
        let removed = self.store.remove(id);
        self.state.busy = false;

        match removed {
            Ok(entries) => {
                self.state.entries = entries;
                self.reset_form();
                self.state.notice = Some(Notice::success(DELETED));
                Outcome::Deleted
            }
            Err(StoreError::EntryNotFound(id)) => self.entry_gone(&id),
            Err(e) => {
                error!("Error deleting entry: {}", e);
                self.state.notice = Some(Notice::error(DELETE_FAILED));
                Outcome::Failed
            }
        }
    }

    /// Offer the workbook to the host's share target.
    pub fn share(&mut self) -> Outcome {
        if !self.sharer.is_available() {
            self.state.notice = Some(Notice::error(SHARE_UNAVAILABLE));
            return Outcome::Failed;
        }

        match self.sharer.share(self.store.path(), XLSX_MIME) {
            Ok(()) => Outcome::Shared,
            Err(ShareError::Unavailable) => {
                self.state.notice = Some(Notice::error(SHARE_UNAVAILABLE));
                Outcome::Failed
            }
            Err(e) => {
                error!("Error sharing file: {}", e);
                self.state.notice = Some(Notice::error(SHARE_FAILED));
                Outcome::Failed
            }
        }
    }

    fn reset_form(&mut self) {
        self.state.form.clear();
        self.state.errors = FieldErrors::default();
        self.state.mode = Mode::Creating;
    }

    // The entry vanished from the file behind our back; resync from disk.
    fn entry_gone(&mut self, id: &str) -> Outcome {
        warn!("entry {:?} not found in {:?}", id, self.store.path());
        match self.store.load_all() {
            Ok(entries) => self.state.entries = entries,
            Err(e) => error!("Error reloading Excel file: {}", e),
        }
        self.reset_form();
        self.state.notice = Some(Notice::error(GONE));
        Outcome::Missing
    }
}
