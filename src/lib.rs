/*!
# Contact Sheet

A contact-entry form whose records live as rows of an Excel workbook on
local storage.

## Overview

The user fills in a form (name, phone, email, city and free-text details).
Each saved entry becomes one row of `data.xlsx`, a single-sheet workbook
named `Data` kept in the application's data directory. Entries can be
listed, edited, deleted, and the workbook can be shared or exported.

## Architecture

Every user action flows through the same layers, one call at a time:

### Presentation
- **console**: interactive terminal form
- **app** (feature `web`): HTTP/JSON API over the controller
- the `contact-sheet` binary: one-shot subcommands

### Controller
- Explicit state object: form fields, per-field errors, create/edit mode,
  the list of entries, busy flag and the last user notice
- Validation always runs before storage; the list is replaced only after
  a successful write; the form resets only after that

### Persistence
- **store**: full-file read-modify-write of `data.xlsx`
- **downloader** / **loader**: XLSX encode (rust_xlsxwriter) and decode
  (calamine), plus CSV export

## Workbook layout

| id | Name | Phone | Email | Details | City | Date | Time | Timestamp |
|----|------|-------|-------|---------|------|------|------|-----------|

The header row is always present, even with no entries. Row order is
insertion order.

## Modules

- **entry**: Entry record, form fields, save-time stamps, id allocation
- **validation**: required-field, phone length and email shape checks
- **store**: the record store
- **downloader**: XLSX and CSV encoding
- **loader**: XLSX decoding
- **controller**: form state machine
- **share**: hand-off of the workbook to the host
- **config**: data directory and bind address resolution
- **error**: error types
*/

#[cfg(feature = "web")]
pub mod app;
pub mod config;
pub mod console;
pub mod controller;
pub mod downloader;
pub mod entry;
pub mod error;
pub mod loader;
pub mod share;
pub mod store;
pub mod validation;

/// Re-export the everyday types
pub use controller::{Controller, ControllerState, Mode, Notice, NoticeKind, Outcome};
pub use entry::{Entry, EntryFields, Field, Stamp};
pub use error::{CodecError, ConfigError, ShareError, StoreCause, StoreError};
pub use store::RecordStore;
pub use validation::{FieldErrors, ValidationResult, validate};
