use crate::entry::{EntryFields, Field};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub const NAME_REQUIRED: &str = "Name is required";
pub const PHONE_REQUIRED: &str = "Phone is required";
pub const PHONE_TOO_SHORT: &str = "Phone must be at least 10 digits";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email";
pub const CITY_REQUIRED: &str = "City is required";

/// Minimum phone length, counted in characters
pub const MIN_PHONE_LEN: usize = 10;

/// Per-field messages; an empty string means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::City => &self.city,
            Field::Details => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.phone.is_empty() && self.email.is_empty() && self.city.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: FieldErrors,
    pub valid: bool,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Whether `email` has the `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(&email.to_lowercase())
}

/// Check the four required fields.
///
/// Every rule runs; a failing field never hides errors on another one.
/// `details` is free text and is not checked.
pub fn validate(fields: &EntryFields) -> ValidationResult {
    let mut errors = FieldErrors::default();

    if fields.name.trim().is_empty() {
        errors.name = NAME_REQUIRED.to_string();
    }

    if fields.phone.trim().is_empty() {
        errors.phone = PHONE_REQUIRED.to_string();
    } else if fields.phone.chars().count() < MIN_PHONE_LEN {
        errors.phone = PHONE_TOO_SHORT.to_string();
    }

    if fields.email.trim().is_empty() {
        errors.email = EMAIL_REQUIRED.to_string();
    } else if !is_valid_email(&fields.email) {
        errors.email = EMAIL_INVALID.to_string();
    }

    if fields.city.trim().is_empty() {
        errors.city = CITY_REQUIRED.to_string();
    }

    let valid = errors.is_empty();
    ValidationResult { errors, valid }
}
