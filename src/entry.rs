use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Column headers of the `Data` sheet, in on-disk order.
///
/// The header row is always written, even when the sheet has no data rows.
pub const HEADERS: [&str; 9] = [
    "id",
    "Name",
    "Phone",
    "Email",
    "Details",
    "City",
    "Date",
    "Time",
    "Timestamp",
];

/// User-editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Phone,
    Email,
    Details,
    City,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Phone,
        Field::Email,
        Field::City,
        Field::Details,
    ];

    pub fn from_strng(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "name" => Some(Field::Name),
            "phone" => Some(Field::Phone),
            "email" => Some(Field::Email),
            "details" => Some(Field::Details),
            "city" => Some(Field::City),
            _ => None,
        }
    }

    /// Label shown next to the input, required fields marked with `*`
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name *",
            Field::Phone => "Phone Number *",
            Field::Email => "Email *",
            Field::Details => "Details",
            Field::City => "City *",
        }
    }
}

/// The values a user types into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFields {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub details: String,
    pub city: String,
}

impl EntryFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Details => &self.details,
            Field::City => &self.city,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Email => self.email = value,
            Field::Details => self.details = value,
            Field::City => self.city = value,
        }
    }

    pub fn clear(&mut self) {
        *self = EntryFields::default();
    }
}

/// Save-time stamp carried by every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub date: String,
    pub time: String,
    pub timestamp: String,
}

impl Stamp {
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    /// `date` and `time` are local display strings, `timestamp` is the UTC
    /// instant in RFC 3339 with millisecond precision.
    pub fn at(now: DateTime<Local>) -> Self {
        Stamp {
            date: now.format("%-m/%-d/%Y").to_string(),
            time: now.format("%-I:%M:%S %p").to_string(),
            timestamp: now
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// One contact record, one row of the `Data` sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub details: String,
    pub city: String,
    pub date: String,
    pub time: String,
    pub timestamp: String,
}

impl Entry {
    /// Build a fresh entry whose id is derived from the stamp's instant.
    pub fn create(fields: &EntryFields, stamp: Stamp) -> Self {
        let id = DateTime::parse_from_rfc3339(&stamp.timestamp)
            .map(|t| t.timestamp_millis())
            .unwrap_or_else(|_| Utc::now().timestamp_millis())
            .to_string();
        Self::with_id(id, fields, stamp)
    }

    pub fn with_id(id: impl Into<String>, fields: &EntryFields, stamp: Stamp) -> Self {
        Entry {
            id: id.into(),
            name: fields.name.clone(),
            phone: fields.phone.clone(),
            email: fields.email.clone(),
            details: fields.details.clone(),
            city: fields.city.clone(),
            date: stamp.date,
            time: stamp.time,
            timestamp: stamp.timestamp,
        }
    }

    /// Overwrite the editable fields and the stamp, keeping `id`.
    pub fn apply(&mut self, patch: &Entry) {
        self.name = patch.name.clone();
        self.phone = patch.phone.clone();
        self.email = patch.email.clone();
        self.details = patch.details.clone();
        self.city = patch.city.clone();
        self.date = patch.date.clone();
        self.time = patch.time.clone();
        self.timestamp = patch.timestamp.clone();
    }

    pub fn fields(&self) -> EntryFields {
        EntryFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            details: self.details.clone(),
            city: self.city.clone(),
        }
    }

    /// Cell values in `HEADERS` order
    pub fn to_row(&self) -> [&str; 9] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.phone.as_str(),
            self.email.as_str(),
            self.details.as_str(),
            self.city.as_str(),
            self.date.as_str(),
            self.time.as_str(),
            self.timestamp.as_str(),
        ]
    }

    /// Set a cell by its header name; unknown headers are ignored.
    pub fn set_column(&mut self, header: &str, value: String) {
        match header {
            "id" => self.id = value,
            "Name" => self.name = value,
            "Phone" => self.phone = value,
            "Email" => self.email = value,
            "Details" => self.details = value,
            "City" => self.city = value,
            "Date" => self.date = value,
            "Time" => self.time = value,
            "Timestamp" => self.timestamp = value,
            _ => {}
        }
    }

    pub(crate) fn blank() -> Self {
        Entry {
            id: String::new(),
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            details: String::new(),
            city: String::new(),
            date: String::new(),
            time: String::new(),
            timestamp: String::new(),
        }
    }
}

/// Return `candidate` if no entry uses it, otherwise the next free integer above it.
///
/// Non-numeric candidates that collide get a numeric suffix instead.
pub fn unique_id(candidate: &str, existing: &[Entry]) -> String {
    let taken = |id: &str| existing.iter().any(|e| e.id == id);
    if !candidate.is_empty() && !taken(candidate) {
        return candidate.to_string();
    }

    match candidate.parse::<i64>() {
        Ok(mut n) => loop {
            n += 1;
            let id = n.to_string();
            if !taken(&id) {
                return id;
            }
        },
        Err(_) => {
            let mut suffix = 1;
            loop {
                let id = format!("{}-{}", candidate, suffix);
                if !taken(&id) {
                    return id;
                }
                suffix += 1;
            }
        }
    }
}
