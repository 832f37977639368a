/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the database layer and the UI layer.

/// A stored contact, as read back from the database.
///
/// Values returned from queries are independent copies with no
/// back-reference to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Unique database ID, assigned on creation and never reused
    pub id: i64,
    /// Required display name
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub first_meet_place: Option<String>,
    pub how_close: Option<String>,
    pub reason_close: Option<String>,
    /// Base64-encoded PNG, or None when no picture was uploaded
    pub profile_picture: Option<String>,
    pub notes: Option<String>,
}

impl Contact {
    /// Label used in the delete selection list, e.g. "Alice (ID: 3)"
    pub fn label(&self) -> String {
        format!("{} (ID: {})", self.name, self.id)
    }
}

/// Form input for a contact that has not been saved yet.
///
/// The text fields mirror the Add Contact form directly; blank fields are
/// converted to NULL when the draft is inserted.
#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub first_meet_place: String,
    pub how_close: String,
    pub reason_close: String,
    pub notes: String,
    /// Already encoded by the picture codec when a file was chosen
    pub profile_picture: Option<String>,
}

/// Blank form fields are stored as NULL rather than empty strings.
pub(crate) fn null_if_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
