use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::contact::{null_if_blank, Contact, ContactDraft};

/// The contact database could not be opened or a statement failed
/// (file inaccessible, disk I/O error, locked database). Never retried;
/// the UI surfaces the message and abandons the action.
#[derive(Debug, Error)]
#[error("contact storage unavailable: {0}")]
pub struct StorageUnavailable(#[from] rusqlite::Error);

/// The ContactStore manages the SQLite contacts database.
///
/// It holds only the database path: every operation opens its own
/// connection and drops it on return. Actions are short-lived and
/// single-threaded, so there is nothing to gain from a shared connection,
/// and the delete-then-refresh flow relies on each action reopening its own.
pub struct ContactStore {
    db_path: PathBuf,
}

impl ContactStore {
    /// Create a ContactStore at the default location and initialize it.
    ///
    /// The database file lives in the user's data directory:
    /// - Linux: ~/.local/share/contact-book/contacts.db
    /// - macOS: ~/Library/Application Support/contact-book/contacts.db
    /// - Windows: %APPDATA%\contact-book\contacts.db
    pub fn new() -> Result<Self, StorageUnavailable> {
        let db_path = Self::default_db_path();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .expect("Failed to create application data directory");
        }

        let store = ContactStore { db_path };
        store.initialize()?;

        println!("📁 Contact database at: {}", store.db_path.display());

        Ok(store)
    }

    /// Create a ContactStore over an explicit database file.
    /// Does not touch the file; call `initialize` before use.
    pub fn open(db_path: impl AsRef<Path>) -> Self {
        ContactStore {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Get the path where the database should be stored
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");

        path.push("contact-book");
        path.push("contacts.db");
        path
    }

    /// Open a fresh connection for a single operation
    fn connect(&self) -> Result<Connection, StorageUnavailable> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// Ensure the contacts table exists. Idempotent; called once at startup
    /// before any other store operation.
    pub fn initialize(&self) -> Result<(), StorageUnavailable> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS contacts (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                name                TEXT NOT NULL,
                phone               TEXT,
                email               TEXT,
                first_meet_place    TEXT,
                how_close           TEXT,
                reason_close        TEXT,
                profile_picture     TEXT,
                notes               TEXT
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert a new contact and return its assigned id.
    ///
    /// Duplicates are permitted; only the primary key is unique. Blank
    /// optional fields are stored as NULL.
    pub fn create(&self, draft: &ContactDraft) -> Result<i64, StorageUnavailable> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO contacts
             (name, phone, email, first_meet_place, how_close, reason_close, profile_picture, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                draft.name.trim(),
                null_if_blank(&draft.phone),
                null_if_blank(&draft.email),
                null_if_blank(&draft.first_meet_place),
                null_if_blank(&draft.how_close),
                null_if_blank(&draft.reason_close),
                draft.profile_picture,
                null_if_blank(&draft.notes),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get every stored contact, in insertion order.
    pub fn list_all(&self) -> Result<Vec<Contact>, StorageUnavailable> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, phone, email, first_meet_place, how_close,
                    reason_close, profile_picture, notes
             FROM contacts",
        )?;

        let contact_iter = stmt.query_map([], |row| {
            Ok(Contact {
                id: row.get(0)?,
                name: row.get(1)?,
                phone: row.get(2)?,
                email: row.get(3)?,
                first_meet_place: row.get(4)?,
                how_close: row.get(5)?,
                reason_close: row.get(6)?,
                profile_picture: row.get(7)?,
                notes: row.get(8)?,
            })
        })?;

        let mut contacts = Vec::new();
        for contact in contact_iter {
            contacts.push(contact?);
        }

        Ok(contacts)
    }

    /// Remove the contact with the given id.
    /// A no-op (not an error) if the id does not exist.
    pub fn delete_by_id(&self, id: i64) -> Result<(), StorageUnavailable> {
        let conn = self.connect()?;

        conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;

        Ok(())
    }

    /// Get a count of stored contacts
    pub fn count(&self) -> Result<i64, StorageUnavailable> {
        let conn = self.connect()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for ContactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, ContactStore) {
        let dir = TempDir::new().unwrap();
        let store = ContactStore::open(dir.path().join("contacts.db"));
        store.initialize().unwrap();
        (dir, store)
    }

    fn draft(name: &str) -> ContactDraft {
        ContactDraft {
            name: name.to_string(),
            ..ContactDraft::default()
        }
    }

    #[test]
    fn initialize_is_idempotent() {
        let (_dir, store) = test_store();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn create_then_list_contains_new_contact() {
        let (_dir, store) = test_store();

        let before = store.list_all().unwrap().len();

        let mut new_contact = draft("Alice");
        new_contact.phone = "555-1000".to_string();
        new_contact.email = "alice@example.com".to_string();
        let id = store.create(&new_contact).unwrap();

        let contacts = store.list_all().unwrap();
        assert_eq!(contacts.len(), before + 1);

        let stored = contacts.iter().find(|c| c.id == id).unwrap();
        assert_eq!(stored.name, "Alice");
        assert_eq!(stored.phone.as_deref(), Some("555-1000"));
        assert_eq!(stored.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn contact_without_picture_lists_with_none() {
        let (_dir, store) = test_store();

        let mut alice = draft("Alice");
        alice.phone = "555-1000".to_string();
        store.create(&alice).unwrap();

        let contacts = store.list_all().unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].profile_picture, None);
    }

    #[test]
    fn blank_optional_fields_are_stored_as_null() {
        let (_dir, store) = test_store();

        let mut bob = draft("Bob");
        bob.phone = "   ".to_string();
        store.create(&bob).unwrap();

        let contacts = store.list_all().unwrap();
        assert_eq!(contacts[0].phone, None);
        assert_eq!(contacts[0].email, None);
        assert_eq!(contacts[0].notes, None);
    }

    #[test]
    fn duplicate_names_are_permitted() {
        let (_dir, store) = test_store();

        let first = store.create(&draft("Alice")).unwrap();
        let second = store.create(&draft("Alice")).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, store) = test_store();

        let keep = store.create(&draft("Alice")).unwrap();
        let gone = store.create(&draft("Bob")).unwrap();

        store.delete_by_id(gone).unwrap();
        let after_first = store.list_all().unwrap();

        // Deleting the same id again is a no-op, not an error
        store.delete_by_id(gone).unwrap();
        let after_second = store.list_all().unwrap();

        assert_eq!(after_first, after_second);
        assert_eq!(after_second.len(), 1);
        assert_eq!(after_second[0].id, keep);
    }

    #[test]
    fn ids_keep_increasing_after_delete() {
        let (_dir, store) = test_store();

        store.create(&draft("Alice")).unwrap();
        let second = store.create(&draft("Bob")).unwrap();
        store.delete_by_id(second).unwrap();

        // AUTOINCREMENT never hands out a previously used id
        let third = store.create(&draft("Carol")).unwrap();
        assert!(third > second);
    }

    #[test]
    fn round_trip_preserves_profile_picture_text() {
        let (_dir, store) = test_store();

        let mut with_picture = draft("Dave");
        with_picture.profile_picture = Some("aGVsbG8=".to_string());
        let id = store.create(&with_picture).unwrap();

        let contacts = store.list_all().unwrap();
        let stored = contacts.iter().find(|c| c.id == id).unwrap();
        assert_eq!(stored.profile_picture.as_deref(), Some("aGVsbG8="));
    }
}
