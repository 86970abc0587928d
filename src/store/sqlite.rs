//! SQLite-backed contact table
//!
//! Ids are assigned by `AUTOINCREMENT`, so they strictly increase and are
//! never reused after a delete. Every write is a single statement and commits
//! before the call returns.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Contact, ContactFields, ContactStore, CreateContact, StoreError, StoreResult};

const BACKEND: &str = "sqlite";
const BUSY_TIMEOUT_MS: u64 = 5_000;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS contacts (
      id    INTEGER PRIMARY KEY AUTOINCREMENT,
      name  TEXT NOT NULL,
      email TEXT NOT NULL,
      phone TEXT NOT NULL
    );
";

pub struct SqliteContactStore {
    conn: Mutex<Connection>,
}

impl SqliteContactStore {
    /// Open or create the database file and materialize the schema.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.as_os_str() == ":memory:" {
            return Self::open_in_memory();
        }
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn row_to_contact(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
    })
}

impl ContactStore for SqliteContactStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn list(&self) -> StoreResult<Vec<Contact>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, name, email, phone FROM contacts ORDER BY id")?;
        let contacts = stmt
            .query_map([], row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(contacts)
    }

    fn create(&self, payload: CreateContact) -> StoreResult<Contact> {
        let fields = payload.fields;
        fields.validate()?;

        let conn = self.conn();
        conn.execute(
            "INSERT INTO contacts (name, email, phone) VALUES (?1, ?2, ?3)",
            params![fields.name, fields.email, fields.phone],
        )?;
        Ok(Contact::new(conn.last_insert_rowid(), fields))
    }

    fn get(&self, id: i64) -> StoreResult<Contact> {
        self.conn()
            .query_row(
                "SELECT id, name, email, phone FROM contacts WHERE id = ?1",
                params![id],
                row_to_contact,
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: i64, fields: ContactFields) -> StoreResult<Contact> {
        fields.validate()?;

        let changed = self.conn().execute(
            "UPDATE contacts SET name = ?1, email = ?2, phone = ?3 WHERE id = ?4",
            params![fields.name, fields.email, fields.phone, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(Contact::new(id, fields))
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn ping(&self) -> StoreResult<()> {
        self.conn().query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}
