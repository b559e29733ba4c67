//! SQLite-backed contact directory.

use std::path::Path;

use contactbook_db::queries::contacts::{self, ContactRow};
use contactbook_db::queries::methods;
use contactbook_db::DbError;
use contactbook_types::{Contact, ContactDraft, ContactId};
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::{validate, ContactDirectory, DirectoryError, Result};

/// Contact directory over a single SQLite connection.
pub struct SqliteDirectory {
    conn: Connection,
}

impl SqliteDirectory {
    /// Wrap an already opened and migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (or create) the database file and wrap it.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(contactbook_db::open(path)?))
    }

    /// In-memory directory (for testing).
    pub fn open_memory() -> Result<Self> {
        Ok(Self::new(contactbook_db::open_memory()?))
    }

    /// Underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn load(&self, row: ContactRow) -> Result<Contact> {
        load_with(&self.conn, row)
    }

    fn load_all(&self, rows: Vec<ContactRow>) -> Result<Vec<Contact>> {
        rows.into_iter().map(|row| self.load(row)).collect()
    }
}

fn load_with(conn: &Connection, row: ContactRow) -> Result<Contact> {
    let methods = methods::list_for_contact(conn, row.id)?;
    Ok(Contact {
        id: row.id,
        name: row.name,
        company: row.company,
        position: row.position,
        notes: row.notes,
        is_favorite: row.is_favorite,
        photo_path: row.photo_path,
        created_at: row.created_at,
        updated_at: row.updated_at,
        methods,
    })
}

/// Insert a contact and its methods on `conn`, which is expected to be
/// inside a transaction.
fn insert_draft(conn: &Connection, draft: &ContactDraft, now: u64) -> Result<ContactId> {
    let id = contacts::insert(conn, draft, now)?;
    for method in &draft.methods {
        methods::insert(conn, id, method, now)?;
    }
    Ok(id)
}

impl ContactDirectory for SqliteDirectory {
    fn list_all(&self) -> Result<Vec<Contact>> {
        let rows = contacts::list(&self.conn)?;
        self.load_all(rows)
    }

    fn list_favorites(&self) -> Result<Vec<Contact>> {
        let rows = contacts::list_favorites(&self.conn)?;
        self.load_all(rows)
    }

    fn search(&self, term: &str) -> Result<Vec<Contact>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_all();
        }
        debug!("Searching contacts for {:?}", term);
        let rows = contacts::search(&self.conn, term)?;
        self.load_all(rows)
    }

    fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        match contacts::get(&self.conn, id) {
            Ok(row) => Ok(Some(self.load(row)?)),
            Err(DbError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&self, draft: &ContactDraft) -> Result<Contact> {
        let draft = &validate::normalized(draft)?;

        let now = contactbook_db::now_secs();
        let tx = self.conn.unchecked_transaction()?;
        let id = insert_draft(&tx, draft, now)?;
        let contact = load_with(&tx, contacts::get(&tx, id)?)?;
        tx.commit()?;

        info!("Created contact {} ({})", contact.id, contact.name);
        Ok(contact)
    }

    fn create_many(&self, drafts: &[ContactDraft]) -> Result<Vec<Contact>> {
        let drafts = drafts
            .iter()
            .map(validate::normalized)
            .collect::<Result<Vec<_>>>()?;

        let now = contactbook_db::now_secs();
        let tx = self.conn.unchecked_transaction()?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            let id = insert_draft(&tx, draft, now)?;
            created.push(load_with(&tx, contacts::get(&tx, id)?)?);
        }
        tx.commit()?;

        info!("Created {} contacts in one batch", created.len());
        Ok(created)
    }

    fn update(&self, id: ContactId, draft: &ContactDraft) -> Result<Contact> {
        let draft = &validate::normalized(draft)?;

        let now = contactbook_db::now_secs();
        let tx = self.conn.unchecked_transaction()?;
        if !contacts::update(&tx, id, draft, now)? {
            warn!("Update of missing contact {}", id);
            return Err(DirectoryError::NotFound(id));
        }
        let removed = methods::remove_for_contact(&tx, id)?;
        for method in &draft.methods {
            methods::insert(&tx, id, method, now)?;
        }
        let contact = load_with(&tx, contacts::get(&tx, id)?)?;
        tx.commit()?;

        info!(
            "Updated contact {} ({}), replaced {} methods with {}",
            id,
            contact.name,
            removed,
            contact.methods.len()
        );
        Ok(contact)
    }

    fn delete(&self, id: ContactId) -> Result<bool> {
        let existed = contacts::remove(&self.conn, id)?;
        if existed {
            info!("Deleted contact {}", id);
        } else {
            warn!("Attempted to delete missing contact {}", id);
        }
        Ok(existed)
    }

    fn toggle_favorite(&self, id: ContactId) -> Result<Contact> {
        let now = contactbook_db::now_secs();
        let tx = self.conn.unchecked_transaction()?;
        let is_favorite = contacts::toggle_favorite(&tx, id, now).map_err(|e| match e {
            DbError::NotFound(_) => DirectoryError::NotFound(id),
            other => other.into(),
        })?;
        let contact = load_with(&tx, contacts::get(&tx, id)?)?;
        tx.commit()?;

        info!("Contact {} favorite is now {}", id, is_favorite);
        Ok(contact)
    }

    fn count(&self) -> Result<u64> {
        Ok(contacts::count(&self.conn)?)
    }
}
