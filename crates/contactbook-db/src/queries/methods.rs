//! Contact method query functions.

use contactbook_types::{ContactId, ContactMethod, ContactMethodType, MethodDraft, MethodId};
use rusqlite::Connection;

use crate::{DbError, Result};

/// Insert a method for a contact and return its id.
pub fn insert(
    conn: &Connection,
    contact_id: ContactId,
    draft: &MethodDraft,
    now: u64,
) -> Result<MethodId> {
    conn.execute(
        "INSERT INTO contact_methods (contact_id, kind, label, value, is_primary, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            contact_id,
            draft.kind.code(),
            draft.label,
            draft.value,
            draft.is_primary,
            now as i64,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// List the methods of one contact in insertion order.
pub fn list_for_contact(conn: &Connection, contact_id: ContactId) -> Result<Vec<ContactMethod>> {
    let mut stmt = conn.prepare(
        "SELECT id, contact_id, kind, label, value, is_primary, created_at
         FROM contact_methods WHERE contact_id = ?1 ORDER BY id",
    )?;

    let rows = stmt
        .query_map([contact_id], |row| {
            Ok(MethodRow {
                id: row.get(0)?,
                contact_id: row.get(1)?,
                kind: row.get(2)?,
                label: row.get(3)?,
                value: row.get(4)?,
                is_primary: row.get(5)?,
                created_at: row.get::<_, i64>(6)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(MethodRow::into_method).collect()
}

/// Delete every method of a contact. Returns how many were removed.
pub fn remove_for_contact(conn: &Connection, contact_id: ContactId) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM contact_methods WHERE contact_id = ?1",
        [contact_id],
    )?;
    Ok(removed)
}

/// A raw method row; `kind` is still the stored integer.
#[derive(Debug)]
struct MethodRow {
    id: MethodId,
    contact_id: ContactId,
    kind: i64,
    label: Option<String>,
    value: String,
    is_primary: bool,
    created_at: u64,
}

impl MethodRow {
    fn into_method(self) -> Result<ContactMethod> {
        let kind = ContactMethodType::from_code(self.kind).ok_or_else(|| {
            DbError::Corrupt(format!("method {} has unknown kind {}", self.id, self.kind))
        })?;
        Ok(ContactMethod {
            id: self.id,
            contact_id: self.contact_id,
            kind,
            label: self.label,
            value: self.value,
            is_primary: self.is_primary,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::contacts;
    use contactbook_types::ContactDraft;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_insert_and_list_in_order() {
        let conn = test_db();
        let id = contacts::insert(&conn, &ContactDraft::named("Alice"), 1).expect("insert");

        insert(&conn, id, &MethodDraft::new(ContactMethodType::Phone, Some("work"), "123"), 5)
            .expect("insert phone");
        insert(&conn, id, &MethodDraft::new(ContactMethodType::Email, None, "a@b.test"), 5)
            .expect("insert email");

        let methods = list_for_contact(&conn, id).expect("list");
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].kind, ContactMethodType::Phone);
        assert_eq!(methods[0].label.as_deref(), Some("work"));
        assert_eq!(methods[0].contact_id, id);
        assert_eq!(methods[1].kind, ContactMethodType::Email);
        assert_eq!(methods[1].label, None);
        assert_eq!(methods[1].created_at, 5);
    }

    #[test]
    fn test_cascade_on_contact_delete() {
        let conn = test_db();
        let id = contacts::insert(&conn, &ContactDraft::named("Alice"), 1).expect("insert");
        insert(&conn, id, &MethodDraft::new(ContactMethodType::QQ, None, "10001"), 1)
            .expect("insert method");

        contacts::remove(&conn, id).expect("remove");

        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM contact_methods", [], |row| row.get(0))
            .expect("count");
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_method_requires_existing_contact() {
        let conn = test_db();
        let result = insert(&conn, 77, &MethodDraft::new(ContactMethodType::Other, None, "x"), 1);
        assert!(matches!(result, Err(DbError::Sqlite(_))));
    }

    #[test]
    fn test_remove_for_contact() {
        let conn = test_db();
        let id = contacts::insert(&conn, &ContactDraft::named("Alice"), 1).expect("insert");
        for value in ["1", "2", "3"] {
            insert(&conn, id, &MethodDraft::new(ContactMethodType::Phone, None, value), 1)
                .expect("insert");
        }
        assert_eq!(remove_for_contact(&conn, id).expect("remove"), 3);
        assert!(list_for_contact(&conn, id).expect("list").is_empty());
    }
}
