//! Contact row query functions.
//!
//! These operate on the `contacts` table only; methods are loaded and
//! replaced through [`super::methods`].

use contactbook_types::{ContactDraft, ContactId};
use rusqlite::{Connection, Row};

use crate::{DbError, Result};

const COLUMNS: &str =
    "id, name, company, position, notes, is_favorite, photo_path, created_at, updated_at";

/// Insert a new contact row and return its id.
pub fn insert(conn: &Connection, draft: &ContactDraft, now: u64) -> Result<ContactId> {
    conn.execute(
        "INSERT INTO contacts (name, company, position, notes, is_favorite, photo_path, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        rusqlite::params![
            draft.name,
            draft.company,
            draft.position,
            draft.notes,
            draft.is_favorite,
            draft.photo_path,
            now as i64,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get a contact row by id.
pub fn get(conn: &Connection, id: ContactId) -> Result<ContactRow> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM contacts WHERE id = ?1"),
        [id],
        map_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("contact {id}")),
        other => DbError::Sqlite(other),
    })
}

/// List all contacts, favorites first, then by name.
pub fn list(conn: &Connection) -> Result<Vec<ContactRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM contacts ORDER BY is_favorite DESC, name, id"
    ))?;
    let rows = stmt
        .query_map([], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// List favorite contacts by name.
pub fn list_favorites(conn: &Connection) -> Result<Vec<ContactRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM contacts WHERE is_favorite = 1 ORDER BY name, id"
    ))?;
    let rows = stmt
        .query_map([], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Contacts whose name, company or position contains `term`.
///
/// Matching uses SQLite `LIKE`, which folds ASCII case. Wildcards in `term`
/// match literally.
pub fn search(conn: &Connection, term: &str) -> Result<Vec<ContactRow>> {
    let pattern = format!("%{}%", escape_like(term));
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM contacts
         WHERE name LIKE ?1 ESCAPE '\\'
            OR company LIKE ?1 ESCAPE '\\'
            OR position LIKE ?1 ESCAPE '\\'
         ORDER BY is_favorite DESC, name, id"
    ))?;
    let rows = stmt
        .query_map([pattern], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Overwrite the scalar fields of a contact. Returns false if absent.
pub fn update(conn: &Connection, id: ContactId, draft: &ContactDraft, now: u64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE contacts
         SET name = ?1, company = ?2, position = ?3, notes = ?4,
             is_favorite = ?5, photo_path = ?6, updated_at = ?7
         WHERE id = ?8",
        rusqlite::params![
            draft.name,
            draft.company,
            draft.position,
            draft.notes,
            draft.is_favorite,
            draft.photo_path,
            now as i64,
            id,
        ],
    )?;
    Ok(changed > 0)
}

/// Flip the favorite flag. Returns the new value, or `NotFound`.
pub fn toggle_favorite(conn: &Connection, id: ContactId, now: u64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE contacts SET is_favorite = NOT is_favorite, updated_at = ?1 WHERE id = ?2",
        rusqlite::params![now as i64, id],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("contact {id}")));
    }
    Ok(get(conn, id)?.is_favorite)
}

/// Remove a contact. Its methods go with it. Returns false if absent.
pub fn remove(conn: &Connection, id: ContactId) -> Result<bool> {
    let changed = conn.execute("DELETE FROM contacts WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

/// Number of stored contacts.
pub fn count(conn: &Connection) -> Result<u64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
    Ok(n as u64)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<ContactRow> {
    Ok(ContactRow {
        id: row.get(0)?,
        name: row.get(1)?,
        company: row.get(2)?,
        position: row.get(3)?,
        notes: row.get(4)?,
        is_favorite: row.get(5)?,
        photo_path: row.get(6)?,
        created_at: row.get::<_, i64>(7)? as u64,
        updated_at: row.get::<_, i64>(8)? as u64,
    })
}

/// A raw contact row from the database.
#[derive(Debug, Clone)]
pub struct ContactRow {
    pub id: ContactId,
    pub name: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub notes: Option<String>,
    pub is_favorite: bool,
    pub photo_path: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    fn draft(name: &str, company: Option<&str>, favorite: bool) -> ContactDraft {
        ContactDraft {
            name: name.to_string(),
            company: company.map(str::to_string),
            is_favorite: favorite,
            ..ContactDraft::default()
        }
    }

    #[test]
    fn test_insert_and_get() {
        let conn = test_db();
        let id = insert(&conn, &draft("Alice", Some("Acme"), false), 1000).expect("insert");
        let row = get(&conn, id).expect("get");

        assert_eq!(row.name, "Alice");
        assert_eq!(row.company.as_deref(), Some("Acme"));
        assert_eq!(row.created_at, 1000);
        assert_eq!(row.updated_at, 1000);
        assert!(!row.is_favorite);
    }

    #[test]
    fn test_get_missing() {
        let conn = test_db();
        assert!(matches!(get(&conn, 42), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_list_orders_favorites_first() {
        let conn = test_db();
        insert(&conn, &draft("Carol", None, false), 1).expect("insert");
        insert(&conn, &draft("Bob", None, true), 1).expect("insert");
        insert(&conn, &draft("Alice", None, false), 1).expect("insert");
        insert(&conn, &draft("Dave", None, true), 1).expect("insert");

        let names: Vec<_> = list(&conn).expect("list").into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["Bob", "Dave", "Alice", "Carol"]);

        let favs: Vec<_> = list_favorites(&conn)
            .expect("favorites")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(favs, ["Bob", "Dave"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let conn = test_db();
        insert(&conn, &draft("Alice", Some("Acme Corp"), false), 1).expect("insert");
        insert(&conn, &draft("Bob", Some("Globex"), false), 1).expect("insert");
        let mut with_position = draft("Carol", None, true);
        with_position.position = Some("ACME liaison".to_string());
        insert(&conn, &with_position, 1).expect("insert");

        let names: Vec<_> = search(&conn, "acme")
            .expect("search")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["Carol", "Alice"]);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let conn = test_db();
        insert(&conn, &draft("100% Sure", None, false), 1).expect("insert");
        insert(&conn, &draft("Plain", None, false), 1).expect("insert");

        assert_eq!(search(&conn, "%").expect("search").len(), 1);
        assert_eq!(search(&conn, "_").expect("search").len(), 0);
    }

    #[test]
    fn test_update_and_toggle() {
        let conn = test_db();
        let id = insert(&conn, &draft("Alice", None, false), 10).expect("insert");

        assert!(update(&conn, id, &draft("Alicia", Some("Initech"), false), 20).expect("update"));
        let row = get(&conn, id).expect("get");
        assert_eq!(row.name, "Alicia");
        assert_eq!(row.created_at, 10);
        assert_eq!(row.updated_at, 20);

        assert!(toggle_favorite(&conn, id, 30).expect("toggle"));
        assert!(!toggle_favorite(&conn, id, 40).expect("toggle back"));
        assert_eq!(get(&conn, id).expect("get").updated_at, 40);

        assert!(!update(&conn, 999, &draft("Nobody", None, false), 50).expect("update missing"));
        assert!(matches!(toggle_favorite(&conn, 999, 50), Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_remove_and_count() {
        let conn = test_db();
        let id = insert(&conn, &draft("Alice", None, false), 1).expect("insert");
        assert_eq!(count(&conn).expect("count"), 1);
        assert!(remove(&conn, id).expect("remove"));
        assert!(!remove(&conn, id).expect("remove again"));
        assert_eq!(count(&conn).expect("count"), 0);
    }
}
