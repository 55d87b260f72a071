//! Local `SQLite` storage for setup lists.
//!
//! Holds lists, their hooks and recommendations, and which list is active.
//! The default list is seeded on open and cannot be deleted.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::application::SetupStore;
use crate::domain::{
    is_default_list, AppError, Hook, Recommendation, Result, Setup, SetupList, DEFAULT_LIST_ID,
    DEFAULT_LIST_NAME,
};

/// Setup repository using `SQLite`.
pub struct SetupDb {
    conn: Connection,
}

impl SetupDb {
    /// Opens or creates the setup database.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or schema creation fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create storage directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::database)?;
        Self::with_connection(conn)
    }

    /// Opens a throwaway in-memory database.
    ///
    /// # Errors
    /// Returns error if schema creation fails.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::database)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(AppError::database)?;

        let mut db = Self { conn };
        db.init_schema()?;
        db.seed_default_list()?;

        Ok(db)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            CREATE TABLE IF NOT EXISTS lists (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                position INTEGER NOT NULL,
                created_at TEXT
            );

            CREATE TABLE IF NOT EXISTS hooks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                list_id TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS recommendations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                hook_id INTEGER NOT NULL REFERENCES hooks(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                text TEXT NOT NULL DEFAULT '',
                unit TEXT NOT NULL,
                race TEXT,
                audio_url TEXT NOT NULL,
                category TEXT
            );

            CREATE TABLE IF NOT EXISTS app_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                active_list_id TEXT NOT NULL DEFAULT 'default'
            );

            INSERT OR IGNORE INTO app_state (id) VALUES (1);

            CREATE INDEX IF NOT EXISTS idx_hooks_list
                ON hooks(list_id, position);
            CREATE INDEX IF NOT EXISTS idx_recommendations_hook
                ON recommendations(hook_id, position);
            ",
            )
            .map_err(AppError::database)?;

        Ok(())
    }

    /// Insert the default list with empty folder hooks if missing.
    fn seed_default_list(&mut self) -> Result<()> {
        let tx = self.conn.transaction().map_err(AppError::database)?;

        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO lists (id, name, position, created_at) VALUES (?1, ?2, 0, ?3)",
                params![DEFAULT_LIST_ID, DEFAULT_LIST_NAME, Utc::now().to_rfc3339()],
            )
            .map_err(AppError::database)?;

        if inserted > 0 {
            insert_hooks(&tx, DEFAULT_LIST_ID, &Setup::default_hooks())?;
            tracing::info!("Seeded default setup list");
        }

        tx.commit().map_err(AppError::database)
    }

    fn list_exists(&self, id: &str) -> Result<bool> {
        self.conn
            .query_row("SELECT 1 FROM lists WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .map(|row| row.is_some())
            .map_err(AppError::database)
    }

    fn ensure_list(&self, id: &str) -> Result<()> {
        if self.list_exists(id)? {
            Ok(())
        } else {
            Err(AppError::ListNotFound { id: id.to_string() })
        }
    }

    /// Pick an unused id derived from `name`.
    fn unique_id(&self, name: &str) -> Result<String> {
        let base = slugify(name);
        let mut candidate = base.clone();
        let mut n = 2;

        while is_default_list(&candidate) || self.list_exists(&candidate)? {
            candidate = format!("{base}-{n}");
            n += 1;
        }

        Ok(candidate)
    }

    fn load_hooks(&self, list_id: &str) -> Result<Vec<Hook>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, description FROM hooks WHERE list_id = ?1 ORDER BY position",
            )
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([list_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    Hook {
                        name: row.get(1)?,
                        description: row.get(2)?,
                        recommendations: Vec::new(),
                    },
                ))
            })
            .map_err(AppError::database)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(AppError::database)?;

        let mut hooks = Vec::with_capacity(rows.len());
        for (hook_id, mut hook) in rows {
            hook.recommendations = self.load_recommendations(hook_id)?;
            hooks.push(hook);
        }

        Ok(hooks)
    }

    fn load_recommendations(&self, hook_id: i64) -> Result<Vec<Recommendation>> {
        let mut stmt = self
            .conn
            .prepare(
                r"
            SELECT text, unit, race, audio_url, category
            FROM recommendations
            WHERE hook_id = ?1
            ORDER BY position
            ",
            )
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([hook_id], |row| {
                Ok(Recommendation {
                    text: row.get(0)?,
                    unit: row.get(1)?,
                    race: row.get(2)?,
                    audio_url: row.get(3)?,
                    category: row.get(4)?,
                })
            })
            .map_err(AppError::database)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(AppError::database)
    }

    /// Convert a row to a `SetupList`.
    fn row_to_list(row: &rusqlite::Row) -> rusqlite::Result<SetupList> {
        let created_at_str: Option<String> = row.get(2)?;
        let created_at = created_at_str
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(SetupList {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at,
        })
    }
}

impl SetupStore for SetupDb {
    fn lists(&self) -> Result<Vec<SetupList>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM lists ORDER BY position, id")
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([], Self::row_to_list)
            .map_err(AppError::database)?;

        let mut lists = Vec::new();
        for row in rows {
            match row {
                Ok(list) => lists.push(list),
                Err(e) => tracing::warn!("Failed to read list row: {}", e),
            }
        }

        Ok(lists)
    }

    fn active_list_id(&self) -> Result<String> {
        let id: String = self
            .conn
            .query_row("SELECT active_list_id FROM app_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .map_err(AppError::database)?;

        // A list removed behind our back falls back to the default one.
        if self.list_exists(&id)? {
            Ok(id)
        } else {
            Ok(DEFAULT_LIST_ID.to_string())
        }
    }

    fn create_list(&mut self, name: &str) -> Result<SetupList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("List name cannot be empty"));
        }

        let id = self.unique_id(name)?;
        let created_at = Utc::now();

        let tx = self.conn.transaction().map_err(AppError::database)?;
        tx.execute(
            r"
            INSERT INTO lists (id, name, position, created_at)
            VALUES (?1, ?2, (SELECT COALESCE(MAX(position), 0) + 1 FROM lists), ?3)
            ",
            params![&id, name, created_at.to_rfc3339()],
        )
        .map_err(AppError::database)?;
        insert_hooks(&tx, &id, &Setup::default_hooks())?;
        tx.commit().map_err(AppError::database)?;

        tracing::debug!(%id, "Inserted setup list");

        Ok(SetupList {
            id,
            name: name.to_string(),
            created_at: Some(created_at),
        })
    }

    fn rename_list(&mut self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("List name cannot be empty"));
        }

        let updated = self
            .conn
            .execute("UPDATE lists SET name = ?1 WHERE id = ?2", params![name, id])
            .map_err(AppError::database)?;

        if updated == 0 {
            return Err(AppError::ListNotFound { id: id.to_string() });
        }
        Ok(())
    }

    fn delete_list(&mut self, id: &str) -> Result<()> {
        if is_default_list(id) {
            return Err(AppError::ProtectedList { id: id.to_string() });
        }

        let tx = self.conn.transaction().map_err(AppError::database)?;
        let deleted = tx
            .execute("DELETE FROM lists WHERE id = ?1", [id])
            .map_err(AppError::database)?;
        if deleted == 0 {
            return Err(AppError::ListNotFound { id: id.to_string() });
        }

        tx.execute(
            "UPDATE app_state SET active_list_id = ?1 WHERE id = 1 AND active_list_id = ?2",
            params![DEFAULT_LIST_ID, id],
        )
        .map_err(AppError::database)?;

        tx.commit().map_err(AppError::database)
    }

    fn set_active_list(&mut self, id: &str) -> Result<()> {
        self.ensure_list(id)?;
        self.conn
            .execute(
                "UPDATE app_state SET active_list_id = ?1 WHERE id = 1",
                [id],
            )
            .map_err(AppError::database)?;
        Ok(())
    }

    fn setup(&self, id: &str) -> Result<Setup> {
        let list = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM lists WHERE id = ?1",
                [id],
                Self::row_to_list,
            )
            .optional()
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::ListNotFound { id: id.to_string() })?;

        let hooks = self.load_hooks(id)?;
        Ok(Setup { list, hooks })
    }

    fn replace_hooks(&mut self, id: &str, hooks: &[Hook]) -> Result<()> {
        self.ensure_list(id)?;

        let tx = self.conn.transaction().map_err(AppError::database)?;
        tx.execute("DELETE FROM hooks WHERE list_id = ?1", [id])
            .map_err(AppError::database)?;
        insert_hooks(&tx, id, hooks)?;
        tx.commit().map_err(AppError::database)?;

        tracing::debug!(%id, hooks = hooks.len(), "Replaced hooks");
        Ok(())
    }
}

/// Insert hooks and their recommendations for a list, in order.
fn insert_hooks(tx: &Transaction<'_>, list_id: &str, hooks: &[Hook]) -> Result<()> {
    for (position, hook) in hooks.iter().enumerate() {
        tx.execute(
            "INSERT INTO hooks (list_id, position, name, description) VALUES (?1, ?2, ?3, ?4)",
            params![list_id, position, &hook.name, &hook.description],
        )
        .map_err(AppError::database)?;
        let hook_id = tx.last_insert_rowid();

        for (rec_position, rec) in hook.recommendations.iter().enumerate() {
            tx.execute(
                r"
                INSERT INTO recommendations
                    (hook_id, position, text, unit, race, audio_url, category)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
                params![
                    hook_id,
                    rec_position,
                    &rec.text,
                    &rec.unit,
                    &rec.race,
                    &rec.audio_url,
                    &rec.category,
                ],
            )
            .map_err(AppError::database)?;
        }
    }

    Ok(())
}

/// Lowercase, dash-separated id from a display name.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "list".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rec(url: &str) -> Recommendation {
        Recommendation {
            text: "In the pipe, five by five.".into(),
            unit: "Viking".into(),
            race: Some("terran".into()),
            audio_url: url.into(),
            category: None,
        }
    }

    #[test]
    fn test_open_seeds_default_list() {
        let db = SetupDb::open_in_memory().unwrap();

        let lists = db.lists().unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, DEFAULT_LIST_ID);
        assert_eq!(db.active_list_id().unwrap(), DEFAULT_LIST_ID);

        let setup = db.setup(DEFAULT_LIST_ID).unwrap();
        let names: Vec<_> = setup.hooks.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["done", "start", "userpromptsubmit", "precompact"]);
    }

    #[test]
    fn test_reopen_keeps_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("setups.db");

        {
            let mut db = SetupDb::open(&path).unwrap();
            let list = db.create_list("Zerg Swarm").unwrap();
            db.set_active_list(&list.id).unwrap();
        }

        let db = SetupDb::open(&path).unwrap();
        assert_eq!(db.lists().unwrap().len(), 2);
        assert_eq!(db.active_list_id().unwrap(), "zerg-swarm");
    }

    #[test]
    fn test_create_list_ids_are_unique() {
        let mut db = SetupDb::open_in_memory().unwrap();

        assert_eq!(db.create_list("My Setup").unwrap().id, "my-setup");
        assert_eq!(db.create_list("my setup!").unwrap().id, "my-setup-2");
        assert_eq!(db.create_list("Default").unwrap().id, "default-2");
        assert_eq!(db.create_list("???").unwrap().id, "list");
        assert!(matches!(
            db.create_list("  "),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_rename_list() {
        let mut db = SetupDb::open_in_memory().unwrap();
        db.rename_list(DEFAULT_LIST_ID, "Main").unwrap();
        assert_eq!(db.setup(DEFAULT_LIST_ID).unwrap().list.name, "Main");

        assert!(matches!(
            db.rename_list("nope", "x"),
            Err(AppError::ListNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_default_is_refused() {
        let mut db = SetupDb::open_in_memory().unwrap();
        assert!(matches!(
            db.delete_list(DEFAULT_LIST_ID),
            Err(AppError::ProtectedList { .. })
        ));
        assert_eq!(db.lists().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_active_list_falls_back_to_default() {
        let mut db = SetupDb::open_in_memory().unwrap();
        let list = db.create_list("Protoss").unwrap();
        db.set_active_list(&list.id).unwrap();

        db.delete_list(&list.id).unwrap();

        assert_eq!(db.active_list_id().unwrap(), DEFAULT_LIST_ID);
        assert!(matches!(
            db.setup(&list.id),
            Err(AppError::ListNotFound { .. })
        ));
    }

    #[test]
    fn test_set_active_unknown_list() {
        let mut db = SetupDb::open_in_memory().unwrap();
        assert!(matches!(
            db.set_active_list("ghost"),
            Err(AppError::ListNotFound { .. })
        ));
        assert_eq!(db.active_list_id().unwrap(), DEFAULT_LIST_ID);
    }

    #[test]
    fn test_replace_hooks_preserves_order() {
        let mut db = SetupDb::open_in_memory().unwrap();
        let mut hooks = Setup::default_hooks();
        hooks[2].recommendations = vec![rec("a.ogg"), rec("b.ogg")];
        hooks.reverse();

        db.replace_hooks(DEFAULT_LIST_ID, &hooks).unwrap();

        let setup = db.setup(DEFAULT_LIST_ID).unwrap();
        assert_eq!(setup.hooks, hooks);
        assert_eq!(setup.total_sounds(), 2);

        db.replace_hooks(DEFAULT_LIST_ID, &[]).unwrap();
        assert!(db.setup(DEFAULT_LIST_ID).unwrap().hooks.is_empty());
        let orphans: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM recommendations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Terran  Voices"), "terran-voices");
        assert_eq!(slugify("  --Zerg--  "), "zerg");
        assert_eq!(slugify(""), "list");
    }
}
