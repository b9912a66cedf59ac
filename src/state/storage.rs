//! SQLite-based resource state storage

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

use super::StateEntry;
use crate::error::StateError;
use crate::resource::ResourceData;

/// Schema version - increment to trigger a rebuild
const SCHEMA_VERSION: i32 = 1;

const DB_FILE: &str = "state.db";

type Result<T> = std::result::Result<T, StateError>;

/// SQLite-backed store of resource records keyed by address
pub struct StateStore {
    conn: Connection,
    path: PathBuf,
}

impl StateStore {
    /// Default state directory (~/.orgform)
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(StateError::NoHome)?;
        Ok(home.join(".orgform"))
    }

    /// Open the store in `dir`, or the default directory when `None`
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::open_at(dir),
            None => Self::open_at(&Self::default_dir()?),
        }
    }

    /// Open or create the store in a specific directory
    pub fn open_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| StateError::Io(format!("Failed to create state dir: {}", e)))?;

        let path = dir.join(DB_FILE);
        let conn = Connection::open(&path)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::warn!(
                "State schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            conn.execute_batch("DROP TABLE IF EXISTS resources;")?;
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS resources (
                address TEXT PRIMARY KEY NOT NULL,
                resource_type TEXT NOT NULL,
                resource_id TEXT NOT NULL,
                attributes TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self { conn, path })
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record stored at `address`
    pub fn get(&self, address: &str) -> Result<Option<ResourceData>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT resource_id, attributes FROM resources WHERE address = ?1",
                [address],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((id, attributes)) => Ok(Some(to_data(&id, &attributes)?)),
            None => Ok(None),
        }
    }

    /// Persist a record. A record without an identifier is removed instead.
    ///
    /// Returns `true` when the record was written.
    pub fn put(&self, address: &str, resource_type: &str, data: &ResourceData) -> Result<bool> {
        if !data.is_present() {
            let removed = self.remove(address)?;
            if removed {
                log::info!("Removed {} from state", address);
            }
            return Ok(false);
        }

        let attributes = serde_json::to_string(data.attributes())?;
        self.conn.execute(
            "INSERT OR REPLACE INTO resources
             (address, resource_type, resource_id, attributes, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                address,
                resource_type,
                data.id(),
                attributes,
                Utc::now().timestamp()
            ],
        )?;
        Ok(true)
    }

    /// Forget the record at `address`; returns whether one existed
    pub fn remove(&self, address: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM resources WHERE address = ?1", [address])?;
        Ok(deleted > 0)
    }

    /// All stored records, ordered by address
    pub fn list(&self) -> Result<Vec<StateEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT address, resource_type, resource_id, attributes, updated_at
             FROM resources ORDER BY address",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (address, resource_type, id, attributes, updated_at) = row?;
            entries.push(StateEntry {
                address,
                resource_type,
                data: to_data(&id, &attributes)?,
                updated_at: timestamp(updated_at),
            });
        }
        Ok(entries)
    }
}

fn to_data(id: &str, attributes: &str) -> Result<ResourceData> {
    let attributes: std::collections::BTreeMap<String, String> = serde_json::from_str(attributes)?;
    let mut data = ResourceData::with_id(id);
    for (key, value) in &attributes {
        data.set(key, Some(value.as_str()));
    }
    Ok(data)
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}
