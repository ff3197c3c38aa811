//! SQLite-backed catalog store.
//!
//! Reads an existing movie table with `id`, `title`, `emb` (BLOB of
//! little-endian `f32`), `year` and `genre` columns plus an image path
//! column. The defaults fit the Django `movie_movie` table, whose image
//! column is `images`.

use std::path::Path;

use cinematch_core::{CatalogEntry, CatalogError, CatalogStore};
use rusqlite::{Connection, OptionalExtension, params};

/// Default table name.
pub const DEFAULT_TABLE: &str = "movie_movie";

/// Default image path column.
pub const DEFAULT_IMAGE_COLUMN: &str = "images";

/// Catalog store over a SQLite connection.
pub struct SqliteCatalog {
    conn: Connection,
    table: String,
    image_column: String,
}

fn store_err(err: rusqlite::Error) -> CatalogError {
    CatalogError::Store(err.to_string())
}

impl SqliteCatalog {
    /// Opens the database at `path`.
    pub fn open(path: &Path, table: &str) -> cinematch_core::Result<Self> {
        let conn = Connection::open(path).map_err(store_err)?;
        Self::with_connection(conn, table)
    }

    /// Wraps an open connection. The table name must be a plain identifier.
    pub fn with_connection(conn: Connection, table: &str) -> cinematch_core::Result<Self> {
        Ok(Self {
            conn,
            table: identifier("table", table)?,
            image_column: DEFAULT_IMAGE_COLUMN.to_string(),
        })
    }

    /// Reads and writes image paths through `column` instead of the default.
    pub fn with_image_column(mut self, column: &str) -> cinematch_core::Result<Self> {
        self.image_column = identifier("image column", column)?;
        Ok(self)
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT id, title, emb, year, genre, {} FROM {}",
            self.image_column, self.table
        )
    }
}

fn identifier(kind: &str, name: &str) -> cinematch_core::Result<String> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CatalogError::Store(format!("invalid {kind} name: {name:?}")));
    }
    Ok(name.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<CatalogEntry> {
    Ok(CatalogEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        embedding: row.get::<_, Option<Vec<u8>>>(2)?.unwrap_or_default(),
        year: row.get(3)?,
        genre: non_empty(row.get(4)?),
        image: non_empty(row.get(5)?),
    })
}

#[cfg(test)]
impl SqliteCatalog {
    /// Creates the table if it is missing.
    pub fn ensure_table(&self) -> cinematch_core::Result<()> {
        self.conn
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    emb BLOB,
                    year INTEGER,
                    genre TEXT,
                    {} TEXT
                )",
                self.table, self.image_column
            ))
            .map_err(store_err)
    }

    /// Inserts or replaces an entry.
    pub fn upsert(&self, entry: &CatalogEntry) -> cinematch_core::Result<()> {
        self.conn
            .execute(
                &format!(
                    "INSERT OR REPLACE INTO {} (id, title, emb, year, genre, {})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    self.table, self.image_column
                ),
                params![
                    entry.id,
                    entry.title,
                    entry.embedding,
                    entry.year,
                    entry.genre,
                    entry.image
                ],
            )
            .map_err(store_err)?;
        Ok(())
    }

    /// Reads one entry by id.
    pub fn get(&self, id: i64) -> cinematch_core::Result<Option<CatalogEntry>> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", self.select_sql()),
                params![id],
                row_to_entry,
            )
            .optional()
            .map_err(store_err)
    }
}

impl CatalogStore for SqliteCatalog {
    fn entries(&self) -> cinematch_core::Result<Vec<CatalogEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id", self.select_sql()))
            .map_err(store_err)?;

        let rows = stmt.query_map([], row_to_entry).map_err(store_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(store_err)
    }

    fn set_image(&mut self, id: i64, path: &str) -> cinematch_core::Result<()> {
        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE {} SET {} = ?1 WHERE id = ?2",
                    self.table, self.image_column
                ),
                params![path, id],
            )
            .map_err(store_err)?;
        if changed == 0 {
            return Err(CatalogError::Store(format!("no entry with id {id}")));
        }
        Ok(())
    }
}
