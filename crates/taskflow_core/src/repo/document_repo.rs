//! Document repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load and save the whole ordered block collection under one document
//!   key in the `documents` table.
//! - Keep SQL and payload-format details inside the persistence boundary.
//!
//! # Invariants
//! - `load` returns the saved collection verbatim or `None`; a corrupt or
//!   unsupported payload reads as `None` so a broken record can never block
//!   editing.
//! - `save` always writes the full collection; there are no partial writes.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::block::{ids_are_distinct, Block};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when a caller does not name a document instance.
pub const DEFAULT_DOCUMENT_KEY: &str = "editor-document-v1";

/// Version tag written into every persisted snapshot. Reserved for forward
/// compatibility; snapshots with any other version read as absent.
const SNAPSHOT_VERSION: u32 = 1;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from document persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap failure.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Snapshot could not be serialized for writing.
    Serialization(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "document repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "document repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "document repository requires column `{column}` in table `{table}`"
            ),
            Self::Serialization(err) => write!(f, "document snapshot serialization failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Durable read/write contract for one document instance.
pub trait DocumentRepository {
    /// Returns the previously saved collection, or `None` when no usable
    /// prior save exists.
    fn load(&self) -> RepoResult<Option<Vec<Block>>>;
    /// Serializes and persists the full collection.
    fn save(&self, blocks: &[Block]) -> RepoResult<()>;
}

/// Persisted payload envelope.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentSnapshot {
    version: u32,
    blocks: Vec<Block>,
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
    doc_key: String,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Creates a repository over the default document key.
    ///
    /// # Errors
    /// - Rejects connections whose schema has not been migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::try_with_key(conn, DEFAULT_DOCUMENT_KEY)
    }

    /// Creates a repository over a caller-chosen document key.
    ///
    /// One durable record exists per key, so distinct keys address distinct
    /// document instances on the same connection.
    pub fn try_with_key(conn: &'conn Connection, doc_key: impl Into<String>) -> RepoResult<Self> {
        ensure_initialized(conn)?;
        Ok(Self {
            conn,
            doc_key: doc_key.into(),
        })
    }

    /// Storage key this repository reads and writes.
    pub fn doc_key(&self) -> &str {
        &self.doc_key
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn load(&self) -> RepoResult<Option<Vec<Block>>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM documents WHERE doc_key = ?1;",
                [self.doc_key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let snapshot = match serde_json::from_slice::<DocumentSnapshot>(&payload) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "event=doc_load module=repo status=skip doc_key={} reason=malformed_payload error={err}",
                    self.doc_key
                );
                return Ok(None);
            }
        };

        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                "event=doc_load module=repo status=skip doc_key={} reason=unsupported_version version={}",
                self.doc_key, snapshot.version
            );
            return Ok(None);
        }

        if !ids_are_distinct(&snapshot.blocks) {
            warn!(
                "event=doc_load module=repo status=skip doc_key={} reason=duplicate_block_ids",
                self.doc_key
            );
            return Ok(None);
        }

        Ok(Some(snapshot.blocks))
    }

    fn save(&self, blocks: &[Block]) -> RepoResult<()> {
        let snapshot = DocumentSnapshot {
            version: SNAPSHOT_VERSION,
            blocks: blocks.to_vec(),
        };
        let payload = serde_json::to_vec(&snapshot)?;

        self.conn.execute(
            "INSERT INTO documents (doc_key, payload, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(doc_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.doc_key.as_str(), payload],
        )?;

        Ok(())
    }
}

fn ensure_initialized(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("PRAGMA table_info(documents);")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>("name")?);
    }

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable("documents"));
    }
    for required in ["doc_key", "payload", "updated_at"] {
        if !columns.iter().any(|name| name == required) {
            return Err(RepoError::MissingRequiredColumn {
                table: "documents",
                column: required,
            });
        }
    }

    Ok(())
}
