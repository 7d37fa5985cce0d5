//! Media blob repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store image blobs keyed by generated id and indexed by paragraph.
//! - Provide the time-based sweep used to bound local cache size.
//!
//! # Invariants
//! - Listing is deterministic: `uploaded_at ASC, media_id ASC`.
//! - Sweeps only remove rows strictly older than the cutoff.

use super::{ensure_table_ready, RepoError, RepoResult};
use crate::model::media::{MediaId, MediaMetadata, MediaRecord};
use crate::model::paragraph::ParagraphId;
use rusqlite::{params, Connection, Row};

const MEDIA_SELECT_SQL: &str = "SELECT
    media_id,
    paragraph_id,
    data,
    filename,
    mime_type,
    uploaded_at
FROM media_blobs";

/// Repository interface for media blob operations.
pub trait MediaRepository {
    /// Inserts or replaces one record.
    fn save(&self, record: &MediaRecord) -> RepoResult<()>;
    /// Loads one record by id.
    fn get(&self, id: &MediaId) -> RepoResult<Option<MediaRecord>>;
    /// Lists records attached to one paragraph.
    fn list_by_paragraph(&self, paragraph_id: &ParagraphId) -> RepoResult<Vec<MediaRecord>>;
    /// Lists every record.
    fn list_all(&self) -> RepoResult<Vec<MediaRecord>>;
    /// Deletes one record; `NotFound` when absent.
    fn delete(&self, id: &MediaId) -> RepoResult<()>;
    /// Deletes all records of one paragraph. Returns the removed count.
    fn delete_by_paragraph(&self, paragraph_id: &ParagraphId) -> RepoResult<usize>;
    /// Deletes records uploaded before `cutoff_ms`. Returns the removed count.
    fn delete_older_than(&self, cutoff_ms: i64) -> RepoResult<usize>;
}

/// SQLite-backed media repository.
pub struct SqliteMediaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMediaRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "media_blobs",
            &[
                "media_id",
                "paragraph_id",
                "data",
                "filename",
                "mime_type",
                "uploaded_at",
            ],
        )?;
        Ok(Self { conn })
    }

    fn query_records(&self, sql: &str, key: Option<&str>) -> RepoResult<Vec<MediaRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match key {
            Some(key) => stmt.query([key])?,
            None => stmt.query([])?,
        };
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_media_row(row)?);
        }
        Ok(records)
    }
}

impl MediaRepository for SqliteMediaRepository<'_> {
    fn save(&self, record: &MediaRecord) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO media_blobs (
                media_id,
                paragraph_id,
                data,
                filename,
                mime_type,
                uploaded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.id.as_str(),
                record.paragraph_id.as_str(),
                record.data.as_slice(),
                record.metadata.filename.as_str(),
                record.metadata.mime_type.as_str(),
                record.metadata.uploaded_at,
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &MediaId) -> RepoResult<Option<MediaRecord>> {
        let records = self.query_records(
            &format!("{MEDIA_SELECT_SQL} WHERE media_id = ?1;"),
            Some(id.as_str()),
        )?;
        Ok(records.into_iter().next())
    }

    fn list_by_paragraph(&self, paragraph_id: &ParagraphId) -> RepoResult<Vec<MediaRecord>> {
        self.query_records(
            &format!(
                "{MEDIA_SELECT_SQL}
                 WHERE paragraph_id = ?1
                 ORDER BY uploaded_at ASC, media_id ASC;"
            ),
            Some(paragraph_id.as_str()),
        )
    }

    fn list_all(&self) -> RepoResult<Vec<MediaRecord>> {
        self.query_records(
            &format!("{MEDIA_SELECT_SQL} ORDER BY uploaded_at ASC, media_id ASC;"),
            None,
        )
    }

    fn delete(&self, id: &MediaId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM media_blobs WHERE media_id = ?1;", [id.as_str()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_by_paragraph(&self, paragraph_id: &ParagraphId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM media_blobs WHERE paragraph_id = ?1;",
            [paragraph_id.as_str()],
        )?;
        Ok(changed)
    }

    fn delete_older_than(&self, cutoff_ms: i64) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM media_blobs WHERE uploaded_at < ?1;", [cutoff_ms])?;
        Ok(changed)
    }
}

fn parse_media_row(row: &Row<'_>) -> RepoResult<MediaRecord> {
    let media_id: String = row.get("media_id")?;
    if media_id.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "empty media_id in media_blobs.media_id".to_string(),
        ));
    }

    Ok(MediaRecord {
        id: MediaId::new(media_id),
        paragraph_id: ParagraphId::new(row.get::<_, String>("paragraph_id")?),
        data: row.get("data")?,
        metadata: MediaMetadata {
            uploaded_at: row.get("uploaded_at")?,
            filename: row.get("filename")?,
            mime_type: row.get("mime_type")?,
        },
    })
}
