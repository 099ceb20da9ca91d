//! SQLite repository for score rows

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use scorebook_core::model::ScoreRecord;
use scorebook_core::PreparedScore;

const SCORE_COLUMNS: &str =
    "id, user_id, title, composer, description, config_json, image_filename, created_at, updated_at";

/// Column values written by an insert or update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreFields<'a> {
    pub title: &'a str,
    pub composer: &'a str,
    pub description: &'a str,
    pub config_json: &'a str,
    pub image_filename: &'a str,
}

impl<'a> From<&'a PreparedScore> for ScoreFields<'a> {
    fn from(score: &'a PreparedScore) -> Self {
        Self {
            title: &score.title,
            composer: &score.composer,
            description: &score.description,
            config_json: &score.config_json,
            image_filename: &score.cover_filename,
        }
    }
}

/// SQLite repository for scores
///
/// Every statement is scoped by `user_id`; a row of another user is
/// indistinguishable from a missing one.
pub struct ScoreRepo;

impl ScoreRepo {
    /// All scores of a user, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> Result<Vec<ScoreRecord>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM scores WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
                SCORE_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([user_id], read_score)
            .map_err(from_rusqlite)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)
    }

    pub fn get_for_user(conn: &Connection, user_id: i64, id: i64) -> Result<Option<ScoreRecord>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM scores WHERE id = ?1 AND user_id = ?2",
                SCORE_COLUMNS
            ),
            rusqlite::params![id, user_id],
            read_score,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Insert a new score and return the stored row
    pub fn insert(conn: &Connection, user_id: i64, fields: ScoreFields<'_>) -> Result<ScoreRecord> {
        conn.query_row(
            &format!(
                "INSERT INTO scores (user_id, title, composer, description, config_json, image_filename)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {}",
                SCORE_COLUMNS
            ),
            rusqlite::params![
                user_id,
                fields.title,
                fields.composer,
                fields.description,
                fields.config_json,
                fields.image_filename,
            ],
            read_score,
        )
        .map_err(from_rusqlite)
    }

    /// Overwrite a score's columns, bumping `updated_at`
    ///
    /// Returns `None` when no row with that id belongs to the user.
    pub fn update(
        conn: &Connection,
        user_id: i64,
        id: i64,
        fields: ScoreFields<'_>,
    ) -> Result<Option<ScoreRecord>> {
        conn.query_row(
            &format!(
                "UPDATE scores
                 SET title = ?1, composer = ?2, description = ?3, config_json = ?4,
                     image_filename = ?5, updated_at = datetime('now')
                 WHERE id = ?6 AND user_id = ?7
                 RETURNING {}",
                SCORE_COLUMNS
            ),
            rusqlite::params![
                fields.title,
                fields.composer,
                fields.description,
                fields.config_json,
                fields.image_filename,
                id,
                user_id,
            ],
            read_score,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Delete a score; `false` when nothing matched
    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<bool> {
        let changed = conn
            .execute(
                "DELETE FROM scores WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![id, user_id],
            )
            .map_err(from_rusqlite)?;
        Ok(changed > 0)
    }
}

fn read_score(row: &Row<'_>) -> rusqlite::Result<ScoreRecord> {
    Ok(ScoreRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        composer: row.get(3)?,
        description: row.get(4)?,
        config_json: row.get(5)?,
        image_filename: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
