use super::traits::{SavedCandidate, SavedListStore};
use crate::directory::types::CandidateRecord;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::Path;

const INIT_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS saved_candidates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    list_key TEXT NOT NULL,
    user_id INTEGER NOT NULL,
    login TEXT NOT NULL,
    name TEXT,
    location TEXT,
    email TEXT,
    company TEXT,
    bio TEXT,
    avatar_url TEXT NOT NULL DEFAULT '',
    html_url TEXT NOT NULL DEFAULT '',
    public_repos INTEGER,
    followers INTEGER,
    following INTEGER,
    created_at TEXT,
    saved_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_saved_candidates_list
    ON saved_candidates(list_key, id);
";

type SavedRow = (
    i64,            // user_id
    String,         // login
    Option<String>, // name
    Option<String>, // location
    Option<String>, // email
    Option<String>, // company
    Option<String>, // bio
    String,         // avatar_url
    String,         // html_url
    Option<i64>,    // public_repos
    Option<i64>,    // followers
    Option<i64>,    // following
    Option<String>, // created_at
    String,         // saved_at
);

/// SQLite-backed saved list. Ordering is the insertion rowid, so reads
/// come back exactly in commit order.
pub struct SqliteSavedList {
    pool: SqlitePool,
}

impl SqliteSavedList {
    /// Open (or create) the database at `<workspace_dir>/saved.db`.
    pub async fn open(workspace_dir: &Path) -> Result<Self, StoreError> {
        let db_path = workspace_dir.join("saved.db");
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePool::connect(&url).await?;
        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory database (useful for tests).
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::raw_sql(INIT_SCHEMA).execute(pool).await?;
        Ok(())
    }

    fn row_to_saved(row: SavedRow) -> Result<SavedCandidate, StoreError> {
        let (
            user_id,
            login,
            name,
            location,
            email,
            company,
            bio,
            avatar_url,
            html_url,
            public_repos,
            followers,
            following,
            created_at,
            saved_at,
        ) = row;
        let saved_at = saved_at
            .parse::<DateTime<Utc>>()
            .map_err(|err| StoreError::Sqlx(format!("bad saved_at column: {err}")))?;
        Ok(SavedCandidate {
            record: CandidateRecord {
                id: u64::try_from(user_id).unwrap_or_default(),
                login,
                name,
                location,
                email,
                company,
                bio,
                avatar_url,
                html_url,
                public_repos: public_repos.and_then(|n| u64::try_from(n).ok()),
                followers: followers.and_then(|n| u64::try_from(n).ok()),
                following: following.and_then(|n| u64::try_from(n).ok()),
                created_at: created_at.and_then(|s| s.parse().ok()),
            },
            saved_at,
        })
    }
}

#[async_trait]
impl SavedListStore for SqliteSavedList {
    async fn append(&self, list_key: &str, record: &CandidateRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO saved_candidates (
                list_key, user_id, login, name, location, email, company, bio,
                avatar_url, html_url, public_repos, followers, following,
                created_at, saved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )
        .bind(list_key)
        .bind(i64::try_from(record.id).unwrap_or(i64::MAX))
        .bind(&record.login)
        .bind(&record.name)
        .bind(&record.location)
        .bind(&record.email)
        .bind(&record.company)
        .bind(&record.bio)
        .bind(&record.avatar_url)
        .bind(&record.html_url)
        .bind(record.public_repos.and_then(|n| i64::try_from(n).ok()))
        .bind(record.followers.and_then(|n| i64::try_from(n).ok()))
        .bind(record.following.and_then(|n| i64::try_from(n).ok()))
        .bind(record.created_at.map(|t| t.to_rfc3339()))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn read_all(&self, list_key: &str) -> Result<Vec<SavedCandidate>, StoreError> {
        let rows: Vec<SavedRow> = sqlx::query_as(
            "SELECT user_id, login, name, location, email, company, bio,
                    avatar_url, html_url, public_repos, followers, following,
                    created_at, saved_at
             FROM saved_candidates WHERE list_key = ?1 ORDER BY id",
        )
        .bind(list_key)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_saved).collect()
    }

    async fn remove_at(&self, list_key: &str, position: usize) -> Result<(), StoreError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM saved_candidates WHERE list_key = ?1
             ORDER BY id LIMIT 1 OFFSET ?2",
        )
        .bind(list_key)
        .bind(i64::try_from(position).unwrap_or(i64::MAX))
        .fetch_optional(&self.pool)
        .await?;

        let Some((id,)) = row else {
            return Err(StoreError::OutOfBounds {
                list_key: list_key.to_string(),
                position,
            });
        };

        sqlx::query("DELETE FROM saved_candidates WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
