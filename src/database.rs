// src/database.rs
use crate::error::StorageError;
use crate::job_extraction::strategies::MIN_DESCRIPTION_CHARS;
use crate::utils::char_len;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    JobDescription,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Resume => "Resume",
            DocumentKind::JobDescription => "Job description",
        }
    }
}

/// A stored résumé or job description.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub kind: DocumentKind,
    pub text: String,
    pub file_name: String,
    pub title: String,
    pub company: String,
    pub source_url: Option<String>,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub text: String,
    pub file_name: String,
    pub title: String,
    pub company: String,
    pub source_url: Option<String>,
}

impl NewDocument {
    pub fn uploaded(kind: DocumentKind, text: String, file_name: String) -> Self {
        Self {
            kind,
            text,
            file_name,
            title: String::new(),
            company: String::new(),
            source_url: None,
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        if self.text.trim().is_empty() {
            return Err(StorageError::InvalidDocument(
                "document text must not be empty".to_string(),
            ));
        }
        if self.file_name.trim().is_empty() {
            return Err(StorageError::InvalidDocument(
                "file name must not be empty".to_string(),
            ));
        }
        if self.source_url.is_some() && char_len(&self.text) < MIN_DESCRIPTION_CHARS {
            return Err(StorageError::InvalidDocument(format!(
                "job description from a URL must be at least {} characters",
                MIN_DESCRIPTION_CHARS
            )));
        }
        Ok(())
    }
}

/// Owns the SQLite pool; cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database file at `database_path`.
    pub async fn connect(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Database connection pool initialized: {}", database_url);
        Ok(Self { pool })
    }

    /// Single-connection in-memory database, used by tests.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn documents(&self) -> DocumentRepository<'_> {
        DocumentRepository::new(&self.pool)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY NOT NULL,
                kind TEXT NOT NULL,
                text TEXT NOT NULL,
                file_name TEXT NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                company TEXT NOT NULL DEFAULT '',
                source_url TEXT,
                upload_date TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create documents table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_documents_kind
            ON documents(kind);
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create documents index")?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewDocument) -> Result<Document, StorageError> {
        new.validate()?;

        let document = Document {
            id: Uuid::new_v4().to_string(),
            kind: new.kind,
            text: new.text,
            file_name: new.file_name,
            title: new.title,
            company: new.company,
            source_url: new.source_url,
            upload_date: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO documents (id, kind, text, file_name, title, company, source_url, upload_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&document.id)
        .bind(document.kind)
        .bind(&document.text)
        .bind(&document.file_name)
        .bind(&document.title)
        .bind(&document.company)
        .bind(&document.source_url)
        .bind(document.upload_date)
        .execute(self.pool)
        .await?;

        info!(
            "Stored {} '{}' ({})",
            document.kind.label().to_lowercase(),
            document.file_name,
            document.id
        );
        Ok(document)
    }

    /// Newest first.
    pub async fn list(&self, kind: DocumentKind) -> Result<Vec<Document>, StorageError> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, kind, text, file_name, title, company, source_url, upload_date
            FROM documents
            WHERE kind = ?
            ORDER BY rowid DESC
            "#,
        )
        .bind(kind)
        .fetch_all(self.pool)
        .await?;

        debug!("Listed {} documents of kind {:?}", documents.len(), kind);
        Ok(documents)
    }

    pub async fn find_by_id(
        &self,
        kind: DocumentKind,
        id: &str,
    ) -> Result<Option<Document>, StorageError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, kind, text, file_name, title, company, source_url, upload_date
            FROM documents
            WHERE kind = ? AND id = ?
            "#,
        )
        .bind(kind)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(document)
    }

    pub async fn get(&self, kind: DocumentKind, id: &str) -> Result<Document, StorageError> {
        self.find_by_id(kind, id)
            .await?
            .ok_or_else(|| StorageError::NotFound {
                kind: kind.label(),
                id: id.to_string(),
            })
    }

    pub async fn delete_by_id(&self, kind: DocumentKind, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM documents WHERE kind = ? AND id = ?")
            .bind(kind)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound {
                kind: kind.label(),
                id: id.to_string(),
            });
        }

        info!("Deleted {} {}", kind.label().to_lowercase(), id);
        Ok(())
    }
}
