//! Article tag storage
//!
//! Tag rows live in `article_teams`, one per matched team. The primary tag is
//! also denormalized onto `web_articles.primary_league` / `primary_team` so
//! listing pages can filter without a join.

use super::retry::{execute_with_retry, RetryPolicy};
use crate::backfill::{ArticleRecord, ArticleStore, TagRow};
use crate::classifier::ClassificationResult;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Idempotent DDL, applied in order.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS article_teams (
        id BIGSERIAL PRIMARY KEY,
        web_article_id BIGINT NOT NULL REFERENCES web_articles(id) ON DELETE CASCADE,
        league_slug VARCHAR(50) NOT NULL,
        team_slug VARCHAR(50) NOT NULL,
        is_primary BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_article_teams_article_team ON article_teams (web_article_id, team_slug)",
    "CREATE INDEX IF NOT EXISTS idx_article_teams_league ON article_teams (league_slug)",
    "CREATE INDEX IF NOT EXISTS idx_article_teams_team ON article_teams (team_slug)",
    "ALTER TABLE web_articles ADD COLUMN IF NOT EXISTS primary_league VARCHAR(50)",
    "ALTER TABLE web_articles ADD COLUMN IF NOT EXISTS primary_team VARCHAR(50)",
    "CREATE INDEX IF NOT EXISTS idx_web_articles_primary_league ON web_articles (primary_league)",
    "CREATE INDEX IF NOT EXISTS idx_web_articles_primary_team ON web_articles (primary_team)",
];

/// False until `ensure_schema` has run on a fresh database.
const TAG_TABLE_EXISTS_SQL: &str = "SELECT to_regclass('article_teams') IS NOT NULL";

/// Create the tag table, primary columns and indexes if missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to apply schema statement: {}", statement.trim()))?;
    }
    info!("article_teams schema ready ({} statements)", SCHEMA_STATEMENTS.len());
    Ok(())
}

/// Postgres-backed `ArticleStore`.
///
/// A database without `article_teams` (dry run before the first real run)
/// reports every article as untagged.
#[derive(Clone)]
pub struct PgArticleStore {
    pool: PgPool,
    retry: RetryPolicy,
    tag_table: OnceCell<bool>,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            retry: RetryPolicy::default(),
            tag_table: OnceCell::new(),
        }
    }

    /// Whether `article_teams` exists. Checked once per store.
    pub async fn tag_table_exists(&self) -> Result<bool> {
        let exists = self
            .tag_table
            .get_or_try_init(|| async {
                let exists: bool = sqlx::query_scalar(TAG_TABLE_EXISTS_SQL)
                    .fetch_one(&self.pool)
                    .await
                    .context("Failed to check for article_teams table")?;
                if !exists {
                    warn!("article_teams table not found; treating all articles as untagged");
                }
                Ok::<_, anyhow::Error>(exists)
            })
            .await?;
        Ok(*exists)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn published_articles(&self) -> Result<Vec<ArticleRecord>> {
        let articles = sqlx::query_as::<_, ArticleRecord>(
            r#"
            SELECT id::BIGINT AS id, headline, subtitle, body_text
            FROM web_articles
            WHERE is_published
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch published articles")?;

        Ok(articles)
    }

    async fn has_tags(&self, article_id: i64) -> Result<bool> {
        if !self.tag_table_exists().await? {
            return Ok(false);
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM article_teams WHERE web_article_id = $1)",
        )
        .bind(article_id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to check tags for article {}", article_id))?;

        Ok(exists)
    }

    async fn write_tags(&self, article_id: i64, result: &ClassificationResult) -> Result<()> {
        let pool = &self.pool;
        execute_with_retry(
            || async move { write_tags_tx(pool, article_id, result).await },
            &self.retry,
        )
        .await
    }
}

/// Insert every tag row and set the primary columns in one transaction.
async fn write_tags_tx(pool: &PgPool, article_id: i64, result: &ClassificationResult) -> Result<()> {
    let Some(primary) = result.primary() else {
        return Ok(());
    };

    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    for row in TagRow::rows_for(article_id, result) {
        sqlx::query(
            r#"
            INSERT INTO article_teams (web_article_id, league_slug, team_slug, is_primary)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (web_article_id, team_slug) DO NOTHING
            "#,
        )
        .bind(row.article_id)
        .bind(&row.league_slug)
        .bind(&row.team_slug)
        .bind(row.is_primary)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE web_articles SET primary_league = $1, primary_team = $2 WHERE id = $3")
        .bind(&primary.league_slug)
        .bind(&primary.team_slug)
        .bind(article_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    debug!(
        "Tagged article {}: {}/{} (+{} secondary)",
        article_id,
        primary.team_slug,
        primary.league_slug,
        result.len() - 1
    );

    Ok(())
}
