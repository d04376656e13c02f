//! Idempotent team/league backfill over stored articles.
//!
//! Each article is one independent unit of work: skip if it already has tags,
//! otherwise classify and write every match as a tag row plus the primary
//! team/league on the article itself. Re-running after a partial run only
//! touches articles that were not finished.

use crate::classifier::{ClassificationResult, TeamClassifier};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Article fields needed for classification.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ArticleRecord {
    pub id: i64,
    pub headline: Option<String>,
    pub subtitle: Option<String>,
    pub body_text: Option<String>,
}

impl ArticleRecord {
    pub fn new(id: i64, headline: &str, body_text: &str) -> Self {
        Self {
            id,
            headline: Some(headline.to_string()),
            subtitle: None,
            body_text: Some(body_text.to_string()),
        }
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    /// Headline, empty when missing.
    pub fn title(&self) -> &str {
        self.headline.as_deref().unwrap_or("")
    }

    /// Body used for classification: `body_text + " " + subtitle`.
    pub fn classification_body(&self) -> String {
        format!(
            "{} {}",
            self.body_text.as_deref().unwrap_or(""),
            self.subtitle.as_deref().unwrap_or("")
        )
    }
}

/// One `article_teams` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRow {
    pub article_id: i64,
    pub league_slug: String,
    pub team_slug: String,
    pub is_primary: bool,
}

impl TagRow {
    pub fn rows_for(article_id: i64, result: &ClassificationResult) -> Vec<TagRow> {
        result
            .tags()
            .map(|(m, is_primary)| TagRow {
                article_id,
                league_slug: m.league_slug.clone(),
                team_slug: m.team_slug.clone(),
                is_primary,
            })
            .collect()
    }
}

/// Storage collaborator for the backfill job.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Published articles, ordered by id.
    async fn published_articles(&self) -> Result<Vec<ArticleRecord>>;

    /// Whether the article already has at least one tag row.
    async fn has_tags(&self, article_id: i64) -> Result<bool>;

    /// Write all tag rows and the denormalized primary team/league.
    /// Only called with non-empty results.
    async fn write_tags(&self, article_id: i64, result: &ClassificationResult) -> Result<()>;
}

/// Backfill tuning knobs.
#[derive(Debug, Clone)]
pub struct BackfillOptions {
    /// Articles processed concurrently (bounded by store write capacity)
    pub concurrency: usize,
    /// Classify and log only; never write
    pub dry_run: bool,
    /// Log progress every N tagged articles (0 disables)
    pub progress_every: usize,
}

impl Default for BackfillOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            dry_run: false,
            progress_every: 50,
        }
    }
}

/// What happened to a single article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// Tags written (or would be, in dry-run)
    Tagged { primary_team: String, tags: usize },
    /// Already tagged by an earlier run
    Skipped,
    /// No team reached the threshold
    Untagged,
    /// Storage error; left for the next run
    Failed(String),
}

/// Summary of a backfill run.
#[derive(Debug, Clone, Serialize)]
pub struct BackfillReport {
    pub total: usize,
    pub tagged: usize,
    pub skipped: usize,
    pub untagged: usize,
    pub failed: usize,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BackfillReport {
    fn start(total: usize, dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            total,
            tagged: 0,
            skipped: 0,
            untagged: 0,
            failed: 0,
            dry_run,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn processed(&self) -> usize {
        self.tagged + self.skipped + self.untagged + self.failed
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Batch driver tying a classifier to an article store.
pub struct BackfillJob<S: ArticleStore> {
    classifier: Arc<TeamClassifier>,
    store: Arc<S>,
    options: BackfillOptions,
}

impl<S: ArticleStore> BackfillJob<S> {
    pub fn new(classifier: Arc<TeamClassifier>, store: Arc<S>, options: BackfillOptions) -> Self {
        Self {
            classifier,
            store,
            options,
        }
    }

    /// Run over every published article. Per-article storage errors are
    /// counted and logged; only failing to list articles aborts the run.
    pub async fn run(&self) -> Result<BackfillReport> {
        let articles = self.store.published_articles().await?;
        let mut report = BackfillReport::start(articles.len(), self.options.dry_run);

        info!(
            "Found {} published articles to process (concurrency={}, dry_run={})",
            report.total, self.options.concurrency, self.options.dry_run
        );

        let mut outcomes = stream::iter(articles)
            .map(|article| self.process(article))
            .buffer_unordered(self.options.concurrency.max(1));

        while let Some((article_id, outcome)) = outcomes.next().await {
            match outcome {
                ArticleOutcome::Tagged { .. } => {
                    report.tagged += 1;
                    let every = self.options.progress_every;
                    if every > 0 && report.tagged % every == 0 {
                        info!(
                            "  Progress: {} tagged, {} skipped, {}/{}",
                            report.tagged,
                            report.skipped,
                            report.processed(),
                            report.total
                        );
                    }
                }
                ArticleOutcome::Skipped => report.skipped += 1,
                ArticleOutcome::Untagged => report.untagged += 1,
                ArticleOutcome::Failed(reason) => {
                    warn!("Article {} failed: {}", article_id, reason);
                    report.failed += 1;
                }
            }
        }

        report.finished_at = Utc::now();
        Ok(report)
    }

    /// Classify and store a single article.
    pub async fn process(&self, article: ArticleRecord) -> (i64, ArticleOutcome) {
        let id = article.id;
        let outcome = match self.try_process(&article).await {
            Ok(outcome) => outcome,
            Err(e) => ArticleOutcome::Failed(format!("{:#}", e)),
        };
        (id, outcome)
    }

    async fn try_process(&self, article: &ArticleRecord) -> Result<ArticleOutcome> {
        if self.store.has_tags(article.id).await? {
            return Ok(ArticleOutcome::Skipped);
        }

        let result = self
            .classifier
            .classify(article.title(), &article.classification_body());

        let Some(primary) = result.primary() else {
            return Ok(ArticleOutcome::Untagged);
        };
        let outcome = ArticleOutcome::Tagged {
            primary_team: primary.team_slug.clone(),
            tags: result.len(),
        };

        if self.options.dry_run {
            debug!(
                "[dry-run] article {} -> {}/{} ({} tag(s))",
                article.id,
                primary.team_slug,
                primary.league_slug,
                result.len()
            );
            return Ok(outcome);
        }

        self.store.write_tags(article.id, &result).await?;
        Ok(outcome)
    }
}

/// In-memory `ArticleStore`, for tests and local runs without a database.
#[derive(Default)]
pub struct MemoryArticleStore {
    articles: Vec<ArticleRecord>,
    tags: RwLock<BTreeMap<i64, Vec<TagRow>>>,
    primaries: RwLock<BTreeMap<i64, (String, String)>>,
    failing: HashSet<i64>,
    missing_tag_table: bool,
}

impl MemoryArticleStore {
    pub fn new(articles: Vec<ArticleRecord>) -> Self {
        Self {
            articles,
            ..Default::default()
        }
    }

    /// Make `write_tags` fail for this article.
    pub fn with_failing_article(mut self, article_id: i64) -> Self {
        self.failing.insert(article_id);
        self
    }

    /// Behave like a database where the tag table was never created:
    /// nothing counts as tagged and every write fails.
    pub fn without_tag_table(mut self) -> Self {
        self.missing_tag_table = true;
        self
    }

    /// Pre-seed tags, as if an earlier run already handled the article.
    pub async fn seed_tags(&self, rows: Vec<TagRow>) {
        let mut tags = self.tags.write().await;
        for row in rows {
            tags.entry(row.article_id).or_default().push(row);
        }
    }

    pub async fn tags_for(&self, article_id: i64) -> Vec<TagRow> {
        self.tags
            .read()
            .await
            .get(&article_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn tag_count(&self) -> usize {
        self.tags.read().await.values().map(Vec::len).sum()
    }

    /// Denormalized `(primary_league, primary_team)` for an article.
    pub async fn primary_for(&self, article_id: i64) -> Option<(String, String)> {
        self.primaries.read().await.get(&article_id).cloned()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn published_articles(&self) -> Result<Vec<ArticleRecord>> {
        let mut articles = self.articles.clone();
        articles.sort_by_key(|a| a.id);
        Ok(articles)
    }

    async fn has_tags(&self, article_id: i64) -> Result<bool> {
        if self.missing_tag_table {
            return Ok(false);
        }
        Ok(self
            .tags
            .read()
            .await
            .get(&article_id)
            .map(|rows| !rows.is_empty())
            .unwrap_or(false))
    }

    async fn write_tags(&self, article_id: i64, result: &ClassificationResult) -> Result<()> {
        if self.missing_tag_table {
            anyhow::bail!("relation \"article_teams\" does not exist");
        }
        if self.failing.contains(&article_id) {
            anyhow::bail!("write rejected for article {}", article_id);
        }
        let Some(primary) = result.primary() else {
            return Ok(());
        };

        self.tags
            .write()
            .await
            .insert(article_id, TagRow::rows_for(article_id, result));
        self.primaries.write().await.insert(
            article_id,
            (primary.league_slug.clone(), primary.team_slug.clone()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(store: Arc<MemoryArticleStore>, options: BackfillOptions) -> BackfillJob<MemoryArticleStore> {
        let classifier = Arc::new(TeamClassifier::builtin().unwrap());
        BackfillJob::new(classifier, store, options)
    }

    #[test]
    fn test_classification_body_joins_subtitle() {
        let article = ArticleRecord::new(1, "Titular", "Cuerpo").with_subtitle("Subtítulo");
        assert_eq!(article.classification_body(), "Cuerpo Subtítulo");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let article = ArticleRecord {
            id: 7,
            headline: None,
            subtitle: None,
            body_text: None,
        };
        assert_eq!(article.title(), "");
        assert_eq!(article.classification_body(), " ");
    }

    #[tokio::test]
    async fn test_process_tags_article() {
        let store = Arc::new(MemoryArticleStore::new(vec![]));
        let job = job(store.clone(), BackfillOptions::default());

        let (id, outcome) = job
            .process(ArticleRecord::new(3, "El Betis gana", "Betis líder"))
            .await;

        assert_eq!(id, 3);
        assert_eq!(
            outcome,
            ArticleOutcome::Tagged {
                primary_team: "betis".to_string(),
                tags: 1
            }
        );
        assert_eq!(
            store.primary_for(3).await,
            Some(("laliga".to_string(), "betis".to_string()))
        );
    }

    #[tokio::test]
    async fn test_process_untagged() {
        let store = Arc::new(MemoryArticleStore::new(vec![]));
        let job = job(store.clone(), BackfillOptions::default());

        let (_, outcome) = job
            .process(ArticleRecord::new(4, "Resumen de la jornada", "Betis 2 - Getafe 1"))
            .await;

        assert_eq!(outcome, ArticleOutcome::Untagged);
        assert_eq!(store.tag_count().await, 0);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let store = Arc::new(MemoryArticleStore::new(vec![ArticleRecord::new(
            1,
            "El Betis gana",
            "",
        )]));
        let options = BackfillOptions {
            dry_run: true,
            ..Default::default()
        };

        let report = job(store.clone(), options).run().await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.tagged, 1);
        assert_eq!(store.tag_count().await, 0);
    }

    #[tokio::test]
    async fn test_dry_run_without_tag_table() {
        let store = Arc::new(
            MemoryArticleStore::new(vec![
                ArticleRecord::new(1, "El Betis gana", ""),
                ArticleRecord::new(2, "Inter golea", ""),
                ArticleRecord::new(3, "Resumen de la jornada", ""),
            ])
            .without_tag_table(),
        );
        let options = BackfillOptions {
            dry_run: true,
            ..Default::default()
        };

        let report = job(store.clone(), options).run().await.unwrap();

        assert_eq!(report.tagged, 2);
        assert_eq!(report.untagged, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.skipped, 0);
    }

    #[tokio::test]
    async fn test_real_run_without_tag_table_fails_writes() {
        let store = Arc::new(
            MemoryArticleStore::new(vec![ArticleRecord::new(1, "El Betis gana", "")])
                .without_tag_table(),
        );

        let report = job(store.clone(), BackfillOptions::default())
            .run()
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(store.tag_count().await, 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_counted() {
        let store = Arc::new(
            MemoryArticleStore::new(vec![
                ArticleRecord::new(1, "El Betis gana", ""),
                ArticleRecord::new(2, "Inter golea", ""),
            ])
            .with_failing_article(2),
        );

        let report = job(store.clone(), BackfillOptions::default())
            .run()
            .await
            .unwrap();

        assert_eq!(report.tagged, 1);
        assert_eq!(report.failed, 1);
        assert!(store.tags_for(2).await.is_empty());
    }

    #[test]
    fn test_report_counts() {
        let mut report = BackfillReport::start(5, false);
        report.tagged = 2;
        report.skipped = 1;
        report.untagged = 1;
        assert_eq!(report.processed(), 4);
        assert!(report.elapsed_secs() >= 0.0);
    }
}
