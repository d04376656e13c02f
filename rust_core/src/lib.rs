//! GoalFeed Core - team and league tagging for football news articles.
//!
//! This module provides:
//! - Built-in league keyword and team alias tables
//! - Whole-phrase keyword matching over normalized article text
//! - Team classification with league-context disambiguation
//! - Batch classification via rayon
//! - Editorial sport, category and verification status heuristics
//! - Idempotent backfill of article tags into Postgres

pub mod backfill;
pub mod catalog;
pub mod classifier;
pub mod db;
pub mod editorial;
pub mod league_config;
pub mod text;

#[cfg(feature = "python")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use std::sync::OnceLock;

pub use backfill::{
    ArticleOutcome, ArticleRecord, ArticleStore, BackfillJob, BackfillOptions, BackfillReport,
    MemoryArticleStore, TagRow,
};
pub use catalog::{Catalog, CatalogError, LeagueKeywordEntry, TeamAliasEntry, TeamLeagueMembership};
pub use classifier::{ClassificationResult, TeamClassifier, TeamMatch};
pub use editorial::{
    determine_status, Category, CategoryClassifier, KeywordTableError, SportClassifier, Status,
};

// ============================================================================
// Python bindings
// ============================================================================

#[cfg(feature = "python")]
static TEAM_CLASSIFIER: OnceLock<Result<TeamClassifier, String>> = OnceLock::new();

#[cfg(feature = "python")]
static CATEGORY_CLASSIFIER: OnceLock<Result<CategoryClassifier, String>> = OnceLock::new();

#[cfg(feature = "python")]
static SPORT_CLASSIFIER: OnceLock<Result<SportClassifier, String>> = OnceLock::new();

#[cfg(feature = "python")]
fn team_classifier() -> PyResult<&'static TeamClassifier> {
    TEAM_CLASSIFIER
        .get_or_init(|| TeamClassifier::builtin().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| PyValueError::new_err(e.clone()))
}

#[cfg(feature = "python")]
fn category_classifier() -> PyResult<&'static CategoryClassifier> {
    CATEGORY_CLASSIFIER
        .get_or_init(|| CategoryClassifier::new().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| PyValueError::new_err(e.clone()))
}

#[cfg(feature = "python")]
fn sport_classifier() -> PyResult<&'static SportClassifier> {
    SPORT_CLASSIFIER
        .get_or_init(|| SportClassifier::new().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| PyValueError::new_err(e.clone()))
}

/// Classify an article against the built-in catalog.
///
/// Returns `(team_slug, league_slug, score)` tuples, primary first.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "classify_teams")]
fn py_classify_teams(title: &str, body: &str) -> PyResult<Vec<(String, String, u32)>> {
    let result = team_classifier()?.classify(title, body);
    Ok(result
        .into_iter()
        .map(|m| (m.team_slug, m.league_slug, m.score))
        .collect())
}

/// Batch version of `classify_teams`, parallelized with rayon.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "batch_classify_teams")]
fn py_batch_classify_teams(
    articles: Vec<(String, String)>,
) -> PyResult<Vec<Vec<(String, String, u32)>>> {
    let results = team_classifier()?.classify_batch(&articles);
    Ok(results
        .into_iter()
        .map(|r| {
            r.into_iter()
                .map(|m| (m.team_slug, m.league_slug, m.score))
                .collect()
        })
        .collect())
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "detect_league_context")]
fn py_detect_league_context(title: &str, body: &str) -> PyResult<Option<String>> {
    let text = text::normalize_article(title, body);
    Ok(team_classifier()?
        .detect_league_context(&text)
        .map(str::to_string))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "classify_sport", signature = (title, summary, categories=Vec::new(), sport_hint=None))]
fn py_classify_sport(
    title: &str,
    summary: &str,
    categories: Vec<String>,
    sport_hint: Option<&str>,
) -> PyResult<String> {
    let categories: Vec<&str> = categories.iter().map(String::as_str).collect();
    Ok(sport_classifier()?
        .classify(title, summary, &categories, sport_hint)
        .to_string())
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "classify_category")]
fn py_classify_category(title: &str, summary: &str) -> PyResult<String> {
    Ok(category_classifier()?
        .classify(title, summary)
        .as_str()
        .to_string())
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "determine_status", signature = (title, summary, source_domain=None))]
fn py_determine_status(title: &str, summary: &str, source_domain: Option<&str>) -> String {
    determine_status(title, summary, source_domain).as_str().to_string()
}

#[cfg(feature = "python")]
#[pymodule]
fn goalfeed_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_classify_teams, m)?)?;
    m.add_function(wrap_pyfunction!(py_batch_classify_teams, m)?)?;
    m.add_function(wrap_pyfunction!(py_detect_league_context, m)?)?;
    m.add_function(wrap_pyfunction!(py_classify_sport, m)?)?;
    m.add_function(wrap_pyfunction!(py_classify_category, m)?)?;
    m.add_function(wrap_pyfunction!(py_determine_status, m)?)?;

    m.add("TITLE_WEIGHT", classifier::TITLE_WEIGHT)?;
    m.add("BODY_WEIGHT", classifier::BODY_WEIGHT)?;
    m.add("MIN_SCORE_THRESHOLD", classifier::MIN_SCORE_THRESHOLD)?;

    Ok(())
}
