//! Team and league catalog used by the classifier.
//!
//! This module provides:
//! - Owned alias/keyword/membership tables
//! - Validation (unique slugs, known league references)
//! - JSON loading so a different season or competition set can be swapped in
//! - The built-in catalog from `league_config`
//!
//! A `Catalog` is built once at startup and never mutated afterwards.

use crate::league_config::{LEAGUE_KEYWORDS, TEAM_ALIASES, TEAM_LEAGUE_MEMBERSHIP};
use crate::text::fold_case;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("empty {kind} slug")]
    EmptySlug { kind: &'static str },

    #[error("duplicate league slug: {0}")]
    DuplicateLeague(String),

    #[error("duplicate team slug: {0}")]
    DuplicateTeam(String),

    #[error("team {team} references unknown league {league}")]
    UnknownLeague { team: String, league: String },

    #[error("membership entry for unknown team {0}")]
    UnknownTeam(String),

    #[error("invalid phrase {phrase:?}: {source}")]
    Pattern {
        phrase: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One known team and its surface forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAliasEntry {
    pub team_slug: String,
    pub primary_league_slug: String,
    pub aliases: Vec<String>,
}

/// One league and the phrases that signal its context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueKeywordEntry {
    pub league_slug: String,
    pub keywords: Vec<String>,
}

/// Sparse `team_slug -> {league_slug}` map for multi-competition teams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamLeagueMembership {
    entries: FxHashMap<String, FxHashSet<String>>,
}

impl TeamLeagueMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `league` to the membership set of `team`.
    pub fn insert(&mut self, team: &str, league: &str) {
        self.entries
            .entry(team.to_string())
            .or_default()
            .insert(league.to_string());
    }

    /// Membership set for a team, if it has one.
    pub fn leagues_for(&self, team: &str) -> Option<&FxHashSet<String>> {
        self.entries.get(team)
    }

    pub fn contains(&self, team: &str, league: &str) -> bool {
        self.entries
            .get(team)
            .map(|leagues| leagues.contains(league))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &FxHashSet<String>)> {
        self.entries.iter()
    }
}

impl<S: AsRef<str>> FromIterator<(S, S)> for TeamLeagueMembership {
    fn from_iter<I: IntoIterator<Item = (S, S)>>(iter: I) -> Self {
        let mut membership = Self::new();
        for (team, league) in iter {
            membership.insert(team.as_ref(), league.as_ref());
        }
        membership
    }
}

/// On-disk JSON shape.
///
/// ```json
/// {
///   "leagues": [{ "league_slug": "laliga", "keywords": ["laliga", "jornada"] }],
///   "teams": [{ "team_slug": "betis", "primary_league_slug": "laliga", "aliases": ["betis"] }],
///   "membership": { "betis": ["laliga"] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub leagues: Vec<LeagueKeywordEntry>,
    pub teams: Vec<TeamAliasEntry>,
    #[serde(default)]
    pub membership: BTreeMap<String, Vec<String>>,
}

/// Validated, immutable classification tables.
///
/// League order is the tie-break order for context detection; team order is
/// the tie-break order for ranking.
#[derive(Debug, Clone)]
pub struct Catalog {
    leagues: Vec<LeagueKeywordEntry>,
    teams: Vec<TeamAliasEntry>,
    membership: TeamLeagueMembership,
}

impl Catalog {
    /// Build a catalog from parts. Aliases and keywords are lowercased;
    /// blank phrases are dropped.
    pub fn new(
        leagues: Vec<LeagueKeywordEntry>,
        teams: Vec<TeamAliasEntry>,
        membership: TeamLeagueMembership,
    ) -> Result<Self, CatalogError> {
        let mut league_slugs = FxHashSet::default();
        let leagues = leagues
            .into_iter()
            .map(|entry| {
                if entry.league_slug.trim().is_empty() {
                    return Err(CatalogError::EmptySlug { kind: "league" });
                }
                if !league_slugs.insert(entry.league_slug.clone()) {
                    return Err(CatalogError::DuplicateLeague(entry.league_slug));
                }
                Ok(LeagueKeywordEntry {
                    league_slug: entry.league_slug,
                    keywords: clean_phrases(entry.keywords),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut team_slugs = FxHashSet::default();
        let teams = teams
            .into_iter()
            .map(|entry| {
                if entry.team_slug.trim().is_empty() {
                    return Err(CatalogError::EmptySlug { kind: "team" });
                }
                if !team_slugs.insert(entry.team_slug.clone()) {
                    return Err(CatalogError::DuplicateTeam(entry.team_slug));
                }
                if !league_slugs.contains(&entry.primary_league_slug) {
                    return Err(CatalogError::UnknownLeague {
                        team: entry.team_slug,
                        league: entry.primary_league_slug,
                    });
                }
                Ok(TeamAliasEntry {
                    team_slug: entry.team_slug,
                    primary_league_slug: entry.primary_league_slug,
                    aliases: clean_phrases(entry.aliases),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (team, member_leagues) in membership.iter() {
            if !team_slugs.contains(team) {
                return Err(CatalogError::UnknownTeam(team.clone()));
            }
            if let Some(league) = member_leagues.iter().find(|l| !league_slugs.contains(*l)) {
                return Err(CatalogError::UnknownLeague {
                    team: team.clone(),
                    league: league.clone(),
                });
            }
        }

        Ok(Self {
            leagues,
            teams,
            membership,
        })
    }

    /// The tables shipped with the crate (see `league_config`).
    pub fn builtin() -> Result<Self, CatalogError> {
        let leagues = LEAGUE_KEYWORDS
            .iter()
            .map(|l| LeagueKeywordEntry {
                league_slug: l.league_slug.to_string(),
                keywords: l.keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();

        let teams = TEAM_ALIASES
            .iter()
            .map(|t| TeamAliasEntry {
                team_slug: t.team_slug.to_string(),
                primary_league_slug: t.league.to_string(),
                aliases: t.aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();

        let membership = TEAM_LEAGUE_MEMBERSHIP
            .iter()
            .flat_map(|(team, leagues)| leagues.iter().map(move |league| (*team, *league)))
            .collect();

        Self::new(leagues, teams, membership)
    }

    /// Parse and validate a JSON catalog document.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::from_file(file)
    }

    /// Load and validate a JSON catalog from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let membership = file
            .membership
            .iter()
            .flat_map(|(team, leagues)| leagues.iter().map(move |league| (team, league)))
            .collect();
        Self::new(file.leagues, file.teams, membership)
    }

    /// Convert back to the on-disk shape.
    pub fn to_file(&self) -> CatalogFile {
        let membership = self
            .membership
            .iter()
            .map(|(team, leagues)| {
                let mut leagues: Vec<String> = leagues.iter().cloned().collect();
                leagues.sort();
                (team.clone(), leagues)
            })
            .collect();

        CatalogFile {
            leagues: self.leagues.clone(),
            teams: self.teams.clone(),
            membership,
        }
    }

    pub fn leagues(&self) -> &[LeagueKeywordEntry] {
        &self.leagues
    }

    pub fn teams(&self) -> &[TeamAliasEntry] {
        &self.teams
    }

    pub fn membership(&self) -> &TeamLeagueMembership {
        &self.membership
    }

    pub fn team(&self, team_slug: &str) -> Option<&TeamAliasEntry> {
        self.teams.iter().find(|t| t.team_slug == team_slug)
    }
}

fn clean_phrases(phrases: Vec<String>) -> Vec<String> {
    phrases
        .into_iter()
        .map(|p| fold_case(p.trim()))
        .filter(|p| !p.is_empty())
        .collect()
}
