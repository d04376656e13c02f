//! Team/league classification for articles.
//!
//! Pipeline: normalize -> detect league context -> score team aliases ->
//! disambiguate league -> rank.
//!
//! Scoring: each alias hit in the title is worth `TITLE_WEIGHT`, each hit in
//! the body is worth `BODY_WEIGHT`. Teams below `MIN_SCORE_THRESHOLD` are
//! dropped, so a single incidental body mention never tags an article.

use crate::catalog::{Catalog, CatalogError, TeamLeagueMembership};
use crate::text::{fold_case, normalize_article, PhraseMatcher};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weight of a single alias hit in the title.
pub const TITLE_WEIGHT: u32 = 3;
/// Weight of a single alias hit in the body.
pub const BODY_WEIGHT: u32 = 1;
/// Minimum score (inclusive) for a team to be reported.
pub const MIN_SCORE_THRESHOLD: u32 = 2;

/// One classified team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMatch {
    pub team_slug: String,
    pub league_slug: String,
    pub score: u32,
}

/// Ranked classification output. Descending by score; the first entry is the
/// primary team/league.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationResult {
    matches: Vec<TeamMatch>,
}

impl ClassificationResult {
    /// The highest-scoring match, used for denormalized "main topic" fields.
    pub fn primary(&self) -> Option<&TeamMatch> {
        self.matches.first()
    }

    /// All matches, primary included, in rank order.
    pub fn matches(&self) -> &[TeamMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Iterate `(match, is_primary)` pairs, the shape tag rows are written in.
    pub fn tags(&self) -> impl Iterator<Item = (&TeamMatch, bool)> {
        self.matches.iter().enumerate().map(|(i, m)| (m, i == 0))
    }

    pub fn into_matches(self) -> Vec<TeamMatch> {
        self.matches
    }
}

impl IntoIterator for ClassificationResult {
    type Item = TeamMatch;
    type IntoIter = std::vec::IntoIter<TeamMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

struct CompiledLeague {
    slug: String,
    keywords: Vec<PhraseMatcher>,
}

struct CompiledTeam {
    slug: String,
    primary_league: String,
    aliases: Vec<PhraseMatcher>,
}

/// Classifies article text against an immutable catalog.
///
/// All matchers are compiled once in `new`; `classify` is pure and the
/// classifier can be shared across threads.
pub struct TeamClassifier {
    leagues: Vec<CompiledLeague>,
    teams: Vec<CompiledTeam>,
    membership: TeamLeagueMembership,
}

impl TeamClassifier {
    pub fn new(catalog: &Catalog) -> Result<Self, CatalogError> {
        let leagues = catalog
            .leagues()
            .iter()
            .map(|entry| {
                Ok(CompiledLeague {
                    slug: entry.league_slug.clone(),
                    keywords: compile_all(&entry.keywords)?,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let teams = catalog
            .teams()
            .iter()
            .map(|entry| {
                Ok(CompiledTeam {
                    slug: entry.team_slug.clone(),
                    primary_league: entry.primary_league_slug.clone(),
                    aliases: compile_all(&entry.aliases)?,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        debug!(
            "Compiled classifier: {} leagues, {} teams",
            leagues.len(),
            teams.len()
        );

        Ok(Self {
            leagues,
            teams,
            membership: catalog.membership().clone(),
        })
    }

    /// Classifier over the built-in season tables.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(&Catalog::builtin()?)
    }

    /// Guess the competition `text` is about.
    ///
    /// `text` must already be lowercased. Returns `None` when no league
    /// keyword appears. Ties go to the league listed first in the catalog.
    pub fn detect_league_context(&self, text: &str) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;

        for league in &self.leagues {
            let score: usize = league.keywords.iter().map(|kw| kw.count(text)).sum();
            if score == 0 {
                continue;
            }
            // Strictly greater: earlier leagues keep ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((league.slug.as_str(), score));
            }
        }

        best.map(|(slug, _)| slug)
    }

    /// Classify an article. Empty title/body are valid and simply match nothing.
    pub fn classify(&self, title: &str, body: &str) -> ClassificationResult {
        let title_lower = fold_case(title);
        let body_lower = fold_case(body);
        let full_text = normalize_article(title, body);

        let league_context = self.detect_league_context(&full_text);

        let mut matches: Vec<TeamMatch> = self
            .teams
            .iter()
            .filter_map(|team| {
                let score = Self::score_team(team, &title_lower, &body_lower);
                if score < MIN_SCORE_THRESHOLD {
                    return None;
                }
                Some(TeamMatch {
                    team_slug: team.slug.clone(),
                    league_slug: self.resolve_league(team, league_context).to_string(),
                    score,
                })
            })
            .collect();

        // Stable: equal scores keep catalog order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(primary) = matches.first() {
            debug!(
                "Classified {:?}: {} team(s), primary={}/{} (score {}), context={:?}",
                truncate(title, 40),
                matches.len(),
                primary.team_slug,
                primary.league_slug,
                primary.score,
                league_context
            );
        }

        ClassificationResult { matches }
    }

    /// Classify many `(title, body)` pairs in parallel. Output order matches input.
    pub fn classify_batch<T, B>(&self, articles: &[(T, B)]) -> Vec<ClassificationResult>
    where
        T: AsRef<str> + Sync,
        B: AsRef<str> + Sync,
    {
        articles
            .par_iter()
            .map(|(title, body)| self.classify(title.as_ref(), body.as_ref()))
            .collect()
    }

    fn score_team(team: &CompiledTeam, title_lower: &str, body_lower: &str) -> u32 {
        team.aliases
            .iter()
            .map(|alias| {
                let title_hits = alias.count(title_lower) as u32;
                let body_hits = alias.count(body_lower) as u32;
                title_hits * TITLE_WEIGHT + body_hits * BODY_WEIGHT
            })
            .sum()
    }

    /// Primary league unless the team is a known member of the detected context.
    fn resolve_league<'a>(&'a self, team: &'a CompiledTeam, context: Option<&'a str>) -> &'a str {
        match context {
            Some(league) if self.membership.contains(&team.slug, league) => league,
            _ => team.primary_league.as_str(),
        }
    }
}

fn compile_all(phrases: &[String]) -> Result<Vec<PhraseMatcher>, CatalogError> {
    phrases
        .iter()
        .map(|phrase| {
            PhraseMatcher::new(phrase).map_err(|source| CatalogError::Pattern {
                phrase: phrase.clone(),
                source,
            })
        })
        .collect()
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LeagueKeywordEntry, TeamAliasEntry};

    fn league(slug: &str, keywords: &[&str]) -> LeagueKeywordEntry {
        LeagueKeywordEntry {
            league_slug: slug.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn team(slug: &str, league: &str, aliases: &[&str]) -> TeamAliasEntry {
        TeamAliasEntry {
            team_slug: slug.to_string(),
            primary_league_slug: league.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Small catalog with one alias per team so scores are easy to reason about.
    fn small_classifier() -> TeamClassifier {
        let catalog = Catalog::new(
            vec![
                league("laliga", &["laliga", "jornada"]),
                league("champions", &["champions league", "champions"]),
                league("seriea", &["serie a"]),
            ],
            vec![
                team("realmadrid", "laliga", &["real madrid"]),
                team("betis", "laliga", &["betis"]),
                team("getafe", "laliga", &["getafe"]),
                team("inter", "seriea", &["inter"]),
                team("psg", "champions", &["psg"]),
            ],
            [
                ("realmadrid", "laliga"),
                ("realmadrid", "champions"),
                ("inter", "seriea"),
                ("inter", "champions"),
            ]
            .into_iter()
            .collect(),
        )
        .unwrap();
        TeamClassifier::new(&catalog).unwrap()
    }

    #[test]
    fn test_no_alias_empty_result() {
        let c = small_classifier();
        let result = c.classify("Resumen del mercado", "Nada que ver con equipos");
        assert!(result.is_empty());
        assert!(result.primary().is_none());
    }

    #[test]
    fn test_empty_inputs() {
        let c = small_classifier();
        assert!(c.classify("", "").is_empty());
    }

    #[test]
    fn test_two_body_mentions_meet_threshold() {
        let c = small_classifier();
        let result = c.classify("Crónica", "El Betis remonta. Gran noche del Betis.");
        assert_eq!(result.len(), 1);
        assert_eq!(result.matches()[0].team_slug, "betis");
        assert_eq!(result.matches()[0].score, 2);
    }

    #[test]
    fn test_single_body_mention_dropped() {
        let c = small_classifier();
        assert!(c.classify("Crónica", "El Betis remonta.").is_empty());
    }

    #[test]
    fn test_title_mention_weighted() {
        let c = small_classifier();
        let result = c.classify("El Betis remonta", "");
        assert_eq!(result.matches()[0].score, 3);
    }

    #[test]
    fn test_no_membership_keeps_primary_league() {
        let c = small_classifier();
        let result = c.classify(
            "El Betis en la Champions",
            "Betis sueña con la champions league y la champions",
        );
        let betis = &result.matches()[0];
        assert_eq!(betis.team_slug, "betis");
        assert_eq!(betis.league_slug, "laliga");
    }

    #[test]
    fn test_membership_reassigns_to_context() {
        let c = small_classifier();
        let result = c.classify("Inter golea", "El Inter ya piensa en la Champions");
        let inter = &result.matches()[0];
        assert_eq!(inter.team_slug, "inter");
        assert_eq!(inter.league_slug, "champions");
    }

    #[test]
    fn test_membership_without_matching_context_keeps_primary() {
        let c = small_classifier();
        // Context is laliga, which inter is not a member of
        let result = c.classify("Inter golea", "Inter. Jornada de laliga en España");
        assert_eq!(result.matches()[0].league_slug, "seriea");
    }

    #[test]
    fn test_real_madrid_champions_scenario() {
        let c = small_classifier();
        let result = c.classify(
            "Real Madrid golea en Champions League",
            "El conjunto de Real Madrid certificó su pase en la fase de grupos de la Champions League.",
        );
        assert_eq!(result.len(), 1);
        let primary = result.primary().unwrap();
        assert_eq!(primary.team_slug, "realmadrid");
        assert_eq!(primary.league_slug, "champions");
        assert_eq!(primary.score, 4);
    }

    #[test]
    fn test_single_incidental_mentions_scenario() {
        let c = small_classifier();
        let result = c.classify("Resumen de la jornada", "Betis 2 - Getafe 1");
        assert!(result.is_empty());
    }

    #[test]
    fn test_ranking_and_stable_ties() {
        let c = small_classifier();
        let result = c.classify("PSG y Getafe", "Betis Betis Betis Betis");
        let order: Vec<_> = result.matches().iter().map(|m| m.team_slug.as_str()).collect();
        // betis 4, getafe 3, psg 3: getafe precedes psg in catalog order
        assert_eq!(order, vec!["betis", "getafe", "psg"]);
        let primaries: Vec<bool> = result.tags().map(|(_, p)| p).collect();
        assert_eq!(primaries, vec![true, false, false]);
    }

    #[test]
    fn test_all_scores_meet_threshold() {
        let c = small_classifier();
        let result = c.classify("Inter, Betis", "Getafe, PSG, real madrid y inter");
        assert!(result.matches().iter().all(|m| m.score >= MIN_SCORE_THRESHOLD));
    }

    #[test]
    fn test_idempotent() {
        let c = small_classifier();
        let a = c.classify("Inter y Betis", "betis inter champions");
        let b = c.classify("Inter y Betis", "betis inter champions");
        assert_eq!(a, b);
    }

    #[test]
    fn test_league_context_none() {
        let c = small_classifier();
        assert_eq!(c.detect_league_context("nada relevante"), None);
    }

    #[test]
    fn test_league_context_highest_wins() {
        let c = small_classifier();
        assert_eq!(
            c.detect_league_context("serie a, serie a y laliga"),
            Some("seriea")
        );
    }

    #[test]
    fn test_league_context_tie_goes_to_first() {
        let c = small_classifier();
        // laliga 1, seriea 1: laliga is listed first
        assert_eq!(
            c.detect_league_context("serie a frente a laliga"),
            Some("laliga")
        );
    }

    #[test]
    fn test_league_context_counts_overlapping_keywords() {
        let c = small_classifier();
        // "champions league" hits both "champions league" and "champions"
        assert_eq!(
            c.detect_league_context("jornada champions league"),
            Some("champions")
        );
    }

    #[test]
    fn test_case_and_accents() {
        let catalog = Catalog::new(
            vec![league("laliga", &["laliga"])],
            vec![team("atlmadrid", "laliga", &["atlético madrid"])],
            TeamLeagueMembership::new(),
        )
        .unwrap();
        let c = TeamClassifier::new(&catalog).unwrap();
        let result = c.classify("ATLÉTICO MADRID gana", "");
        assert_eq!(result.matches()[0].score, 3);
        // Unaccented spelling is a different alias
        assert!(c.classify("Atletico Madrid gana", "").is_empty());
    }

    #[test]
    fn test_batch_preserves_order() {
        let c = small_classifier();
        let articles = vec![
            ("Betis gana", ""),
            ("Sin equipos", ""),
            ("Inter gana", ""),
        ];
        let results = c.classify_batch(&articles);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].primary().unwrap().team_slug, "betis");
        assert!(results[1].is_empty());
        assert_eq!(results[2].primary().unwrap().team_slug, "inter");
    }

    #[test]
    fn test_builtin_real_madrid_champions() {
        let c = TeamClassifier::builtin().unwrap();
        let result = c.classify(
            "Real Madrid golea en Champions League",
            "El conjunto de Real Madrid certificó su pase en la fase de grupos de la Champions League.",
        );
        let primary = result.primary().unwrap();
        assert_eq!(primary.team_slug, "realmadrid");
        assert_eq!(primary.league_slug, "champions");
        // "real madrid" and "madrid" both hit once in title and body
        assert_eq!(primary.score, 8);
    }

    #[test]
    fn test_builtin_incidental_mentions() {
        let c = TeamClassifier::builtin().unwrap();
        assert!(c.classify("Resumen de la jornada", "Betis 2 - Getafe 1").is_empty());
    }

    #[test]
    fn test_builtin_premier_context() {
        let c = TeamClassifier::builtin().unwrap();
        let result = c.classify(
            "Liverpool vence al Chelsea",
            "Liverpool lidera la Premier League tras ganar al Chelsea.",
        );
        let liverpool = result
            .matches()
            .iter()
            .find(|m| m.team_slug == "liverpool")
            .unwrap();
        assert_eq!(liverpool.league_slug, "premierleague");
        assert_eq!(result.primary().unwrap().team_slug, "liverpool");
    }

    #[test]
    fn test_serializes_as_list() {
        let c = small_classifier();
        let json = serde_json::to_value(c.classify("Betis gana", "")).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "team_slug": "betis", "league_slug": "laliga", "score": 3 }])
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Atlético", 6), "Atléti");
        assert_eq!(truncate("Betis", 40), "Betis");
    }
}
