//! Editorial heuristics: sport, article category and verification status.
//!
//! Sport and category use the same whole-phrase keyword counting as team
//! classification; category counts title hits again at double weight.
//! Status is a cheap substring check over title + summary.

use crate::text::{fold_case, PhraseMatcher};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sport reported when there is no hint and no keyword matches.
pub const DEFAULT_SPORT: &str = "football_eu";

/// `breaking` wins outright once it reaches this score.
pub const BREAKING_MIN_SCORE: usize = 2;
/// Extra weight for a keyword hit in the title.
pub const CATEGORY_TITLE_BONUS: usize = 2;

/// A built-in keyword table failed to compile.
#[derive(Debug, Error)]
#[error("invalid {table} keyword {phrase:?}: {source}")]
pub struct KeywordTableError {
    pub table: &'static str,
    pub phrase: String,
    #[source]
    pub source: regex::Error,
}

fn compile_keywords(
    table: &'static str,
    keywords: &[&str],
) -> Result<Vec<PhraseMatcher>, KeywordTableError> {
    keywords
        .iter()
        .map(|kw| {
            PhraseMatcher::new(kw).map_err(|source| KeywordTableError {
                table,
                phrase: kw.to_string(),
                source,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transfer,
    Injury,
    MatchResult,
    Controversy,
    Breaking,
    Stats,
    Schedule,
    Default,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transfer => "transfer",
            Category::Injury => "injury",
            Category::MatchResult => "match_result",
            Category::Controversy => "controversy",
            Category::Breaking => "breaking",
            Category::Stats => "stats",
            Category::Schedule => "schedule",
            Category::Default => "default",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Confirmado,
    Rumor,
    EnDesarrollo,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Confirmado => "CONFIRMADO",
            Status::Rumor => "RUMOR",
            Status::EnDesarrollo => "EN_DESARROLLO",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sport keyword table, in tie-break order.
#[rustfmt::skip]
pub static SPORT_KEYWORDS: &[(&str, &[&str])] = &[
    (DEFAULT_SPORT, &[
        "futbol", "fútbol", "football", "soccer", "liga", "premier league",
        "champions", "europa league", "laliga", "serie a", "bundesliga",
        "ligue 1", "real madrid", "barcelona", "atletico", "manchester",
        "liverpool", "chelsea", "arsenal", "juventus", "milan", "inter",
        "psg", "bayern", "dortmund", "messi", "ronaldo", "mbappe", "haaland",
        "bellingham", "vinicius", "gol", "fichaje", "transfer", "penalty",
        "penalti", "red card", "tarjeta roja", "portero", "goalkeeper",
        "mundial", "eurocopa", "copa del rey", "fa cup",
    ]),
];

/// Category keyword table, in tie-break order.
#[rustfmt::skip]
pub static CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Transfer, &[
        "fichaje", "transfer", "signing", "firma", "contrato", "contract",
        "traspaso", "cesión", "loan", "llegada", "salida", "venta", "compra",
        "acuerdo", "deal", "negociación", "negotiations", "interés", "interest",
        "pretende", "quiere fichar", "wants to sign", "target", "objetivo",
    ]),
    (Category::Injury, &[
        "lesión", "injury", "injured", "lesionado", "baja", "out", "rotura",
        "esguince", "fractura", "operación", "surgery", "recuperación",
        "recovery", "parte médico", "medical report", "muscular", "rodilla",
        "knee", "tobillo", "ankle", "semanas de baja", "weeks out",
    ]),
    (Category::MatchResult, &[
        "resultado", "result", "ganó", "won", "perdió", "lost", "empate",
        "draw", "victoria", "victory", "derrota", "defeat", "goles", "goals",
        "marcador", "score", "final", "partido", "match", "game", "encuentro",
    ]),
    (Category::Controversy, &[
        "polémica", "controversy", "escándalo", "scandal", "sanción",
        "suspension", "expulsión", "red card", "var", "arbitraje", "referee",
        "injusticia", "injustice", "protesta", "protest", "denuncia",
        "investigación", "investigation", "dopaje", "doping",
    ]),
    (Category::Breaking, &[
        "última hora", "breaking", "urgente", "urgent", "oficial", "official",
        "comunicado", "announcement", "confirmado", "confirmed", "ya es",
        "done deal", "cerrado", "exclusiva", "exclusive", "bombazo", "shock",
    ]),
    (Category::Stats, &[
        "récord", "record", "estadísticas", "statistics", "stats", "histórico",
        "historic", "mejor", "best", "peor", "worst", "ranking", "clasificación",
        "standing", "tabla", "table", "promedio", "average", "racha", "streak",
    ]),
    (Category::Schedule, &[
        "calendario", "schedule", "fixture", "horario", "hora", "time",
        "fecha", "date", "jornada", "matchday", "convocatoria", "squad",
        "alineación", "lineup", "once", "starting eleven", "previa", "preview",
    ]),
];

/// Club and league domains treated as official sources.
pub static OFFICIAL_DOMAINS: &[&str] = &[
    // Clubs
    "realmadrid.com",
    "fcbarcelona.com",
    "atleticodemadrid.com",
    "manutd.com",
    "mancity.com",
    "liverpoolfc.com",
    "chelseafc.com",
    "arsenal.com",
    "tottenhamhotspur.com",
    "juventus.com",
    "acmilan.com",
    "inter.it",
    "psg.fr",
    "fcbayern.com",
    "bvb.de",
    // Leagues & federations
    "laliga.com",
    "premierleague.com",
    "bundesliga.com",
    "seriea.it",
    "ligue1.com",
    "uefa.com",
    "fifa.com",
];

const DEVELOPING_KEYWORDS: &[&str] = &[
    "en desarrollo", "breaking", "última hora", "developing",
    "live", "en vivo", "directo", "ahora mismo", "just in",
    "en curso", "ongoing",
];

const CONFIRMED_KEYWORDS: &[&str] = &[
    "oficial", "official", "confirmado", "confirmed",
    "comunicado", "announcement", "done deal", "ya es",
    "firma", "signed", "agree", "acuerdo cerrado",
];

/// Keyword-based sport classifier. Matchers are compiled once.
pub struct SportClassifier {
    sports: Vec<(&'static str, Vec<PhraseMatcher>)>,
}

impl SportClassifier {
    pub fn new() -> Result<Self, KeywordTableError> {
        let sports = SPORT_KEYWORDS
            .iter()
            .map(|(sport, keywords)| Ok((*sport, compile_keywords("sport", keywords)?)))
            .collect::<Result<Vec<_>, KeywordTableError>>()?;

        Ok(Self { sports })
    }

    /// Whole-phrase hits per sport over title, summary and feed categories,
    /// in table order.
    pub fn scores(&self, title: &str, summary: &str, categories: &[&str]) -> Vec<(&'static str, usize)> {
        let text = fold_case(&format!("{} {} {}", title, summary, categories.join(" ")));

        self.sports
            .iter()
            .map(|(sport, matchers)| (*sport, matchers.iter().map(|m| m.count(&text)).sum()))
            .collect()
    }

    /// Pick the article sport.
    ///
    /// A non-empty source hint wins outright. Otherwise the top-scoring sport
    /// (first in table order on ties), or `DEFAULT_SPORT` when nothing matches.
    pub fn classify<'a>(
        &self,
        title: &str,
        summary: &str,
        categories: &[&str],
        sport_hint: Option<&'a str>,
    ) -> &'a str {
        if let Some(hint) = sport_hint.map(str::trim).filter(|h| !h.is_empty()) {
            return hint;
        }

        let mut best: Option<(&'static str, usize)> = None;
        for (sport, score) in self.scores(title, summary, categories) {
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((sport, score));
            }
        }

        best.map(|(sport, _)| sport).unwrap_or(DEFAULT_SPORT)
    }
}

/// Keyword-based category classifier. Matchers are compiled once.
pub struct CategoryClassifier {
    categories: Vec<(Category, Vec<PhraseMatcher>)>,
}

impl CategoryClassifier {
    pub fn new() -> Result<Self, KeywordTableError> {
        let categories = CATEGORY_KEYWORDS
            .iter()
            .map(|(category, keywords)| {
                Ok((*category, compile_keywords(category.as_str(), keywords)?))
            })
            .collect::<Result<Vec<_>, KeywordTableError>>()?;

        Ok(Self { categories })
    }

    /// Score every category; returned in table order.
    pub fn scores(&self, title: &str, summary: &str) -> Vec<(Category, usize)> {
        let title_lower = fold_case(title);
        let text = format!("{} {}", title_lower, fold_case(summary));

        self.categories
            .iter()
            .map(|(category, matchers)| {
                let score = matchers
                    .iter()
                    .map(|m| m.count(&text) + m.count(&title_lower) * CATEGORY_TITLE_BONUS)
                    .sum();
                (*category, score)
            })
            .collect()
    }

    /// Pick the article category, `Category::Default` when nothing matches.
    pub fn classify(&self, title: &str, summary: &str) -> Category {
        let scores = self.scores(title, summary);

        let breaking = scores
            .iter()
            .find(|(c, _)| *c == Category::Breaking)
            .map(|(_, s)| *s)
            .unwrap_or(0);
        if breaking >= BREAKING_MIN_SCORE {
            return Category::Breaking;
        }

        let mut best: Option<(Category, usize)> = None;
        for (category, score) in scores {
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((category, score));
            }
        }

        best.map(|(c, _)| c).unwrap_or(Category::Default)
    }
}

/// Verification status for an article.
///
/// Official source domain first, then developing-story markers, then
/// confirmation markers; everything else is a rumor.
pub fn determine_status(title: &str, summary: &str, source_domain: Option<&str>) -> Status {
    if let Some(domain) = source_domain {
        let domain = domain.trim().to_ascii_lowercase();
        let domain = domain.strip_prefix("www.").unwrap_or(&domain);
        if OFFICIAL_DOMAINS.contains(&domain) {
            return Status::Confirmado;
        }
    }

    let text = fold_case(&format!("{} {}", title, summary));

    if DEVELOPING_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return Status::EnDesarrollo;
    }
    if CONFIRMED_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return Status::Confirmado;
    }

    Status::Rumor
}
