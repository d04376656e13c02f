//! Built-in league and team tables for the current season.
//!
//! This module provides:
//! - League context keywords (competition names, round terminology)
//! - Team aliases in ES + EN, including nicknames and abbreviations
//! - Multi-competition membership for clubs playing domestic + continental
//!
//! Order matters: the league table order is the tie-break order for league
//! context detection, and the team table order is the tie-break order when
//! ranking teams with equal scores.

/// Keywords that signal a specific league context.
#[derive(Debug, Clone)]
pub struct LeagueKeywords {
    /// League slug (e.g., "laliga", "champions")
    pub league_slug: &'static str,
    /// Lowercase phrases matched on word boundaries
    pub keywords: &'static [&'static str],
}

/// Known surface forms for a single team.
#[derive(Debug, Clone)]
pub struct TeamAliases {
    /// Team slug (e.g., "realmadrid")
    pub team_slug: &'static str,
    /// League the team is conventionally associated with
    pub league: &'static str,
    /// Lowercase aliases, full names first
    pub aliases: &'static [&'static str],
}

/// Static league keyword table, in tie-break order.
pub static LEAGUE_KEYWORDS: &[LeagueKeywords] = &[
    LeagueKeywords {
        league_slug: "laliga",
        keywords: &[
            "laliga", "la liga", "liga española", "liga espanola", "primera división",
            "primera division", "liga santander", "liga ea sports", "jornada",
        ],
    },
    LeagueKeywords {
        league_slug: "champions",
        keywords: &[
            "champions league", "champions", "ucl", "uefa champions",
            "champions league draw", "sorteo champions", "fase de grupos champions",
            "octavos champions", "cuartos champions", "semifinal champions",
            "final champions", "orejona",
        ],
    },
    LeagueKeywords {
        league_slug: "seriea",
        keywords: &[
            "serie a", "calcio", "scudetto", "seria a", "liga italiana",
            "campeonato italiano",
        ],
    },
    LeagueKeywords {
        league_slug: "premierleague",
        keywords: &[
            "premier league", "premier", "epl", "liga inglesa",
            "english premier", "premiership", "fa cup", "carabao cup",
            "league cup",
        ],
    },
];

/// Static team alias table.
#[rustfmt::skip]
pub static TEAM_ALIASES: &[TeamAliases] = &[
    // La Liga
    TeamAliases {
        team_slug: "barcelona",
        league: "laliga",
        aliases: &["barcelona", "barça", "barca", "blaugrana", "culé", "culers", "fcb", "fc barcelona"],
    },
    TeamAliases {
        team_slug: "realmadrid",
        league: "laliga",
        aliases: &["real madrid", "madrid", "madridista", "merengues", "blancos", "rmcf", "los blancos"],
    },
    TeamAliases {
        team_slug: "atlmadrid",
        league: "laliga",
        aliases: &["atletico madrid", "atlético madrid", "atletico de madrid", "atlético de madrid", "atl. madrid", "atleti", "colchoneros", "rojiblanco"],
    },
    TeamAliases {
        team_slug: "sevilla",
        league: "laliga",
        aliases: &["sevilla", "sevilla fc", "nervionenses", "sevillismo"],
    },
    TeamAliases {
        team_slug: "betis",
        league: "laliga",
        aliases: &["betis", "real betis", "verdiblanco", "béticos", "beticos"],
    },
    TeamAliases {
        team_slug: "realsociedad",
        league: "laliga",
        aliases: &["real sociedad", "la real", "txuri-urdin", "txuri urdin", "donostiarra"],
    },
    TeamAliases {
        team_slug: "villarreal",
        league: "laliga",
        aliases: &["villarreal", "submarino amarillo", "yellow submarine", "groguet"],
    },
    TeamAliases {
        team_slug: "athletic",
        league: "laliga",
        aliases: &["athletic", "athletic club", "athletic bilbao", "athletic de bilbao", "leones", "los leones", "zurigorri"],
    },
    TeamAliases {
        team_slug: "valencia",
        league: "laliga",
        aliases: &["valencia cf", "valencia", "che", "los che", "murciélagos"],
    },
    TeamAliases {
        team_slug: "celta",
        league: "laliga",
        aliases: &["celta", "celta de vigo", "celta vigo", "celtiñas", "celestes"],
    },
    TeamAliases {
        team_slug: "osasuna",
        league: "laliga",
        aliases: &["osasuna", "ca osasuna", "rojillos", "los rojillos"],
    },
    TeamAliases {
        team_slug: "mallorca",
        league: "laliga",
        aliases: &["mallorca", "rcd mallorca", "bermellones"],
    },
    TeamAliases {
        team_slug: "getafe",
        league: "laliga",
        aliases: &["getafe", "getafe cf", "azulones"],
    },
    TeamAliases {
        team_slug: "girona",
        league: "laliga",
        aliases: &["girona", "girona fc"],
    },
    TeamAliases {
        team_slug: "espanyol",
        league: "laliga",
        aliases: &["espanyol", "rcd espanyol", "periquitos", "pericos"],
    },
    TeamAliases {
        team_slug: "rayovallecano",
        league: "laliga",
        aliases: &["rayo vallecano", "rayo", "franjirrojos", "vallecanos"],
    },
    TeamAliases {
        team_slug: "alaves",
        league: "laliga",
        aliases: &["alavés", "alaves", "deportivo alavés", "deportivo alaves", "babazorro"],
    },
    TeamAliases {
        team_slug: "levante",
        league: "laliga",
        aliases: &["levante", "levante ud", "granotas"],
    },
    TeamAliases {
        team_slug: "elche",
        league: "laliga",
        aliases: &["elche", "elche cf", "franjiverdes"],
    },
    TeamAliases {
        team_slug: "realoviedo",
        league: "laliga",
        aliases: &["real oviedo", "oviedo", "carbayones", "azules"],
    },
    // Champions League (non-Spanish teams)
    TeamAliases {
        team_slug: "bayernmunchen",
        league: "champions",
        aliases: &["bayern", "bayern munich", "bayern münchen", "bayern munchen", "fc bayern", "bavarians"],
    },
    TeamAliases {
        team_slug: "manchestercity",
        league: "premierleague",
        aliases: &["manchester city", "man city", "city", "citizens", "cityzens", "mcfc"],
    },
    TeamAliases {
        team_slug: "liverpool",
        league: "premierleague",
        aliases: &["liverpool", "reds", "lfc", "liverpool fc", "the reds", "anfield"],
    },
    TeamAliases {
        team_slug: "arsenal",
        league: "premierleague",
        aliases: &["arsenal", "gunners", "the gunners", "afc", "arsenal fc"],
    },
    TeamAliases {
        team_slug: "chelsea",
        league: "premierleague",
        aliases: &["chelsea", "blues", "the blues", "cfc", "chelsea fc"],
    },
    TeamAliases {
        team_slug: "psg",
        league: "champions",
        aliases: &["psg", "paris saint-germain", "paris saint germain", "paris sg", "parisinos"],
    },
    TeamAliases {
        team_slug: "inter",
        league: "seriea",
        aliases: &["inter", "inter milan", "inter de milán", "inter de milan", "internazionale", "nerazzurri"],
    },
    TeamAliases {
        team_slug: "juventus",
        league: "seriea",
        aliases: &["juventus", "juve", "la vecchia signora", "bianconeri", "la juve"],
    },
    TeamAliases {
        team_slug: "napoli",
        league: "seriea",
        aliases: &["napoli", "nápoles", "ssc napoli", "partenopei", "azzurri napoli"],
    },
    TeamAliases {
        team_slug: "borussiadortmund",
        league: "champions",
        aliases: &["borussia dortmund", "dortmund", "bvb", "die borussen"],
    },
    TeamAliases {
        team_slug: "bayerleverkusen",
        league: "champions",
        aliases: &["bayer leverkusen", "leverkusen", "werkself", "bayer 04"],
    },
    TeamAliases {
        team_slug: "benfica",
        league: "champions",
        aliases: &["benfica", "sl benfica", "águias", "encarnados"],
    },
    TeamAliases {
        team_slug: "sporting",
        league: "champions",
        aliases: &["sporting", "sporting cp", "sporting lisboa", "leões"],
    },
    TeamAliases {
        team_slug: "ajax",
        league: "champions",
        aliases: &["ajax", "ajax amsterdam", "godenzonen", "afc ajax"],
    },
    TeamAliases {
        team_slug: "psv",
        league: "champions",
        aliases: &["psv", "psv eindhoven"],
    },
    TeamAliases {
        team_slug: "tottenham",
        league: "premierleague",
        aliases: &["tottenham", "spurs", "tottenham hotspur", "thfc"],
    },
    TeamAliases {
        team_slug: "newcastle",
        league: "premierleague",
        aliases: &["newcastle", "newcastle united", "magpies", "toon", "nufc"],
    },
    TeamAliases {
        team_slug: "atalanta",
        league: "seriea",
        aliases: &["atalanta", "atalanta bergamo", "la dea", "orobici"],
    },
    TeamAliases {
        team_slug: "galatasaray",
        league: "champions",
        aliases: &["galatasaray", "gala", "cim bom"],
    },
    TeamAliases {
        team_slug: "clubbrujas",
        league: "champions",
        aliases: &["club brujas", "club brugge", "bruges"],
    },
    TeamAliases {
        team_slug: "milan",
        league: "seriea",
        aliases: &["ac milan", "milan", "rossoneri", "diavolo", "il milan"],
    },
    // Serie A (remaining)
    TeamAliases {
        team_slug: "roma",
        league: "seriea",
        aliases: &["roma", "as roma", "giallorossi", "la loba", "romanisti"],
    },
    TeamAliases {
        team_slug: "lazio",
        league: "seriea",
        aliases: &["lazio", "ss lazio", "biancocelesti", "aquilotti"],
    },
    TeamAliases {
        team_slug: "fiorentina",
        league: "seriea",
        aliases: &["fiorentina", "acf fiorentina", "viola", "la viola", "gigliati"],
    },
    TeamAliases {
        team_slug: "torino",
        league: "seriea",
        aliases: &["torino", "torino fc", "toro", "granata"],
    },
    TeamAliases {
        team_slug: "bologna",
        league: "seriea",
        aliases: &["bologna", "bologna fc", "rossoblu"],
    },
    TeamAliases {
        team_slug: "udinese",
        league: "seriea",
        aliases: &["udinese", "udinese calcio", "bianconeri friulani"],
    },
    TeamAliases {
        team_slug: "genoa",
        league: "seriea",
        aliases: &["genoa", "genoa cfc", "grifone"],
    },
    TeamAliases {
        team_slug: "cagliari",
        league: "seriea",
        aliases: &["cagliari", "cagliari calcio", "rossoblu sardi"],
    },
    TeamAliases {
        team_slug: "lecce",
        league: "seriea",
        aliases: &["lecce", "us lecce", "salentini", "giallorossi lecce"],
    },
    TeamAliases {
        team_slug: "parma",
        league: "seriea",
        aliases: &["parma", "parma calcio", "ducali", "crociati"],
    },
    TeamAliases {
        team_slug: "hellasverona",
        league: "seriea",
        aliases: &["hellas verona", "verona", "mastini", "gialloblu"],
    },
    TeamAliases {
        team_slug: "como",
        league: "seriea",
        aliases: &["como", "como 1907", "lariani"],
    },
    TeamAliases {
        team_slug: "sassuolo",
        league: "seriea",
        aliases: &["sassuolo", "us sassuolo", "neroverdi"],
    },
    TeamAliases {
        team_slug: "pisa",
        league: "seriea",
        aliases: &["pisa", "pisa sc", "nerazzurri pisa"],
    },
    TeamAliases {
        team_slug: "cremonese",
        league: "seriea",
        aliases: &["cremonese", "us cremonese", "grigiorossi"],
    },
    // Premier League (remaining)
    TeamAliases {
        team_slug: "manchesterunited",
        league: "premierleague",
        aliases: &["manchester united", "man united", "man utd", "red devils", "mufc", "united"],
    },
    TeamAliases {
        team_slug: "astonvilla",
        league: "premierleague",
        aliases: &["aston villa", "villa", "villans", "avfc"],
    },
    TeamAliases {
        team_slug: "brighton",
        league: "premierleague",
        aliases: &["brighton", "brighton & hove albion", "brighton and hove", "seagulls", "bhafc"],
    },
    TeamAliases {
        team_slug: "westham",
        league: "premierleague",
        aliases: &["west ham", "west ham united", "hammers", "irons", "whufc"],
    },
    TeamAliases {
        team_slug: "crystalpalace",
        league: "premierleague",
        aliases: &["crystal palace", "palace", "eagles", "cpfc"],
    },
    TeamAliases {
        team_slug: "bournemouth",
        league: "premierleague",
        aliases: &["bournemouth", "afc bournemouth", "cherries"],
    },
    TeamAliases {
        team_slug: "fulham",
        league: "premierleague",
        aliases: &["fulham", "fulham fc", "cottagers"],
    },
    TeamAliases {
        team_slug: "wolverhampton",
        league: "premierleague",
        aliases: &["wolverhampton", "wolves", "wolverhampton wanderers", "wwfc"],
    },
    TeamAliases {
        team_slug: "everton",
        league: "premierleague",
        aliases: &["everton", "toffees", "efc", "everton fc"],
    },
    TeamAliases {
        team_slug: "brentford",
        league: "premierleague",
        aliases: &["brentford", "brentford fc", "bees"],
    },
    TeamAliases {
        team_slug: "nottinghamforest",
        league: "premierleague",
        aliases: &["nottingham forest", "forest", "nffc", "tricky trees"],
    },
    TeamAliases {
        team_slug: "leicester",
        league: "premierleague",
        aliases: &["leicester", "leicester city", "foxes", "lcfc"],
    },
    TeamAliases {
        team_slug: "ipswich",
        league: "premierleague",
        aliases: &["ipswich", "ipswich town", "tractor boys", "itfc"],
    },
    TeamAliases {
        team_slug: "southampton",
        league: "premierleague",
        aliases: &["southampton", "saints", "soton", "sfc"],
    },
];

/// Teams that compete in more than one tracked competition.
pub static TEAM_LEAGUE_MEMBERSHIP: &[(&str, &[&str])] = &[
    ("barcelona", &["laliga", "champions"]),
    ("realmadrid", &["laliga", "champions"]),
    ("atlmadrid", &["laliga", "champions"]),
    ("villarreal", &["laliga", "champions"]),
    ("athletic", &["laliga", "champions"]),
    ("manchestercity", &["premierleague", "champions"]),
    ("liverpool", &["premierleague", "champions"]),
    ("arsenal", &["premierleague", "champions"]),
    ("chelsea", &["premierleague", "champions"]),
    ("tottenham", &["premierleague", "champions"]),
    ("newcastle", &["premierleague", "champions"]),
    ("inter", &["seriea", "champions"]),
    ("juventus", &["seriea", "champions"]),
    ("napoli", &["seriea", "champions"]),
    ("atalanta", &["seriea", "champions"]),
    ("milan", &["seriea", "champions"]),
];

/// Get league keywords by slug.
pub fn get_league_keywords(league: &str) -> Option<&'static LeagueKeywords> {
    LEAGUE_KEYWORDS
        .iter()
        .find(|l| l.league_slug.eq_ignore_ascii_case(league))
}

/// Get team aliases by slug.
pub fn get_team_aliases(team: &str) -> Option<&'static TeamAliases> {
    TEAM_ALIASES
        .iter()
        .find(|t| t.team_slug.eq_ignore_ascii_case(team))
}

/// Get list of all league slugs, in tie-break order.
pub fn get_all_league_slugs() -> Vec<&'static str> {
    LEAGUE_KEYWORDS.iter().map(|l| l.league_slug).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_league_order() {
        assert_eq!(
            get_all_league_slugs(),
            vec!["laliga", "champions", "seriea", "premierleague"]
        );
    }

    #[test]
    fn test_team_count() {
        assert_eq!(TEAM_ALIASES.len(), 70);
    }

    #[test]
    fn test_team_slugs_unique() {
        let slugs: HashSet<_> = TEAM_ALIASES.iter().map(|t| t.team_slug).collect();
        assert_eq!(slugs.len(), TEAM_ALIASES.len());
    }

    #[test]
    fn test_primary_leagues_are_known() {
        for team in TEAM_ALIASES {
            assert!(
                get_league_keywords(team.league).is_some(),
                "{} has unknown league {}",
                team.team_slug,
                team.league
            );
        }
    }

    #[test]
    fn test_membership_references_known_entries() {
        for (team, leagues) in TEAM_LEAGUE_MEMBERSHIP {
            let entry = get_team_aliases(team).unwrap();
            assert!(leagues.contains(&entry.league));
            for league in *leagues {
                assert!(get_league_keywords(league).is_some());
            }
        }
    }

    #[test]
    fn test_aliases_are_lowercase() {
        for team in TEAM_ALIASES {
            for alias in team.aliases {
                assert_eq!(*alias, alias.to_lowercase());
            }
        }
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert!(get_team_aliases("RealMadrid").is_some());
        assert!(get_league_keywords("LALIGA").is_some());
        assert!(get_league_keywords("bundesliga").is_none());
    }
}
