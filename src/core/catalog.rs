use crate::utils::error::{ReportError, Result};

/// A named strategic grouping of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDefinition {
    label: String,
    name: Option<String>,
    members: Vec<String>,
}

impl TeamDefinition {
    /// Member identifiers are stored lower-cased.
    pub fn new<I, S>(label: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            name: None,
            members: members
                .into_iter()
                .map(|m| m.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Column header for this team.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.label)
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// A named set of teams rendered together as one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCategory {
    name: String,
    teams: Vec<TeamDefinition>,
}

impl ReportCategory {
    /// Fails with `EmptyCategoryError` when `teams` is empty; every category
    /// therefore has at least one team column to average over.
    pub fn new(name: impl Into<String>, teams: Vec<TeamDefinition>) -> Result<Self> {
        let name = name.into();
        if teams.is_empty() {
            return Err(ReportError::EmptyCategoryError { category: name });
        }
        Ok(Self { name, teams })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn teams(&self) -> &[TeamDefinition] {
        &self.teams
    }
}

/// Immutable set of report categories, built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCatalog {
    categories: Vec<ReportCategory>,
}

impl TeamCatalog {
    pub fn new(categories: Vec<ReportCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[ReportCategory] {
        &self.categories
    }

    pub fn get(&self, name: &str) -> Option<&ReportCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Narrows the catalog to `names`, keeping catalog order. An empty
    /// selection keeps everything.
    pub fn select(&self, names: &[String]) -> Result<TeamCatalog> {
        if names.is_empty() {
            return Ok(self.clone());
        }

        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            let known: Vec<&str> = self.categories.iter().map(|c| c.name()).collect();
            return Err(ReportError::InvalidConfigValueError {
                field: "categories".to_string(),
                value: unknown.clone(),
                reason: format!("Unknown category. Known categories: {}", known.join(", ")),
            });
        }

        Ok(TeamCatalog::new(
            self.categories
                .iter()
                .filter(|c| names.iter().any(|n| n == &c.name))
                .cloned()
                .collect(),
        ))
    }

    /// War and raid catalog the alliance reports were built around.
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, teams)| {
                let teams = teams
                    .iter()
                    .map(|(label, team_name, members)| {
                        TeamDefinition::new(*label, members.iter()).with_name(*team_name)
                    })
                    .collect();
                ReportCategory::new(*name, teams)
            })
            .collect::<Result<Vec<_>>>()
            .expect("built-in categories list at least one team");

        Self { categories }
    }
}

impl Default for TeamCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// (category, [(label, name, members)])
#[rustfmt::skip]
const BUILTIN_CATEGORIES: &[(&str, &[(&str, &str, &[&str])])] = &[
    ("Offense", &[
        ("BO", "Black Order", &["ebony-maw", "thanos", "cull-obsidian", "corvus-glaive", "proxima-midnight"]),
        ("BH2", "Brotherhood V2", &["juggernaut", "toad", "blob", "pyro", "magneto"]),
        ("DEFTRON", "Deftron", &["ultron", "jessica-jones", "iron-fist", "daredevil", "punisher"]),
        ("F4", "Fantastic Four", &["invisible-woman", "the-thing", "human-torch", "mister-fantastic", "namor"]),
        ("HY2", "Hydra V2", &["hydra-grenadier", "winter-soldier", "kingpin", "crossbones"]),
        ("INH", "Inhumans", &["quake", "crystal", "karnak", "yoyo", "black-bolt"]),
        ("PA2", "Power Armor V2", &["iron-man", "iron-heart", "war-machine", "falcon", "rescue"]),
        ("SN", "Supernatural", &["mordo", "ghost-rider", "scarlet-witch", "doctor-strange", "elsa-bloodstone"]),
        ("SYM", "Symbiotes", &["spider-man-symbiote", "carnage", "venom", "spider-man", "spider-man-miles"]),
        ("XFORCE", "X-Force", &["negasonic", "cable", "deadpool", "domino", "x23"]),
        ("XMEN", "X-Men", &["wolverine", "colossus", "cyclops", "storm", "phoenix"]),
    ]),
    ("Defense", &[
        ("ASG", "Asgardian", &["hela", "thor", "loki", "sif", "heimdall"]),
        ("HY", "Hydra", &["hydra-armored-guard", "hydra-scientist", "hydra-rifle-trooper", "hydra-sniper", "red-skull"]),
        ("MAR", "Marauders", &["mister-sinister", "sabretooth", "emmafrost", "mystique", "stryfe"]),
        ("MERC", "Mercenaries", &["taskmaster", "mercenary-sniper", "mercenary-riot-guard", "mercenary-lieutenant", "bullseye"]),
        ("SHC", "S.H.I.E.L.D. Coulson", &["nick-fury", "coulson", "shield-medic", "shield-security", "shield-assault"]),
        ("AVG", "Avengers", &["captain-america", "captain-marvel", "hulk", "black-widow", "hawkeye"]),
        ("BRAWL", "Brawlers", &["america-chavez", "squirrelgirl", "miss-marvel", "psylocke", "wolverine"]),
        ("S6", "Sinister 6", &["rhino", "green-goblin", "shocker", "vulture", "mysterio"]),
    ]),
    ("Flex", &[
        ("AIM", "A.I.M.", &["scientist-supreme", "graviton", "aim-monstruosity", "aim-assualter", "aim-security"]),
        ("DEF", "Defenders", &["luke-cage", "jessica-jones", "iron-fist", "daredevil", "punisher"]),
        ("GOG", "Guardians of the Galaxy", &["star-lord", "groot", "drax", "rocket-racoon", "mantis"]),
        ("WAK", "Wakandans", &["shuri", "black-panther", "killmonger", "mbaku", "okoye"]),
    ]),
    ("U7", &[
        ("MAWTRON", "Mawtron", &["ultron", "ebony-maw", "black-bolt", "minn-erva", "thanos"]),
        ("SYMTECH", "SymTech", &["spider-man-symbiote", "carnage", "venom", "scientist-supreme", "shuri"]),
        ("TECHWING", "TechWing", &["ultron", "scientist-supreme", "shuri", "minn-erva", "falcon"]),
        ("ANGELTRON", "Ultron's Angels", &["ultron", "shuri", "scientist-supreme", "invisible-woman", "minn-erva"]),
    ]),
];
