use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// Version stamp of the alias table compiled into the crate.
pub const BUILTIN_ALIAS_VERSION: u32 = 1;

const BUILTIN_GROUPS: &[(&str, &[&str])] = &[
    (
        "computer",
        &["computer", "computer science", "cse", "comp", "cs"],
    ),
    ("information technology", &["information technology", "it"]),
    (
        "electronics and telecommunication",
        &[
            "electronics and telecommunication",
            "electronics and tele communication",
            "entc",
            "e and tc",
            "extc",
        ],
    ),
    ("electrical", &["electrical", "ee"]),
    ("mechanical", &["mechanical", "mech"]),
    ("civil", &["civil"]),
    ("chemical", &["chemical", "chem"]),
    ("instrumentation", &["instrumentation", "instru"]),
    (
        "artificial intelligence",
        &[
            "artificial intelligence",
            "ai",
            "aiml",
            "ai and ml",
            "machine learning",
        ],
    ),
    ("data science", &["data science", "ds", "ai and ds"]),
];

/// Named discipline with the spellings that refer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasGroup {
    pub discipline: String,
    pub phrases: Vec<String>,
}

/// Versioned table of course-name aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    pub version: u32,
    pub groups: Vec<AliasGroup>,
}

impl AliasTable {
    pub fn builtin() -> Self {
        let groups = BUILTIN_GROUPS
            .iter()
            .map(|(discipline, phrases)| AliasGroup {
                discipline: discipline.to_string(),
                phrases: phrases.iter().map(|phrase| phrase.to_string()).collect(),
            })
            .collect();

        Self {
            version: BUILTIN_ALIAS_VERSION,
            groups,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn builtin_table_is_versioned() {
        let table = AliasTable::builtin();
        assert_eq!(table.version, BUILTIN_ALIAS_VERSION);
        assert!(table
            .groups
            .iter()
            .any(|group| group.discipline == "information technology"
                && group.phrases.iter().any(|phrase| phrase == "it")));
    }

    #[test]
    fn custom_table_loads_from_json() {
        let json = r#"{"version": 7, "groups": [{"discipline": "robotics", "phrases": ["robotics", "rai"]}]}"#;
        let table = AliasTable::from_reader(Cursor::new(json)).expect("table loads");
        assert_eq!(table.version, 7);
        assert_eq!(table.groups[0].phrases, vec!["robotics", "rai"]);
    }
}
