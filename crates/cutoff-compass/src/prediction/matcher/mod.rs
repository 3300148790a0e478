//! Resolves a candidate's free-text course name to catalog offerings.
//!
//! Names are compared as normalized token sequences. A requested name matches an offering when
//! either name contains the other, when the offering contains the first requested word, or
//! when both names mention a phrase from the same alias group.

mod aliases;

pub use aliases::{AliasGroup, AliasTable, BUILTIN_ALIAS_VERSION};

use crate::catalog::normalizer::{contains_tokens, tokens};
use crate::catalog::{CatalogStore, CourseRef};

#[derive(Debug, Clone)]
struct CompiledGroup {
    discipline: String,
    phrases: Vec<Vec<String>>,
}

impl CompiledGroup {
    fn mentioned_by(&self, name: &[String]) -> bool {
        self.phrases
            .iter()
            .any(|phrase| contains_tokens(name, phrase))
    }
}

/// Why a requested name matched an offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchReason {
    Containment,
    LeadingToken,
    Alias { discipline: String },
}

#[derive(Debug, Clone)]
pub struct CourseMatcher {
    alias_version: u32,
    groups: Vec<CompiledGroup>,
}

impl CourseMatcher {
    pub fn new(table: &AliasTable) -> Self {
        let groups = table
            .groups
            .iter()
            .map(|group| CompiledGroup {
                discipline: group.discipline.clone(),
                phrases: group
                    .phrases
                    .iter()
                    .map(|phrase| tokens(phrase))
                    .filter(|phrase| !phrase.is_empty())
                    .collect(),
            })
            .collect();

        Self {
            alias_version: table.version,
            groups,
        }
    }

    pub fn alias_version(&self) -> u32 {
        self.alias_version
    }

    pub fn match_reason(&self, requested: &str, offering: &str) -> Option<MatchReason> {
        let requested = RequestedName::parse(requested)?;
        self.reason_for_tokens(&requested, &tokens(offering))
    }

    pub fn is_match(&self, requested: &str, offering: &str) -> bool {
        self.match_reason(requested, offering).is_some()
    }

    /// Every offering in the catalog that plausibly corresponds to `requested`.
    pub fn matches<'a, C>(&self, requested: &str, catalog: &'a C) -> Vec<CourseRef<'a>>
    where
        C: CatalogStore + ?Sized,
    {
        let Some(requested) = RequestedName::parse(requested) else {
            return Vec::new();
        };

        catalog
            .courses()
            .filter(|entry| {
                let offering = tokens(&entry.course.name);
                self.reason_for_tokens(&requested, &offering).is_some()
            })
            .collect()
    }

    fn reason_for_tokens(
        &self,
        requested: &RequestedName,
        offering: &[String],
    ) -> Option<MatchReason> {
        if offering.is_empty() {
            return None;
        }

        if contains_tokens(offering, &requested.tokens)
            || contains_tokens(&requested.tokens, offering)
        {
            return Some(MatchReason::Containment);
        }

        if contains_tokens(offering, &requested.leading) {
            return Some(MatchReason::LeadingToken);
        }

        self.groups
            .iter()
            .find(|group| group.mentioned_by(&requested.tokens) && group.mentioned_by(offering))
            .map(|group| MatchReason::Alias {
                discipline: group.discipline.clone(),
            })
    }
}

/// Requested course name with its first whitespace-delimited word kept as one token run.
#[derive(Debug, Clone)]
struct RequestedName {
    tokens: Vec<String>,
    leading: Vec<String>,
}

impl RequestedName {
    fn parse(raw: &str) -> Option<Self> {
        let all = tokens(raw);
        if all.is_empty() {
            return None;
        }
        // "E&TC" leads with [e, and, tc], never a bare "e".
        let leading = raw
            .split_whitespace()
            .map(tokens)
            .find(|word| !word.is_empty())
            .unwrap_or_default();

        Some(Self {
            tokens: all,
            leading,
        })
    }
}

impl Default for CourseMatcher {
    fn default() -> Self {
        Self::new(&AliasTable::builtin())
    }
}
