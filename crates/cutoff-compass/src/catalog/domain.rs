use serde::{Deserialize, Serialize};

/// Reservation category of a candidate, also used as a cutoff column key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "open")]
    General,
    Obc,
    Sc,
    St,
    Ews,
    Vjnt,
    Nt1,
    Nt2,
    Nt3,
    Sebc,
}

impl Category {
    pub const fn ordered() -> [Category; 10] {
        [
            Category::General,
            Category::Obc,
            Category::Sc,
            Category::St,
            Category::Ews,
            Category::Vjnt,
            Category::Nt1,
            Category::Nt2,
            Category::Nt3,
            Category::Sebc,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Obc => "obc",
            Category::Sc => "sc",
            Category::St => "st",
            Category::Ews => "ews",
            Category::Vjnt => "vjnt",
            Category::Nt1 => "nt1",
            Category::Nt2 => "nt2",
            Category::Nt3 => "nt3",
            Category::Sebc => "sebc",
        }
    }

    /// Case-insensitive lookup accepting `open` as a synonym for `general`.
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        if needle == "open" {
            return Some(Category::General);
        }
        Self::ordered()
            .into_iter()
            .find(|category| category.label() == needle)
    }
}

/// Ownership classification of an institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnershipType {
    Government,
    Private,
    Autonomous,
    Deemed,
    University,
}

impl OwnershipType {
    pub const fn label(self) -> &'static str {
        match self {
            OwnershipType::Government => "Government",
            OwnershipType::Private => "Private",
            OwnershipType::Autonomous => "Autonomous",
            OwnershipType::Deemed => "Deemed",
            OwnershipType::University => "University",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "government" | "govt" => Some(OwnershipType::Government),
            "private" => Some(OwnershipType::Private),
            "autonomous" => Some(OwnershipType::Autonomous),
            "deemed" => Some(OwnershipType::Deemed),
            "university" => Some(OwnershipType::University),
            _ => None,
        }
    }
}

/// One nullable percentile threshold per reservation category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCutoffs {
    #[serde(default, alias = "open")]
    pub general: Option<f64>,
    #[serde(default)]
    pub obc: Option<f64>,
    #[serde(default)]
    pub sc: Option<f64>,
    #[serde(default)]
    pub st: Option<f64>,
    #[serde(default)]
    pub ews: Option<f64>,
    #[serde(default)]
    pub vjnt: Option<f64>,
    #[serde(default)]
    pub nt1: Option<f64>,
    #[serde(default)]
    pub nt2: Option<f64>,
    #[serde(default)]
    pub nt3: Option<f64>,
    #[serde(default)]
    pub sebc: Option<f64>,
}

impl CategoryCutoffs {
    /// Raw value recorded for `category`, without range checks.
    pub fn get(&self, category: Category) -> Option<f64> {
        match category {
            Category::General => self.general,
            Category::Obc => self.obc,
            Category::Sc => self.sc,
            Category::St => self.st,
            Category::Ews => self.ews,
            Category::Vjnt => self.vjnt,
            Category::Nt1 => self.nt1,
            Category::Nt2 => self.nt2,
            Category::Nt3 => self.nt3,
            Category::Sebc => self.sebc,
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ordered()
            .into_iter()
            .all(|category| self.get(category).is_none())
    }
}

/// Cutoff snapshot for a single round (or the legacy flat cutoff).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cutoff {
    #[serde(flatten)]
    pub open: CategoryCutoffs,
    #[serde(default)]
    pub tfws: Option<f64>,
    #[serde(default)]
    pub ladies: CategoryCutoffs,
}

impl Cutoff {
    pub fn general(value: f64) -> Self {
        Self {
            open: CategoryCutoffs {
                general: Some(value),
                ..CategoryCutoffs::default()
            },
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.tfws.is_none() && self.ladies.is_empty()
    }
}

/// Returns the value only if it is a finite percentile in `[0, 100]`.
pub fn usable_percentile(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && (0.0..=100.0).contains(value))
}

/// Published cutoffs for one allocation round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub number: u8,
    pub cutoff: Cutoff,
}

/// A course offered by an institution with its round-by-round cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOffering {
    pub name: String,
    #[serde(default)]
    pub seats: Option<u32>,
    #[serde(default)]
    pub rounds: Vec<Round>,
    /// Legacy flat cutoff mirroring the first/best round.
    #[serde(default)]
    pub cutoff: Option<Cutoff>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeSummary {
    #[serde(default)]
    pub annual_fee: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementSummary {
    #[serde(default)]
    pub average_package_lpa: Option<f32>,
    #[serde(default)]
    pub highest_package_lpa: Option<f32>,
    #[serde(default)]
    pub placement_rate: Option<f32>,
}

/// A college with its course catalog. Read-only during a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub name: String,
    #[serde(default)]
    pub city: String,
    pub ownership: OwnershipType,
    #[serde(default)]
    pub fees: FeeSummary,
    #[serde(default)]
    pub placement: PlacementSummary,
    /// Legacy flat cutoff for institutions without per-course data.
    #[serde(default)]
    pub cutoff: Option<Cutoff>,
    #[serde(default)]
    pub courses: Vec<CourseOffering>,
}
