//! Domain types shared by the pipeline stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of legal authority a domain belongs to.
///
/// Declaration order is the order tags are searched, reported and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Consolidated statute and regulation texts.
    Statutes,
    /// Published court decisions.
    CaseLaw,
    /// Rulings of professional disciplinary bodies.
    DisciplinaryRulings,
    /// Prosecution fine schedules.
    FinesDatabase,
    /// Central government information and policy pages.
    GeneralGovernment,
    /// Local (municipal and provincial) regulations.
    MunicipalBylaws,
}

impl SourceTag {
    /// Every tag, in declaration order.
    pub const ALL: [SourceTag; 6] = [
        SourceTag::Statutes,
        SourceTag::CaseLaw,
        SourceTag::DisciplinaryRulings,
        SourceTag::FinesDatabase,
        SourceTag::GeneralGovernment,
        SourceTag::MunicipalBylaws,
    ];

    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Statutes => "statutes",
            SourceTag::CaseLaw => "case_law",
            SourceTag::DisciplinaryRulings => "disciplinary_rulings",
            SourceTag::FinesDatabase => "fines_database",
            SourceTag::GeneralGovernment => "general_government",
            SourceTag::MunicipalBylaws => "municipal_bylaws",
        }
    }

    /// Human-readable heading used when rendering evidence.
    pub fn label(&self) -> &'static str {
        match self {
            SourceTag::Statutes => "Legislation",
            SourceTag::CaseLaw => "Case law",
            SourceTag::DisciplinaryRulings => "Disciplinary rulings",
            SourceTag::FinesDatabase => "Fines and penalties",
            SourceTag::GeneralGovernment => "Government information",
            SourceTag::MunicipalBylaws => "Municipal regulations",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record as returned by the upstream search provider.
///
/// This is the form stored in the result cache, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub display_link: String,
}

/// Temporal validity of a single search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FreshnessVerdict {
    /// The most recent year mentioned is the current year (or next year).
    pub is_current_year: bool,
    /// At least one plausible year was found and no superseded term matched.
    pub has_valid_date: bool,
    /// Distinct years found, most recent first.
    pub extracted_years: Vec<i32>,
    /// Short explanation of the verdict.
    pub reason: String,
}

/// A validated search hit, labeled with the source tag it was found under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub display_link: String,
    pub source: SourceTag,
    pub verdict: FreshnessVerdict,
}

impl SearchResult {
    /// Whether this result passed the current-year check.
    pub fn is_current(&self) -> bool {
        self.verdict.is_current_year
    }
}
