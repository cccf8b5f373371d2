//! Temporal validity checks for search snippets and queries.
//!
//! The validator only looks at recency signals in text that was already
//! returned by the search provider: the years it mentions and a deny-list of
//! legal concepts known to be superseded. It does not judge legal correctness.
//!
//! ### Verdict procedure
//!
//! 1. Collect every 4-digit year in `[MIN_YEAR, current_year + 1]` from
//!    `title + " " + text`, unique, most recent first.
//! 2. A deny-listed term wins over everything else, unless the same text
//!    carries a supersession qualifier ("vervangen door", "no longer applies").
//! 3. No years: undated.
//! 4. Most recent year before the current year: outdated.
//! 5. Otherwise current.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::FreshnessVerdict;

/// Lowest year considered a date. Older 4-digit numbers are usually statute
/// or article numbers.
pub const MIN_YEAR: i32 = 2020;

/// Legal concepts that have been repealed or replaced.
pub const DEFAULT_OUTDATED_TERMS: &[&str] = &[
    "wet bescherming persoonsgegevens",
    "awbz",
    "wet werk en bijstand",
    "wet op de jeugdzorg",
    "wet algemene bepalingen omgevingsrecht",
    "bouwbesluit 2012",
    "wet investeren in jongeren",
    "wet tegemoetkoming chronisch zieken en gehandicapten",
];

/// Phrases signalling that a text describes a rule as superseded rather than
/// relying on it.
pub const DEFAULT_SUPERSESSION_QUALIFIERS: &[&str] = &[
    "vervangen door",
    "niet meer van toepassing",
    "is vervallen",
    "is ingetrokken",
    "no longer applies",
    "no longer in force",
    "replaced by",
];

/// Phrases that mark a query as asking about a past state of the law.
pub const DEFAULT_HISTORICAL_PHRASES: &[&str] = &[
    "wat was",
    "wat waren",
    "hoe was",
    "in het verleden",
    "vroeger",
    "destijds",
    "voorheen",
    "geschiedenis van",
    "historisch",
    "oude regeling",
    "what was",
    "what were",
    "in the past",
    "back then",
    "history of",
    "used to",
];

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("year pattern is a valid regex"));

static IN_YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+(19|20)\d{2}\b").expect("in-year pattern is a valid regex"));

/// Classifies snippets as current, outdated or undated relative to a fixed year.
#[derive(Debug, Clone)]
pub struct FreshnessValidator {
    current_year: i32,
    outdated_terms: Vec<String>,
    qualifiers: Vec<String>,
}

impl FreshnessValidator {
    /// Validator for `current_year` with the default term lists.
    pub fn new(current_year: i32) -> Self {
        Self {
            current_year,
            outdated_terms: DEFAULT_OUTDATED_TERMS.iter().map(|t| t.to_string()).collect(),
            qualifiers: DEFAULT_SUPERSESSION_QUALIFIERS.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// Replace the deny-list of superseded terms.
    pub fn with_outdated_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outdated_terms = terms.into_iter().map(|t| t.into().to_lowercase()).collect();
        self
    }

    /// Replace the list of supersession qualifiers.
    pub fn with_qualifiers<I, S>(mut self, qualifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualifiers = qualifiers.into_iter().map(|q| q.into().to_lowercase()).collect();
        self
    }

    /// Same term lists, different reference year.
    pub fn with_current_year(mut self, current_year: i32) -> Self {
        self.current_year = current_year;
        self
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Distinct plausible years in `text`, most recent first.
    pub fn extract_years(&self, text: &str) -> Vec<i32> {
        let max_year = self.current_year + 1;
        let mut years: Vec<i32> = YEAR_PATTERN
            .captures_iter(text)
            .filter_map(|caps| caps[1].parse::<i32>().ok())
            .filter(|year| (MIN_YEAR..=max_year).contains(year))
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// First deny-listed term found in `lowered`, unless a qualifier is present.
    fn outdated_reference(&self, lowered: &str) -> Option<&str> {
        if self.qualifiers.iter().any(|q| lowered.contains(q.as_str())) {
            return None;
        }
        self.outdated_terms
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Classify one document from its snippet `text` and `title`.
    pub fn validate(&self, text: &str, title: &str) -> FreshnessVerdict {
        let combined = format!("{title} {text}");
        let extracted_years = self.extract_years(&combined);

        if let Some(term) = self.outdated_reference(&combined.to_lowercase()) {
            return FreshnessVerdict {
                is_current_year: false,
                has_valid_date: false,
                extracted_years,
                reason: format!("contains outdated reference: {term}"),
            };
        }

        let Some(&most_recent) = extracted_years.first() else {
            return FreshnessVerdict {
                is_current_year: false,
                has_valid_date: false,
                extracted_years,
                reason: "no valid year found".to_string(),
            };
        };

        if most_recent < self.current_year {
            return FreshnessVerdict {
                is_current_year: false,
                has_valid_date: true,
                extracted_years,
                reason: format!("source dates to {most_recent}, current year is {}", self.current_year),
            };
        }

        FreshnessVerdict {
            is_current_year: true,
            has_valid_date: true,
            extracted_years,
            reason: format!("current source ({most_recent})"),
        }
    }
}

/// Keyword gate deciding whether a query asks about the past.
///
/// Historical queries are exempt from the current-year filter. This is a
/// lexical heuristic with no confidence score.
#[derive(Debug, Clone)]
pub struct HistoricalQueryDetector {
    phrases: Vec<String>,
}

impl Default for HistoricalQueryDetector {
    fn default() -> Self {
        Self { phrases: DEFAULT_HISTORICAL_PHRASES.iter().map(|p| p.to_string()).collect() }
    }
}

impl HistoricalQueryDetector {
    /// Detector with a custom phrase list. The `in <year>` rule always applies.
    pub fn with_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { phrases: phrases.into_iter().map(|p| p.into().to_lowercase()).collect() }
    }

    pub fn is_historical(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        self.phrases.iter().any(|p| lowered.contains(p.as_str())) || IN_YEAR_PATTERN.is_match(&lowered)
    }
}
