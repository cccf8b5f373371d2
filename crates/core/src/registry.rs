//! Site group registry: which domains are searched for each source tag.

use std::collections::{BTreeMap, HashSet};

use crate::Error;
use crate::types::SourceTag;

/// Built-in allow-list, in search order per tag.
const BUILTIN_SITE_GROUPS: &[(SourceTag, &[&str])] = &[
    (SourceTag::Statutes, &["wetten.overheid.nl", "zoek.officielebekendmakingen.nl"]),
    (SourceTag::CaseLaw, &["uitspraken.rechtspraak.nl", "raadvanstate.nl"]),
    (SourceTag::DisciplinaryRulings, &["tuchtrecht.overheid.nl"]),
    (SourceTag::FinesDatabase, &["boetebase.om.nl"]),
    (SourceTag::GeneralGovernment, &["rijksoverheid.nl", "belastingdienst.nl", "government.nl"]),
    (SourceTag::MunicipalBylaws, &["lokaleregelgeving.overheid.nl"]),
];

/// Mapping from source tag to an ordered, non-empty list of unique domains.
///
/// Construction validates that every [`SourceTag`] has at least one domain,
/// so a registry that exists is always complete.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    groups: BTreeMap<SourceTag, Vec<String>>,
}

impl SiteRegistry {
    /// Build a registry from explicit groups.
    ///
    /// Domains are trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptySiteGroup` if any tag is missing or has no
    /// domains, and `Error::DuplicateDomain` if a domain repeats within a tag.
    pub fn new(groups: BTreeMap<SourceTag, Vec<String>>) -> Result<Self, Error> {
        let mut normalized = BTreeMap::new();

        for tag in SourceTag::ALL {
            let domains = groups.get(&tag).map(Vec::as_slice).unwrap_or_default();
            let mut seen = HashSet::new();
            let mut list = Vec::with_capacity(domains.len());

            for domain in domains {
                let domain = domain.trim().to_lowercase();
                if domain.is_empty() {
                    continue;
                }
                if !seen.insert(domain.clone()) {
                    return Err(Error::DuplicateDomain { tag, domain });
                }
                list.push(domain);
            }

            if list.is_empty() {
                return Err(Error::EmptySiteGroup(tag));
            }
            normalized.insert(tag, list);
        }

        Ok(Self { groups: normalized })
    }

    /// The built-in allow-list of government and legal domains.
    pub fn builtin() -> Self {
        let groups = BUILTIN_SITE_GROUPS
            .iter()
            .map(|(tag, domains)| (*tag, domains.iter().map(|d| d.to_string()).collect()))
            .collect();
        Self { groups }
    }

    /// Domains for `tag`, in search order.
    pub fn domains(&self, tag: SourceTag) -> &[String] {
        self.groups.get(&tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every `(tag, domain)` pair, tag order first, then domain order.
    pub fn pairs(&self) -> impl Iterator<Item = (SourceTag, &str)> {
        self.groups
            .iter()
            .flat_map(|(tag, domains)| domains.iter().map(move |d| (*tag, d.as_str())))
    }

    /// Total number of domains across all tags.
    pub fn domain_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
