//! Fuzzy resolution of planner filters into exact index terms.
//!
//! Each non-empty filter field is replaced by the single best-scoring
//! catalog entry. There is no minimum similarity: a poor match is still
//! used when it is the best one available.

use crate::catalog::snapshot::{CatalogSnapshot, MetadataField};
use crate::research::query::Filter;
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

/// One exact-match condition on an index payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTerm {
    pub field: MetadataField,
    pub value: String,
}

/// Conjunction of exact terms: every term must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFilter {
    pub must: Vec<FilterTerm>,
}

impl ResolvedFilter {
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
    }

    pub fn value(&self, field: MetadataField) -> Option<&str> {
        self.must
            .iter()
            .find(|t| t.field == field)
            .map(|t| t.value.as_str())
    }
}

/// Maps loosely specified author / source names onto catalog entries.
pub struct FilterResolver;

impl FilterResolver {
    /// Resolve a filter against the catalog.
    ///
    /// Returns `None` ("no filter") when no field resolved to a term.
    pub fn resolve(filter: Option<&Filter>, catalog: &CatalogSnapshot) -> Option<ResolvedFilter> {
        let filter = filter?;
        let requested = [
            (MetadataField::Author, filter.author.as_deref()),
            (MetadataField::Source, filter.source_title.as_deref()),
        ];

        let must: Vec<FilterTerm> = requested
            .into_iter()
            .filter_map(|(field, wanted)| {
                let value = Self::best_match(wanted?, catalog.candidates(field))?;
                Some(FilterTerm {
                    field,
                    value: value.to_string(),
                })
            })
            .collect();

        if must.is_empty() {
            None
        } else {
            Some(ResolvedFilter { must })
        }
    }

    /// Best catalog entry for `needle`, regardless of how good it is.
    ///
    /// Order of preference: a case-insensitive exact match, then the highest
    /// fuzzy (subsequence) score, then the smallest edit distance. Ties go to
    /// the entry listed first.
    pub fn best_match<'a>(needle: &str, candidates: &'a [String]) -> Option<&'a str> {
        let needle = needle.trim();
        if needle.is_empty() || candidates.is_empty() {
            return None;
        }

        if let Some(exact) = candidates.iter().find(|c| c.eq_ignore_ascii_case(needle)) {
            return Some(exact.as_str());
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::new(
            needle,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let mut best: Option<(u32, &str)> = None;
        for candidate in candidates {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(candidate, &mut buf);
            if let Some(score) = pattern.score(haystack, &mut matcher)
                && best.is_none_or(|(top, _)| score > top)
            {
                best = Some((score, candidate.as_str()));
            }
        }
        if let Some((_, candidate)) = best {
            return Some(candidate);
        }

        let needle = needle.to_lowercase();
        candidates
            .iter()
            .min_by_key(|c| edit_distance(&needle, &c.to_lowercase()))
            .map(String::as_str)
    }
}

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec!["Aristotle".to_string(), "Plato".to_string(), "Kant".to_string()],
            vec![
                "Nicomachean Ethics".to_string(),
                "Republic".to_string(),
                "Critique of Pure Reason".to_string(),
            ],
        )
    }

    #[test]
    fn test_misspelled_author_resolves_without_threshold() {
        let filter = Filter::author("Aristotel");
        let resolved = FilterResolver::resolve(Some(&filter), &catalog()).unwrap();
        assert_eq!(resolved.value(MetadataField::Author), Some("Aristotle"));
        assert_eq!(resolved.must.len(), 1);
    }

    #[test]
    fn test_poor_match_is_still_substituted() {
        let filter = Filter::author("Wittgenstein");
        let resolved = FilterResolver::resolve(Some(&filter), &catalog()).unwrap();
        assert!(resolved.value(MetadataField::Author).is_some());
    }

    #[test]
    fn test_partial_title_resolves_by_subsequence() {
        let filter = Filter::source_title("critique pure reason");
        let resolved = FilterResolver::resolve(Some(&filter), &catalog()).unwrap();
        assert_eq!(
            resolved.value(MetadataField::Source),
            Some("Critique of Pure Reason")
        );
    }

    #[test]
    fn test_both_fields_form_a_conjunction() {
        let filter = Filter::author("plato").with_source_title("Republc");
        let resolved = FilterResolver::resolve(Some(&filter), &catalog()).unwrap();
        assert_eq!(
            resolved.must,
            vec![
                FilterTerm {
                    field: MetadataField::Author,
                    value: "Plato".to_string()
                },
                FilterTerm {
                    field: MetadataField::Source,
                    value: "Republic".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_no_filter_means_no_terms() {
        assert_eq!(FilterResolver::resolve(None, &catalog()), None);
        assert_eq!(
            FilterResolver::resolve(Some(&Filter::default()), &catalog()),
            None
        );
    }

    #[test]
    fn test_empty_catalog_resolves_nothing() {
        let filter = Filter::author("Kant");
        assert_eq!(
            FilterResolver::resolve(Some(&filter), &CatalogSnapshot::default()),
            None
        );
    }

    #[test]
    fn test_exact_match_beats_longer_fuzzy_match() {
        let candidates = vec!["Platonism".to_string(), "Plato".to_string()];
        assert_eq!(FilterResolver::best_match("PLATO", &candidates), Some("Plato"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("aristotel", "aristotle"), 2);
        assert_eq!(edit_distance("", "kant"), 4);
        assert_eq!(edit_distance("hume", "hume"), 0);
    }
}
