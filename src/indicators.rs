use crate::config::CategorySpec;
use serde::{Deserialize, Serialize};

/// The seven fixed risk taxonomies. Category definitions (phrases, weights,
/// descriptions) live in the rule configuration; this enum is only identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    DataMonetization,
    SensitiveData,
    BehavioralTracking,
    LegalRedFlags,
    DataRetention,
    ThirdPartyAccess,
    InternationalTransfer,
}

impl CategoryId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::DataMonetization => "data_monetization",
            CategoryId::SensitiveData => "sensitive_data",
            CategoryId::BehavioralTracking => "behavioral_tracking",
            CategoryId::LegalRedFlags => "legal_red_flags",
            CategoryId::DataRetention => "data_retention",
            CategoryId::ThirdPartyAccess => "third_party_access",
            CategoryId::InternationalTransfer => "international_transfer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Capitalized form used in the qualitative per-category analysis.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

/// A single matched risk phrase with its category metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Indicator {
    #[serde(rename = "type")]
    pub category_id: CategoryId,
    pub term: String,
    pub risk: Severity,
    pub category: String,
    pub description: String,
}

/// A category with its phrase list pre-lowercased for scanning.
pub struct CategoryRule {
    pub id: CategoryId,
    pub label: String,
    pub points: u32,
    pub severity: Severity,
    pub description: String,
    phrases: Vec<String>,
}

/// Scans page text against the category taxonomy. Matching is lower-cased
/// substring containment, not word-boundary matching: a phrase inside a
/// longer word still counts. That recall-over-precision trade-off is part of
/// the scoring contract and must not be "fixed" here.
pub struct IndicatorMatcher {
    categories: Vec<CategoryRule>,
}

impl IndicatorMatcher {
    pub fn new(specs: &[CategorySpec]) -> Self {
        let categories = specs
            .iter()
            .map(|spec| CategoryRule {
                id: spec.id,
                label: spec.label.clone(),
                points: spec.points,
                severity: spec.severity,
                description: spec.description.clone(),
                phrases: spec.phrases.iter().map(|p| p.to_lowercase()).collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryRule] {
        &self.categories
    }

    /// One Indicator per distinct matched phrase per category, in category
    /// order then phrase order. The same substring may fire in two
    /// categories; that is deliberate, the categories weigh it differently.
    pub fn scan(&self, text: &str) -> Vec<Indicator> {
        if text.is_empty() {
            return Vec::new();
        }

        let haystack = text.to_lowercase();
        let mut indicators = Vec::new();

        for category in &self.categories {
            for phrase in &category.phrases {
                if haystack.contains(phrase.as_str()) {
                    indicators.push(Indicator {
                        category_id: category.id,
                        term: phrase.clone(),
                        risk: category.severity,
                        category: category.label.clone(),
                        description: category.description.clone(),
                    });
                }
            }
        }

        log::debug!("matched {} risk indicators", indicators.len());
        indicators
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;

    fn matcher() -> IndicatorMatcher {
        IndicatorMatcher::new(&RuleConfig::default().categories)
    }

    #[test]
    fn empty_text_yields_no_indicators() {
        assert!(matcher().scan("").is_empty());
    }

    #[test]
    fn monetization_phrase_matches() {
        let indicators = matcher().scan("we sell your data to data brokers");
        assert_eq!(indicators.len(), 1);
        assert_eq!(indicators[0].category_id, CategoryId::DataMonetization);
        assert_eq!(indicators[0].term, "sell your data");
        assert_eq!(indicators[0].category, "Data Monetization");
        assert_eq!(indicators[0].risk, Severity::High);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let indicators = matcher().scan("We use COOKIES and Analytics");
        let ids: Vec<_> = indicators.iter().map(|i| i.term.as_str()).collect();
        assert!(ids.contains(&"cookies"));
        assert!(ids.contains(&"analytics"));
    }

    #[test]
    fn same_text_can_fire_in_two_categories() {
        // "share with third parties" is a monetization phrase and contains
        // the third-party-access phrase "third parties".
        let indicators = matcher().scan("we may share with third parties");
        let ids: Vec<_> = indicators.iter().map(|i| i.category_id).collect();
        assert!(ids.contains(&CategoryId::DataMonetization));
        assert!(ids.contains(&CategoryId::ThirdPartyAccess));
    }

    #[test]
    fn substring_matching_has_no_word_boundaries() {
        // "ssn" inside a longer token still matches; this is intentional.
        let indicators = matcher().scan("classname=ssn_input");
        assert!(indicators
            .iter()
            .any(|i| i.category_id == CategoryId::SensitiveData && i.term == "ssn"));
    }

    #[test]
    fn repeated_occurrences_emit_one_indicator_per_phrase() {
        let indicators = matcher().scan("tracking tracking tracking");
        let tracking: Vec<_> = indicators.iter().filter(|i| i.term == "tracking").collect();
        assert_eq!(tracking.len(), 1);
    }

    #[test]
    fn scan_order_is_deterministic() {
        let text = "cookies and tracking, plus we sell your data under a perpetual license";
        let a: Vec<_> = matcher().scan(text).iter().map(|i| i.term.clone()).collect();
        let b: Vec<_> = matcher().scan(text).iter().map(|i| i.term.clone()).collect();
        assert_eq!(a, b);
    }
}
