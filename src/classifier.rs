use crate::config::SiteRule;
use serde::{Deserialize, Serialize};
use url::Url;

/// Coarse classification of a page's business domain, used as the scoring
/// baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteType {
    SocialMedia,
    Financial,
    Ecommerce,
    Educational,
    General,
}

impl WebsiteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebsiteType::SocialMedia => "social_media",
            WebsiteType::Financial => "financial",
            WebsiteType::Ecommerce => "ecommerce",
            WebsiteType::Educational => "educational",
            WebsiteType::General => "general",
        }
    }
}

struct CompiledSiteRule {
    website_type: WebsiteType,
    url_terms: Vec<String>,
    text_terms: Vec<String>,
}

/// First-matching-rule-wins site classifier. Rule order is priority order:
/// overlapping rule sets are resolved by position, not match count, so a
/// given page always maps to exactly one type.
pub struct SiteClassifier {
    rules: Vec<CompiledSiteRule>,
}

impl SiteClassifier {
    pub fn new(rules: &[SiteRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| CompiledSiteRule {
                website_type: rule.website_type,
                url_terms: lowercase_all(&rule.url_terms),
                text_terms: lowercase_all(&rule.text_terms),
            })
            .collect();
        Self { rules }
    }

    /// A URL that does not parse is treated as no-match for every URL term;
    /// the rule can still fire on its text terms.
    pub fn classify(&self, url: &str, text: &str) -> WebsiteType {
        let url_haystack = Url::parse(url).ok().map(|u| u.as_str().to_lowercase());
        let text_haystack = text.to_lowercase();

        for rule in &self.rules {
            let url_hit = url_haystack
                .as_deref()
                .map(|u| rule.url_terms.iter().any(|term| u.contains(term)))
                .unwrap_or(false);
            let text_hit = rule.text_terms.iter().any(|term| text_haystack.contains(term));

            if url_hit || text_hit {
                log::debug!("classified {url} as {}", rule.website_type.as_str());
                return rule.website_type;
            }
        }

        WebsiteType::General
    }
}

pub(crate) fn lowercase_all(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}
