use crate::classifier::lowercase_all;
use crate::config::DocumentRule;
use serde::{Deserialize, Serialize};
use url::Url;

/// Kind of legal document a page appears to be. Recognized documents carry a
/// fixed baseline adjustment because they describe data practices directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PrivacyPolicy,
    TermsOfService,
    CookiePolicy,
    DataProcessingAgreement,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::PrivacyPolicy => "privacy_policy",
            DocumentKind::TermsOfService => "terms_of_service",
            DocumentKind::CookiePolicy => "cookie_policy",
            DocumentKind::DataProcessingAgreement => "data_processing_agreement",
        }
    }
}

struct CompiledDocumentRule {
    kind: DocumentKind,
    url_terms: Vec<String>,
    text_terms: Vec<String>,
}

/// Detects privacy policies, terms of service, and similar legal documents
/// from the page URL and text. Same first-match-wins shape as the site
/// classifier; no match means the page is ordinary content.
pub struct DocumentClassifier {
    rules: Vec<CompiledDocumentRule>,
}

impl DocumentClassifier {
    pub fn new(rules: &[DocumentRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| CompiledDocumentRule {
                kind: rule.kind,
                url_terms: lowercase_all(&rule.url_terms),
                text_terms: lowercase_all(&rule.text_terms),
            })
            .collect();
        Self { rules }
    }

    pub fn classify(&self, url: &str, text: &str) -> Option<DocumentKind> {
        let url_haystack = Url::parse(url).ok().map(|u| u.as_str().to_lowercase());
        let text_haystack = text.to_lowercase();

        for rule in &self.rules {
            let url_hit = url_haystack
                .as_deref()
                .map(|u| rule.url_terms.iter().any(|term| u.contains(term)))
                .unwrap_or(false);
            let text_hit = rule.text_terms.iter().any(|term| text_haystack.contains(term));

            if url_hit || text_hit {
                log::debug!("recognized {url} as {}", rule.kind.as_str());
                return Some(rule.kind);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;

    fn classifier() -> DocumentClassifier {
        DocumentClassifier::new(&RuleConfig::default().document_rules)
    }

    #[test]
    fn privacy_policy_detected_from_url() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("https://example.com/privacy-policy", ""),
            Some(DocumentKind::PrivacyPolicy)
        );
    }

    #[test]
    fn terms_detected_from_text() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify(
                "https://example.com/legal",
                "These Terms of Service govern your use of the site",
            ),
            Some(DocumentKind::TermsOfService)
        );
    }

    #[test]
    fn ordinary_page_is_none() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("https://example.com", "welcome to our homepage"),
            None
        );
    }

    #[test]
    fn privacy_outranks_cookie_policy() {
        let classifier = classifier();
        // A privacy policy that also mentions cookies classifies by rule order.
        assert_eq!(
            classifier.classify(
                "https://example.com/about",
                "Our privacy policy explains our cookie notice",
            ),
            Some(DocumentKind::PrivacyPolicy)
        );
    }
}
