use crate::classifier::WebsiteType;
use crate::document::DocumentKind;
use crate::indicators::{CategoryId, Severity};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The complete rule set the engine runs on: indicator taxonomy, site and
/// document classification rules, sensitive-field patterns, and the scoring
/// table. One immutable object, loadable from YAML, with built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategorySpec>,
    #[serde(default = "default_site_rules")]
    pub site_rules: Vec<SiteRule>,
    #[serde(default = "default_document_rules")]
    pub document_rules: Vec<DocumentRule>,
    #[serde(default = "default_form_rules")]
    pub form_rules: FormRules,
    #[serde(default = "default_brand_terms")]
    pub brand_terms: Vec<String>,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// One risk category: its identity, per-match weight, severity label,
/// user-facing description, and the phrase list it matches on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    pub id: CategoryId,
    pub label: String,
    pub points: u32,
    pub severity: Severity,
    pub description: String,
    pub phrases: Vec<String>,
}

/// Website-type classification rule. Rules are evaluated in list order and
/// the first whose URL or text terms match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRule {
    pub website_type: WebsiteType,
    #[serde(default)]
    pub url_terms: Vec<String>,
    #[serde(default)]
    pub text_terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRule {
    pub kind: DocumentKind,
    #[serde(default)]
    pub url_terms: Vec<String>,
    #[serde(default)]
    pub text_terms: Vec<String>,
}

/// Sensitive-field detection rules. `patterns` are compiled case-insensitive
/// and matched against field names and types; `types` are exact input-type
/// matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormRules {
    pub patterns: Vec<String>,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub baselines: Baselines,
    #[serde(default)]
    pub document_weights: DocumentWeights,
    #[serde(default = "default_form_cap")]
    pub form_cap: u32,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default = "default_max_score")]
    pub max_score: u32,
}

/// Prior risk expectation by site category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baselines {
    pub social_media: u32,
    pub financial: u32,
    pub ecommerce: u32,
    pub educational: u32,
    pub general: u32,
}

/// Baseline adjustment applied when the page is a recognized legal document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWeights {
    pub privacy_policy: u32,
    pub terms_of_service: u32,
    pub cookie_policy: u32,
    pub data_processing_agreement: u32,
}

/// Lower bounds of the non-Safe recommendation tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    pub moderate: u32,
    pub caution: u32,
    pub dangerous: u32,
}

impl RuleConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rule configuration {}", path.display()))?;
        let config: RuleConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse rule configuration {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("failed to serialize rule configuration")
    }

    /// Reject rule sets the engine could not run deterministically: empty
    /// taxonomies, blank phrases, uncompilable field patterns, or tier
    /// thresholds that are out of order.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.categories.is_empty() {
            bail!("rule configuration has no indicator categories");
        }
        for category in &self.categories {
            if category.phrases.is_empty() {
                bail!("category {} has no phrases", category.id.as_str());
            }
            if category.phrases.iter().any(|p| p.trim().is_empty()) {
                bail!("category {} contains a blank phrase", category.id.as_str());
            }
        }
        for pattern in &self.form_rules.patterns {
            regex::Regex::new(&format!("(?i){pattern}"))
                .with_context(|| format!("invalid sensitive-field pattern '{pattern}'"))?;
        }
        let t = &self.scoring.thresholds;
        if !(t.moderate <= t.caution && t.caution <= t.dangerous) {
            bail!(
                "recommendation thresholds must be ordered: moderate {} <= caution {} <= dangerous {}",
                t.moderate,
                t.caution,
                t.dangerous
            );
        }
        if t.dangerous > self.scoring.max_score {
            bail!("dangerous threshold exceeds the maximum score");
        }
        Ok(())
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            site_rules: default_site_rules(),
            document_rules: default_document_rules(),
            form_rules: default_form_rules(),
            brand_terms: default_brand_terms(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl ScoringConfig {
    pub fn baseline(&self, website_type: WebsiteType) -> u32 {
        match website_type {
            WebsiteType::SocialMedia => self.baselines.social_media,
            WebsiteType::Financial => self.baselines.financial,
            WebsiteType::Ecommerce => self.baselines.ecommerce,
            WebsiteType::Educational => self.baselines.educational,
            WebsiteType::General => self.baselines.general,
        }
    }

    pub fn document_weight(&self, kind: DocumentKind) -> u32 {
        match kind {
            DocumentKind::PrivacyPolicy => self.document_weights.privacy_policy,
            DocumentKind::TermsOfService => self.document_weights.terms_of_service,
            DocumentKind::CookiePolicy => self.document_weights.cookie_policy,
            DocumentKind::DataProcessingAgreement => {
                self.document_weights.data_processing_agreement
            }
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baselines: Baselines::default(),
            document_weights: DocumentWeights::default(),
            form_cap: default_form_cap(),
            thresholds: Thresholds::default(),
            max_score: default_max_score(),
        }
    }
}

impl Default for Baselines {
    fn default() -> Self {
        Self {
            social_media: 4,
            financial: 5,
            ecommerce: 3,
            educational: 2,
            general: 1,
        }
    }
}

impl Default for DocumentWeights {
    fn default() -> Self {
        Self {
            privacy_policy: 2,
            terms_of_service: 1,
            cookie_policy: 1,
            data_processing_agreement: 2,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            moderate: 4,
            caution: 6,
            dangerous: 8,
        }
    }
}

fn default_form_cap() -> u32 {
    3
}

fn default_max_score() -> u32 {
    10
}

fn strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

fn default_categories() -> Vec<CategorySpec> {
    vec![
        CategorySpec {
            id: CategoryId::DataMonetization,
            label: "Data Monetization".to_string(),
            points: 3,
            severity: Severity::High,
            description: "Website may sell or share your personal data with third parties"
                .to_string(),
            phrases: strings(&[
                "sell your data",
                "sell personal information",
                "share with third parties",
                "advertising partners",
                "marketing partners",
                "monetize user data",
            ]),
        },
        CategorySpec {
            id: CategoryId::SensitiveData,
            label: "Sensitive Data Collection".to_string(),
            points: 3,
            severity: Severity::Critical,
            description: "Website asks for highly sensitive personal or financial information"
                .to_string(),
            phrases: strings(&[
                "social security",
                "ssn",
                "date of birth",
                "passport number",
                "bank account",
                "credit card number",
                "medical records",
                "biometric",
            ]),
        },
        CategorySpec {
            id: CategoryId::BehavioralTracking,
            label: "Behavioral Tracking".to_string(),
            points: 1,
            severity: Severity::Medium,
            description: "Website monitors your activity and browsing behavior".to_string(),
            phrases: strings(&[
                "tracking",
                "cookies",
                "analytics",
                "fingerprinting",
                "tracking pixels",
                "cross-site tracking",
                "beacons",
                "surveillance",
                "profiling",
            ]),
        },
        CategorySpec {
            id: CategoryId::LegalRedFlags,
            label: "Legal Red Flags".to_string(),
            points: 2,
            severity: Severity::High,
            description: "Legal terms limit your rights or the website's responsibility"
                .to_string(),
            phrases: strings(&[
                "disclaim all liability",
                "use at your own risk",
                "no warranty",
                "perpetual license",
                "irrevocable",
                "arbitration clause",
                "class action waiver",
                "binding arbitration",
                "right to terminate",
            ]),
        },
        CategorySpec {
            id: CategoryId::DataRetention,
            label: "Data Retention".to_string(),
            points: 1,
            severity: Severity::Medium,
            description: "Website may keep your personal data for a long or unspecified time"
                .to_string(),
            phrases: strings(&[
                "data retention",
                "retain your data",
                "retained indefinitely",
                "stored indefinitely",
                "as long as necessary",
            ]),
        },
        CategorySpec {
            id: CategoryId::ThirdPartyAccess,
            label: "Third-Party Access".to_string(),
            points: 2,
            severity: Severity::High,
            description: "Outside companies may receive access to your personal data".to_string(),
            phrases: strings(&[
                "third party",
                "third parties",
                "third-party",
                "service providers",
                "subprocessors",
            ]),
        },
        CategorySpec {
            id: CategoryId::InternationalTransfer,
            label: "International Transfer".to_string(),
            points: 2,
            severity: Severity::Medium,
            description: "Your data may be moved to servers in other countries".to_string(),
            phrases: strings(&[
                "international transfer",
                "transfer your data",
                "cross-border",
                "outside your country",
                "overseas servers",
            ]),
        },
    ]
}

fn default_site_rules() -> Vec<SiteRule> {
    vec![
        SiteRule {
            website_type: WebsiteType::SocialMedia,
            url_terms: strings(&[
                "instagram", "facebook", "twitter", "tiktok", "snapchat", "linkedin", "youtube",
            ]),
            text_terms: strings(&["follow us", "social network", "like and share"]),
        },
        SiteRule {
            website_type: WebsiteType::Financial,
            url_terms: strings(&[
                "bank",
                "chase",
                "wellsfargo",
                "paypal",
                "stripe",
                "financial",
                "credit",
                "loan",
                "mortgage",
            ]),
            text_terms: strings(&[
                "bank account",
                "online banking",
                "loan",
                "mortgage",
                "credit card",
            ]),
        },
        SiteRule {
            website_type: WebsiteType::Ecommerce,
            url_terms: strings(&[
                "amazon", "ebay", "shop", "store", "cart", "checkout", "walmart", "target",
            ]),
            text_terms: strings(&["add to cart", "checkout", "free shipping", "discount code"]),
        },
        SiteRule {
            website_type: WebsiteType::Educational,
            url_terms: strings(&[
                "coursera",
                "edx",
                "khanacademy",
                "udemy",
                ".edu",
                "course",
                "learn",
                "education",
                "university",
                "academy",
            ]),
            text_terms: strings(&[
                "course",
                "lesson",
                "curriculum",
                "student",
                "university",
                "college",
                "classroom",
            ]),
        },
    ]
}

fn default_document_rules() -> Vec<DocumentRule> {
    vec![
        DocumentRule {
            kind: DocumentKind::PrivacyPolicy,
            url_terms: strings(&["privacy-policy", "privacy_policy", "privacy"]),
            text_terms: strings(&["privacy policy", "data protection"]),
        },
        DocumentRule {
            kind: DocumentKind::TermsOfService,
            url_terms: strings(&["terms-of-service", "user-agreement", "terms", "tos"]),
            text_terms: strings(&["terms of service", "terms and conditions", "user agreement"]),
        },
        DocumentRule {
            kind: DocumentKind::CookiePolicy,
            url_terms: strings(&["cookie-policy", "cookies"]),
            text_terms: strings(&["cookie policy", "cookie notice"]),
        },
        DocumentRule {
            kind: DocumentKind::DataProcessingAgreement,
            url_terms: strings(&["data-processing", "dpa"]),
            text_terms: strings(&["data processing agreement"]),
        },
    ]
}

fn default_form_rules() -> FormRules {
    FormRules {
        patterns: strings(&[
            "password",
            "passwd",
            "ssn",
            "social security",
            "social_security",
            "passport",
            "tax id",
            "credit",
            "debit",
            "card number",
            "cvv",
            "iban",
            "routing",
            "bank",
            "income",
            "salary",
            "email",
            "e-mail",
            "phone",
            "mobile",
            "address",
            "birth",
            "dob",
            "student id",
            "username",
            "login",
            "account number",
        ]),
        types: strings(&["password", "email", "tel"]),
    }
}

fn default_brand_terms() -> Vec<String> {
    strings(&[
        "google certified",
        "microsoft certified",
        "apple certified",
        "official partner",
        "verified by",
        "endorsed by",
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        RuleConfig::default()
            .validate()
            .expect("built-in rules must validate");
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = RuleConfig::default();
        let yaml = config.to_yaml().unwrap();
        let reloaded: RuleConfig = serde_yaml::from_str(&yaml).unwrap();
        reloaded.validate().unwrap();
        assert_eq!(reloaded.categories.len(), config.categories.len());
        assert_eq!(reloaded.scoring.form_cap, 3);
        assert_eq!(reloaded.scoring.thresholds.dangerous, 8);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: RuleConfig = serde_yaml::from_str("scoring:\n  form_cap: 5\n").unwrap();
        assert_eq!(config.scoring.form_cap, 5);
        assert_eq!(config.categories.len(), 7);
        assert_eq!(config.scoring.thresholds.moderate, 4);
    }

    #[test]
    fn empty_phrase_list_is_rejected() {
        let mut config = RuleConfig::default();
        config.categories[0].phrases.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unordered_thresholds_are_rejected() {
        let mut config = RuleConfig::default();
        config.scoring.thresholds = Thresholds {
            moderate: 6,
            caution: 4,
            dangerous: 8,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_field_pattern_is_rejected() {
        let mut config = RuleConfig::default();
        config.form_rules.patterns.push("(unclosed".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn baseline_lookup_matches_table() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.baseline(WebsiteType::Financial), 5);
        assert_eq!(scoring.baseline(WebsiteType::SocialMedia), 4);
        assert_eq!(scoring.baseline(WebsiteType::Ecommerce), 3);
        assert_eq!(scoring.baseline(WebsiteType::Educational), 2);
        assert_eq!(scoring.baseline(WebsiteType::General), 1);
    }
}
