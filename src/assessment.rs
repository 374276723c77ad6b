use crate::brand::BrandChecker;
use crate::classifier::{SiteClassifier, WebsiteType};
use crate::config::{RuleConfig, ScoringConfig};
use crate::document::{DocumentClassifier, DocumentKind};
use crate::forms::FormAnalyzer;
use crate::indicators::IndicatorMatcher;
use crate::signals::{Form, PageSignals};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

/// Recommendation tier derived from the clamped risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Safe,
    Moderate,
    Caution,
    Dangerous,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Safe => "Safe",
            Recommendation::Moderate => "Moderate",
            Recommendation::Caution => "Caution",
            Recommendation::Dangerous => "Dangerous",
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Recommendation::Safe => "Good privacy practices",
            Recommendation::Moderate => "Some privacy concerns",
            Recommendation::Caution => "Significant privacy concerns",
            Recommendation::Dangerous => "Critical privacy concerns detected",
        }
    }

    fn student_summary(&self) -> &'static str {
        match self {
            Recommendation::Safe => {
                "This site looks safe, but only share information you are comfortable with."
            }
            Recommendation::Moderate => {
                "This site has some privacy concerns. Think twice before entering personal details."
            }
            Recommendation::Caution => {
                "Be careful. This site shows several signs of risky data practices."
            }
            Recommendation::Dangerous => {
                "This site looks dangerous. Avoid entering personal information here."
            }
        }
    }
}

/// The complete assessment for one page. Consumers render this verbatim;
/// the engine is the single source of truth for the score and tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub risk_score: u32,
    pub recommendation: Recommendation,
    pub recommendation_reason: String,
    pub privacy_threats: Vec<String>,
    pub detailed_metrics: BTreeMap<String, u32>,
    pub detailed_analysis: BTreeMap<String, String>,
    #[serde(rename = "websiteType")]
    pub website_type: WebsiteType,
    pub forms: Vec<Form>,
    pub summary: String,
    pub student_summary: String,
    pub brand_impersonation: Vec<String>,
    pub document_type: Option<DocumentKind>,
}

/// Stateless risk assessment engine. Construction compiles the rule set;
/// `assess` is pure over its input and safe to call from any number of
/// threads through a shared reference.
pub struct AssessmentEngine {
    classifier: SiteClassifier,
    documents: DocumentClassifier,
    matcher: IndicatorMatcher,
    forms: FormAnalyzer,
    brand: BrandChecker,
    scoring: ScoringConfig,
}

impl AssessmentEngine {
    /// Engine with the built-in rule set.
    pub fn new() -> Self {
        Self::with_config(RuleConfig::default()).expect("built-in rule set is valid")
    }

    pub fn with_config(config: RuleConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: SiteClassifier::new(&config.site_rules),
            documents: DocumentClassifier::new(&config.document_rules),
            matcher: IndicatorMatcher::new(&config.categories),
            forms: FormAnalyzer::new(&config.form_rules)?,
            brand: BrandChecker::new(&config.brand_terms),
            scoring: config.scoring,
        })
    }

    /// Assess one page. Never panics to the caller: any internal fault is
    /// caught here and degraded to the neutral result so a consuming UI
    /// always has something structurally valid to render.
    pub fn assess(&self, signals: &PageSignals) -> AnalysisResult {
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(signals))) {
            Ok(result) => result,
            Err(_) => {
                log::error!(
                    "assessment failed internally for {}; returning neutral result",
                    signals.url
                );
                Self::neutral_result()
            }
        }
    }

    fn run(&self, signals: &PageSignals) -> AnalysisResult {
        let website_type = self.classifier.classify(&signals.url, &signals.text);
        let document_type = self.documents.classify(&signals.url, &signals.text);
        let indicators = self.matcher.scan(&signals.text);
        let form_analysis = self.forms.analyze(&signals.forms);
        let brand_impersonation = self.brand.scan(&signals.text);

        let mut score = self.scoring.baseline(website_type);
        if let Some(kind) = document_type {
            score += self.scoring.document_weight(kind);
        }

        let mut detailed_metrics = BTreeMap::new();
        let mut detailed_analysis = BTreeMap::new();
        for category in self.matcher.categories() {
            let count = indicators
                .iter()
                .filter(|i| i.category_id == category.id)
                .count() as u32;
            score += count * category.points;
            detailed_metrics.insert(category.id.as_str().to_string(), count);
            let label = if count == 0 {
                "Low"
            } else {
                category.severity.label()
            };
            detailed_analysis.insert(category.id.as_str().to_string(), label.to_string());
        }

        // One threat line per indicator, in match order.
        let privacy_threats: Vec<String> = indicators
            .iter()
            .map(|i| format!("{}: {}", i.category, i.description))
            .collect();

        score += form_analysis
            .sensitive_field_count
            .min(self.scoring.form_cap);
        detailed_metrics.insert("formRisks".to_string(), form_analysis.sensitive_field_count);

        // Hard cap, not normalization: anything above the maximum is truncated.
        let risk_score = score.min(self.scoring.max_score);

        let recommendation = self.tier(risk_score);
        let summary = format!(
            "Detected {} risk indicators and {} sensitive form fields across {} forms",
            indicators.len(),
            form_analysis.sensitive_field_count,
            form_analysis.forms.len()
        );

        log::debug!(
            "{}: type={} score={} recommendation={}",
            signals.url,
            website_type.as_str(),
            risk_score,
            recommendation.as_str()
        );

        AnalysisResult {
            risk_score,
            recommendation,
            recommendation_reason: recommendation.reason().to_string(),
            privacy_threats,
            detailed_metrics,
            detailed_analysis,
            website_type,
            forms: form_analysis.forms,
            summary,
            student_summary: recommendation.student_summary().to_string(),
            brand_impersonation,
            document_type,
        }
    }

    fn tier(&self, score: u32) -> Recommendation {
        let t = &self.scoring.thresholds;
        match score {
            s if s >= t.dangerous => Recommendation::Dangerous,
            s if s >= t.caution => Recommendation::Caution,
            s if s >= t.moderate => Recommendation::Moderate,
            _ => Recommendation::Safe,
        }
    }

    /// Fixed fallback returned when the pipeline faults internally.
    pub fn neutral_result() -> AnalysisResult {
        AnalysisResult {
            risk_score: 0,
            recommendation: Recommendation::Safe,
            recommendation_reason: "Analysis failed".to_string(),
            privacy_threats: Vec::new(),
            detailed_metrics: BTreeMap::new(),
            detailed_analysis: BTreeMap::new(),
            website_type: WebsiteType::General,
            forms: Vec::new(),
            summary: "Analysis could not be completed".to_string(),
            student_summary: "We could not analyze this page.".to_string(),
            brand_impersonation: Vec::new(),
            document_type: None,
        }
    }
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::new()
    }
}
