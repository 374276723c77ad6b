pub mod assessment;
pub mod brand;
pub mod classifier;
pub mod config;
pub mod document;
pub mod forms;
pub mod indicators;
pub mod signals;

pub use assessment::{AnalysisResult, AssessmentEngine, Recommendation};
pub use classifier::WebsiteType;
pub use config::RuleConfig;
pub use document::DocumentKind;
pub use indicators::{CategoryId, Indicator, Severity};
pub use signals::{Field, Form, PageSignals};
