use serde::{Deserialize, Serialize};

/// Everything the extraction layer hands us about a single page.
///
/// All fields default when absent so a partial or malformed producer record
/// deserializes to something the engine can still score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSignals {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub forms: Vec<Form>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A single form input. `sensitive` is computed by the form analyzer; any
/// value supplied by the caller is overwritten during assessment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub sensitive: bool,
}
