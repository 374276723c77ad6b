use crate::classifier::lowercase_all;

/// Scans for certification and endorsement claims ("google certified",
/// "official partner") that EdTech sites use to borrow trust. Matches are
/// reported for the reader to verify; they carry no score weight because the
/// score must stay traceable to the indicator taxonomy.
pub struct BrandChecker {
    terms: Vec<String>,
}

impl BrandChecker {
    pub fn new(terms: &[String]) -> Self {
        Self {
            terms: lowercase_all(terms),
        }
    }

    pub fn scan(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let haystack = text.to_lowercase();
        self.terms
            .iter()
            .filter(|term| haystack.contains(term.as_str()))
            .map(|term| format!("Unverified claim: '{term}'"))
            .collect()
    }
}
