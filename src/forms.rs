use crate::config::FormRules;
use crate::signals::Form;
use anyhow::Context;
use regex::Regex;

/// Result of scanning a page's forms: the same forms with `sensitive` flags
/// filled in, plus the total count of sensitive fields.
#[derive(Debug, Clone)]
pub struct FormAnalysis {
    pub forms: Vec<Form>,
    pub sensitive_field_count: u32,
}

/// Flags form fields that likely collect personal, financial, or credential
/// data. Patterns are compiled once, case-insensitive, and matched against
/// both the field name and the field type; a short list of input types
/// (password, email, tel) is sensitive regardless of name.
pub struct FormAnalyzer {
    patterns: Vec<Regex>,
    types: Vec<String>,
}

impl FormAnalyzer {
    pub fn new(rules: &FormRules) -> anyhow::Result<Self> {
        let mut patterns = Vec::with_capacity(rules.patterns.len());
        for pattern in &rules.patterns {
            let compiled = Regex::new(&format!("(?i){pattern}"))
                .with_context(|| format!("invalid sensitive-field pattern '{pattern}'"))?;
            patterns.push(compiled);
        }
        Ok(Self {
            patterns,
            types: rules.types.iter().map(|t| t.to_lowercase()).collect(),
        })
    }

    pub fn analyze(&self, forms: &[Form]) -> FormAnalysis {
        let mut annotated = forms.to_vec();
        let mut sensitive_field_count = 0u32;

        for form in &mut annotated {
            for field in &mut form.fields {
                field.sensitive = self.is_sensitive(&field.name, &field.field_type);
                if field.sensitive {
                    sensitive_field_count += 1;
                }
            }
        }

        FormAnalysis {
            forms: annotated,
            sensitive_field_count,
        }
    }

    fn is_sensitive(&self, name: &str, field_type: &str) -> bool {
        if self.types.iter().any(|t| t == &field_type.to_lowercase()) {
            return true;
        }
        self.patterns
            .iter()
            .any(|p| p.is_match(name) || p.is_match(field_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::signals::Field;

    fn analyzer() -> FormAnalyzer {
        FormAnalyzer::new(&RuleConfig::default().form_rules).unwrap()
    }

    fn field(name: &str, field_type: &str) -> Field {
        Field {
            name: name.to_string(),
            field_type: field_type.to_string(),
            sensitive: false,
        }
    }

    fn form(fields: Vec<Field>) -> Form {
        Form {
            action: "/submit".to_string(),
            method: "post".to_string(),
            fields,
        }
    }

    #[test]
    fn counts_sensitive_fields_by_name() {
        let forms = vec![form(vec![
            field("password", "text"),
            field("email", "text"),
            field("comment", "text"),
        ])];
        let analysis = analyzer().analyze(&forms);
        assert_eq!(analysis.sensitive_field_count, 2);
        assert!(analysis.forms[0].fields[0].sensitive);
        assert!(analysis.forms[0].fields[1].sensitive);
        assert!(!analysis.forms[0].fields[2].sensitive);
    }

    #[test]
    fn sensitive_types_match_regardless_of_name() {
        let forms = vec![form(vec![field("contact", "tel"), field("q", "password")])];
        assert_eq!(analyzer().analyze(&forms).sensitive_field_count, 2);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let forms = vec![form(vec![field("Email-Address", "TEXT")])];
        assert_eq!(analyzer().analyze(&forms).sensitive_field_count, 1);
    }

    #[test]
    fn empty_names_and_types_are_not_sensitive() {
        let forms = vec![form(vec![field("", "")])];
        let analysis = analyzer().analyze(&forms);
        assert_eq!(analysis.sensitive_field_count, 0);
        assert!(!analysis.forms[0].fields[0].sensitive);
    }

    #[test]
    fn zero_field_forms_are_tolerated() {
        let forms = vec![form(Vec::new()), form(vec![field("ssn", "text")])];
        assert_eq!(analyzer().analyze(&forms).sensitive_field_count, 1);
    }

    #[test]
    fn caller_supplied_flags_are_overwritten() {
        let mut f = field("comment", "text");
        f.sensitive = true;
        let analysis = analyzer().analyze(&[form(vec![f])]);
        assert!(!analysis.forms[0].fields[0].sensitive);
        assert_eq!(analysis.sensitive_field_count, 0);
    }

    #[test]
    fn counts_span_multiple_forms() {
        let forms = vec![
            form(vec![field("username", "text")]),
            form(vec![field("credit_card", "text"), field("notes", "textarea")]),
        ];
        assert_eq!(analyzer().analyze(&forms).sensitive_field_count, 2);
    }
}
