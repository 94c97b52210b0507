//! Report template value object and built-in templates

use serde::{Deserialize, Serialize};

/// A named report skeleton with `[placeholder]` sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub content: String,
}

impl Template {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

const CHEST_XRAY: &str = r#"# Chest X-ray Report Template

## Clinical Information
[clinical_information]

## Technique
[technique]

## Findings
[findings]

## Impression
[impression]"#;

const ABDOMINAL_CT: &str = r#"# Abdominal CT Report Template

## Clinical Information
[clinical_information]

## Technique
[technique]

## Findings
### Liver
[liver_findings]

### Gallbladder and Biliary System
[gallbladder_findings]

### Pancreas
[pancreas_findings]

### Spleen
[spleen_findings]

### Adrenal Glands
[adrenal_findings]

### Kidneys and Ureters
[kidney_findings]

### GI Tract
[gi_findings]

### Vascular
[vascular_findings]

### Other Findings
[other_findings]

## Impression
[impression]"#;

/// Templates seeded into an empty template store
pub fn default_templates() -> Vec<Template> {
    vec![
        Template::new("chest_xray", CHEST_XRAY),
        Template::new("abdominal_ct", ABDOMINAL_CT),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_unique_names() {
        let templates = default_templates();
        assert_eq!(templates.len(), 2);
        assert_ne!(templates[0].name, templates[1].name);
    }

    #[test]
    fn defaults_end_with_impression() {
        for template in default_templates() {
            assert!(template.content.contains("[clinical_information]"));
            assert!(template.content.ends_with("[impression]"));
        }
    }
}
