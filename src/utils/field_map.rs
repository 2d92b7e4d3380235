//! Header normalization for bulk import. Spreadsheet exports arrive with
//! inconsistent column labels ("Father Name", "postion", "Job"); this maps
//! them onto canonical field names before rows reach the insert path.

use std::collections::HashMap;

use serde_json::Value;

/// Misspellings and synonyms observed in real uploads.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("position", &["postion", "job", "job_position"]),
    ("phone_number", &["phone", "mobile"]),
    ("serial_number", &["serial", "sn"]),
];

pub struct FieldMap {
    canonical: HashMap<&'static str, &'static str>,
}

impl FieldMap {
    pub fn with_defaults() -> Self {
        let mut canonical = HashMap::new();
        for (target, aliases) in SYNONYMS {
            for alias in *aliases {
                canonical.insert(*alias, *target);
            }
        }
        Self { canonical }
    }

    /// Lowercase, trim, spaces to underscores, then resolve synonyms.
    pub fn canonical_key(&self, header: &str) -> String {
        let normalized = header.trim().to_lowercase().replace(' ', "_");
        match self.canonical.get(normalized.as_str()) {
            Some(target) => (*target).to_string(),
            None => normalized,
        }
    }

    /// Flattens one uploaded row into canonical-key -> trimmed string.
    /// Non-string scalars are stringified; nested values are dropped.
    pub fn normalize_row(&self, row: &Value) -> HashMap<String, String> {
        let mut out = HashMap::new();
        let Some(obj) = row.as_object() else {
            return out;
        };
        for (header, value) in obj {
            let text = match value {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            if !text.is_empty() {
                out.insert(self.canonical_key(header), text);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn headers_are_normalized_and_synonyms_resolved() {
        let map = FieldMap::with_defaults();
        assert_eq!(map.canonical_key(" Father Name "), "father_name");
        assert_eq!(map.canonical_key("Postion"), "position");
        assert_eq!(map.canonical_key("JOB"), "position");
        assert_eq!(map.canonical_key("SN"), "serial_number");
        assert_eq!(map.canonical_key("project"), "project");
    }

    #[test]
    fn rows_are_flattened_to_trimmed_strings() {
        let map = FieldMap::with_defaults();
        let row = json!({
            "Name": "  Abebe ",
            "Phone": 251911123456u64,
            "Job": "Engineer",
            "empty": "   ",
            "nested": {"ignored": true}
        });

        let fields = map.normalize_row(&row);

        assert_eq!(fields.get("name").map(String::as_str), Some("Abebe"));
        assert_eq!(
            fields.get("phone_number").map(String::as_str),
            Some("251911123456")
        );
        assert_eq!(fields.get("position").map(String::as_str), Some("Engineer"));
        assert!(!fields.contains_key("empty"));
        assert!(!fields.contains_key("nested"));
    }
}
