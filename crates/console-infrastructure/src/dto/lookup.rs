//! Lookup list entries.

use serde::Deserialize;

/// Lookup entries come as plain strings or as `{ "name": .. }` objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LookupItemDto {
    Text(String),
    Named {
        #[serde(alias = "label", alias = "value")]
        name: String,
    },
}

impl From<LookupItemDto> for String {
    fn from(item: LookupItemDto) -> Self {
        match item {
            LookupItemDto::Text(s) => s,
            LookupItemDto::Named { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_lookup_entries() {
        let items: Vec<LookupItemDto> =
            serde_json::from_str(r#"["India", {"name": "Japan", "code": "JP"}, {"label": "Chile"}]"#)
                .unwrap();
        let names: Vec<String> = items.into_iter().map(Into::into).collect();
        assert_eq!(names, vec!["India", "Japan", "Chile"]);
    }
}
