use url::Url;

use crate::constants::{DEFAULT_CATEGORY, TAG_SEPARATOR};
use crate::error::{PlugdexError, Result};
use crate::model::PluginRecord;

/// Raw contents of the entry form. Tags are kept as the comma-separated text
/// the user typed and only split on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDraft {
    pub name: String,
    pub category: String,
    pub description: String,
    pub tags_text: String,
    pub download_url: String,
}

impl Default for PluginDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            description: String::new(),
            tags_text: String::new(),
            download_url: String::new(),
        }
    }
}

impl PluginDraft {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn tags(&self) -> Vec<String> {
        parse_tags(&self.tags_text)
    }

    /// Builds an id-less record, or the first validation failure.
    pub fn to_record(&self) -> Result<PluginRecord> {
        let record = PluginRecord {
            id: None,
            name: self.name.trim().to_string(),
            category: self.category.clone(),
            description: self.description.clone(),
            tags: self.tags(),
            download_url: self.download_url.trim().to_string(),
        };
        validate_record(&record)?;
        Ok(record)
    }
}

/// Splits on commas, trims, drops empties and exact repeats. First
/// occurrence wins so display order follows input order.
pub fn parse_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in text.split(TAG_SEPARATOR).map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PlugdexError::ValidationFailed(
            "plugin name is required".to_string(),
        ));
    }
    Ok(())
}

/// Absolute http(s) URL with a host.
pub fn validate_download_url(raw: &str) -> Result<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PlugdexError::ValidationFailed(
            "download URL is required".to_string(),
        ));
    }
    let url = Url::parse(trimmed).map_err(|e| {
        PlugdexError::ValidationFailed(format!("download URL is malformed: {}", e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PlugdexError::ValidationFailed(format!(
            "download URL must use http or https, not {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(PlugdexError::ValidationFailed(
            "download URL has no host".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_record(record: &PluginRecord) -> Result<()> {
    validate_name(&record.name)?;
    validate_download_url(&record.download_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PluginDraft {
        PluginDraft {
            name: "  Bass Synth ".into(),
            category: "synth".into(),
            description: String::new(),
            tags_text: String::new(),
            download_url: "http://x".into(),
        }
    }

    #[test]
    fn draft_becomes_an_id_less_record() {
        let record = filled().to_record().unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.name, "Bass Synth");
        assert_eq!(record.category, "synth");
        assert_eq!(record.download_url, "http://x");
        assert!(record.tags.is_empty());
    }

    #[test]
    fn tags_keep_input_order_without_blanks_or_repeats() {
        assert_eq!(
            parse_tags(" reverb, hall,,reverb , plate "),
            vec!["reverb", "hall", "plate"]
        );
        assert!(parse_tags("  , ,").is_empty());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut draft = filled();
        draft.name = "   ".into();
        assert!(matches!(
            draft.to_record(),
            Err(PlugdexError::ValidationFailed(_))
        ));
    }

    #[test]
    fn download_url_must_be_http_with_a_host() {
        assert!(validate_download_url("https://example.com/plugin.zip").is_ok());
        assert!(validate_download_url("").is_err());
        assert!(validate_download_url("not a url").is_err());
        assert!(validate_download_url("ftp://example.com/file").is_err());
        assert!(validate_download_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn reset_restores_the_default_category() {
        let mut draft = filled();
        draft.reset();
        assert_eq!(draft, PluginDraft::default());
        assert_eq!(draft.category, DEFAULT_CATEGORY);
    }
}
