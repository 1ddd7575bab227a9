use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

/// The layout variant the renderer draws a resume with.
///
/// Resolved exactly once from a free-form tag (navigation parameter, stored
/// record, or admin template metadata). Anything unrecognised becomes
/// `Unknown`, which renders through the generic fallback layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateType {
    #[default]
    Modern,
    Minimalist,
    Classic,
    Creative,
    Executive,
    Unknown,
}

impl TemplateType {
    /// The five built-in variants an admin template may declare.
    pub const BUILT_IN: [TemplateType; 5] = [
        TemplateType::Modern,
        TemplateType::Minimalist,
        TemplateType::Classic,
        TemplateType::Creative,
        TemplateType::Executive,
    ];

    pub fn resolve(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "modern" => TemplateType::Modern,
            "minimalist" => TemplateType::Minimalist,
            "classic" => TemplateType::Classic,
            "creative" => TemplateType::Creative,
            "executive" => TemplateType::Executive,
            _ => TemplateType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Modern => "modern",
            TemplateType::Minimalist => "minimalist",
            TemplateType::Classic => "classic",
            TemplateType::Creative => "creative",
            TemplateType::Executive => "executive",
            TemplateType::Unknown => "unknown",
        }
    }

    pub fn is_built_in(&self) -> bool {
        !matches!(self, TemplateType::Unknown)
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TemplateType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TemplateType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.map(|t| TemplateType::resolve(&t)).unwrap_or_default())
    }
}

/// A row of the `templates` table.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub template_type: String,
    pub s3_key: String,
    pub file_type: String,
    pub uploaded_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Catalogue listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
}

/// What the editor needs to apply an admin template: the layout variant and
/// where to fetch its background image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub preview_image: String,
}

impl TemplateRow {
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            template_type: TemplateType::resolve(&self.template_type),
        }
    }

    pub fn meta(&self) -> TemplateMeta {
        TemplateMeta {
            id: self.id,
            name: self.name.clone(),
            template_type: TemplateType::resolve(&self.template_type),
            preview_image: preview_image_url(self.id),
        }
    }
}

pub fn preview_image_url(id: Uuid) -> String {
    format!("/api/v1/templates/{id}/image")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_tags_case_insensitive() {
        assert_eq!(TemplateType::resolve("Classic"), TemplateType::Classic);
        assert_eq!(TemplateType::resolve(" executive "), TemplateType::Executive);
        assert_eq!(TemplateType::resolve("minimalist"), TemplateType::Minimalist);
    }

    #[test]
    fn test_resolve_unknown_tag_is_fallback() {
        assert_eq!(TemplateType::resolve("bespoke"), TemplateType::Unknown);
        assert_eq!(TemplateType::resolve("template1"), TemplateType::Unknown);
        assert_eq!(TemplateType::resolve(""), TemplateType::Unknown);
    }

    #[test]
    fn test_deserialize_null_defaults_to_modern() {
        let t: TemplateType = serde_json::from_str("null").unwrap();
        assert_eq!(t, TemplateType::Modern);
        let t: TemplateType = serde_json::from_str("\"creative\"").unwrap();
        assert_eq!(t, TemplateType::Creative);
    }

    #[test]
    fn test_built_in_excludes_unknown() {
        assert!(TemplateType::BUILT_IN.iter().all(|t| t.is_built_in()));
        assert!(!TemplateType::Unknown.is_built_in());
    }
}
