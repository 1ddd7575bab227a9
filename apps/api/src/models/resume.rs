use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::template::TemplateType;

pub const DEFAULT_ACCENT_COLOR: &str = "#2563EB";

/// Treats an explicit JSON `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub job_title: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "nullable")]
    pub phone: String,
    #[serde(deserialize_with = "nullable")]
    pub address: String,
    #[serde(deserialize_with = "nullable")]
    pub linkedin: String,
    #[serde(deserialize_with = "nullable")]
    pub github: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "nullable")]
    pub institution: String,
    #[serde(deserialize_with = "nullable")]
    pub degree: String,
    #[serde(deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "nullable")]
    pub company: String,
    #[serde(deserialize_with = "nullable")]
    pub role: String,
    #[serde(deserialize_with = "nullable")]
    pub start_date: String,
    #[serde(deserialize_with = "nullable")]
    pub end_date: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub link: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
}

/// The structured document a user edits.
///
/// Plain data: the binders in `crate::editor` own every invariant about how
/// it may be mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "nullable")]
    pub personal_details: PersonalDetails,
    #[serde(deserialize_with = "nullable")]
    pub summary: String,
    #[serde(deserialize_with = "nullable")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "nullable")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "nullable")]
    pub projects: Vec<ProjectEntry>,
    #[serde(deserialize_with = "nullable")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub languages: Vec<String>,
    pub template_id: Option<Uuid>,
    pub template_type: TemplateType,
    #[serde(deserialize_with = "nullable")]
    pub accent_color: String,
}

impl Default for ResumeRecord {
    fn default() -> Self {
        ResumeRecord {
            personal_details: PersonalDetails::default(),
            summary: String::new(),
            education: Vec::new(),
            experience: Vec::new(),
            projects: Vec::new(),
            skills: Vec::new(),
            certifications: Vec::new(),
            languages: Vec::new(),
            template_id: None,
            template_type: TemplateType::Modern,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

impl ResumeRecord {
    /// An empty record for a new editing session, laid out with the variant and
    /// accent picked on the template gallery.
    pub fn blank(template_type: TemplateType, accent_color: &str) -> Self {
        ResumeRecord {
            template_type,
            accent_color: accent_color.to_string(),
            ..ResumeRecord::default()
        }
    }
}

/// A row of the `resumes` table. The record itself is one JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data: Json<ResumeRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted resume as returned to API callers: the record's fields flattened
/// next to its identity and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub record: ResumeRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for StoredResume {
    fn from(row: ResumeRow) -> Self {
        StoredResume {
            id: row.id,
            user_id: row.user_id,
            record: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
