use serde::{Deserialize, Serialize};

/// Identifier of an entry inside a resume list. Assigned once at creation.
pub type EntryId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: EntryId,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    /// Bullet lines in display order. May contain blank in-progress lines.
    #[serde(default)]
    pub description: Vec<String>,
}

impl ExperienceEntry {
    /// A freshly added entry: empty fields and one empty bullet ready for input.
    pub fn blank(id: EntryId) -> Self {
        Self {
            id,
            company: String::new(),
            position: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            description: vec![String::new()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: EntryId,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub location: String,
}

impl EducationEntry {
    pub fn blank(id: EntryId) -> Self {
        Self {
            id,
            institution: String::new(),
            degree: String::new(),
            field_of_study: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            location: String::new(),
        }
    }
}

/// A skill badge. An empty name is a valid in-progress state and is never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
}

/// The full resume aggregate. Owned by exactly one user session at a time.
///
/// Serialized with camelCase keys; list order is display order and survives
/// a save/load round trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub experiences: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Field patches
// ────────────────────────────────────────────────────────────────────────────

/// A single-field update to `PersonalInfo`, addressed by field name on the wire:
/// `{"field": "jobTitle", "value": "Engineer"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum PersonalInfoPatch {
    FirstName(String),
    LastName(String),
    JobTitle(String),
    Address(String),
    Phone(String),
    Email(String),
    Summary(String),
}

/// A single-field update to an `ExperienceEntry`. `Description` replaces every bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ExperiencePatch {
    Company(String),
    Position(String),
    Location(String),
    StartDate(String),
    EndDate(String),
    Description(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum EducationPatch {
    Institution(String),
    Degree(String),
    FieldOfStudy(String),
    StartDate(String),
    EndDate(String),
    Location(String),
}
