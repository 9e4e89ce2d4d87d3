//! Read-only projection of a `ResumeDocument` into what the preview shows.
//!
//! `project` is pure: the same document always yields the same
//! `VisualDocument`, and sections with nothing to show are omitted entirely.

pub mod handlers;

use serde::Serialize;

use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeDocument};

/// Mount identifier of the preview root. The export pipeline captures this element.
pub const PREVIEW_ROOT_ID: &str = "resume-preview";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualDocument {
    pub root_id: String,
    pub header: Header,
    pub summary: Option<String>,
    pub experience: Option<Vec<ExperienceBlock>>,
    pub education: Option<Vec<EducationBlock>>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub name: String,
    pub job_title: String,
    pub address: Option<String>,
    /// Phone then email, each only when non-empty.
    pub contacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceBlock {
    pub position: String,
    pub dates: String,
    pub company: String,
    pub location: Option<String>,
    pub bullets: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationBlock {
    pub degree_line: String,
    pub dates: String,
    pub institution: String,
    pub location: Option<String>,
}

pub fn project(doc: &ResumeDocument) -> VisualDocument {
    let info = &doc.personal_info;

    let header = Header {
        name: format!("{} {}", info.first_name, info.last_name)
            .trim()
            .to_string(),
        job_title: info.job_title.clone(),
        address: non_empty(&info.address),
        contacts: [&info.phone, &info.email]
            .into_iter()
            .filter_map(|s| non_empty(s))
            .collect(),
    };

    let experience = (!doc.experiences.is_empty())
        .then(|| doc.experiences.iter().map(project_experience).collect());

    let education = (!doc.education.is_empty())
        .then(|| doc.education.iter().map(project_education).collect());

    let skill_names: Vec<String> = doc
        .skills
        .iter()
        .filter(|s| !is_blank(&s.name))
        .map(|s| s.name.clone())
        .collect();
    let skills = (!skill_names.is_empty()).then_some(skill_names);

    VisualDocument {
        root_id: PREVIEW_ROOT_ID.to_string(),
        header,
        summary: non_empty(&info.summary),
        experience,
        education,
        skills,
    }
}

fn project_experience(exp: &ExperienceEntry) -> ExperienceBlock {
    // A list whose first line is still empty is treated as not started.
    let bullets = match exp.description.first() {
        Some(first) if !first.is_empty() => {
            let lines: Vec<String> = exp
                .description
                .iter()
                .filter(|b| !is_blank(b))
                .cloned()
                .collect();
            (!lines.is_empty()).then_some(lines)
        }
        _ => None,
    };

    ExperienceBlock {
        position: exp.position.clone(),
        dates: date_range(&exp.start_date, &exp.end_date),
        company: exp.company.clone(),
        location: non_empty(&exp.location),
        bullets,
    }
}

fn project_education(edu: &EducationEntry) -> EducationBlock {
    let degree_line = if edu.field_of_study.is_empty() {
        edu.degree.clone()
    } else {
        format!("{} in {}", edu.degree, edu.field_of_study)
            .trim()
            .to_string()
    };

    EducationBlock {
        degree_line,
        dates: date_range(&edu.start_date, &edu.end_date),
        institution: edu.institution.clone(),
        location: non_empty(&edu.location),
    }
}

/// `"start - end"`, or just `"start"` while the end date is empty (ongoing).
fn date_range(start: &str, end: &str) -> String {
    if end.is_empty() {
        start.to_string()
    } else {
        format!("{start} - {end}").trim().to_string()
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
