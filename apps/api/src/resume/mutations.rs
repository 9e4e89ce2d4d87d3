//! Pure update operations over `ResumeDocument`.
//!
//! Every function takes the current snapshot and returns a new one with exactly
//! one logical change. Unknown ids and out-of-range bullet indices are absorbed
//! as no-ops; nothing here can fail.

use crate::models::resume::{
    EducationEntry, EducationPatch, EntryId, ExperienceEntry, ExperiencePatch, PersonalInfo,
    PersonalInfoPatch, ResumeDocument, SkillEntry,
};

// ────────────────────────────────────────────────────────────────────────────
// Personal info
// ────────────────────────────────────────────────────────────────────────────

pub fn update_personal_info(doc: &ResumeDocument, patch: PersonalInfoPatch) -> ResumeDocument {
    let mut info: PersonalInfo = doc.personal_info.clone();
    match patch {
        PersonalInfoPatch::FirstName(v) => info.first_name = v,
        PersonalInfoPatch::LastName(v) => info.last_name = v,
        PersonalInfoPatch::JobTitle(v) => info.job_title = v,
        PersonalInfoPatch::Address(v) => info.address = v,
        PersonalInfoPatch::Phone(v) => info.phone = v,
        PersonalInfoPatch::Email(v) => info.email = v,
        PersonalInfoPatch::Summary(v) => info.summary = v,
    }
    ResumeDocument {
        personal_info: info,
        ..doc.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Prepends a blank entry, so the newest entry is shown first.
pub fn add_experience(doc: &ResumeDocument, id: EntryId) -> ResumeDocument {
    let mut experiences = Vec::with_capacity(doc.experiences.len() + 1);
    experiences.push(ExperienceEntry::blank(id));
    experiences.extend(doc.experiences.iter().cloned());
    ResumeDocument {
        experiences,
        ..doc.clone()
    }
}

pub fn update_experience(doc: &ResumeDocument, id: &str, patch: ExperiencePatch) -> ResumeDocument {
    map_experience(doc, id, |exp| match patch {
        ExperiencePatch::Company(v) => exp.company = v,
        ExperiencePatch::Position(v) => exp.position = v,
        ExperiencePatch::Location(v) => exp.location = v,
        ExperiencePatch::StartDate(v) => exp.start_date = v,
        ExperiencePatch::EndDate(v) => exp.end_date = v,
        ExperiencePatch::Description(v) => exp.description = v,
    })
}

pub fn remove_experience(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    ResumeDocument {
        experiences: doc
            .experiences
            .iter()
            .filter(|exp| exp.id != id)
            .cloned()
            .collect(),
        ..doc.clone()
    }
}

/// Appends an empty bullet to the matching entry.
pub fn add_experience_bullet(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    map_experience(doc, id, |exp| exp.description.push(String::new()))
}

pub fn update_experience_bullet(
    doc: &ResumeDocument,
    id: &str,
    index: usize,
    value: String,
) -> ResumeDocument {
    map_experience(doc, id, |exp| {
        if let Some(bullet) = exp.description.get_mut(index) {
            *bullet = value;
        }
    })
}

pub fn remove_experience_bullet(doc: &ResumeDocument, id: &str, index: usize) -> ResumeDocument {
    map_experience(doc, id, |exp| {
        if index < exp.description.len() {
            exp.description.remove(index);
        }
    })
}

fn map_experience(
    doc: &ResumeDocument,
    id: &str,
    edit: impl FnOnce(&mut ExperienceEntry),
) -> ResumeDocument {
    let mut experiences = doc.experiences.clone();
    if let Some(exp) = experiences.iter_mut().find(|exp| exp.id == id) {
        edit(exp);
    }
    ResumeDocument {
        experiences,
        ..doc.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// Prepends a blank entry, mirroring `add_experience`.
pub fn add_education(doc: &ResumeDocument, id: EntryId) -> ResumeDocument {
    let mut education = Vec::with_capacity(doc.education.len() + 1);
    education.push(EducationEntry::blank(id));
    education.extend(doc.education.iter().cloned());
    ResumeDocument {
        education,
        ..doc.clone()
    }
}

pub fn update_education(doc: &ResumeDocument, id: &str, patch: EducationPatch) -> ResumeDocument {
    let mut education = doc.education.clone();
    if let Some(edu) = education.iter_mut().find(|edu| edu.id == id) {
        match patch {
            EducationPatch::Institution(v) => edu.institution = v,
            EducationPatch::Degree(v) => edu.degree = v,
            EducationPatch::FieldOfStudy(v) => edu.field_of_study = v,
            EducationPatch::StartDate(v) => edu.start_date = v,
            EducationPatch::EndDate(v) => edu.end_date = v,
            EducationPatch::Location(v) => edu.location = v,
        }
    }
    ResumeDocument {
        education,
        ..doc.clone()
    }
}

pub fn remove_education(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    ResumeDocument {
        education: doc
            .education
            .iter()
            .filter(|edu| edu.id != id)
            .cloned()
            .collect(),
        ..doc.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Appends an empty-named skill (skills keep insertion order, unlike entries).
pub fn add_skill(doc: &ResumeDocument, id: EntryId) -> ResumeDocument {
    let mut skills = doc.skills.clone();
    skills.push(SkillEntry {
        id,
        name: String::new(),
    });
    ResumeDocument {
        skills,
        ..doc.clone()
    }
}

pub fn update_skill(doc: &ResumeDocument, id: &str, value: String) -> ResumeDocument {
    let mut skills = doc.skills.clone();
    if let Some(skill) = skills.iter_mut().find(|skill| skill.id == id) {
        skill.name = value;
    }
    ResumeDocument {
        skills,
        ..doc.clone()
    }
}

pub fn remove_skill(doc: &ResumeDocument, id: &str) -> ResumeDocument {
    ResumeDocument {
        skills: doc
            .skills
            .iter()
            .filter(|skill| skill.id != id)
            .cloned()
            .collect(),
        ..doc.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> ResumeDocument {
        let doc = ResumeDocument::default();
        let doc = update_personal_info(&doc, PersonalInfoPatch::FirstName("Grace".into()));
        let doc = update_personal_info(&doc, PersonalInfoPatch::LastName("Hopper".into()));
        let doc = add_experience(&doc, "100".into());
        let doc = update_experience(&doc, "100", ExperiencePatch::Company("Navy".into()));
        let doc = add_education(&doc, "200".into());
        let doc = add_skill(&doc, "300".into());
        update_skill(&doc, "300", "COBOL".into())
    }

    #[test]
    fn test_update_personal_info_changes_only_named_field() {
        let doc = sample_doc();
        let next = update_personal_info(&doc, PersonalInfoPatch::Phone("555-0100".into()));

        assert_eq!(next.personal_info.phone, "555-0100");
        assert_eq!(next.personal_info.first_name, doc.personal_info.first_name);
        assert_eq!(next.personal_info.last_name, doc.personal_info.last_name);
        assert_eq!(next.experiences, doc.experiences);
        assert_eq!(next.education, doc.education);
        assert_eq!(next.skills, doc.skills);
    }

    #[test]
    fn test_update_personal_info_reapplying_previous_value_restores() {
        let doc = sample_doc();
        let changed = update_personal_info(&doc, PersonalInfoPatch::FirstName("Amazing".into()));
        let restored = update_personal_info(&changed, PersonalInfoPatch::FirstName("Grace".into()));
        assert_eq!(restored, doc);

        let again = update_personal_info(&restored, PersonalInfoPatch::FirstName("Grace".into()));
        assert_eq!(again, restored);
    }

    #[test]
    fn test_update_personal_info_accepts_empty_value() {
        let doc = sample_doc();
        let next = update_personal_info(&doc, PersonalInfoPatch::FirstName(String::new()));
        assert_eq!(next.personal_info.first_name, "");
    }

    #[test]
    fn test_add_experience_prepends_blank_entry() {
        let doc = sample_doc();
        let next = add_experience(&doc, "101".into());

        assert_eq!(next.experiences.len(), 2);
        assert_eq!(next.experiences[0].id, "101");
        assert_eq!(next.experiences[0].description, vec![String::new()]);
        assert_eq!(next.experiences[1].id, "100");
    }

    #[test]
    fn test_add_then_remove_experience_is_identity() {
        let doc = sample_doc();
        let added = add_experience(&doc, "999".into());
        let removed = remove_experience(&added, "999");
        assert_eq!(removed, doc);
    }

    #[test]
    fn test_add_then_remove_education_is_identity() {
        let doc = sample_doc();
        let removed = remove_education(&add_education(&doc, "999".into()), "999");
        assert_eq!(removed, doc);
    }

    #[test]
    fn test_update_experience_unknown_id_is_noop() {
        let doc = sample_doc();
        let next = update_experience(&doc, "nope", ExperiencePatch::Position("CEO".into()));
        assert_eq!(next, doc);
    }

    #[test]
    fn test_update_experience_description_replaces_bullets() {
        let doc = sample_doc();
        let next = update_experience(
            &doc,
            "100",
            ExperiencePatch::Description(vec!["one".into(), "two".into()]),
        );
        assert_eq!(next.experiences[0].description, vec!["one", "two"]);
    }

    #[test]
    fn test_remove_experience_unknown_id_is_noop() {
        let doc = sample_doc();
        assert_eq!(remove_experience(&doc, "nope"), doc);
    }

    #[test]
    fn test_bullet_add_appends() {
        let doc = sample_doc();
        let doc = update_experience_bullet(&doc, "100", 0, "first".into());
        let doc = add_experience_bullet(&doc, "100");
        assert_eq!(doc.experiences[0].description, vec!["first", ""]);
    }

    #[test]
    fn test_bullet_update_and_remove_by_index() {
        let doc = sample_doc();
        let doc = add_experience_bullet(&doc, "100");
        let doc = update_experience_bullet(&doc, "100", 0, "a".into());
        let doc = update_experience_bullet(&doc, "100", 1, "b".into());
        let doc = remove_experience_bullet(&doc, "100", 0);
        assert_eq!(doc.experiences[0].description, vec!["b"]);
    }

    #[test]
    fn test_bullet_out_of_range_is_noop() {
        let doc = sample_doc();
        assert_eq!(update_experience_bullet(&doc, "100", 5, "x".into()), doc);
        assert_eq!(remove_experience_bullet(&doc, "100", 5), doc);
    }

    #[test]
    fn test_bullet_ops_on_empty_description_are_noops() {
        let doc = update_experience(&sample_doc(), "100", ExperiencePatch::Description(vec![]));
        assert_eq!(update_experience_bullet(&doc, "100", 0, "x".into()), doc);
        assert_eq!(remove_experience_bullet(&doc, "100", 0), doc);
        assert_eq!(remove_experience_bullet(&doc, "missing", 0), doc);
    }

    #[test]
    fn test_add_education_prepends() {
        let doc = add_education(&sample_doc(), "201".into());
        let ids: Vec<_> = doc.education.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["201", "200"]);
    }

    #[test]
    fn test_update_education_field() {
        let doc = update_education(
            &sample_doc(),
            "200",
            EducationPatch::FieldOfStudy("Mathematics".into()),
        );
        assert_eq!(doc.education[0].field_of_study, "Mathematics");
        assert_eq!(doc.education[0].degree, "");
    }

    #[test]
    fn test_skills_append_in_order() {
        let doc = add_skill(&sample_doc(), "301".into());
        let doc = update_skill(&doc, "301", "Rust".into());
        let names: Vec<_> = doc.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["COBOL", "Rust"]);
    }

    #[test]
    fn test_remove_skill() {
        let doc = remove_skill(&sample_doc(), "300");
        assert!(doc.skills.is_empty());
        let doc = update_skill(&doc, "300", "ghost".into());
        assert!(doc.skills.is_empty());
    }
}
