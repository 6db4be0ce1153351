/// The eleven evaluation categories and the per-candidate score record.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::score::CategoryScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    JobTitleRelevance,
    ExperienceYearsMatch,
    EducationMatch,
    ExperienceRelevance,
    SkillsMatch,
    SoftSkillsRelevance,
    CertificationsMatch,
    DomainKnowledgeMatch,
    LanguagesMatch,
    PreferredEducationRelevance,
    PreferredQualificationsRelevance,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::JobTitleRelevance,
        Category::ExperienceYearsMatch,
        Category::EducationMatch,
        Category::ExperienceRelevance,
        Category::SkillsMatch,
        Category::SoftSkillsRelevance,
        Category::CertificationsMatch,
        Category::DomainKnowledgeMatch,
        Category::LanguagesMatch,
        Category::PreferredEducationRelevance,
        Category::PreferredQualificationsRelevance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::JobTitleRelevance => "job_title_relevance",
            Category::ExperienceYearsMatch => "experience_years_match",
            Category::EducationMatch => "education_match",
            Category::ExperienceRelevance => "experience_relevance",
            Category::SkillsMatch => "skills_match",
            Category::SoftSkillsRelevance => "soft_skills_relevance",
            Category::CertificationsMatch => "certifications_match",
            Category::DomainKnowledgeMatch => "domain_knowledge_match",
            Category::LanguagesMatch => "languages_match",
            Category::PreferredEducationRelevance => "preferred_education_relevance",
            Category::PreferredQualificationsRelevance => "preferred_qualifications_relevance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One score per category for a single job/candidate pair.
///
/// Serialized as eleven plain numbers with `-1` for `NoReference`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndividualScore {
    pub job_title_relevance: CategoryScore,
    pub experience_years_match: CategoryScore,
    pub education_match: CategoryScore,
    pub experience_relevance: CategoryScore,
    pub skills_match: CategoryScore,
    pub soft_skills_relevance: CategoryScore,
    pub certifications_match: CategoryScore,
    pub domain_knowledge_match: CategoryScore,
    pub languages_match: CategoryScore,
    pub preferred_education_relevance: CategoryScore,
    pub preferred_qualifications_relevance: CategoryScore,
}

impl IndividualScore {
    /// Every category without a reference.
    pub fn empty() -> Self {
        IndividualScore::from_fn(|_| CategoryScore::NoReference)
    }

    pub fn from_fn(mut f: impl FnMut(Category) -> CategoryScore) -> Self {
        IndividualScore {
            job_title_relevance: f(Category::JobTitleRelevance),
            experience_years_match: f(Category::ExperienceYearsMatch),
            education_match: f(Category::EducationMatch),
            experience_relevance: f(Category::ExperienceRelevance),
            skills_match: f(Category::SkillsMatch),
            soft_skills_relevance: f(Category::SoftSkillsRelevance),
            certifications_match: f(Category::CertificationsMatch),
            domain_knowledge_match: f(Category::DomainKnowledgeMatch),
            languages_match: f(Category::LanguagesMatch),
            preferred_education_relevance: f(Category::PreferredEducationRelevance),
            preferred_qualifications_relevance: f(Category::PreferredQualificationsRelevance),
        }
    }

    pub fn get(&self, category: Category) -> CategoryScore {
        match category {
            Category::JobTitleRelevance => self.job_title_relevance,
            Category::ExperienceYearsMatch => self.experience_years_match,
            Category::EducationMatch => self.education_match,
            Category::ExperienceRelevance => self.experience_relevance,
            Category::SkillsMatch => self.skills_match,
            Category::SoftSkillsRelevance => self.soft_skills_relevance,
            Category::CertificationsMatch => self.certifications_match,
            Category::DomainKnowledgeMatch => self.domain_knowledge_match,
            Category::LanguagesMatch => self.languages_match,
            Category::PreferredEducationRelevance => self.preferred_education_relevance,
            Category::PreferredQualificationsRelevance => self.preferred_qualifications_relevance,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, CategoryScore)> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_individual_score_wire_format() {
        let mut scores = IndividualScore::empty();
        scores.skills_match = CategoryScore::Scored(75.0);
        let value = serde_json::to_value(scores).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 11);
        assert_eq!(obj["skills_match"], 75.0);
        assert_eq!(obj["languages_match"], -1.0);
    }

    #[test]
    fn test_get_follows_from_fn() {
        let scores = IndividualScore::from_fn(|c| CategoryScore::Scored(c as usize as f64));
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(scores.get(*category), CategoryScore::Scored(i as f64));
        }
    }
}
