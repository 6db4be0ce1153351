/// Category weight table used by the aggregator.
///
/// Weights need not sum to 1.0: the aggregator divides by the weights of the
/// categories it actually includes.

use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::errors::RankerError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub job_title_relevance: f64,
    pub experience_years_match: f64,
    pub education_match: f64,
    pub experience_relevance: f64,
    pub skills_match: f64,
    pub soft_skills_relevance: f64,
    pub certifications_match: f64,
    pub domain_knowledge_match: f64,
    pub languages_match: f64,
    pub preferred_education_relevance: f64,
    pub preferred_qualifications_relevance: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        WeightTable {
            job_title_relevance: 0.03,
            experience_years_match: 0.20,
            education_match: 0.20,
            experience_relevance: 0.08,
            skills_match: 0.20,
            soft_skills_relevance: 0.04,
            certifications_match: 0.05,
            domain_knowledge_match: 0.04,
            languages_match: 0.10,
            preferred_education_relevance: 0.03,
            preferred_qualifications_relevance: 0.03,
        }
    }
}

impl WeightTable {
    pub fn get(&self, category: Category) -> f64 {
        *self.slot(category)
    }

    pub fn set(&mut self, category: Category, weight: f64) {
        *self.slot_mut(category) = weight;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, w)| w).sum()
    }

    pub fn validate(&self) -> Result<(), RankerError> {
        for (category, weight) in self.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RankerError::Config(format!(
                    "scoring.weights.{} must be a finite, non-negative number (got {})",
                    category, weight
                )));
            }
        }
        Ok(())
    }

    fn slot(&self, category: Category) -> &f64 {
        match category {
            Category::JobTitleRelevance => &self.job_title_relevance,
            Category::ExperienceYearsMatch => &self.experience_years_match,
            Category::EducationMatch => &self.education_match,
            Category::ExperienceRelevance => &self.experience_relevance,
            Category::SkillsMatch => &self.skills_match,
            Category::SoftSkillsRelevance => &self.soft_skills_relevance,
            Category::CertificationsMatch => &self.certifications_match,
            Category::DomainKnowledgeMatch => &self.domain_knowledge_match,
            Category::LanguagesMatch => &self.languages_match,
            Category::PreferredEducationRelevance => &self.preferred_education_relevance,
            Category::PreferredQualificationsRelevance => &self.preferred_qualifications_relevance,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::JobTitleRelevance => &mut self.job_title_relevance,
            Category::ExperienceYearsMatch => &mut self.experience_years_match,
            Category::EducationMatch => &mut self.education_match,
            Category::ExperienceRelevance => &mut self.experience_relevance,
            Category::SkillsMatch => &mut self.skills_match,
            Category::SoftSkillsRelevance => &mut self.soft_skills_relevance,
            Category::CertificationsMatch => &mut self.certifications_match,
            Category::DomainKnowledgeMatch => &mut self.domain_knowledge_match,
            Category::LanguagesMatch => &mut self.languages_match,
            Category::PreferredEducationRelevance => &mut self.preferred_education_relevance,
            Category::PreferredQualificationsRelevance => &mut self.preferred_qualifications_relevance,
        }
    }
}
