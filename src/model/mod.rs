/// Input and output records.
///
/// Job and candidate records arrive already extracted, as JSON. Every field
/// is optional on read: extraction is best-effort upstream, and a missing
/// field simply means "no data" for the categories that use it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::category::IndividualScore;
use crate::text::join_words;

/// One job posting's extracted criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirements {
    pub job_title: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub required_education: Option<String>,
    pub preferred_education: Option<String>,
    pub required_experience_duration: Option<String>,
    pub required_domain_knowledge: Vec<String>,
    pub preferred_domain_knowledge: Vec<String>,
    pub soft_skills: Vec<String>,
    pub required_certifications: Vec<String>,
    #[serde(alias = "languages")]
    pub required_languages: Vec<String>,
    pub responsibilities: Vec<String>,
}

/// Opaque contact block, carried through to results untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub field_of_study: Option<String>,
    pub institution: Option<String>,
}

impl Education {
    /// "degree field_of_study", the string both education comparisons use.
    pub fn label(&self) -> String {
        format!("{} {}", self.degree, self.field_of_study.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub description: String,
    pub technologies_used: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuing_organization: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainKnowledge {
    pub industries: Vec<String>,
    pub business_domains: Vec<String>,
}

/// One resume's extracted attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    pub name: String,
    pub job_title: Option<String>,
    pub contact: Contact,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub experience_duration: String,
    pub soft_skills: Vec<String>,
    pub domain_knowledge: DomainKnowledge,
    pub certifications: Vec<Certification>,
    pub languages: Vec<String>,
    /// Merge key; by convention the stem of the candidate's JSON file.
    pub filename: String,
}

impl Default for Candidate {
    fn default() -> Self {
        Candidate {
            name: "Unknown".to_string(),
            job_title: None,
            contact: Contact::default(),
            skills: Vec::new(),
            education: Vec::new(),
            experience: Vec::new(),
            experience_duration: String::new(),
            soft_skills: Vec::new(),
            domain_knowledge: DomainKnowledge::default(),
            certifications: Vec::new(),
            languages: Vec::new(),
            filename: String::new(),
        }
    }
}

impl Candidate {
    pub fn education_labels(&self) -> Vec<String> {
        self.education.iter().map(Education::label).collect()
    }

    pub fn education_text(&self) -> String {
        join_words(self.education_labels())
    }

    /// Each role's description followed by its technologies.
    pub fn experience_text(&self) -> String {
        join_words(self.experience.iter().map(|e| {
            format!("{} {}", e.description, join_words(&e.technologies_used))
        }))
    }

    pub fn certification_names(&self) -> Vec<String> {
        self.certifications.iter().map(|c| c.name.clone()).collect()
    }

    pub fn industries(&self) -> &[String] {
        &self.domain_knowledge.industries
    }
}

/// One scored (job, candidate) pair. Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub name: String,
    /// Merge key, copied from `Candidate::filename`.
    pub file_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub contact: Contact,
    pub scores: IndividualScore,
    /// Weighted aggregate, rounded to two decimals.
    pub overall_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranked_at: Option<DateTime<Utc>>,
}

/// Wrapper kept for the persisted layout `{"candidates": {"candidates": [...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidates {
    #[serde(default)]
    pub candidates: Vec<CandidateMatch>,
}

/// Ranked candidates for one job, best first, one entry per `file_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatchingResult {
    pub job_title: String,
    pub job_file_name: String,
    #[serde(default)]
    pub candidates: Candidates,
}

impl JobMatchingResult {
    pub fn matches(&self) -> &[CandidateMatch] {
        &self.candidates.candidates
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.matches().iter().any(|m| m.file_name == file_name)
    }

    pub fn len(&self) -> usize {
        self.candidates.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_accepts_languages_alias() {
        let job: JobRequirements = serde_json::from_value(json!({
            "job_title": "Data Engineer",
            "languages": ["English", "Spanish"],
            "required_education": null
        }))
        .unwrap();
        assert_eq!(job.required_languages, vec!["English", "Spanish"]);
        assert_eq!(job.required_education, None);
        assert!(job.required_skills.is_empty());
    }

    #[test]
    fn test_candidate_defaults_and_texts() {
        let candidate: Candidate = serde_json::from_value(json!({
            "education": [
                {"degree": "BSc", "field_of_study": "Physics", "institution": "MIT"},
                {"degree": "MBA", "field_of_study": null}
            ],
            "experience": [
                {"description": "Built pipelines", "technologies_used": ["Spark", "Airflow"]},
                {"description": "Ran reports"}
            ],
            "certifications": [{"name": "CKA", "issuing_organization": "CNCF"}],
            "domain_knowledge": {"industries": ["fintech"]},
            "filename": "jane_doe"
        }))
        .unwrap();
        assert_eq!(candidate.name, "Unknown");
        assert_eq!(candidate.education_labels(), vec!["BSc Physics", "MBA "]);
        assert_eq!(candidate.experience_text(), "Built pipelines Spark Airflow Ran reports ");
        assert_eq!(candidate.certification_names(), vec!["CKA"]);
        assert_eq!(candidate.industries(), ["fintech".to_string()]);
    }

    #[test]
    fn test_result_layout() {
        let result = JobMatchingResult {
            job_title: "Analyst".to_string(),
            job_file_name: "analyst.json".to_string(),
            candidates: Candidates::default(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["candidates"]["candidates"], json!([]));
        assert!(result.is_empty());
        assert!(!result.contains("anyone"));
    }

    #[test]
    fn test_match_without_timestamp_parses() {
        let m: CandidateMatch = serde_json::from_value(json!({
            "name": "Ann",
            "file_name": "ann",
            "scores": {
                "job_title_relevance": 71.2, "experience_years_match": 100,
                "education_match": 88, "experience_relevance": 60,
                "skills_match": 75, "soft_skills_relevance": -1,
                "certifications_match": -1, "domain_knowledge_match": 40,
                "languages_match": 100, "preferred_education_relevance": -1,
                "preferred_qualifications_relevance": 55
            },
            "overall_score": 80.12
        }))
        .unwrap();
        assert_eq!(m.ranked_at, None);
        assert_eq!(m.scores.soft_skills_relevance, crate::scoring::score::CategoryScore::NoReference);
    }
}
