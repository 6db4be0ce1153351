/// Per-category scoring of one candidate against one job.
///
/// Job-side embeddings are computed once into a `JobProfile` and reused for
/// every candidate of that job.

use chrono::Utc;

use super::aggregate::{aggregate, round2};
use super::category::IndividualScore;
use super::score::CategoryScore;
use crate::config::ScoringConfig;
use crate::duration::parse_years;
use crate::embedding::EmbeddingError;
use crate::fuzzy::FuzzyMatcher;
use crate::model::{Candidate, CandidateMatch, JobRequirements};
use crate::semantic::{cosine_similarity, Embedding, SemanticScorer};
use crate::text::join_words;

/// A job with its semantic texts already encoded.
#[derive(Debug, Clone)]
pub struct JobProfile {
    pub job: JobRequirements,
    pub required_years: f64,
    title: Option<Embedding>,
    skills: Option<Embedding>,
    education: Option<Embedding>,
    responsibilities: Option<Embedding>,
    soft_skills: Option<Embedding>,
    domain_knowledge: Option<Embedding>,
    preferred_qualifications: Option<Embedding>,
}

/// Candidate-side embeddings, one per semantic category.
struct CandidateVectors {
    title: Option<Embedding>,
    skills: Option<Embedding>,
    education: Option<Embedding>,
    experience: Option<Embedding>,
    soft_skills: Option<Embedding>,
    industries: Option<Embedding>,
    qualifications: Option<Embedding>,
}

/// Ratio of candidate to required years, capped at 100; neutral 50 when the
/// job states no usable figure.
pub fn experience_years_match(required_years: f64, candidate_years: f64) -> CategoryScore {
    if required_years > 0.0 {
        CategoryScore::Scored((candidate_years / required_years * 100.0).min(100.0))
    } else {
        CategoryScore::neutral()
    }
}

fn concat(a: &[String], b: &[String]) -> String {
    join_words(a.iter().chain(b.iter()))
}

/// Vector as a slice, for `cosine_similarity`.
fn view(v: &Option<Embedding>) -> Option<&[f32]> {
    v.as_deref()
}

#[derive(Clone)]
pub struct CategoryScoreCalculator {
    semantic: SemanticScorer,
    fuzzy: FuzzyMatcher,
    config: ScoringConfig,
}

impl CategoryScoreCalculator {
    pub fn new(semantic: SemanticScorer, fuzzy: FuzzyMatcher, config: ScoringConfig) -> Self {
        CategoryScoreCalculator { semantic, fuzzy, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Encode every job-side text once.
    pub async fn profile_job(&self, job: &JobRequirements) -> Result<JobProfile, EmbeddingError> {
        let education_text = format!(
            "{} {}",
            job.required_education.as_deref().unwrap_or(""),
            job.preferred_education.as_deref().unwrap_or("")
        );
        let skills_text = concat(&job.required_skills, &job.preferred_skills);
        let responsibilities_text = join_words(&job.responsibilities);
        let soft_skills_text = join_words(&job.soft_skills);
        let domain_text = concat(&job.required_domain_knowledge, &job.preferred_domain_knowledge);
        let preferred_text = concat(&job.preferred_skills, &job.preferred_domain_knowledge);

        let (title, skills, education, responsibilities, soft_skills, domain_knowledge, preferred_qualifications) =
            tokio::try_join!(
                self.semantic.encode(&job.job_title),
                self.semantic.encode(&skills_text),
                self.semantic.encode(&education_text),
                self.semantic.encode(&responsibilities_text),
                self.semantic.encode(&soft_skills_text),
                self.semantic.encode(&domain_text),
                self.semantic.encode(&preferred_text),
            )?;

        Ok(JobProfile {
            job: job.clone(),
            required_years: parse_years(job.required_experience_duration.as_deref().unwrap_or("")),
            title,
            skills,
            education,
            responsibilities,
            soft_skills,
            domain_knowledge,
            preferred_qualifications,
        })
    }

    async fn encode_candidate(&self, candidate: &Candidate) -> Result<CandidateVectors, EmbeddingError> {
        let skills_text = join_words(&candidate.skills);
        let education_text = candidate.education_text();
        let experience_text = candidate.experience_text();
        let soft_skills_text = join_words(&candidate.soft_skills);
        let industries_text = join_words(candidate.industries());
        let qualifications_text = concat(&candidate.skills, candidate.industries());

        let (title, skills, education, experience, soft_skills, industries, qualifications) = tokio::try_join!(
            self.semantic.encode(candidate.job_title.as_deref().unwrap_or("")),
            self.semantic.encode(&skills_text),
            self.semantic.encode(&education_text),
            self.semantic.encode(&experience_text),
            self.semantic.encode(&soft_skills_text),
            self.semantic.encode(&industries_text),
            self.semantic.encode(&qualifications_text),
        )?;

        Ok(CandidateVectors {
            title,
            skills,
            education,
            experience,
            soft_skills,
            industries,
            qualifications,
        })
    }

    /// All eleven category scores for one candidate.
    pub async fn score(&self, profile: &JobProfile, candidate: &Candidate) -> Result<IndividualScore, EmbeddingError> {
        let vectors = self.encode_candidate(candidate).await?;
        let job = &profile.job;
        let blend_e = self.config.embedding_weight;
        let blend_f = self.config.fuzzy_weight;

        let education_labels = candidate.education_labels();
        let required_education = job.required_education.as_deref().unwrap_or("");
        let preferred_education = job.preferred_education.as_deref().unwrap_or("");

        let skills_semantic = cosine_similarity(view(&profile.skills), view(&vectors.skills));
        let skills_fuzzy = self.fuzzy.set_match(&job.required_skills, &candidate.skills);

        let education_semantic = cosine_similarity(view(&profile.education), view(&vectors.education));
        let education_fuzzy = self.fuzzy.education_match(required_education, &education_labels);

        Ok(IndividualScore {
            job_title_relevance: cosine_similarity(view(&profile.title), view(&vectors.title)),
            experience_years_match: experience_years_match(
                profile.required_years,
                parse_years(&candidate.experience_duration),
            ),
            education_match: CategoryScore::blend(education_semantic, blend_e, education_fuzzy, blend_f),
            experience_relevance: cosine_similarity(view(&profile.responsibilities), view(&vectors.experience)),
            skills_match: CategoryScore::blend(skills_semantic, blend_e, skills_fuzzy, blend_f),
            soft_skills_relevance: cosine_similarity(view(&profile.soft_skills), view(&vectors.soft_skills)),
            certifications_match: self
                .fuzzy
                .set_match(&job.required_certifications, &candidate.certification_names()),
            domain_knowledge_match: cosine_similarity(view(&profile.domain_knowledge), view(&vectors.industries)),
            languages_match: self.fuzzy.set_match(&job.required_languages, &candidate.languages),
            preferred_education_relevance: self.fuzzy.education_match(preferred_education, &education_labels),
            preferred_qualifications_relevance: cosine_similarity(
                view(&profile.preferred_qualifications),
                view(&vectors.qualifications),
            ),
        })
    }

    /// Score, aggregate and stamp a `CandidateMatch` for one candidate.
    pub async fn match_candidate(&self, profile: &JobProfile, candidate: &Candidate) -> Result<CandidateMatch, EmbeddingError> {
        let scores = self.score(profile, candidate).await?;
        let overall = round2(aggregate(&scores, &self.config.weights));

        Ok(CandidateMatch {
            name: candidate.name.clone(),
            file_name: candidate.filename.clone(),
            job_title: candidate.job_title.clone().unwrap_or_default(),
            contact: candidate.contact.clone(),
            scores,
            overall_score: overall,
            ranked_at: Some(Utc::now()),
        })
    }
}
