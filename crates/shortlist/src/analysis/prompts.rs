//! Prompt templates for the analysis stages.
//!
//! Both prompts demand a bare JSON object; the shared footer restates the
//! constraint. The response is still treated as untrusted and validated
//! after parsing.

use crate::experience::ExperienceSummary;
use crate::llm_client::prompts::JSON_ONLY_FOOTER;

const WORK_EXPERIENCE_TEMPLATE: &str = r#"Extract all work experience entries from the CV text below. For each position, identify the start and end dates.
If the end date is "Present" or "Current", use today's date.

CV text:
{cv_text}

Format your response as JSON with the following structure:
{
    "work_experience": [
        {
            "position": "Job Title",
            "company": "Company Name",
            "start_date": "YYYY-MM",
            "end_date": "YYYY-MM or Present"
        }
    ]
}
"#;

const ANALYSIS_TEMPLATE: &str = r#"You are an AI HR assistant. You need to evaluate a candidate's CV against a job description.

Job Description:
{job_description}

Candidate CV:
{cv_text}

Candidate's total work experience: {experience_formatted} ({experience_months} months total)

Provide a numerical score from 1-10 for how well this candidate matches the job requirements.
Consider both skills match AND the relevance and duration of work experience when scoring.

Also provide a brief explanation (maximum 3 sentences) of the main strengths and weaknesses.

Format your response as JSON with the following structure:
{
    "score": [1-10 integer],
    "experience_relevance_score": [1-10 integer],
    "skills_match_score": [1-10 integer],
    "explanation": "[brief explanation]",
    "key_skills_matched": ["skill1", "skill2", "skill3"],
    "missing_skills": ["skill1", "skill2"],
    "experience_summary": "[brief summary of relevant experience]"
}
"#;

/// Builds the work-experience extraction prompt for one CV.
pub fn work_experience_prompt(cv_text: &str) -> String {
    let body = WORK_EXPERIENCE_TEMPLATE.replace("{cv_text}", cv_text);
    format!("{body}{JSON_ONLY_FOOTER}")
}

/// Builds the scoring prompt: full job description, full CV text, and the
/// precomputed experience summary with its month total.
pub fn analysis_prompt(
    job_description: &str,
    cv_text: &str,
    experience: &ExperienceSummary,
) -> String {
    let body = ANALYSIS_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{cv_text}", cv_text)
        .replace("{experience_formatted}", &experience.formatted)
        .replace(
            "{experience_months}",
            &experience.total_months.to_string(),
        );
    format!("{body}{JSON_ONLY_FOOTER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ExperienceSummary {
        crate::experience::total_experience_as_of(
            &crate::experience::WorkExperienceRecord::default(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_work_experience_prompt_embeds_cv() {
        let prompt = work_experience_prompt("Jane Doe, Rust Engineer at Acme");
        assert!(prompt.contains("Jane Doe, Rust Engineer at Acme"));
        assert!(prompt.contains("\"work_experience\""));
        assert!(prompt.ends_with(JSON_ONLY_FOOTER));
        assert!(!prompt.contains("{cv_text}"));
    }

    #[test]
    fn test_analysis_prompt_embeds_all_sections() {
        let prompt = analysis_prompt("Senior Rust Engineer role", "Jane's CV text", &summary());
        assert!(prompt.contains("Senior Rust Engineer role"));
        assert!(prompt.contains("Jane's CV text"));
        assert!(prompt.contains("0 years, 0 months (0 months total)"));
        assert!(prompt.contains("\"missing_skills\""));
        assert!(prompt.ends_with(JSON_ONLY_FOOTER));
    }
}
