use crate::prelude::{Error, Result};

/// Renders the evaluation prompt for a resume/job-description pair.
///
/// The five numbered sections and their order are a contract: stored
/// feedback and the rendering layer both assume this shape, so changing
/// the section count or order breaks every historical record.
pub fn compile(resume_text: &str, job_description: &str) -> Result<String> {
    if resume_text.trim().is_empty() {
        return Err(Error::EmptyField("resumeText"));
    }
    if job_description.trim().is_empty() {
        return Err(Error::EmptyField("jobDescription"));
    }
    Ok(format!(
        r#"You are an AI-powered career coach and resume expert. Evaluate the resume below against the job description and provide structured, actionable feedback in exactly these five sections, in this order:

## 1. Resume Match Score (0-100)
- Score how well the resume fits the job description, considering ATS compatibility, relevant skills, formatting, and keyword matching.

## 2. ATS Optimization Check
- Is the resume formatted for applicant tracking systems: simple fonts, bullet points, standard section titles, no graphics or tables?

## 3. Missing Keywords & Skills
- Extract the important keywords from the job description, list the ones missing from the resume, and provide a corrected resume summary that uses them.

## 4. Formatting & Readability
- Is the resume easy to read? Suggest concrete formatting improvements such as font size, bullet points, and section order.

## 5. Final Actionable Steps
- List 3-5 specific changes the candidate should make.

Resume:
{}

Job Description:
{}
"#,
        resume_text, job_description
    ))
}
