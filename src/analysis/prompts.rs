// src/analysis/prompts.rs

/// Section titles the system prompt asks the model to produce, in order.
pub const CANONICAL_SECTION_TITLES: [&str; 6] = [
    "Match Score",
    "Key Skills Match",
    "Experience Alignment",
    "Keywords Analysis",
    "Specific Recommendations",
    "Format and Structure",
];

pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an applicant tracking system (ATS) specialist who reviews resumes against job descriptions.
Compare the resume with the job description and suggest concrete improvements.
Answer with exactly these numbered sections, each header on its own line:

1. Match Score: the overall match as a percentage, for example "Match Score: 72%"
2. Key Skills Match: skills the resume shares with the posting and important skills it lacks
3. Experience Alignment: how the candidate's experience lines up with the role's requirements
4. Keywords Analysis: ATS keywords that are present and keywords that are missing
5. Specific Recommendations: bullet points describing changes to the resume
6. Format and Structure: how ATS-friendly the resume's visible structure is

Use "-" bullets inside sections rather than numbered lists."#;

pub fn build_user_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "Analyze the following resume against the job description.\n\n\
         Resume:\n{}\n\n\
         Job Description:\n{}\n\n\
         Follow the section structure from your instructions.",
        resume_text, job_description
    )
}
