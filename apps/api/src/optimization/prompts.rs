// Prompt constants for the optimization boundary.

/// Persona half of the system prompt; joined with `llm_client::prompts::JSON_ONLY_SYSTEM`.
pub const OPTIMIZE_PERSONA: &str =
    "You are a professional executive resume writer and career coach.";

/// Optimization prompt template. Replace `{resume_text}` and `{job_description}` before sending.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Analyze the provided RESUME against the TARGET JOB DESCRIPTION.

TASK:
1. Calculate a "Match Score" (0-100) for the current resume.
2. Rewrite key sections of the resume to better highlight relevant skills, achievements, and keywords from the job description.
3. Keep the tone professional, achievement-oriented (STAR method), and ATS-friendly.
4. Provide a new "Optimized Match Score" (0-100).
5. List 5-8 priority keywords you added.
6. Provide the ENTIRE REVISED RESUME as a single cohesive string, formatted for professional presentation.

Return a JSON object with this EXACT schema (no extra fields):
{
  "initialScore": 54,
  "optimizedScore": 86,
  "analysis": "A paragraph summary of the gaps found and improvements made.",
  "sections": [
    {
      "title": "Experience",
      "original": "Original content of this section, verbatim",
      "optimized": "Revised content of this section",
      "changes": ["Specific improvement applied", "Another improvement"]
    }
  ],
  "suggestedKeywords": ["Key term from the job description that was missing"],
  "fullOptimizedResume": "The full, complete text of the revised resume."
}

HARD RULES:
1. Every field above is required. `changes` and `suggestedKeywords` are arrays of strings.
2. Scores are numbers between 0 and 100.
3. `original` must quote the resume section exactly as it appears in the input.
4. Do NOT invent employers, dates, degrees, or metrics that are not in the resume.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}"#;
