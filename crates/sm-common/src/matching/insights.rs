//! Rule-based insight fields attached to every ranked match.
//!
//! These are the deterministic counterparts of LLM-generated insights and are
//! always available, whether or not an external insight generator ran.

use super::skills::SkillsBreakdown;

const OVERLAP_REQUIRED_LIMIT: usize = 10;
const OVERLAP_PREFERRED_LIMIT: usize = 5;
const MISSING_LIMIT: usize = 5;
const STRENGTHS_LIMIT: usize = 5;
const GROWTH_LIMIT: usize = 3;
const REASON_SKILLS_LIMIT: usize = 5;
const LEARNABLE_SKILL_MAX_CHARS: usize = 30;
const COVERAGE_REASON_THRESHOLD: f64 = 0.5;

/// `"Match based on 89.0% semantic similarity"`
pub fn similarity_note(raw_similarity: f64) -> String {
    format!(
        "Match based on {:.1}% semantic similarity",
        raw_similarity * 100.0
    )
}

/// Matched skills worth highlighting to a recruiter: required first, then preferred.
pub fn skill_overlap(breakdown: &SkillsBreakdown) -> Vec<String> {
    breakdown
        .required
        .matched
        .iter()
        .take(OVERLAP_REQUIRED_LIMIT)
        .chain(breakdown.preferred.matched.iter().take(OVERLAP_PREFERRED_LIMIT))
        .cloned()
        .collect()
}

pub fn missing_skills(breakdown: &SkillsBreakdown) -> Vec<String> {
    breakdown
        .required
        .missing
        .iter()
        .take(MISSING_LIMIT)
        .cloned()
        .collect()
}

pub fn skill_strengths(breakdown: &SkillsBreakdown) -> Vec<String> {
    breakdown
        .required
        .matched
        .iter()
        .take(STRENGTHS_LIMIT)
        .cloned()
        .collect()
}

pub fn growth_opportunities(breakdown: &SkillsBreakdown) -> Vec<String> {
    breakdown
        .required
        .missing
        .iter()
        .take(GROWTH_LIMIT)
        .cloned()
        .collect()
}

/// Reasons a job is recommended to a student, derived from skill coverage only.
pub fn recommended_because(breakdown: &SkillsBreakdown) -> Vec<String> {
    let mut reasons = Vec::new();

    if !breakdown.required.matched.is_empty() {
        reasons.push(format!(
            "Strong skill match: {}",
            join_limited(breakdown.required.matched.iter(), REASON_SKILLS_LIMIT)
        ));
    } else if !breakdown.preferred.matched.is_empty() {
        reasons.push(format!(
            "Relevant skills: {}",
            join_limited(breakdown.preferred.matched.iter(), REASON_SKILLS_LIMIT)
        ));
    }

    if breakdown.required.has_requirements()
        && breakdown.required.coverage >= COVERAGE_REASON_THRESHOLD
    {
        reasons.push(format!(
            "{}% required skill coverage",
            (breakdown.required.coverage * 100.0) as u32
        ));
    }

    if reasons.is_empty() {
        reasons.push("Profile aligns with position requirements".to_string());
    }

    reasons
}

/// Short learning suggestions for missing required skills.
pub fn development_areas(breakdown: &SkillsBreakdown) -> Vec<String> {
    let areas: Vec<String> = breakdown
        .required
        .missing
        .iter()
        .filter(|skill| skill.chars().count() < LEARNABLE_SKILL_MAX_CHARS)
        .take(GROWTH_LIMIT)
        .map(|skill| format!("Consider learning {}", title_case(skill)))
        .collect();

    if areas.is_empty() {
        vec!["Strong match - minimal gaps".to_string()]
    } else {
        areas
    }
}

fn join_limited<'a>(skills: impl Iterator<Item = &'a String>, limit: usize) -> String {
    skills
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_alpha = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(ch);
            previous_alpha = false;
        }
    }

    out
}
