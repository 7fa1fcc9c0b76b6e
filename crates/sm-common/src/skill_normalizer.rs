use std::collections::BTreeSet;

/// Normalized, de-duplicated skill tokens. Ordered so that every list derived
/// from it (matched / missing) comes out sorted.
pub type SkillSet = BTreeSet<String>;

/// Skills longer than this (in characters, after normalization) are treated as
/// requirement sentences rather than atomic skill tokens.
pub const MAX_SKILL_CHARS: usize = 50;

/// Lower-cased prefixes of requirement phrases that LLM-extracted skill lists
/// tend to contain ("Bachelor's degree in CS", "Experience with Kafka", ...).
pub const REQUIREMENT_PHRASE_PREFIXES: &[&str] = &[
    "bachelor",
    "master",
    "phd",
    "currently",
    "experience with",
    "knowledge of",
    "understanding of",
    "strong",
    "excellent",
    "proficiency in",
    "familiarity",
    "ability to",
    "minimum",
    "years of",
    "degree in",
];

/// Canonical comparison form of a skill: trimmed and lower-cased.
pub fn normalize_skill(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether `raw` looks like an atomic skill token.
///
/// Judged on the normalized form so that a value which passes once keeps
/// passing after normalization (`to_skill_set` stays idempotent).
pub fn is_valid_skill(raw: &str) -> bool {
    let normalized = normalize_skill(raw);
    !normalized.is_empty()
        && normalized.chars().count() <= MAX_SKILL_CHARS
        && !REQUIREMENT_PHRASE_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
}

/// Filter invalid entries, normalize the rest and collect into a [`SkillSet`].
pub fn to_skill_set<I, S>(skills: I) -> SkillSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .filter(|skill| is_valid_skill(skill.as_ref()))
        .map(|skill| normalize_skill(skill.as_ref()))
        .collect()
}

/// Same as [`to_skill_set`] but as a sorted `Vec` (for serialization).
pub fn normalize_skills_vec(skills: &[String]) -> Vec<String> {
    to_skill_set(skills).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_skill("  FastAPI "), "fastapi");
        assert_eq!(normalize_skill("PostgreSQL"), "postgresql");
        assert_eq!(normalize_skill("\tC++\n"), "c++");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["  Python ", "KUBERNETES", "node.js", "Ünïcode Skill", ""] {
            let once = normalize_skill(raw);
            assert_eq!(normalize_skill(&once), once);
        }
    }

    #[test]
    fn rejects_requirement_phrases() {
        assert!(!is_valid_skill("Bachelor's degree in Computer Science"));
        assert!(!is_valid_skill("Experience with distributed systems"));
        assert!(!is_valid_skill("Strong communication"));
        assert!(!is_valid_skill("Minimum 3 years"));
        assert!(!is_valid_skill("  knowledge of SQL"));
        assert!(is_valid_skill("Python"));
        assert!(is_valid_skill("machine learning"));
    }

    #[test]
    fn rejects_overlong_and_empty_values() {
        let long = "x".repeat(MAX_SKILL_CHARS + 1);
        let exact = "y".repeat(MAX_SKILL_CHARS);

        assert!(!is_valid_skill(&long));
        assert!(is_valid_skill(&exact));
        assert!(!is_valid_skill(""));
        assert!(!is_valid_skill("   "));
    }

    #[test]
    fn length_limit_counts_characters_not_bytes() {
        let multibyte = "é".repeat(MAX_SKILL_CHARS);
        assert!(multibyte.len() > MAX_SKILL_CHARS);
        assert!(is_valid_skill(&multibyte));
    }

    #[test]
    fn skill_set_dedupes_case_insensitively() {
        let set = to_skill_set(strings(&["Python", "python ", "PYTHON", "Docker"]));

        assert_eq!(set.len(), 2);
        assert!(set.contains("python"));
        assert!(set.contains("docker"));
    }

    #[test]
    fn skill_set_is_idempotent() {
        let raw = strings(&[
            "  Rust",
            "Experience with Go",
            "AWS",
            "  strong  ",
            "Degree in math",
            "GraphQL",
        ]);

        let once = to_skill_set(&raw);
        let twice = to_skill_set(&once);

        assert_eq!(once, twice);
        assert_eq!(
            once.into_iter().collect::<Vec<_>>(),
            strings(&["aws", "graphql", "rust"])
        );
    }

    #[test]
    fn normalize_skills_vec_is_sorted() {
        let normalized = normalize_skills_vec(&strings(&["Zig", "ada", "  Go  ", "go"]));

        assert_eq!(normalized, strings(&["ada", "go", "zig"]));
    }
}
