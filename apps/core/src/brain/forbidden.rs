//! Forbidden pattern validator for generated reply text.
//!
//! Each rule is named; the first rule that matches is reported.

use regex::Regex;
use std::sync::LazyLock;

/// A named forbidden shape.
struct ForbiddenRule {
    name: &'static str,
    pattern: Regex,
}

static FORBIDDEN_RULES: LazyLock<Vec<ForbiddenRule>> = LazyLock::new(|| {
    [
        // verb-fragment leaks from anchor assembly
        ("verb_fragment_are_lose", r"(?i)\bare\s+(?:lose|waste|struggle|miss|risk)\b"),
        ("dangling_relative_label", r"(?i)\b(?:who|that|which)\s+i mentioned\b"),
        ("they_re_they", r"(?i)\bthey're\s+they\b"),
        ("double_subject", r"(?i)\bthey\s+they\b"),
        // weak or apologetic calls to action
        ("weak_cta_just_checking", r"(?i)\bjust (?:checking in|following up|circling back)\b"),
        ("apologetic_cta", r"(?i)\b(?:sorry to (?:bother|bug|pester)|apologies for (?:the|any) (?:bother|intrusion))\b"),
        ("weak_cta_no_worries", r"(?i)\bno worries if not\b"),
        // generic filler
        ("generic_filler_industries", r"(?i)\b(?:tech|services|industrials)\s*/\s*(?:tech|services|industrials)\b"),
        ("generic_filler_companies_like_yours", r"(?i)\bcompanies like yours\b"),
    ]
    .into_iter()
    .map(|(name, pattern)| ForbiddenRule {
        name,
        pattern: Regex::new(pattern).expect("Invalid regex: forbidden rule"),
    })
    .collect()
});

/// Name of the first forbidden rule matched by `text`.
pub fn has_forbidden_pattern(text: &str) -> Option<&'static str> {
    FORBIDDEN_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.name)
}

/// Names of every rule in evaluation order.
pub fn rule_names() -> Vec<&'static str> {
    FORBIDDEN_RULES.iter().map(|rule| rule.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_passes() {
        assert_eq!(
            has_forbidden_pattern(
                "Happy to start with a quick 10-15 minute call to see if an intro makes sense."
            ),
            None
        );
        assert_eq!(has_forbidden_pattern(""), None);
    }

    #[test]
    fn test_verb_fragment_leaks() {
        assert_eq!(
            has_forbidden_pattern("They are lose deals every quarter."),
            Some("verb_fragment_are_lose")
        );
        assert_eq!(
            has_forbidden_pattern("the founders who i mentioned"),
            Some("dangling_relative_label")
        );
        assert_eq!(has_forbidden_pattern("they're they busy"), Some("they_re_they"));
        assert_eq!(has_forbidden_pattern("They they lose time"), Some("double_subject"));
    }

    #[test]
    fn test_weak_ctas() {
        assert_eq!(
            has_forbidden_pattern("Just checking in on this"),
            Some("weak_cta_just_checking")
        );
        assert_eq!(
            has_forbidden_pattern("Sorry to bother you again"),
            Some("apologetic_cta")
        );
        assert_eq!(
            has_forbidden_pattern("No worries if not!"),
            Some("weak_cta_no_worries")
        );
    }

    #[test]
    fn test_generic_filler() {
        assert_eq!(
            has_forbidden_pattern("We cover tech / services clients"),
            Some("generic_filler_industries")
        );
        assert_eq!(
            has_forbidden_pattern("We help companies like yours grow"),
            Some("generic_filler_companies_like_yours")
        );
    }

    #[test]
    fn test_rule_names_are_unique() {
        let names = rule_names();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }
}
