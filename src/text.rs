//! Derived-text transforms
//!
//! Placeholder transforms: a bounded character prefix plus a fixed
//! annotation. They stand in for real summarization and translation
//! services; callers depend only on the prefix+annotation shape, so the
//! shape is part of the contract and pinned by tests.

/// Prefix length used by [`relanguage`] and [`simplify`]
const EXCERPT_CHARS: usize = 200;

/// Requested length tier for [`condense`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondenseLength {
    /// 100-character prefix
    Short,
    /// 250-character prefix
    Medium,
    /// 400-character prefix
    Long,
}

impl CondenseLength {
    /// Character budget for this tier
    #[must_use]
    pub const fn chars(self) -> usize {
        match self {
            Self::Short => 100,
            Self::Medium => 250,
            Self::Long => 400,
        }
    }

    /// Tier label used in the annotation
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Parse a tier label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            _ => None,
        }
    }
}

/// Bounded-prefix summary tagged with the requested length tier
#[must_use]
pub fn condense(text: &str, length: CondenseLength) -> String {
    format!(
        "{}... [AI Summary - {}]",
        prefix_chars(text, length.chars()),
        length.label()
    )
}

/// Bounded prefix tagged with the target language (no actual translation)
#[must_use]
pub fn relanguage(text: &str, target_language: &str) -> String {
    format!(
        "[{target_language} Translation]: {}... (Real translation would appear here)",
        prefix_chars(text, EXCERPT_CHARS)
    )
}

/// Bounded prefix wrapped as a simple explanation
#[must_use]
pub fn simplify(text: &str) -> String {
    format!(
        "Simple Explanation: {}... [This would be a child-friendly explanation]",
        prefix_chars(text, EXCERPT_CHARS)
    )
}

/// First `max_chars` characters of `text`
fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condense_short_is_exact_prefix_plus_annotation() {
        let text = "x".repeat(300);
        let out = condense(&text, CondenseLength::Short);
        assert_eq!(out, format!("{}... [AI Summary - short]", "x".repeat(100)));
    }

    #[test]
    fn condense_medium_and_long_budgets() {
        let text = "y".repeat(1000);
        let medium = condense(&text, CondenseLength::Medium);
        assert!(medium.starts_with(&"y".repeat(250)));
        assert!(!medium.starts_with(&"y".repeat(251)));
        assert!(medium.ends_with("[AI Summary - medium]"));

        let long = condense(&text, CondenseLength::Long);
        assert!(long.starts_with(&"y".repeat(400)));
        assert!(long.ends_with("[AI Summary - long]"));
    }

    #[test]
    fn condense_is_total_on_short_input() {
        let out = condense("tiny", CondenseLength::Long);
        assert_eq!(out, "tiny... [AI Summary - long]");
        assert_eq!(condense("", CondenseLength::Short), "... [AI Summary - short]");
    }

    #[test]
    fn relanguage_names_the_target() {
        let text = "z".repeat(500);
        let out = relanguage(&text, "Hindi");
        assert!(out.starts_with("[Hindi Translation]: "));
        assert!(out.contains(&"z".repeat(200)));
        assert!(out.ends_with("(Real translation would appear here)"));
    }

    #[test]
    fn simplify_wraps_excerpt() {
        let out = simplify("water evaporates and condenses");
        assert!(out.starts_with("Simple Explanation: water evaporates"));
        assert!(out.ends_with("[This would be a child-friendly explanation]"));
    }

    #[test]
    fn prefixes_respect_multibyte_chars() {
        let text = "ञ".repeat(400);
        let out = relanguage(&text, "Telugu");
        assert!(out.contains(&"ञ".repeat(200)));

        let condensed = condense(&text, CondenseLength::Short);
        assert!(condensed.contains(&"ञ".repeat(100)));
    }

    #[test]
    fn labels_round_trip() {
        assert_eq!(CondenseLength::from_label("short"), Some(CondenseLength::Short));
        assert_eq!(CondenseLength::from_label(" MEDIUM "), Some(CondenseLength::Medium));
        assert_eq!(CondenseLength::from_label("long"), Some(CondenseLength::Long));
        assert_eq!(CondenseLength::from_label("epic"), None);
    }
}
