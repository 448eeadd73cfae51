//! Nameable key placeholders in templated text.
//!
//! Library content can leave parts of a qualifier open, e.g. a trait
//! prerequisite on `Enemy (@Who@)`. The keys are collected once so an
//! editor can ask for values, then substituted per character.
//!
//! # Syntax
//!
//! - `@key@` - replaced with the registry value for `key`
//! - a lone `@` with no closing partner is literal text

use std::collections::BTreeMap;

/// Placeholder key to substitution value.
pub type Nameables = BTreeMap<String, String>;

/// A segment of templated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text
    Literal(&'a str),
    /// Placeholder: @key@
    Key(&'a str),
}

/// Split text into literal and placeholder segments.
pub fn parse(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = input;

    while let Some(open) = rest.find('@') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('@') else {
            break;
        };

        if close == 0 {
            // "@@" holds no key; keep the first and retry from the second
            segments.push(Segment::Literal(&rest[..open + 1]));
            rest = after;
            continue;
        }

        if open > 0 {
            segments.push(Segment::Literal(&rest[..open]));
        }
        segments.push(Segment::Key(&after[..close]));
        rest = &after[close + 1..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }

    segments
}

/// Record every placeholder key in `text`.
///
/// New keys map to themselves; keys already present keep their value.
pub fn extract(text: &str, registry: &mut Nameables) {
    for segment in parse(text) {
        if let Segment::Key(key) = segment {
            registry
                .entry(key.to_string())
                .or_insert_with(|| key.to_string());
        }
    }
}

/// Substitute placeholders in `text` from `registry`.
pub fn apply(text: &str, registry: &Nameables) -> String {
    if registry.is_empty() || !text.contains('@') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for segment in parse(text) {
        match segment {
            Segment::Literal(s) => out.push_str(s),
            Segment::Key(key) => match registry.get(key) {
                Some(value) if value.trim().is_empty() => out.push_str(key),
                Some(value) => out.push_str(value),
                None => {
                    out.push('@');
                    out.push_str(key);
                    out.push('@');
                }
            },
        }
    }
    out
}

/// Check if text contains any placeholder.
pub fn has_nameables(text: &str) -> bool {
    parse(text).iter().any(|s| matches!(s, Segment::Key(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        assert_eq!(
            parse("Enemy (@Who@)"),
            vec![
                Segment::Literal("Enemy ("),
                Segment::Key("Who"),
                Segment::Literal(")"),
            ]
        );
        assert_eq!(parse("@A@@B@"), vec![Segment::Key("A"), Segment::Key("B")]);
        assert_eq!(parse("no keys"), vec![Segment::Literal("no keys")]);
        assert_eq!(
            parse("user@host"),
            vec![Segment::Literal("user@host")]
        );
    }

    #[test]
    fn test_double_at_keeps_first() {
        assert_eq!(
            parse("a@@b@c@"),
            vec![
                Segment::Literal("a@"),
                Segment::Key("b"),
                Segment::Literal("c@"),
            ]
        );
    }

    #[test]
    fn test_extract_keeps_existing_values() {
        let mut registry = Nameables::new();
        registry.insert("Who".to_string(), "Orcs".to_string());
        extract("Enemy (@Who@) and @Where@", &mut registry);
        assert_eq!(registry["Who"], "Orcs");
        assert_eq!(registry["Where"], "Where");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_apply() {
        let mut registry = Nameables::new();
        registry.insert("Who".to_string(), "Orcs".to_string());
        registry.insert("Blank".to_string(), " ".to_string());
        assert_eq!(apply("Enemy (@Who@)", &registry), "Enemy (Orcs)");
        assert_eq!(apply("@Blank@!", &registry), "Blank!");
        assert_eq!(apply("@Unknown@", &registry), "@Unknown@");
        assert_eq!(apply("plain", &registry), "plain");
    }

    #[test]
    fn test_apply_is_pure() {
        let registry = Nameables::from([("X".to_string(), "@X@".to_string())]);
        // Substituted text is not rescanned
        assert_eq!(apply("@X@", &registry), "@X@");
        assert!(has_nameables("@X@"));
        assert!(!has_nameables("x@"));
    }
}
