//! Comparison criteria used by prerequisites.
//!
//! A criterion pairs a comparison operator with a qualifier of the matching
//! type. The data model makes a numeric qualifier on a string comparison
//! impossible, so evaluation never has to check for it.

use crate::fixed::Fixed;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// String Criteria
// ============================================================================

/// The allowed string comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringCompare {
    /// Always matches; the qualifier is ignored.
    #[default]
    Any,
    Is,
    IsNot,
    Contains,
    DoesNotContain,
    #[serde(alias = "starts")]
    StartsWith,
    DoesNotStartWith,
    #[serde(alias = "ends")]
    EndsWith,
    DoesNotEndWith,
}

impl StringCompare {
    pub fn all() -> [StringCompare; 9] {
        [
            StringCompare::Any,
            StringCompare::Is,
            StringCompare::IsNot,
            StringCompare::Contains,
            StringCompare::DoesNotContain,
            StringCompare::StartsWith,
            StringCompare::DoesNotStartWith,
            StringCompare::EndsWith,
            StringCompare::DoesNotEndWith,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            StringCompare::Any => "is anything",
            StringCompare::Is => "is",
            StringCompare::IsNot => "is not",
            StringCompare::Contains => "contains",
            StringCompare::DoesNotContain => "does not contain",
            StringCompare::StartsWith => "starts with",
            StringCompare::DoesNotStartWith => "does not start with",
            StringCompare::EndsWith => "ends with",
            StringCompare::DoesNotEndWith => "does not end with",
        }
    }

    /// True for the negated half of each operator pair.
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            StringCompare::IsNot
                | StringCompare::DoesNotContain
                | StringCompare::DoesNotStartWith
                | StringCompare::DoesNotEndWith
        )
    }

    /// The operator with the opposite sense. `Any` has no opposite.
    pub fn negate(&self) -> StringCompare {
        match self {
            StringCompare::Any => StringCompare::Any,
            StringCompare::Is => StringCompare::IsNot,
            StringCompare::IsNot => StringCompare::Is,
            StringCompare::Contains => StringCompare::DoesNotContain,
            StringCompare::DoesNotContain => StringCompare::Contains,
            StringCompare::StartsWith => StringCompare::DoesNotStartWith,
            StringCompare::DoesNotStartWith => StringCompare::StartsWith,
            StringCompare::EndsWith => StringCompare::DoesNotEndWith,
            StringCompare::DoesNotEndWith => StringCompare::EndsWith,
        }
    }

    /// Compares `data` against `qualifier`, ignoring case.
    pub fn matches(&self, qualifier: &str, data: &str) -> bool {
        if *self == StringCompare::Any {
            return true;
        }
        let data = data.to_lowercase();
        let qualifier = qualifier.to_lowercase();
        match self {
            StringCompare::Any => true,
            StringCompare::Is => data == qualifier,
            StringCompare::IsNot => data != qualifier,
            StringCompare::Contains => data.contains(&qualifier),
            StringCompare::DoesNotContain => !data.contains(&qualifier),
            StringCompare::StartsWith => data.starts_with(&qualifier),
            StringCompare::DoesNotStartWith => !data.starts_with(&qualifier),
            StringCompare::EndsWith => data.ends_with(&qualifier),
            StringCompare::DoesNotEndWith => !data.ends_with(&qualifier),
        }
    }
}

impl fmt::Display for StringCompare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A string comparison with its qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringCriteria {
    #[serde(default)]
    pub compare: StringCompare,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub qualifier: String,
}

impl StringCriteria {
    pub fn new(compare: StringCompare, qualifier: impl Into<String>) -> Self {
        Self {
            compare,
            qualifier: qualifier.into(),
        }
    }

    pub fn any() -> Self {
        Self::default()
    }

    pub fn is(qualifier: impl Into<String>) -> Self {
        Self::new(StringCompare::Is, qualifier)
    }

    pub fn is_not(qualifier: impl Into<String>) -> Self {
        Self::new(StringCompare::IsNot, qualifier)
    }

    pub fn contains(qualifier: impl Into<String>) -> Self {
        Self::new(StringCompare::Contains, qualifier)
    }

    pub fn is_any(&self) -> bool {
        self.compare == StringCompare::Any
    }

    pub fn matches(&self, data: &str) -> bool {
        self.compare.matches(&self.qualifier, data)
    }

    /// Matches a set of values, such as an item's tags.
    ///
    /// Positive operators need one matching value; negated operators need
    /// every value to match. An empty set is judged as the single value `""`.
    pub fn matches_list<S: AsRef<str>>(&self, values: &[S]) -> bool {
        if values.is_empty() {
            return self.matches("");
        }
        if self.compare.is_negated() {
            values.iter().all(|v| self.matches(v.as_ref()))
        } else {
            values.iter().any(|v| self.matches(v.as_ref()))
        }
    }

    /// Describes the criteria behind a lead-in phrase.
    ///
    /// Returns an empty string for `Any`. Otherwise the result starts with a
    /// space and uses `any_prefix` for positive operators ("at least one
    /// tag") and `all_prefix` for negated ones ("all tags").
    pub fn describe_with_prefix(&self, any_prefix: &str, all_prefix: &str) -> String {
        if self.is_any() {
            return String::new();
        }
        let prefix = if self.compare.is_negated() {
            all_prefix
        } else {
            any_prefix
        };
        format!(" {prefix} {self}")
    }
}

impl fmt::Display for StringCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            f.write_str(self.compare.title())
        } else {
            write!(f, "{} {}", self.compare.title(), self.qualifier)
        }
    }
}

// ============================================================================
// Numeric Criteria
// ============================================================================

/// The allowed numeric comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericCompare {
    #[default]
    Any,
    #[serde(rename = "is", alias = "exactly")]
    Exactly,
    #[serde(rename = "is_not")]
    NotExactly,
    AtLeast,
    AtMost,
}

impl NumericCompare {
    pub fn title(&self) -> &'static str {
        match self {
            NumericCompare::Any => "is anything",
            NumericCompare::Exactly => "exactly",
            NumericCompare::NotExactly => "not",
            NumericCompare::AtLeast => "at least",
            NumericCompare::AtMost => "at most",
        }
    }

    pub fn matches(&self, qualifier: Fixed, data: Fixed) -> bool {
        match self {
            NumericCompare::Any => true,
            NumericCompare::Exactly => data == qualifier,
            NumericCompare::NotExactly => data != qualifier,
            NumericCompare::AtLeast => data >= qualifier,
            NumericCompare::AtMost => data <= qualifier,
        }
    }
}

impl fmt::Display for NumericCompare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A numeric comparison with its qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NumericCriteria {
    #[serde(default)]
    pub compare: NumericCompare,
    #[serde(default)]
    pub qualifier: Fixed,
}

impl NumericCriteria {
    pub fn new(compare: NumericCompare, qualifier: impl Into<Fixed>) -> Self {
        Self {
            compare,
            qualifier: qualifier.into(),
        }
    }

    pub fn any() -> Self {
        Self::default()
    }

    pub fn at_least(qualifier: impl Into<Fixed>) -> Self {
        Self::new(NumericCompare::AtLeast, qualifier)
    }

    pub fn at_most(qualifier: impl Into<Fixed>) -> Self {
        Self::new(NumericCompare::AtMost, qualifier)
    }

    pub fn exactly(qualifier: impl Into<Fixed>) -> Self {
        Self::new(NumericCompare::Exactly, qualifier)
    }

    pub fn is_any(&self) -> bool {
        self.compare == NumericCompare::Any
    }

    pub fn matches(&self, value: Fixed) -> bool {
        self.compare.matches(self.qualifier, value)
    }
}

impl fmt::Display for NumericCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            f.write_str(self.compare.title())
        } else {
            write!(f, "{} {}", self.compare.title(), self.qualifier)
        }
    }
}

/// Numeric criteria over a weight in pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightCriteria(pub NumericCriteria);

impl WeightCriteria {
    pub fn new(compare: NumericCompare, pounds: impl Into<Fixed>) -> Self {
        Self(NumericCriteria::new(compare, pounds))
    }

    pub fn matches(&self, pounds: Fixed) -> bool {
        self.0.matches(pounds)
    }
}

impl fmt::Display for WeightCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_any() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{} lb", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_compare_is_case_insensitive() {
        assert!(StringCriteria::is("Sword").matches("sword"));
        assert!(StringCriteria::is("sword").matches("SWORD"));
        assert!(!StringCriteria::is("Sword").matches("Swords"));
        assert!(StringCriteria::is_not("Sword").matches("Axe"));
    }

    #[test]
    fn test_string_compare_operators() {
        let c = |op, q: &str| StringCriteria::new(op, q);
        assert!(c(StringCompare::Contains, "ORD").matches("Broadsword"));
        assert!(c(StringCompare::DoesNotContain, "axe").matches("Broadsword"));
        assert!(c(StringCompare::StartsWith, "broad").matches("Broadsword"));
        assert!(!c(StringCompare::DoesNotStartWith, "broad").matches("Broadsword"));
        assert!(c(StringCompare::EndsWith, "SWORD").matches("Broadsword"));
        assert!(c(StringCompare::DoesNotEndWith, "axe").matches("Broadsword"));
    }

    #[test]
    fn test_string_edge_cases() {
        // Empty qualifier contained in everything
        assert!(StringCriteria::contains("").matches("anything"));
        assert!(StringCriteria::contains("").matches(""));
        // Any ignores the qualifier
        let any = StringCriteria::new(StringCompare::Any, "ignored");
        assert!(any.matches("whatever"));
    }

    #[test]
    fn test_negation_pairs() {
        for op in StringCompare::all() {
            if op == StringCompare::Any {
                continue;
            }
            assert_ne!(op.is_negated(), op.negate().is_negated());
            assert_eq!(op.negate().negate(), op);
            for data in ["Fire", "fireball", "Water", ""] {
                assert_ne!(op.matches("fire", data), op.negate().matches("fire", data));
            }
        }
    }

    #[test]
    fn test_matches_list() {
        let tags = vec!["Melee".to_string(), "Weapon".to_string()];
        assert!(StringCriteria::is("melee").matches_list(&tags));
        assert!(!StringCriteria::is("ranged").matches_list(&tags));
        // Negated operators need every element to agree
        assert!(!StringCriteria::is_not("melee").matches_list(&tags));
        assert!(StringCriteria::is_not("ranged").matches_list(&tags));
        // Empty list is the empty string
        let none: Vec<String> = vec![];
        assert!(StringCriteria::any().matches_list(&none));
        assert!(!StringCriteria::is("melee").matches_list(&none));
        assert!(StringCriteria::is_not("melee").matches_list(&none));
    }

    #[test]
    fn test_string_descriptions() {
        assert_eq!(StringCriteria::is("Fire").to_string(), "is Fire");
        assert_eq!(StringCriteria::any().to_string(), "is anything");
        assert_eq!(
            StringCriteria::is("Melee")
                .describe_with_prefix("and at least one tag", "and all tags"),
            " and at least one tag is Melee"
        );
        assert_eq!(
            StringCriteria::is_not("Melee")
                .describe_with_prefix("and at least one tag", "and all tags"),
            " and all tags is not Melee"
        );
        assert_eq!(StringCriteria::any().describe_with_prefix("a", "b"), "");
    }

    #[test]
    fn test_numeric_at_least_is_exact() {
        let half = Fixed::parse("1.5").unwrap();
        let c = NumericCriteria::at_least(half);
        assert!(c.matches(half));
        assert!(c.matches(Fixed::from_int(2)));
        assert!(!c.matches(Fixed::parse("1.4999").unwrap()));

        let tenth = Fixed::parse("0.1").unwrap();
        let c = NumericCriteria::exactly(Fixed::parse("0.3").unwrap());
        assert!(c.matches(tenth + tenth + tenth));
    }

    #[test]
    fn test_numeric_operators() {
        let five = Fixed::from_int(5);
        assert!(NumericCriteria::at_most(5i64).matches(five));
        assert!(!NumericCriteria::at_most(4i64).matches(five));
        assert!(NumericCriteria::new(NumericCompare::NotExactly, 4i64).matches(five));
        assert!(NumericCriteria::any().matches(Fixed::from_int(-100)));
    }

    #[test]
    fn test_numeric_descriptions() {
        assert_eq!(NumericCriteria::at_least(1i64).to_string(), "at least 1");
        assert_eq!(NumericCriteria::exactly(2i64).to_string(), "exactly 2");
        assert_eq!(
            WeightCriteria::new(NumericCompare::AtMost, Fixed::parse("2.5").unwrap()).to_string(),
            "at most 2.5 lb"
        );
    }

    #[test]
    fn test_serde_tags() {
        let c: StringCriteria =
            serde_json::from_str(r#"{"compare":"starts","qualifier":"Fire"}"#).unwrap();
        assert_eq!(c.compare, StringCompare::StartsWith);

        let n: NumericCriteria =
            serde_json::from_str(r#"{"compare":"at_least","qualifier":1.5}"#).unwrap();
        assert_eq!(n, NumericCriteria::at_least(Fixed::parse("1.5").unwrap()));

        let n: NumericCriteria =
            serde_json::from_str(r#"{"compare":"exactly","qualifier":3}"#).unwrap();
        assert_eq!(n.compare, NumericCompare::Exactly);
        assert_eq!(
            serde_json::to_string(&n).unwrap(),
            r#"{"compare":"is","qualifier":3}"#
        );
    }

    #[test]
    fn test_serde_rejects_mismatched_qualifier() {
        assert!(serde_json::from_str::<NumericCriteria>(
            r#"{"compare":"at_least","qualifier":"many"}"#
        )
        .is_err());
        let wrong_type = r#"{"compare":"is","qualifier":3}"#;
        assert!(serde_json::from_str::<StringCriteria>(wrong_type).is_err());
        assert!(serde_json::from_str::<StringCriteria>(r#"{"compare":"resembles"}"#).is_err());
    }
}
