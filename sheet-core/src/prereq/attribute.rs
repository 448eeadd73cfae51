use super::{default_true, has_text};
use crate::criteria::NumericCriteria;
use crate::entity::Entity;
use serde::{Deserialize, Serialize};

/// Requires an attribute, optionally summed with a second one, to meet a
/// numeric threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributePrereq {
    #[serde(default = "default_true")]
    pub has: bool,
    pub which: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_with: Option<String>,
    pub qualifier: NumericCriteria,
}

impl Default for AttributePrereq {
    fn default() -> Self {
        Self {
            has: true,
            which: "st".to_string(),
            combined_with: None,
            qualifier: NumericCriteria::at_least(10i64),
        }
    }
}

impl AttributePrereq {
    pub fn new(which: impl Into<String>, qualifier: NumericCriteria) -> Self {
        Self {
            which: which.into(),
            qualifier,
            ..Self::default()
        }
    }

    pub fn combined_with(mut self, other: impl Into<String>) -> Self {
        self.combined_with = Some(other.into());
        self
    }

    pub fn with_has(mut self, has: bool) -> Self {
        self.has = has;
        self
    }

    pub fn satisfied(&self, entity: &Entity, tooltip: Option<&mut String>, prefix: &str) -> bool {
        let value = match &self.combined_with {
            Some(other) => entity
                .attribute_value(&self.which)
                .zip(entity.attribute_value(other))
                .map(|(a, b)| a + b),
            None => entity.attribute_value(&self.which),
        };

        // An attribute the sheet does not define matches nothing.
        let mut satisfied = value.is_some_and(|v| self.qualifier.matches(v));
        if !self.has {
            satisfied = !satisfied;
        }

        if !satisfied {
            if let Some(tip) = tooltip {
                tip.push_str(prefix);
                tip.push_str(has_text(self.has));
                tip.push(' ');
                tip.push_str(&entity.attribute_name(&self.which));
                if let Some(other) = &self.combined_with {
                    tip.push_str(" combined with ");
                    tip.push_str(&entity.attribute_name(other));
                }
                tip.push_str(" which ");
                tip.push_str(&self.qualifier.to_string());
            }
        }
        satisfied
    }
}
