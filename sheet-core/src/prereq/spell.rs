use super::{default_true, has_text, Exclude};
use crate::criteria::{NumericCriteria, StringCriteria};
use crate::entity::Entity;
use crate::fixed::Fixed;
use crate::nameables::{self, Nameables};
use crate::traverse::{traverse, TraverseOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which aspect of a spell a [`SpellPrereq`] counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellSubType {
    #[default]
    Name,
    Tag,
    College,
    CollegeCount,
    Any,
}

impl SpellSubType {
    pub fn all() -> [SpellSubType; 5] {
        [
            SpellSubType::Name,
            SpellSubType::Tag,
            SpellSubType::College,
            SpellSubType::CollegeCount,
            SpellSubType::Any,
        ]
    }

    /// Whether the string qualifier takes part in matching.
    pub fn uses_string_criteria(&self) -> bool {
        matches!(
            self,
            SpellSubType::Name | SpellSubType::Tag | SpellSubType::College
        )
    }

    pub fn title(&self) -> &'static str {
        match self {
            SpellSubType::Name => "whose name",
            SpellSubType::Tag => "whose tag",
            SpellSubType::College => "whose college",
            SpellSubType::CollegeCount => "college count",
            SpellSubType::Any => "of any kind",
        }
    }
}

impl fmt::Display for SpellSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Requires (or forbids) a number of known spells.
///
/// Only spells with points spent count. When the prerequisite belongs to a
/// spell, candidates declaring a different tech level are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellPrereq {
    #[serde(default = "default_true")]
    pub has: bool,
    pub sub_type: SpellSubType,
    pub qualifier: StringCriteria,
    pub quantity: NumericCriteria,
}

impl Default for SpellPrereq {
    fn default() -> Self {
        Self {
            has: true,
            sub_type: SpellSubType::Name,
            qualifier: StringCriteria::is(""),
            quantity: NumericCriteria::at_least(Fixed::ONE),
        }
    }
}

impl SpellPrereq {
    pub fn new(
        sub_type: SpellSubType,
        qualifier: StringCriteria,
        quantity: NumericCriteria,
    ) -> Self {
        Self {
            sub_type,
            qualifier,
            quantity,
            ..Self::default()
        }
    }

    pub fn with_has(mut self, has: bool) -> Self {
        self.has = has;
        self
    }

    pub fn fill_with_nameable_keys(&self, registry: &mut Nameables) {
        if self.sub_type.uses_string_criteria() {
            nameables::extract(&self.qualifier.qualifier, registry);
        }
    }

    pub fn apply_nameable_keys(&mut self, registry: &Nameables) {
        if self.sub_type.uses_string_criteria() {
            self.qualifier.qualifier = nameables::apply(&self.qualifier.qualifier, registry);
        }
    }

    /// Number of spells (or distinct colleges) this prerequisite counts.
    fn count(&self, entity: &Entity, exclude: Exclude<'_>) -> usize {
        let tech_level = match exclude {
            Exclude::Spell(sp) => sp.tech_level.as_deref(),
            _ => None,
        };

        let mut count = 0usize;
        let mut colleges = BTreeSet::new();
        traverse(
            &entity.spells,
            TraverseOptions::default().matching_tech_level(tech_level),
            |sp| {
                if exclude.is(sp) || sp.points.is_zero() {
                    return false;
                }
                let hit = match self.sub_type {
                    SpellSubType::Name => self.qualifier.matches(&sp.name),
                    SpellSubType::Tag => sp.tags.iter().any(|t| self.qualifier.matches(t)),
                    SpellSubType::College => {
                        sp.college.iter().any(|c| self.qualifier.matches(c))
                    }
                    SpellSubType::CollegeCount => {
                        colleges.extend(sp.college.iter().map(|c| c.to_lowercase()));
                        false
                    }
                    SpellSubType::Any => true,
                };
                if hit {
                    count += 1;
                }
                false
            },
        );

        if self.sub_type == SpellSubType::CollegeCount {
            colleges.len()
        } else {
            count
        }
    }

    pub fn satisfied(
        &self,
        entity: &Entity,
        exclude: Exclude<'_>,
        tooltip: Option<&mut String>,
        prefix: &str,
    ) -> bool {
        let count = self.count(entity, exclude);
        let mut satisfied = self.quantity.matches(Fixed::from(count));
        if !self.has {
            satisfied = !satisfied;
        }

        if !satisfied {
            if let Some(tip) = tooltip {
                tip.push_str(prefix);
                tip.push_str(has_text(self.has));
                tip.push(' ');
                if self.sub_type == SpellSubType::CollegeCount {
                    tip.push_str("college count which ");
                    tip.push_str(&self.quantity.to_string());
                } else {
                    tip.push_str(&self.quantity.to_string());
                    if self.quantity.qualifier == Fixed::ONE {
                        tip.push_str(" spell ");
                    } else {
                        tip.push_str(" spells ");
                    }
                    tip.push_str(self.sub_type.title());
                    if self.sub_type != SpellSubType::Any {
                        tip.push(' ');
                        tip.push_str(&self.qualifier.to_string());
                    }
                }
            }
        }
        satisfied
    }
}
