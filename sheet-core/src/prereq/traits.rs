use super::{default_true, has_text, Exclude};
use crate::criteria::{NumericCriteria, StringCriteria};
use crate::entity::Entity;
use crate::fixed::Fixed;
use crate::nameables::{self, Nameables};
use crate::traverse::{traverse, TraverseOptions};
use serde::{Deserialize, Serialize};

/// Requires (or forbids) a trait matching name, notes and level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitPrereq {
    #[serde(default = "default_true")]
    pub has: bool,
    pub name: StringCriteria,
    pub level: NumericCriteria,
    pub notes: StringCriteria,
}

impl Default for TraitPrereq {
    fn default() -> Self {
        Self {
            has: true,
            name: StringCriteria::is(""),
            level: NumericCriteria::at_least(Fixed::ZERO),
            notes: StringCriteria::any(),
        }
    }
}

impl TraitPrereq {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: StringCriteria::is(name),
            ..Self::default()
        }
    }

    pub fn with_has(mut self, has: bool) -> Self {
        self.has = has;
        self
    }

    pub fn with_level(mut self, level: NumericCriteria) -> Self {
        self.level = level;
        self
    }

    pub fn with_notes(mut self, notes: StringCriteria) -> Self {
        self.notes = notes;
        self
    }

    pub fn fill_with_nameable_keys(&self, registry: &mut Nameables) {
        nameables::extract(&self.name.qualifier, registry);
        nameables::extract(&self.notes.qualifier, registry);
    }

    pub fn apply_nameable_keys(&mut self, registry: &Nameables) {
        self.name.qualifier = nameables::apply(&self.name.qualifier, registry);
        self.notes.qualifier = nameables::apply(&self.notes.qualifier, registry);
    }

    pub fn satisfied(
        &self,
        entity: &Entity,
        exclude: Exclude<'_>,
        tooltip: Option<&mut String>,
        prefix: &str,
    ) -> bool {
        let mut satisfied = false;
        traverse(
            &entity.traits,
            TraverseOptions::default()
                .including_containers()
                .skipping_disabled(),
            |t| {
                if exclude.is(t) || !self.name.matches(&t.name) {
                    return false;
                }
                if !self.notes.matches(&t.combined_notes()) {
                    return false;
                }
                satisfied = self.level.matches(t.current_levels());
                satisfied
            },
        );

        if !self.has {
            satisfied = !satisfied;
        }

        if !satisfied {
            if let Some(tip) = tooltip {
                tip.push_str(prefix);
                tip.push_str(has_text(self.has));
                tip.push_str(" a trait whose name ");
                tip.push_str(&self.name.to_string());
                if !self.notes.is_any() {
                    tip.push_str(" and whose notes ");
                    tip.push_str(&self.notes.to_string());
                }
                if !self.level.is_any() && self.level != NumericCriteria::at_least(Fixed::ZERO) {
                    tip.push_str(" and level ");
                    tip.push_str(&self.level.to_string());
                }
            }
        }
        satisfied
    }
}
