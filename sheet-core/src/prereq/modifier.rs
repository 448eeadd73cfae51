use super::{default_true, has_text, Exclude};
use crate::criteria::StringCriteria;
use crate::entity::Entity;
use crate::nameables::{self, Nameables};
use crate::traverse::{traverse, TraverseOptions};
use serde::{Deserialize, Serialize};

/// Requires (or forbids) an enabled modifier on one of the character's
/// enabled traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraitModifierPrereq {
    #[serde(default = "default_true")]
    pub has: bool,
    pub name: StringCriteria,
    pub notes: StringCriteria,
}

impl Default for TraitModifierPrereq {
    fn default() -> Self {
        Self {
            has: true,
            name: StringCriteria::is(""),
            notes: StringCriteria::any(),
        }
    }
}

impl TraitModifierPrereq {
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
        let mut satisfied = traverse(
            &entity.traits,
            TraverseOptions::default()
                .including_containers()
                .skipping_disabled(),
            |t| {
                if exclude.is(t) {
                    return false;
                }
                traverse(
                    &t.modifiers,
                    TraverseOptions::default().skipping_disabled(),
                    |m| {
                        !exclude.is(m) && self.name.matches(&m.name) && self.notes.matches(&m.notes)
                    },
                )
            },
        );

        if !self.has {
            satisfied = !satisfied;
        }

        if !satisfied {
            if let Some(tip) = tooltip {
                tip.push_str(prefix);
                tip.push_str(has_text(self.has));
                tip.push_str(" a trait modifier whose name ");
                tip.push_str(&self.name.to_string());
                if !self.notes.is_any() {
                    tip.push_str(" and whose notes ");
                    tip.push_str(&self.notes.to_string());
                }
            }
        }
        satisfied
    }
}
