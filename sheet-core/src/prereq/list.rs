//! Composite prerequisites.
//!
//! A [`PrereqList`] owns its children outright. Nodes hold no link back to
//! their owner; callers address a node by its [`PrereqPath`] from the root
//! list and ask the root for the parent when they need it.

use super::{EvalFlags, Exclude, Prereq};
use crate::criteria::NumericCriteria;
use crate::entity::Entity;
use crate::nameables::Nameables;
use serde::{Deserialize, Serialize};

/// Child indices leading from a root list to one of its descendants.
///
/// `[2, 0]` is the first child of the root's third child, which must itself
/// be a list.
pub type PrereqPath = Vec<usize>;

/// Indentation inserted after each newline of a nested failure reason.
const NESTED_INDENT: &str = "\n\u{a0}\u{a0}";

/// Combines child prerequisites with all-of or any-of logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrereqList {
    /// Require every child (`true`) or at least one (`false`).
    pub all: bool,
    /// Only enforce the list when the character's tech level matches.
    pub when_tl: NumericCriteria,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prereqs: Vec<Prereq>,
}

impl Default for PrereqList {
    fn default() -> Self {
        Self {
            all: true,
            when_tl: NumericCriteria::any(),
            prereqs: Vec::new(),
        }
    }
}

impl PrereqList {
    pub fn new(all: bool) -> Self {
        Self {
            all,
            ..Self::default()
        }
    }

    /// An empty all-of list.
    pub fn all_of() -> Self {
        Self::new(true)
    }

    /// An empty any-of list.
    pub fn any_of() -> Self {
        Self::new(false)
    }

    pub fn with_when_tl(mut self, when_tl: NumericCriteria) -> Self {
        self.when_tl = when_tl;
        self
    }

    pub fn with(mut self, prereq: impl Into<Prereq>) -> Self {
        self.prereqs.push(prereq.into());
        self
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn len(&self) -> usize {
        self.prereqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prereqs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prereq> {
        self.prereqs.iter()
    }

    /// Append a direct child, returning its path.
    pub fn push(&mut self, prereq: impl Into<Prereq>) -> PrereqPath {
        self.prereqs.push(prereq.into());
        vec![self.prereqs.len() - 1]
    }

    /// The node at `path`. The empty path names the root itself, which is
    /// not a [`Prereq`], so it yields `None`.
    pub fn get(&self, path: &[usize]) -> Option<&Prereq> {
        let (last, parent) = path.split_last()?;
        self.list_at(parent)?.prereqs.get(*last)
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Prereq> {
        let (last, parent) = path.split_last()?;
        self.list_at_mut(parent)?.prereqs.get_mut(*last)
    }

    /// The list owning the node at `path`.
    pub fn parent_of(&self, path: &[usize]) -> Option<&PrereqList> {
        let (last, parent) = path.split_last()?;
        self.list_at(parent).filter(|list| *last < list.len())
    }

    /// The list at `path`, with the empty path naming `self`.
    pub fn list_at(&self, path: &[usize]) -> Option<&PrereqList> {
        path.iter()
            .try_fold(self, |list, &index| list.prereqs.get(index)?.as_list())
    }

    pub fn list_at_mut(&mut self, path: &[usize]) -> Option<&mut PrereqList> {
        path.iter().try_fold(self, |list, &index| {
            list.prereqs.get_mut(index)?.as_list_mut()
        })
    }

    /// Append an independent copy of `prereq` to the list at `parent`.
    ///
    /// Returns the copy's path, or `None` when `parent` does not name a list.
    pub fn insert_clone(&mut self, parent: &[usize], prereq: &Prereq) -> Option<PrereqPath> {
        let list = self.list_at_mut(parent)?;
        list.prereqs.push(prereq.clone());
        let mut path = parent.to_vec();
        path.push(list.prereqs.len() - 1);
        Some(path)
    }

    /// Detach the node at `path`. Later siblings shift down by one.
    pub fn remove(&mut self, path: &[usize]) -> Option<Prereq> {
        let (last, parent) = path.split_last()?;
        let list = self.list_at_mut(parent)?;
        if *last < list.prereqs.len() {
            Some(list.prereqs.remove(*last))
        } else {
            None
        }
    }

    // ========================================================================
    // Nameables
    // ========================================================================

    pub fn fill_with_nameable_keys(&self, registry: &mut Nameables) {
        for prereq in &self.prereqs {
            prereq.fill_with_nameable_keys(registry);
        }
    }

    pub fn apply_nameable_keys(&mut self, registry: &Nameables) {
        for prereq in &mut self.prereqs {
            prereq.apply_nameable_keys(registry);
        }
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Evaluate every child and combine the results.
    ///
    /// Children are never short-circuited so that the tooltip lists every
    /// unmet requirement. Their equipment penalty only reaches `flags` when
    /// the list as a whole fails.
    pub fn satisfied(
        &self,
        entity: &Entity,
        exclude: Exclude<'_>,
        tooltip: Option<&mut String>,
        prefix: &str,
        flags: &mut EvalFlags,
    ) -> bool {
        if !self.when_tl.is_any() && !self.when_tl.matches(entity.tech_level_value()) {
            return true;
        }

        let mut local = tooltip.as_ref().map(|_| String::new());
        let mut child_flags = EvalFlags::default();
        let count = self
            .prereqs
            .iter()
            .filter(|p| p.satisfied(entity, exclude, local.as_mut(), prefix, &mut child_flags))
            .count();

        let satisfied = count == self.prereqs.len() || (!self.all && count > 0);
        if !satisfied {
            if child_flags.has_equipment_penalty {
                flags.has_equipment_penalty = true;
            }
            if let (Some(tip), Some(local)) = (tooltip, local) {
                tip.push_str(prefix);
                tip.push_str(if self.all {
                    "Requires all of:"
                } else {
                    "Requires at least one of:"
                });
                tip.push_str(&local.replace('\n', NESTED_INDENT));
            }
        }
        satisfied
    }
}

impl<'a> IntoIterator for &'a PrereqList {
    type Item = &'a Prereq;
    type IntoIter = std::slice::Iter<'a, Prereq>;

    fn into_iter(self) -> Self::IntoIter {
        self.prereqs.iter()
    }
}
