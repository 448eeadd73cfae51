//! Depth-first walks over the sheet's nested lists.
//!
//! Traits, modifiers, skills, spells and equipment are all forests of
//! containers. Prerequisites search them with [`traverse`], choosing
//! through the visit closure's return value whether the walk stops at the
//! first hit or keeps counting.

use crate::entity::{Equipment, ItemId, Skill, Spell, Trait, TraitModifier};

/// A record that can appear in a sheet forest.
pub trait Node: Sized {
    fn id(&self) -> ItemId;

    fn children(&self) -> &[Self];

    fn is_container(&self) -> bool;

    /// The record's declared tech level, if it has one.
    fn tech_level(&self) -> Option<&str> {
        None
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// How a walk treats containers, tech levels and disabled records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraverseOptions<'a> {
    /// Visit container records themselves. Their children are walked
    /// either way.
    pub include_containers: bool,
    /// Skip records that declare a different tech level. Records without
    /// one always pass, and children of a skipped record are still walked.
    pub tech_level: Option<&'a str>,
    /// Prune disabled records together with everything beneath them.
    pub skip_disabled: bool,
}

impl<'a> TraverseOptions<'a> {
    pub fn including_containers(mut self) -> Self {
        self.include_containers = true;
        self
    }

    pub fn matching_tech_level(mut self, tl: Option<&'a str>) -> Self {
        self.tech_level = tl;
        self
    }

    pub fn skipping_disabled(mut self) -> Self {
        self.skip_disabled = true;
        self
    }

    fn admits<T: Node>(&self, node: &T) -> bool {
        if node.is_container() && !self.include_containers {
            return false;
        }
        match (self.tech_level, node.tech_level()) {
            (Some(want), Some(have)) => want == have,
            _ => true,
        }
    }
}

/// Walk `roots` depth-first in pre-order, calling `visit` on each admitted
/// record.
///
/// `visit` returning `true` ends the whole walk at once. Returns whether
/// the walk was stopped that way.
pub fn traverse<'n, T: Node>(
    roots: &'n [T],
    options: TraverseOptions<'_>,
    mut visit: impl FnMut(&'n T) -> bool,
) -> bool {
    walk(roots, &options, &mut visit)
}

fn walk<'n, T: Node, F: FnMut(&'n T) -> bool>(
    nodes: &'n [T],
    options: &TraverseOptions<'_>,
    visit: &mut F,
) -> bool {
    for node in nodes {
        if options.skip_disabled && !node.is_enabled() {
            continue;
        }
        if options.admits(node) && visit(node) {
            return true;
        }
        if walk(node.children(), options, visit) {
            return true;
        }
    }
    false
}

// ============================================================================
// Node implementations
// ============================================================================

impl Node for Trait {
    fn id(&self) -> ItemId {
        self.id
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Node for TraitModifier {
    fn id(&self) -> ItemId {
        self.id
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Node for Skill {
    fn id(&self) -> ItemId {
        self.id
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn tech_level(&self) -> Option<&str> {
        self.tech_level.as_deref()
    }
}

impl Node for Spell {
    fn id(&self) -> ItemId {
        self.id
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn tech_level(&self) -> Option<&str> {
        self.tech_level.as_deref()
    }
}

impl Node for Equipment {
    fn id(&self) -> ItemId {
        self.id
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn is_container(&self) -> bool {
        self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack() -> Vec<Equipment> {
        vec![
            Equipment::container("Backpack")
                .with_child(Equipment::new("Rope"))
                .with_child(
                    Equipment::container("Pouch")
                        .with_child(Equipment::new("Flint"))
                        .with_child(Equipment::container("Empty Box")),
                ),
            Equipment::new("Sword"),
        ]
    }

    fn names(items: &[Equipment], options: TraverseOptions<'_>) -> Vec<String> {
        let mut seen = Vec::new();
        traverse(items, options, |e| {
            seen.push(e.name.clone());
            false
        });
        seen
    }

    #[test]
    fn test_pre_order_with_containers() {
        assert_eq!(
            names(&pack(), TraverseOptions::default().including_containers()),
            vec!["Backpack", "Rope", "Pouch", "Flint", "Empty Box", "Sword"]
        );
    }

    #[test]
    fn test_containers_skipped_but_descended() {
        assert_eq!(
            names(&pack(), TraverseOptions::default()),
            vec!["Rope", "Flint", "Sword"]
        );
    }

    #[test]
    fn test_stop_early() {
        let items = pack();
        let mut visited = 0;
        let stopped = traverse(&items, TraverseOptions::default(), |e| {
            visited += 1;
            e.name == "Flint"
        });
        assert!(stopped);
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_empty_forest() {
        let none: Vec<Spell> = Vec::new();
        assert!(!traverse(&none, TraverseOptions::default(), |_| true));
    }

    #[test]
    fn test_tech_level_filter() {
        let skills = vec![
            Skill::new("Electronics Operation", 12i64).with_tech_level("8"),
            Skill::new("Electronics Operation", 14i64).with_tech_level("7"),
            Skill::new("Brawling", 13i64),
            Skill::container("Tech")
                .with_tech_level("7")
                .with_child(Skill::new("Computer Operation", 11i64).with_tech_level("8")),
        ];
        let mut seen = Vec::new();
        traverse(
            &skills,
            TraverseOptions::default()
                .including_containers()
                .matching_tech_level(Some("8")),
            |s| {
                seen.push(s.name.as_str());
                false
            },
        );
        assert_eq!(
            seen,
            vec!["Electronics Operation", "Brawling", "Computer Operation"]
        );
    }

    #[test]
    fn test_skip_disabled_prunes_subtree() {
        let traits = vec![
            Trait::container("Racial")
                .disabled()
                .with_child(Trait::new("Night Vision")),
            Trait::new("Luck"),
        ];
        let mut seen = Vec::new();
        traverse(&traits, TraverseOptions::default().skipping_disabled(), |t| {
            seen.push(t.name.clone());
            false
        });
        assert_eq!(seen, vec!["Luck"]);

        let mut all = Vec::new();
        traverse(&traits, TraverseOptions::default(), |t| {
            all.push(t.name.clone());
            false
        });
        assert_eq!(all, vec!["Night Vision", "Luck"]);
    }
}
