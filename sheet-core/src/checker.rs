//! One-call prerequisite checks for editors and exporters.
//!
//! Wraps [`PrereqList::satisfied`] with a configured prefix and returns the
//! verdict, the reason text and the equipment penalty together.
//!
//! # Example
//!
//! ```ignore
//! use sheet_core::{CheckerConfig, Exclude, PrereqChecker};
//!
//! let checker = PrereqChecker::new(CheckerConfig::default());
//! let verdict = checker.check(&spell_prereqs, &entity, Exclude::from(&spell));
//! if !verdict.satisfied {
//!     println!("{}", verdict.tooltip.unwrap_or_default());
//! }
//! ```

use crate::entity::{Entity, ItemId};
use crate::prereq::{EvalFlags, Exclude, PrereqList};
use tracing::{debug, instrument, trace};

/// Prefix placed before each failure reason by default.
pub const DEFAULT_PREFIX: &str = "\n● ";

/// How a [`PrereqChecker`] reports failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Text written before each unmet requirement.
    pub prefix: String,
    /// Build the explanation text at all.
    pub collect_tooltip: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            collect_tooltip: true,
        }
    }
}

impl CheckerConfig {
    /// Verdicts only, with no explanation text.
    pub fn silent() -> Self {
        Self {
            collect_tooltip: false,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_collect_tooltip(mut self, collect: bool) -> Self {
        self.collect_tooltip = collect;
        self
    }
}

/// The outcome of checking one prerequisite list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub satisfied: bool,
    /// Why the list failed, with leading whitespace removed. `None` when
    /// satisfied or when tooltips are not collected.
    pub tooltip: Option<String>,
    /// An equipped-equipment requirement went unmet.
    pub has_equipment_penalty: bool,
}

/// Evaluates prerequisite lists with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct PrereqChecker {
    config: CheckerConfig,
}

impl PrereqChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check `list` on behalf of the record named by `exclude`.
    #[instrument(level = "debug", skip_all, fields(owner = ?exclude.id(), children = list.len()))]
    pub fn check(&self, list: &PrereqList, entity: &Entity, exclude: Exclude<'_>) -> Verdict {
        let mut flags = EvalFlags::default();
        let mut tooltip = String::new();
        let satisfied = list.satisfied(
            entity,
            exclude,
            self.config.collect_tooltip.then_some(&mut tooltip),
            &self.config.prefix,
            &mut flags,
        );

        let tooltip = if satisfied || tooltip.is_empty() {
            None
        } else {
            Some(tooltip.trim_start().to_string())
        };
        if let Some(text) = &tooltip {
            trace!(tooltip = %text, "unmet requirements");
        }
        debug!(
            satisfied,
            equipment_penalty = flags.has_equipment_penalty,
            "prerequisites checked"
        );

        Verdict {
            satisfied,
            tooltip,
            has_equipment_penalty: flags.has_equipment_penalty,
        }
    }

    /// Check several owners' lists against one entity.
    ///
    /// Returns the verdicts that failed, keyed by their owner's id, in input
    /// order. Owners given as [`Exclude::None`] have no id and are reported
    /// under `None`.
    pub fn check_all<'a, I>(&self, entity: &Entity, owners: I) -> Vec<(Option<ItemId>, Verdict)>
    where
        I: IntoIterator<Item = (Exclude<'a>, &'a PrereqList)>,
    {
        let failed: Vec<_> = owners
            .into_iter()
            .map(|(exclude, list)| (exclude.id(), self.check(list, entity, exclude)))
            .filter(|(_, verdict)| !verdict.satisfied)
            .collect();
        debug!(failed = failed.len(), "checked all owners");
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{NumericCriteria, StringCriteria};
    use crate::entity::{EntityBuilder, Equipment, Spell};
    use crate::prereq::{AttributePrereq, EquippedEquipmentPrereq, SpellPrereq, SpellSubType};

    fn entity() -> Entity {
        EntityBuilder::new()
            .name("Test")
            .attribute("iq", 12i64)
            .spell(Spell::new("Ignite Fire").with_college("Fire"))
            .equipment(Equipment::new("Staff"))
            .build()
            .expect("valid entity")
    }

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::default();
        assert_eq!(config.prefix, "\n● ");
        assert!(config.collect_tooltip);
        assert!(!CheckerConfig::silent().collect_tooltip);
    }

    #[test]
    fn test_check_trims_leading_whitespace() {
        let entity = entity();
        let list = PrereqList::all_of()
            .with(AttributePrereq::new("iq", NumericCriteria::at_least(13i64)))
            .with(EquippedEquipmentPrereq::named("Wand"));
        let verdict = PrereqChecker::default().check(&list, &entity, Exclude::None);
        assert!(!verdict.satisfied);
        assert!(verdict.has_equipment_penalty);
        let tooltip = verdict.tooltip.expect("tooltip collected");
        assert!(tooltip.starts_with("● Requires all of:"));
        assert!(tooltip.contains("Has IQ which at least 13"));
    }

    #[test]
    fn test_satisfied_or_silent_has_no_tooltip() {
        let entity = entity();
        let list = PrereqList::all_of().with(EquippedEquipmentPrereq::named("Staff"));
        let verdict = PrereqChecker::default().check(&list, &entity, Exclude::None);
        assert_eq!(
            verdict,
            Verdict {
                satisfied: true,
                tooltip: None,
                has_equipment_penalty: false
            }
        );

        let failing = PrereqList::all_of().with(EquippedEquipmentPrereq::named("Wand"));
        let verdict =
            PrereqChecker::new(CheckerConfig::silent()).check(&failing, &entity, Exclude::None);
        assert!(!verdict.satisfied);
        assert!(verdict.tooltip.is_none());
        assert!(verdict.has_equipment_penalty);
    }

    #[test]
    fn test_check_all_reports_failures_by_owner() {
        let entity = entity();
        let needs_fire = PrereqList::all_of().with(SpellPrereq::new(
            SpellSubType::College,
            StringCriteria::is("Fire"),
            NumericCriteria::at_least(1i64),
        ));
        let fireball = Spell::new("Fireball").with_college("Fire");
        let ignite = &entity.spells[0];

        let failed = PrereqChecker::new(CheckerConfig::default().with_prefix("\n- ")).check_all(
            &entity,
            [
                (Exclude::from(&fireball), &needs_fire),
                (Exclude::from(ignite), &needs_fire),
            ],
        );
        // Ignite Fire cannot count itself
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, Some(ignite.id));
        let tooltip = failed[0].1.tooltip.as_deref().unwrap_or_default();
        assert!(tooltip.starts_with("- Requires all of:"));
    }
}
