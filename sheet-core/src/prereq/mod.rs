//! Prerequisites and their satisfaction protocol.
//!
//! A prerequisite is a node in a tree rooted at a [`PrereqList`]. Each
//! variant searches one part of the character sheet and answers with a
//! boolean. When a tooltip buffer is supplied, failing nodes append a
//! human-readable reason to it. An unmet prerequisite is an ordinary
//! outcome; evaluation itself cannot fail.
//!
//! # Example
//!
//! ```ignore
//! let mut flags = EvalFlags::default();
//! let mut tooltip = String::new();
//! let ok = list.satisfied(&entity, Exclude::None, Some(&mut tooltip), "\n● ", &mut flags);
//! ```

mod attribute;
mod contained;
mod equipment;
mod list;
mod modifier;
mod skill;
mod spell;
mod traits;

pub use attribute::AttributePrereq;
pub use contained::{ContainedQuantityPrereq, ContainedWeightPrereq};
pub use equipment::EquippedEquipmentPrereq;
pub use list::{PrereqList, PrereqPath};
pub use modifier::TraitModifierPrereq;
pub use skill::SkillPrereq;
pub use spell::{SpellPrereq, SpellSubType};
pub use traits::TraitPrereq;

use crate::entity::{Entity, Equipment, ItemId, Skill, Spell, Trait, TraitModifier};
use crate::nameables::Nameables;
use crate::traverse::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) fn default_true() -> bool {
    true
}

/// "Has" or "Does not have", for tooltip sentences.
pub fn has_text(has: bool) -> &'static str {
    if has {
        "Has"
    } else {
        "Does not have"
    }
}

// ============================================================================
// Evaluation context
// ============================================================================

/// Side results accumulated over one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalFlags {
    /// Set when an equipped-equipment prerequisite went unmet. A later
    /// step applies the penalty.
    pub has_equipment_penalty: bool,
}

/// The record whose own prerequisites are being checked.
///
/// Compared by id against every candidate so a record never satisfies its
/// own prerequisite.
#[derive(Debug, Clone, Copy, Default)]
pub enum Exclude<'a> {
    #[default]
    None,
    Trait(&'a Trait),
    Modifier(&'a TraitModifier),
    Skill(&'a Skill),
    Spell(&'a Spell),
    Equipment(&'a Equipment),
}

impl<'a> Exclude<'a> {
    pub fn id(&self) -> Option<ItemId> {
        match self {
            Exclude::None => None,
            Exclude::Trait(t) => Some(t.id),
            Exclude::Modifier(m) => Some(m.id),
            Exclude::Skill(s) => Some(s.id),
            Exclude::Spell(s) => Some(s.id),
            Exclude::Equipment(e) => Some(e.id),
        }
    }

    /// Whether `node` is the excluded record.
    pub fn is<T: Node>(&self, node: &T) -> bool {
        self.id() == Some(node.id())
    }
}

impl<'a> From<&'a Trait> for Exclude<'a> {
    fn from(value: &'a Trait) -> Self {
        Exclude::Trait(value)
    }
}

impl<'a> From<&'a TraitModifier> for Exclude<'a> {
    fn from(value: &'a TraitModifier) -> Self {
        Exclude::Modifier(value)
    }
}

impl<'a> From<&'a Skill> for Exclude<'a> {
    fn from(value: &'a Skill) -> Self {
        Exclude::Skill(value)
    }
}

impl<'a> From<&'a Spell> for Exclude<'a> {
    fn from(value: &'a Spell) -> Self {
        Exclude::Spell(value)
    }
}

impl<'a> From<&'a Equipment> for Exclude<'a> {
    fn from(value: &'a Equipment) -> Self {
        Exclude::Equipment(value)
    }
}

// ============================================================================
// Prerequisite types
// ============================================================================

/// Identifies a prerequisite variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrereqType {
    PrereqList,
    TraitPrereq,
    TraitModifierPrereq,
    AttributePrereq,
    ContainedQuantityPrereq,
    ContainedWeightPrereq,
    EquippedEquipment,
    SkillPrereq,
    SpellPrereq,
}

impl PrereqType {
    pub fn all() -> [PrereqType; 9] {
        [
            PrereqType::PrereqList,
            PrereqType::TraitPrereq,
            PrereqType::TraitModifierPrereq,
            PrereqType::AttributePrereq,
            PrereqType::ContainedQuantityPrereq,
            PrereqType::ContainedWeightPrereq,
            PrereqType::EquippedEquipment,
            PrereqType::SkillPrereq,
            PrereqType::SpellPrereq,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrereqType::PrereqList => "a list",
            PrereqType::TraitPrereq => "a trait",
            PrereqType::TraitModifierPrereq => "a trait modifier",
            PrereqType::AttributePrereq => "an attribute",
            PrereqType::ContainedQuantityPrereq => "a contained quantity",
            PrereqType::ContainedWeightPrereq => "a contained weight",
            PrereqType::EquippedEquipment => "equipped equipment",
            PrereqType::SkillPrereq => "a skill",
            PrereqType::SpellPrereq => "spell(s)",
        }
    }
}

impl fmt::Display for PrereqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single prerequisite node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Prereq {
    #[serde(rename = "prereq_list")]
    List(PrereqList),
    #[serde(rename = "trait_prereq")]
    Trait(TraitPrereq),
    #[serde(rename = "trait_modifier_prereq")]
    TraitModifier(TraitModifierPrereq),
    #[serde(rename = "attribute_prereq")]
    Attribute(AttributePrereq),
    #[serde(rename = "contained_quantity_prereq")]
    ContainedQuantity(ContainedQuantityPrereq),
    #[serde(rename = "contained_weight_prereq")]
    ContainedWeight(ContainedWeightPrereq),
    #[serde(rename = "equipped_equipment")]
    EquippedEquipment(EquippedEquipmentPrereq),
    #[serde(rename = "skill_prereq")]
    Skill(SkillPrereq),
    #[serde(rename = "spell_prereq")]
    Spell(SpellPrereq),
}

impl Prereq {
    /// Create a prerequisite of the given type with default criteria.
    pub fn new(kind: PrereqType) -> Self {
        match kind {
            PrereqType::PrereqList => Prereq::List(PrereqList::default()),
            PrereqType::TraitPrereq => Prereq::Trait(TraitPrereq::default()),
            PrereqType::TraitModifierPrereq => {
                Prereq::TraitModifier(TraitModifierPrereq::default())
            }
            PrereqType::AttributePrereq => Prereq::Attribute(AttributePrereq::default()),
            PrereqType::ContainedQuantityPrereq => {
                Prereq::ContainedQuantity(ContainedQuantityPrereq::default())
            }
            PrereqType::ContainedWeightPrereq => {
                Prereq::ContainedWeight(ContainedWeightPrereq::default())
            }
            PrereqType::EquippedEquipment => {
                Prereq::EquippedEquipment(EquippedEquipmentPrereq::default())
            }
            PrereqType::SkillPrereq => Prereq::Skill(SkillPrereq::default()),
            PrereqType::SpellPrereq => Prereq::Spell(SpellPrereq::default()),
        }
    }

    pub fn prereq_type(&self) -> PrereqType {
        match self {
            Prereq::List(_) => PrereqType::PrereqList,
            Prereq::Trait(_) => PrereqType::TraitPrereq,
            Prereq::TraitModifier(_) => PrereqType::TraitModifierPrereq,
            Prereq::Attribute(_) => PrereqType::AttributePrereq,
            Prereq::ContainedQuantity(_) => PrereqType::ContainedQuantityPrereq,
            Prereq::ContainedWeight(_) => PrereqType::ContainedWeightPrereq,
            Prereq::EquippedEquipment(_) => PrereqType::EquippedEquipment,
            Prereq::Skill(_) => PrereqType::SkillPrereq,
            Prereq::Spell(_) => PrereqType::SpellPrereq,
        }
    }

    pub fn as_list(&self) -> Option<&PrereqList> {
        match self {
            Prereq::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut PrereqList> {
        match self {
            Prereq::List(list) => Some(list),
            _ => None,
        }
    }

    /// Evaluate this node against `entity`.
    ///
    /// On failure, and only if `tooltip` is given, a reason starting with
    /// `prefix` is appended to it.
    pub fn satisfied(
        &self,
        entity: &Entity,
        exclude: Exclude<'_>,
        tooltip: Option<&mut String>,
        prefix: &str,
        flags: &mut EvalFlags,
    ) -> bool {
        match self {
            Prereq::List(p) => p.satisfied(entity, exclude, tooltip, prefix, flags),
            Prereq::Trait(p) => p.satisfied(entity, exclude, tooltip, prefix),
            Prereq::TraitModifier(p) => p.satisfied(entity, exclude, tooltip, prefix),
            Prereq::Attribute(p) => p.satisfied(entity, tooltip, prefix),
            Prereq::ContainedQuantity(p) => p.satisfied(exclude, tooltip, prefix),
            Prereq::ContainedWeight(p) => p.satisfied(exclude, tooltip, prefix),
            Prereq::EquippedEquipment(p) => p.satisfied(entity, exclude, tooltip, prefix, flags),
            Prereq::Skill(p) => p.satisfied(entity, exclude, tooltip, prefix),
            Prereq::Spell(p) => p.satisfied(entity, exclude, tooltip, prefix),
        }
    }

    /// Collect the nameable keys used by this node's text qualifiers.
    pub fn fill_with_nameable_keys(&self, registry: &mut Nameables) {
        match self {
            Prereq::List(p) => p.fill_with_nameable_keys(registry),
            Prereq::Trait(p) => p.fill_with_nameable_keys(registry),
            Prereq::TraitModifier(p) => p.fill_with_nameable_keys(registry),
            Prereq::EquippedEquipment(p) => p.fill_with_nameable_keys(registry),
            Prereq::Skill(p) => p.fill_with_nameable_keys(registry),
            Prereq::Spell(p) => p.fill_with_nameable_keys(registry),
            Prereq::Attribute(_) | Prereq::ContainedQuantity(_) | Prereq::ContainedWeight(_) => {}
        }
    }

    /// Substitute nameable keys into this node's text qualifiers.
    pub fn apply_nameable_keys(&mut self, registry: &Nameables) {
        match self {
            Prereq::List(p) => p.apply_nameable_keys(registry),
            Prereq::Trait(p) => p.apply_nameable_keys(registry),
            Prereq::TraitModifier(p) => p.apply_nameable_keys(registry),
            Prereq::EquippedEquipment(p) => p.apply_nameable_keys(registry),
            Prereq::Skill(p) => p.apply_nameable_keys(registry),
            Prereq::Spell(p) => p.apply_nameable_keys(registry),
            Prereq::Attribute(_) | Prereq::ContainedQuantity(_) | Prereq::ContainedWeight(_) => {}
        }
    }
}

impl From<PrereqList> for Prereq {
    fn from(value: PrereqList) -> Self {
        Prereq::List(value)
    }
}

impl From<TraitPrereq> for Prereq {
    fn from(value: TraitPrereq) -> Self {
        Prereq::Trait(value)
    }
}

impl From<TraitModifierPrereq> for Prereq {
    fn from(value: TraitModifierPrereq) -> Self {
        Prereq::TraitModifier(value)
    }
}

impl From<AttributePrereq> for Prereq {
    fn from(value: AttributePrereq) -> Self {
        Prereq::Attribute(value)
    }
}

impl From<ContainedQuantityPrereq> for Prereq {
    fn from(value: ContainedQuantityPrereq) -> Self {
        Prereq::ContainedQuantity(value)
    }
}

impl From<ContainedWeightPrereq> for Prereq {
    fn from(value: ContainedWeightPrereq) -> Self {
        Prereq::ContainedWeight(value)
    }
}

impl From<EquippedEquipmentPrereq> for Prereq {
    fn from(value: EquippedEquipmentPrereq) -> Self {
        Prereq::EquippedEquipment(value)
    }
}

impl From<SkillPrereq> for Prereq {
    fn from(value: SkillPrereq) -> Self {
        Prereq::Skill(value)
    }
}

impl From<SpellPrereq> for Prereq {
    fn from(value: SpellPrereq) -> Self {
        Prereq::Spell(value)
    }
}
