//! Rules core for a point-buy tabletop RPG character sheet.
//!
//! This crate provides:
//! - String and numeric comparison criteria with exact decimal arithmetic
//! - Prerequisite trees over traits, skills, spells, attributes and equipment
//! - Human-readable explanations of why a prerequisite is unmet
//! - Nameable-key templating for prerequisite text
//! - JSON persistence of prerequisite documents and sheets
//!
//! # Quick Start
//!
//! ```ignore
//! use sheet_core::{
//!     CheckerConfig, EntityBuilder, Exclude, NumericCriteria, PrereqChecker, PrereqList,
//!     SpellPrereq, SpellSubType, StringCriteria,
//! };
//!
//! let entity = EntityBuilder::new().name("Mira").build()?;
//! let prereqs = PrereqList::all_of().with(SpellPrereq::new(
//!     SpellSubType::College,
//!     StringCriteria::is("Fire"),
//!     NumericCriteria::at_least(1i64),
//! ));
//!
//! let checker = PrereqChecker::new(CheckerConfig::default());
//! let verdict = checker.check(&prereqs, &entity, Exclude::None);
//! assert!(!verdict.satisfied);
//! ```

pub mod checker;
pub mod criteria;
pub mod entity;
pub mod fixed;
pub mod nameables;
pub mod persist;
pub mod prereq;
pub mod traverse;

// Primary public API
pub use checker::{CheckerConfig, PrereqChecker, Verdict};
pub use criteria::{
    NumericCompare, NumericCriteria, StringCompare, StringCriteria, WeightCriteria,
};
pub use entity::{
    Attribute, BuilderError, Entity, EntityBuilder, Equipment, ItemId, Skill, Spell, Trait,
    TraitModifier,
};
pub use fixed::{Fixed, FixedError};
pub use nameables::Nameables;
pub use persist::{PersistError, PrereqDocument};
pub use prereq::{
    AttributePrereq, ContainedQuantityPrereq, ContainedWeightPrereq, EquippedEquipmentPrereq,
    EvalFlags, Exclude, Prereq, PrereqList, PrereqPath, PrereqType, SkillPrereq, SpellPrereq,
    SpellSubType, TraitModifierPrereq, TraitPrereq,
};
pub use traverse::{traverse, Node, TraverseOptions};
