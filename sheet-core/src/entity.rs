//! Character sheet types consumed by the rules core.
//!
//! Contains the records a prerequisite can inspect: attributes, traits and
//! their modifiers, skills, spells and carried equipment. Every list is a
//! forest; containers hold children of their own kind. The rules core only
//! reads these.

use crate::fixed::Fixed;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for any sheet record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_true() -> bool {
    true
}

fn default_quantity() -> Fixed {
    Fixed::ONE
}

// ============================================================================
// Attributes
// ============================================================================

lazy_static::lazy_static! {
    /// Display names for the standard attribute ids.
    pub static ref STANDARD_ATTRIBUTES: HashMap<&'static str, &'static str> = HashMap::from([
        ("st", "ST"),
        ("dx", "DX"),
        ("iq", "IQ"),
        ("ht", "HT"),
        ("will", "Will"),
        ("per", "Per"),
        ("basic_speed", "Basic Speed"),
        ("basic_move", "Basic Move"),
        ("fp", "FP"),
        ("hp", "HP"),
    ]);
}

/// A resolved attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub value: Fixed,
}

impl Attribute {
    pub fn new(id: impl Into<String>, value: impl Into<Fixed>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            value: value.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A trait modifier attached to a trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitModifier {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub container: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TraitModifier>,
}

impl TraitModifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            notes: String::new(),
            enabled: true,
            container: false,
            children: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_child(mut self, child: TraitModifier) -> Self {
        self.container = true;
        self.children.push(child);
        self
    }
}

/// An advantage, disadvantage, perk, quirk or trait container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    /// Present only for leveled traits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Fixed>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<TraitModifier>,
    #[serde(default)]
    pub container: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Trait>,
}

impl Trait {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            notes: String::new(),
            levels: None,
            enabled: true,
            modifiers: Vec::new(),
            container: false,
            children: Vec::new(),
        }
    }

    /// Create an empty trait container.
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            container: true,
            ..Self::new(name)
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_levels(mut self, levels: impl Into<Fixed>) -> Self {
        self.levels = Some(levels.into());
        self
    }

    pub fn with_modifier(mut self, modifier: TraitModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_child(mut self, child: Trait) -> Self {
        self.container = true;
        self.children.push(child);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Levels for comparison purposes; unleveled traits count as zero.
    pub fn current_levels(&self) -> Fixed {
        self.levels.map_or(Fixed::ZERO, |l| l.max(Fixed::ZERO))
    }

    /// The trait's own notes followed by those of its enabled modifiers.
    pub fn combined_notes(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.notes.trim().is_empty() {
            parts.push(self.notes.trim());
        }
        crate::traverse::traverse(
            &self.modifiers,
            crate::traverse::TraverseOptions::default().skipping_disabled(),
            |m| {
                if !m.notes.trim().is_empty() {
                    parts.push(m.notes.trim());
                }
                false
            },
        );
        parts.join("; ")
    }
}

// ============================================================================
// Skills and Spells
// ============================================================================

/// A skill with its already-calculated level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_level: Option<String>,
    #[serde(default)]
    pub level: Fixed,
    #[serde(default)]
    pub container: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Skill>,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: impl Into<Fixed>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            specialization: String::new(),
            tech_level: None,
            level: level.into(),
            container: false,
            children: Vec::new(),
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self {
            container: true,
            ..Self::new(name, Fixed::ZERO)
        }
    }

    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = specialization.into();
        self
    }

    pub fn with_tech_level(mut self, tl: impl Into<String>) -> Self {
        self.tech_level = Some(tl.into());
        self
    }

    pub fn with_child(mut self, child: Skill) -> Self {
        self.container = true;
        self.children.push(child);
        self
    }
}

/// A spell known by the character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub college: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Character points spent; a spell with no points is not known yet.
    #[serde(default)]
    pub points: Fixed,
    #[serde(default)]
    pub container: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Spell>,
}

impl Spell {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            tech_level: None,
            college: Vec::new(),
            tags: Vec::new(),
            points: Fixed::ONE,
            container: false,
            children: Vec::new(),
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self {
            container: true,
            points: Fixed::ZERO,
            ..Self::new(name)
        }
    }

    pub fn with_college(mut self, college: impl Into<String>) -> Self {
        self.college.push(college.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_points(mut self, points: impl Into<Fixed>) -> Self {
        self.points = points.into();
        self
    }

    pub fn with_tech_level(mut self, tl: impl Into<String>) -> Self {
        self.tech_level = Some(tl.into());
        self
    }

    pub fn with_child(mut self, child: Spell) -> Self {
        self.container = true;
        self.children.push(child);
        self
    }
}

// ============================================================================
// Equipment
// ============================================================================

/// A piece of carried equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default = "default_quantity")]
    pub quantity: Fixed,
    /// Weight of a single unit in pounds, excluding contents.
    #[serde(default)]
    pub weight: Fixed,
    #[serde(default = "default_true")]
    pub equipped: bool,
    #[serde(default)]
    pub container: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Equipment>,
}

impl Equipment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            tags: Vec::new(),
            quantity: Fixed::ONE,
            weight: Fixed::ZERO,
            equipped: true,
            container: false,
            children: Vec::new(),
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self {
            container: true,
            ..Self::new(name)
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_quantity(mut self, quantity: impl Into<Fixed>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn with_weight(mut self, pounds: impl Into<Fixed>) -> Self {
        self.weight = pounds.into();
        self
    }

    pub fn unequipped(mut self) -> Self {
        self.equipped = false;
        self
    }

    pub fn with_child(mut self, child: Equipment) -> Self {
        self.container = true;
        self.children.push(child);
        self
    }

    /// Weight of everything inside this item, in pounds.
    pub fn contents_weight(&self) -> Fixed {
        self.children.iter().map(Equipment::extended_weight).sum()
    }

    /// Total weight of this entry: quantity × (unit weight + contents).
    ///
    /// Saturates at [`Fixed::MAX`] or [`Fixed::MIN`] instead of overflowing.
    pub fn extended_weight(&self) -> Fixed {
        let per_unit = self.weight + self.contents_weight();
        self.quantity.checked_mul(per_unit).unwrap_or_else(|| {
            if (self.quantity < Fixed::ZERO) == (per_unit < Fixed::ZERO) {
                Fixed::MAX
            } else {
                Fixed::MIN
            }
        })
    }

    /// Sum of the quantities of the direct children.
    pub fn contents_quantity(&self) -> Fixed {
        self.children.iter().map(|c| c.quantity).sum()
    }
}

// ============================================================================
// Entity
// ============================================================================

/// The character whose prerequisites are evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// The character's tech level, e.g. "3" or "8+1".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_level: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub spells: Vec<Spell>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.id.eq_ignore_ascii_case(id))
    }

    pub fn attribute_value(&self, id: &str) -> Option<Fixed> {
        self.attribute(id).map(|a| a.value)
    }

    /// Display name for an attribute id.
    ///
    /// Prefers the name the sheet gives it, then the standard table, then
    /// the id itself.
    pub fn attribute_name(&self, id: &str) -> String {
        if let Some(attr) = self.attribute(id) {
            if !attr.name.is_empty() {
                return attr.name.clone();
            }
        }
        let lower = id.to_lowercase();
        match STANDARD_ATTRIBUTES.get(lower.as_str()) {
            Some(name) => (*name).to_string(),
            None => id.to_string(),
        }
    }

    /// The leading whole number of the character's tech level.
    ///
    /// Missing, unparseable or negative tech levels count as zero. Values
    /// too large to represent saturate at [`Fixed::MAX`].
    pub fn tech_level_value(&self) -> Fixed {
        let Some(tl) = &self.tech_level else {
            return Fixed::ZERO;
        };
        let digits: String = tl
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return Fixed::ZERO;
        }
        digits.parse::<i64>().map_or(Fixed::MAX, Fixed::from_int)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Error from entity building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("Character name is required")]
    MissingName,

    #[error("Attribute {0:?} is defined more than once")]
    DuplicateAttribute(String),
}

/// Builder for assembling a character sheet.
#[derive(Debug, Clone, Default)]
pub struct EntityBuilder {
    name: Option<String>,
    tech_level: Option<String>,
    attributes: Vec<Attribute>,
    traits: Vec<Trait>,
    skills: Vec<Skill>,
    spells: Vec<Spell>,
    equipment: Vec<Equipment>,
}

impl EntityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn tech_level(mut self, tl: impl Into<String>) -> Self {
        self.tech_level = Some(tl.into());
        self
    }

    pub fn attribute(mut self, id: impl Into<String>, value: impl Into<Fixed>) -> Self {
        self.attributes.push(Attribute::new(id, value));
        self
    }

    pub fn with_trait(mut self, t: Trait) -> Self {
        self.traits.push(t);
        self
    }

    pub fn skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn spell(mut self, spell: Spell) -> Self {
        self.spells.push(spell);
        self
    }

    pub fn equipment(mut self, item: Equipment) -> Self {
        self.equipment.push(item);
        self
    }

    pub fn build(self) -> Result<Entity, BuilderError> {
        let name = self.name.ok_or(BuilderError::MissingName)?;
        if name.trim().is_empty() {
            return Err(BuilderError::MissingName);
        }

        let mut seen = HashSet::new();
        for attr in &self.attributes {
            if !seen.insert(attr.id.to_lowercase()) {
                return Err(BuilderError::DuplicateAttribute(attr.id.clone()));
            }
        }

        Ok(Entity {
            name,
            tech_level: self.tech_level,
            attributes: self.attributes,
            traits: self.traits,
            skills: self.skills,
            spells: self.spells,
            equipment: self.equipment,
        })
    }
}
