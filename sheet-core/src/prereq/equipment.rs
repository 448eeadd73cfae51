use super::{EvalFlags, Exclude};
use crate::criteria::StringCriteria;
use crate::entity::Entity;
use crate::fixed::Fixed;
use crate::nameables::{self, Nameables};
use crate::traverse::{traverse, TraverseOptions};
use serde::{Deserialize, Serialize};

/// Requires a matching piece of equipment to be carried and equipped.
///
/// Failing this prerequisite also raises the equipment penalty flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquippedEquipmentPrereq {
    pub name: StringCriteria,
    pub tags: StringCriteria,
}

impl Default for EquippedEquipmentPrereq {
    fn default() -> Self {
        Self {
            name: StringCriteria::is(""),
            tags: StringCriteria::any(),
        }
    }
}

impl EquippedEquipmentPrereq {
    pub fn new(name: StringCriteria, tags: StringCriteria) -> Self {
        Self { name, tags }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: StringCriteria::is(name),
            ..Self::default()
        }
    }

    pub fn fill_with_nameable_keys(&self, registry: &mut Nameables) {
        nameables::extract(&self.name.qualifier, registry);
        nameables::extract(&self.tags.qualifier, registry);
    }

    pub fn apply_nameable_keys(&mut self, registry: &Nameables) {
        self.name.qualifier = nameables::apply(&self.name.qualifier, registry);
        self.tags.qualifier = nameables::apply(&self.tags.qualifier, registry);
    }

    pub fn satisfied(
        &self,
        entity: &Entity,
        exclude: Exclude<'_>,
        tooltip: Option<&mut String>,
        prefix: &str,
        flags: &mut EvalFlags,
    ) -> bool {
        let satisfied = traverse(
            &entity.equipment,
            TraverseOptions::default().including_containers(),
            |eqp| {
                !exclude.is(eqp)
                    && eqp.equipped
                    && eqp.quantity > Fixed::ZERO
                    && self.name.matches(&eqp.name)
                    && self.tags.matches_list(&eqp.tags)
            },
        );

        if !satisfied {
            flags.has_equipment_penalty = true;
            if let Some(tip) = tooltip {
                tip.push_str(prefix);
                tip.push_str("Has equipment which is equipped and whose name ");
                tip.push_str(&self.name.to_string());
                tip.push_str(
                    &self
                        .tags
                        .describe_with_prefix("and at least one tag", "and all tags"),
                );
            }
        }
        satisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Equipment;

    fn entity() -> Entity {
        let mut entity = Entity::new("Test");
        entity.equipment = vec![
            Equipment::new("Sword").with_tag("Melee").with_tag("Weapon"),
            Equipment::new("Sword").with_tag("Melee").with_tag("Weapon"),
            Equipment::new("Shield").unequipped(),
            Equipment::container("Backpack")
                .with_child(Equipment::new("Torch").with_quantity(0i64)),
        ];
        entity
    }

    #[test]
    fn test_equipped_sword_satisfies_without_tooltip() {
        let entity = entity();
        let p = EquippedEquipmentPrereq::new(
            StringCriteria::is("Sword"),
            StringCriteria::is("Melee"),
        );
        let mut flags = EvalFlags::default();
        let mut tip = String::new();
        assert!(p.satisfied(&entity, Exclude::None, Some(&mut tip), "\n", &mut flags));
        assert!(tip.is_empty());
        assert!(!flags.has_equipment_penalty);
    }

    #[test]
    fn test_unequipped_and_empty_stacks_fail() {
        let entity = entity();
        let mut flags = EvalFlags::default();
        assert!(!EquippedEquipmentPrereq::named("Shield").satisfied(
            &entity,
            Exclude::None,
            None,
            "",
            &mut flags
        ));
        assert!(flags.has_equipment_penalty);

        let mut flags = EvalFlags::default();
        assert!(!EquippedEquipmentPrereq::named("Torch").satisfied(
            &entity,
            Exclude::None,
            None,
            "",
            &mut flags
        ));
    }

    #[test]
    fn test_excluded_item_is_skipped() {
        let entity = entity();
        let p = EquippedEquipmentPrereq::named("Sword");
        let mut flags = EvalFlags::default();
        // The second sword still satisfies it
        assert!(p.satisfied(&entity, Exclude::from(&entity.equipment[0]), None, "", &mut flags));
        let backpack = &entity.equipment[3];
        let p = EquippedEquipmentPrereq::named("Backpack");
        assert!(!p.satisfied(&entity, Exclude::from(backpack), None, "", &mut flags));
    }

    #[test]
    fn test_tooltip_wording() {
        let entity = entity();
        let mut flags = EvalFlags::default();
        let mut tip = String::new();
        let p = EquippedEquipmentPrereq::new(
            StringCriteria::is("Axe"),
            StringCriteria::is_not("Cursed"),
        );
        assert!(!p.satisfied(&entity, Exclude::None, Some(&mut tip), "\n", &mut flags));
        assert_eq!(
            tip,
            "\nHas equipment which is equipped and whose name is Axe and all tags is not Cursed"
        );

        let mut tip = String::new();
        EquippedEquipmentPrereq::new(StringCriteria::is("Axe"), StringCriteria::is("Melee"))
            .satisfied(&entity, Exclude::None, Some(&mut tip), "", &mut flags);
        assert_eq!(
            tip,
            "Has equipment which is equipped and whose name is Axe and at least one tag is Melee"
        );
    }
}
