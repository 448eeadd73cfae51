use super::{default_true, has_text, Exclude};
use crate::criteria::{NumericCriteria, StringCriteria};
use crate::entity::Entity;
use crate::fixed::Fixed;
use crate::nameables::{self, Nameables};
use crate::traverse::{traverse, TraverseOptions};
use serde::{Deserialize, Serialize};

/// Requires (or forbids) a skill at some level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillPrereq {
    #[serde(default = "default_true")]
    pub has: bool,
    pub name: StringCriteria,
    pub specialization: StringCriteria,
    pub level: NumericCriteria,
}

impl Default for SkillPrereq {
    fn default() -> Self {
        Self {
            has: true,
            name: StringCriteria::is(""),
            specialization: StringCriteria::any(),
            level: NumericCriteria::at_least(Fixed::ZERO),
        }
    }
}

impl SkillPrereq {
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

    pub fn with_specialization(mut self, specialization: StringCriteria) -> Self {
        self.specialization = specialization;
        self
    }

    pub fn with_level(mut self, level: NumericCriteria) -> Self {
        self.level = level;
        self
    }

    pub fn fill_with_nameable_keys(&self, registry: &mut Nameables) {
        nameables::extract(&self.name.qualifier, registry);
        nameables::extract(&self.specialization.qualifier, registry);
    }

    pub fn apply_nameable_keys(&mut self, registry: &Nameables) {
        self.name.qualifier = nameables::apply(&self.name.qualifier, registry);
        self.specialization.qualifier = nameables::apply(&self.specialization.qualifier, registry);
    }

    pub fn satisfied(
        &self,
        entity: &Entity,
        exclude: Exclude<'_>,
        tooltip: Option<&mut String>,
        prefix: &str,
    ) -> bool {
        // A tech-level skill only accepts candidates of its own TL.
        let tech_level = match exclude {
            Exclude::Skill(sk) => sk.tech_level.as_deref(),
            _ => None,
        };

        let mut satisfied = traverse(
            &entity.skills,
            TraverseOptions::default().matching_tech_level(tech_level),
            |sk| {
                !exclude.is(sk)
                    && self.name.matches(&sk.name)
                    && self.specialization.matches(&sk.specialization)
                    && self.level.matches(sk.level)
            },
        );

        if !self.has {
            satisfied = !satisfied;
        }

        if !satisfied {
            if let Some(tip) = tooltip {
                tip.push_str(prefix);
                tip.push_str(has_text(self.has));
                tip.push_str(" a skill whose name ");
                tip.push_str(&self.name.to_string());
                if !self.specialization.is_any() {
                    tip.push_str(", specialization ");
                    tip.push_str(&self.specialization.to_string());
                    tip.push(',');
                }
                tip.push_str(" and level ");
                tip.push_str(&self.level.to_string());
                if tech_level.is_some() {
                    tip.push_str(" and tech level matches");
                }
            }
        }
        satisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Skill;

    fn entity() -> Entity {
        let mut entity = Entity::new("Test");
        entity.skills = vec![
            Skill::new("Broadsword", 14i64),
            Skill::new("Guns", 12i64).with_specialization("Pistol"),
            Skill::container("Engineering").with_child(
                Skill::new("Engineer", 11i64)
                    .with_specialization("Electrical")
                    .with_tech_level("8"),
            ),
        ];
        entity
    }

    #[test]
    fn test_level_threshold() {
        let entity = entity();
        let p = SkillPrereq::named("broadsword").with_level(NumericCriteria::at_least(14i64));
        assert!(p.satisfied(&entity, Exclude::None, None, ""));

        let mut tip = String::new();
        let p = SkillPrereq::named("Broadsword").with_level(NumericCriteria::at_least(15i64));
        assert!(!p.satisfied(&entity, Exclude::None, Some(&mut tip), "\n"));
        assert_eq!(tip, "\nHas a skill whose name is Broadsword and level at least 15");
    }

    #[test]
    fn test_specialization() {
        let entity = entity();
        let p = SkillPrereq::named("Guns").with_specialization(StringCriteria::is("Rifle"));
        let mut tip = String::new();
        assert!(!p.satisfied(&entity, Exclude::None, Some(&mut tip), ""));
        assert_eq!(
            tip,
            "Has a skill whose name is Guns, specialization is Rifle, and level at least 0"
        );
    }

    #[test]
    fn test_tech_level_must_agree() {
        let entity = entity();
        let p = SkillPrereq::named("Engineer");
        let tl8 = Skill::new("Electronics Repair", 10i64).with_tech_level("8");
        let tl7 = Skill::new("Electronics Repair", 10i64).with_tech_level("7");
        assert!(p.satisfied(&entity, Exclude::from(&tl8), None, ""));

        let mut tip = String::new();
        assert!(!p.satisfied(&entity, Exclude::from(&tl7), Some(&mut tip), ""));
        assert!(tip.ends_with("and tech level matches"));
    }

    #[test]
    fn test_has_false() {
        let entity = entity();
        assert!(!SkillPrereq::named("Broadsword")
            .with_has(false)
            .satisfied(&entity, Exclude::None, None, ""));
        assert!(SkillPrereq::named("Axe/Mace")
            .with_has(false)
            .satisfied(&entity, Exclude::None, None, ""));
    }
}
