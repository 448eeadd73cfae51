//! Limits on what an equipment container may hold.
//!
//! Both variants judge the excluded record itself, which must be the
//! container carrying the prerequisite. Plain equipment passes; any other
//! kind of record fails.

use super::{default_true, has_text, Exclude};
use crate::criteria::{NumericCompare, NumericCriteria, WeightCriteria};
use crate::entity::Equipment;
use crate::fixed::Fixed;
use crate::traverse::Node;
use serde::{Deserialize, Serialize};

fn judge_container(
    exclude: Exclude<'_>,
    has: bool,
    check: impl FnOnce(&Equipment) -> bool,
) -> bool {
    let satisfied = match exclude {
        Exclude::Equipment(eqp) => !eqp.is_container() || check(eqp),
        _ => false,
    };
    if has {
        satisfied
    } else {
        !satisfied
    }
}

/// Caps the total quantity of items directly inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainedQuantityPrereq {
    #[serde(default = "default_true")]
    pub has: bool,
    pub qualifier: NumericCriteria,
}

impl Default for ContainedQuantityPrereq {
    fn default() -> Self {
        Self {
            has: true,
            qualifier: NumericCriteria::at_most(1i64),
        }
    }
}

impl ContainedQuantityPrereq {
    pub fn new(qualifier: NumericCriteria) -> Self {
        Self {
            qualifier,
            ..Self::default()
        }
    }

    pub fn satisfied(
        &self,
        exclude: Exclude<'_>,
        tooltip: Option<&mut String>,
        prefix: &str,
    ) -> bool {
        let satisfied = judge_container(exclude, self.has, |eqp| {
            self.qualifier.matches(eqp.contents_quantity())
        });
        if !satisfied {
            if let Some(tip) = tooltip {
                tip.push_str(prefix);
                tip.push_str(has_text(self.has));
                tip.push_str(" a contained quantity which ");
                tip.push_str(&self.qualifier.to_string());
            }
        }
        satisfied
    }
}

/// Caps the weight carried inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainedWeightPrereq {
    #[serde(default = "default_true")]
    pub has: bool,
    pub qualifier: WeightCriteria,
}

impl Default for ContainedWeightPrereq {
    fn default() -> Self {
        Self {
            has: true,
            qualifier: WeightCriteria::new(NumericCompare::AtMost, Fixed::from_int(5)),
        }
    }
}

impl ContainedWeightPrereq {
    pub fn new(qualifier: WeightCriteria) -> Self {
        Self {
            qualifier,
            ..Self::default()
        }
    }

    pub fn satisfied(
        &self,
        exclude: Exclude<'_>,
        tooltip: Option<&mut String>,
        prefix: &str,
    ) -> bool {
        let satisfied = judge_container(exclude, self.has, |eqp| {
            self.qualifier.matches(eqp.contents_weight())
        });
        if !satisfied {
            if let Some(tip) = tooltip {
                tip.push_str(prefix);
                tip.push_str(has_text(self.has));
                tip.push_str(" a contained weight which ");
                tip.push_str(&self.qualifier.to_string());
            }
        }
        satisfied
    }
}
