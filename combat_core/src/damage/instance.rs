//! DamageInstance - one configured hit of a talent

use crate::types::{DamageCategory, Element, StatType};
use serde::{Deserialize, Serialize};

/// Immutable description of a single hit
///
/// Damage before bonuses is
/// `stat × multiplier × base_multiplier + additive_bonus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageInstance {
    #[serde(default = "default_scaling")]
    pub scaling: StatType,
    #[serde(default = "default_one")]
    pub multiplier: f64,
    #[serde(default = "default_one")]
    pub base_multiplier: f64,
    #[serde(default)]
    pub additive_bonus: f64,
    /// Falls back to the owning talent's category when unset
    #[serde(default)]
    pub category: Option<DamageCategory>,
    /// `None` is physical
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub description: String,
    /// Empty tag = no internal cooldown
    #[serde(default)]
    pub icd_tag: String,
    #[serde(default = "default_icd_interval")]
    pub icd_interval: u32,
    /// Other enemies within this distance of the primary target are hit too
    #[serde(default)]
    pub aoe_radius: f64,
    /// Aura units applied
    #[serde(default = "default_one")]
    pub units: f64,
    /// False on the copy used when the internal cooldown suppresses the element
    #[serde(skip, default = "default_applies_element")]
    pub applies_element: bool,
}

fn default_scaling() -> StatType {
    StatType::Atk
}

fn default_one() -> f64 {
    1.0
}

fn default_icd_interval() -> u32 {
    3
}

fn default_applies_element() -> bool {
    true
}

impl DamageInstance {
    pub fn new(scaling: StatType, multiplier: f64, element: Option<Element>) -> Self {
        DamageInstance {
            scaling,
            multiplier,
            base_multiplier: 1.0,
            additive_bonus: 0.0,
            category: None,
            element,
            description: String::new(),
            icd_tag: String::new(),
            icd_interval: default_icd_interval(),
            aoe_radius: 0.0,
            units: 1.0,
            applies_element: true,
        }
    }

    pub fn with_category(mut self, category: DamageCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_icd(mut self, tag: &str, interval: u32) -> Self {
        self.icd_tag = tag.to_string();
        self.icd_interval = interval;
        self
    }

    pub fn with_aoe(mut self, radius: f64) -> Self {
        self.aoe_radius = radius;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn category_or(&self, fallback: DamageCategory) -> DamageCategory {
        self.category.unwrap_or(fallback)
    }

    /// Copy that deals the same numbers but never touches auras
    pub fn suppressed(&self) -> DamageInstance {
        DamageInstance {
            applies_element: false,
            ..self.clone()
        }
    }

    /// Element to land on the target, if this hit may apply one
    pub fn applied_element(&self) -> Option<Element> {
        if self.applies_element {
            self.element
        } else {
            None
        }
    }

    pub fn label(&self) -> String {
        if !self.description.is_empty() {
            return self.description.clone();
        }
        match self.element {
            Some(element) => format!("{} hit", element),
            None => "Physical hit".to_string(),
        }
    }
}
