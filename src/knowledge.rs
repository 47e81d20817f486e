//! Food knowledge tables and rule scoring: diet compatibility and allergy
//! exclusion multipliers, plus the blend/feedback constants.
//!
//! Loaded from TOML once at startup (`KNOWLEDGE_CONFIG_PATH` or
//! `config/knowledge.toml`); `from_toml_str` exists so tests run from
//! inline fixtures.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_KNOWLEDGE_PATH: &str = "config/knowledge.toml";
pub const ENV_KNOWLEDGE_PATH: &str = "KNOWLEDGE_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct Knowledge {
    pub weights: BlendWeights,
    pub scoring: ScoringSection,
    pub feedback: FeedbackSection,
    pub foods: FoodTables,
    pub diet: DietSection,
    pub allergy: AllergySection,
}

/// Blend weights for the final per-row score.
#[derive(Debug, Clone, Deserialize)]
pub struct BlendWeights {
    pub semantic: f64,
    pub intent: f64,
    pub rules: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSection {
    pub top_k: usize,
    pub confidence_ceiling: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackSection {
    pub positive_boost: f64,
    pub negative_penalty: f64,
}

/// Food category term lists, matched by substring against `food_sources`.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodTables {
    pub animal: Vec<String>,
    pub dairy: Vec<String>,
    pub eggs: Vec<String>,
    pub plant: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DietSection {
    pub vegan_penalty: f64,
    pub veg_penalty: f64,
    pub eggetarian_penalty: f64,
    pub plant_boost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllergySection {
    pub penalty: f64,
    pub triggers: HashMap<String, Vec<String>>,
}

impl Knowledge {
    /// Load from `KNOWLEDGE_CONFIG_PATH` or the default path.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_KNOWLEDGE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_KNOWLEDGE_PATH));
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading knowledge config at {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing knowledge config at {}", path.display()))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let knowledge: Knowledge = toml::from_str(toml_str)?;
        Ok(knowledge)
    }

    /// Diet-compatibility multiplier for one row. `diet` must already be
    /// lowercased; unknown values carry no penalty. The plant boost stacks
    /// with any penalty.
    pub fn diet_multiplier(&self, food_sources: &str, diet: &str) -> f64 {
        let foods = food_sources.to_lowercase();
        let mut score = 1.0;

        let hits = |lists: &[&[String]]| {
            lists
                .iter()
                .any(|list| list.iter().any(|term| foods.contains(term.as_str())))
        };

        match diet {
            "vegan" => {
                if hits(&[&self.foods.animal, &self.foods.dairy, &self.foods.eggs]) {
                    score *= self.diet.vegan_penalty;
                }
            }
            "veg" => {
                if hits(&[&self.foods.animal, &self.foods.eggs]) {
                    score *= self.diet.veg_penalty;
                }
            }
            "eggetarian" => {
                if hits(&[&self.foods.animal]) {
                    score *= self.diet.eggetarian_penalty;
                }
            }
            _ => {}
        }

        if self.foods.plant.iter().any(|p| foods.contains(p.as_str())) {
            score *= self.diet.plant_boost;
        }

        score
    }

    /// Allergy-exclusion multiplier for one row. `allergies` must already be
    /// lowercased; unknown categories are ignored, matched ones stack.
    pub fn allergy_multiplier(&self, food_sources: &str, allergies: &[String]) -> f64 {
        let foods = food_sources.to_lowercase();
        let mut score = 1.0;
        for allergy in allergies {
            if let Some(terms) = self.allergy.triggers.get(allergy) {
                if terms.iter().any(|t| foods.contains(t.as_str())) {
                    score *= self.allergy.penalty;
                }
            }
        }
        score
    }

    /// Combined rule multiplier (diet × allergy).
    pub fn rule_multiplier(&self, food_sources: &str, diet: &str, allergies: &[String]) -> f64 {
        self.diet_multiplier(food_sources, diet) * self.allergy_multiplier(food_sources, allergies)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // Mirrors the shipped config/knowledge.toml; inlined so unit tests stay
    // independent of the working directory.
    pub(crate) const TEST_TOML: &str = r#"
[weights]
semantic = 0.55
intent = 0.20
rules = 0.15

[scoring]
top_k = 5
confidence_ceiling = 95.0

[feedback]
positive_boost = 2.0
negative_penalty = 0.3

[foods]
animal = ["meat", "fish", "chicken", "beef", "pork", "lamb", "seafood"]
dairy = ["milk", "cheese", "butter", "ghee", "curd", "yogurt"]
eggs = ["egg", "eggs"]
plant = ["lentils", "beans", "tofu", "spinach", "seeds", "nuts", "vegetables", "whole grains"]

[diet]
vegan_penalty = 0.03
veg_penalty = 0.05
eggetarian_penalty = 0.1
plant_boost = 1.2

[allergy]
penalty = 0.01

[allergy.triggers]
dairy = ["milk", "cheese", "butter", "ghee", "curd", "yogurt"]
eggs = ["egg", "eggs"]
nuts = ["almond", "cashew", "peanut", "walnut"]
soy = ["soy", "soya"]
gluten = ["wheat", "barley", "rye"]
shellfish = ["shrimp", "prawn", "crab"]
"#;

    pub(crate) fn knowledge() -> Knowledge {
        Knowledge::from_toml_str(TEST_TOML).expect("load test knowledge")
    }

    fn lower(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_lowercase()).collect()
    }

    #[test]
    fn vegan_penalty_applies_to_dairy_sources() {
        let k = knowledge();
        let m = k.diet_multiplier("milk, cheese, almonds", "vegan");
        assert!((m - 0.03).abs() < 1e-12, "got {m}");
    }

    #[test]
    fn vegan_penalty_stacks_with_plant_boost() {
        let k = knowledge();
        // Contains both egg (penalty) and spinach (boost).
        let m = k.diet_multiplier("egg, spinach", "vegan");
        assert!((m - 0.03 * 1.2).abs() < 1e-12, "got {m}");
    }

    #[test]
    fn veg_penalizes_eggs_but_not_dairy() {
        let k = knowledge();
        assert!((k.diet_multiplier("eggs on toast", "veg") - 0.05).abs() < 1e-12);
        assert!((k.diet_multiplier("milk and curd", "veg") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn eggetarian_penalizes_animal_terms_only() {
        let k = knowledge();
        assert!((k.diet_multiplier("chicken breast", "eggetarian") - 0.1).abs() < 1e-12);
        assert!((k.diet_multiplier("boiled eggs", "eggetarian") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_diet_gets_no_penalty() {
        let k = knowledge();
        assert!((k.diet_multiplier("beef, milk, eggs", "other") - 1.0).abs() < 1e-12);
        // Plant boost still applies regardless of diet.
        assert!((k.diet_multiplier("lentils and beef", "other") - 1.2).abs() < 1e-12);
    }

    #[test]
    fn allergy_match_applies_the_exclusion_penalty() {
        let k = knowledge();
        let m = k.allergy_multiplier("almonds, spinach", &lower(&["nuts"]));
        assert!((m - 0.01).abs() < 1e-12, "got {m}");
        let clean = k.allergy_multiplier("spinach, oats", &lower(&["nuts"]));
        assert!((clean - 1.0).abs() < 1e-12);
    }

    #[test]
    fn multiple_matched_allergies_stack() {
        let k = knowledge();
        let m = k.allergy_multiplier("milk with almonds", &lower(&["dairy", "nuts"]));
        assert!((m - 0.0001).abs() < 1e-12, "got {m}");
    }

    #[test]
    fn unknown_allergy_category_is_ignored() {
        let k = knowledge();
        let m = k.allergy_multiplier("milk", &lower(&["pollen"]));
        assert!((m - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rule_multiplier_is_the_product() {
        let k = knowledge();
        let m = k.rule_multiplier("milk, spinach", "vegan", &lower(&["dairy"]));
        // 0.03 (vegan dairy) * 1.2 (plant) * 0.01 (allergy)
        assert!((m - 0.03 * 1.2 * 0.01).abs() < 1e-12, "got {m}");
    }
}
