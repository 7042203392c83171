//! Recipe lookup by produced item, and the best-recipe heuristic

use std::collections::HashMap;

use crate::models::Recipe;

/// Maps each producible item id to the recipes that output it.
///
/// Recipe lists keep dataset order. Build once per dataset and share it
/// between calls; it is never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecipeIndex {
    producers: HashMap<String, Vec<Recipe>>,
    // first-seen order of produced item ids
    items: Vec<String>,
}

impl RecipeIndex {
    pub fn build(recipes: &[Recipe]) -> Self {
        let mut producers: HashMap<String, Vec<Recipe>> = HashMap::new();
        let mut items = Vec::new();

        for recipe in recipes {
            for output in &recipe.outputs {
                let list = producers.entry(output.id.clone()).or_insert_with(|| {
                    items.push(output.id.clone());
                    Vec::new()
                });
                // an output listed twice still registers the recipe once
                if list.last().is_none_or(|r| r.id != recipe.id) {
                    list.push(recipe.clone());
                }
            }
        }

        let index = RecipeIndex { producers, items };

        tracing::debug!(
            recipes = recipes.len(),
            items = index.items.len(),
            "built recipe index"
        );
        index
    }

    /// All recipes producing `item_id`; empty for raw materials
    pub fn producers(&self, item_id: &str) -> &[Recipe] {
        self.producers.get(item_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// An item is raw when nothing in the dataset produces it
    pub fn is_raw(&self, item_id: &str) -> bool {
        self.producers(item_id).is_empty()
    }

    /// Producible item ids in first-seen order
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pick the recipe that represents `item_id` in a production chain.
    ///
    /// Prefers the first candidate whose inputs are all raw, otherwise takes
    /// the first candidate. Returns `None` when the item is raw.
    pub fn pick_best_recipe(&self, item_id: &str) -> Option<&Recipe> {
        let candidates = self.producers(item_id);

        let picked = candidates
            .iter()
            .find(|r| r.inputs.iter().all(|input| self.is_raw(&input.id)))
            .or_else(|| candidates.first());

        if let Some(recipe) = picked {
            tracing::trace!(
                item = item_id,
                recipe = %recipe.id,
                candidates = candidates.len(),
                "selected recipe"
            );
        }
        picked
    }
}
