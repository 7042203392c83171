//! Production tree resolution and raw material collection

use std::collections::HashSet;

use crate::index::RecipeIndex;
use crate::models::{ProductionNode, RawMaterial};

/// Deepest stage a chain may reach; anything deeper is pruned
pub const MAX_DEPTH: usize = 10;

/// Expands a target item into the recipes needed to craft it.
///
/// Branches that revisit an ancestor item, or that would go deeper than
/// `max_depth`, are pruned and their input is left as an unresolved leaf.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    index: &'a RecipeIndex,
    max_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(index: &'a RecipeIndex) -> Self {
        Self {
            index,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the tree for `item_id`, or `None` if the item is raw
    pub fn build(&self, item_id: &str) -> Option<ProductionNode> {
        self.build_node(item_id, 0, &HashSet::new())
    }

    fn build_node(
        &self,
        item_id: &str,
        depth: usize,
        visited: &HashSet<String>,
    ) -> Option<ProductionNode> {
        if depth > self.max_depth {
            tracing::debug!(item = item_id, depth, "depth limit reached, pruning branch");
            return None;
        }
        if visited.contains(item_id) {
            tracing::debug!(item = item_id, depth, "cycle detected, pruning branch");
            return None;
        }

        let recipe = self.index.pick_best_recipe(item_id)?;
        let Some(output_item) = recipe.output(item_id).cloned() else {
            tracing::warn!(item = item_id, recipe = %recipe.id, "recipe indexed for an item it does not output");
            return None;
        };

        // Only ancestors are visible to a branch, so siblings sharing an
        // input each resolve it in full.
        let mut path = visited.clone();
        path.insert(item_id.to_string());

        let children = recipe
            .inputs
            .iter()
            .filter_map(|input| self.build_node(&input.id, depth + 1, &path))
            .collect();

        Some(ProductionNode {
            recipe: recipe.clone(),
            output_item,
            children,
            depth,
        })
    }
}

/// Build a production tree with the default depth ceiling
pub fn build_production_tree(index: &RecipeIndex, item_id: &str) -> Option<ProductionNode> {
    TreeBuilder::new(index).build(item_id)
}

/// Collect every input in the tree that no child resolves.
///
/// Deduplicated by id in first-seen order; the first name seen wins.
pub fn collect_raw_materials(root: &ProductionNode) -> Vec<RawMaterial> {
    let mut seen = HashSet::new();
    let mut raw = Vec::new();
    collect_raw_recursive(root, &mut seen, &mut raw);
    raw
}

fn collect_raw_recursive(
    node: &ProductionNode,
    seen: &mut HashSet<String>,
    raw: &mut Vec<RawMaterial>,
) {
    for (input, child) in node.resolved_inputs() {
        match child {
            Some(child) => collect_raw_recursive(child, seen, raw),
            None => {
                if seen.insert(input.id.clone()) {
                    raw.push(RawMaterial {
                        id: input.id.clone(),
                        name: input.name.clone(),
                    });
                }
            }
        }
    }
}

/// Format a production tree as an indented listing
pub fn format_production_tree(node: &ProductionNode, indent: usize) -> String {
    let mut output = String::new();
    let prefix = "  ".repeat(indent);

    output.push_str(&format!(
        "{}{} x{} <- {} ({}, {}s, {})\n",
        prefix,
        node.output_item.name,
        node.output_item.count,
        node.recipe.name,
        node.recipe.machine_name,
        node.recipe.craft_time_seconds,
        format_power(node.recipe.power_watts),
    ));

    for (input, child) in node.resolved_inputs() {
        match child {
            Some(child) => {
                output.push_str(&format!("{}  needs {} x{}\n", prefix, input.name, input.count));
                output.push_str(&format_production_tree(child, indent + 2));
            }
            None => {
                output.push_str(&format!(
                    "{}  needs {} x{} (raw)\n",
                    prefix, input.name, input.count
                ));
            }
        }
    }

    output
}

pub(crate) fn format_power(watts: f64) -> String {
    if watts >= 1_000_000.0 {
        format!("{:.2}MW", watts / 1_000_000.0)
    } else if watts >= 1_000.0 {
        format!("{:.1}kW", watts / 1_000.0)
    } else if watts > 0.0 {
        format!("{:.0}W", watts)
    } else {
        "no power".to_string()
    }
}
