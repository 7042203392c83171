//! Data models for recipes, production trees and flow layouts

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An item as it appears in a recipe's inputs or outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    pub name: String,
    pub count: u32, // per craft cycle
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub machine_id: String,
    pub machine_name: String,
    pub inputs: Vec<ItemRef>,
    pub outputs: Vec<ItemRef>,
    pub craft_time_seconds: f64,
    #[serde(default)]
    pub power_watts: f64,
}

impl Recipe {
    /// The output entry for `item_id`, if this recipe produces it
    pub fn output(&self, item_id: &str) -> Option<&ItemRef> {
        self.outputs.iter().find(|o| o.id == item_id)
    }
}

/// Informational machine data; recipes carry their own power figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    #[serde(default)]
    pub power: f64,
}

/// The full recipe document as handed over by whatever fetched it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub items: BTreeMap<String, String>,
    #[serde(default)]
    pub buildings: BTreeMap<String, Building>,
    pub recipes: Vec<Recipe>,
}

/// One recipe application in a production tree.
///
/// `children` follow `recipe.inputs` order but only hold inputs that
/// resolved to a recipe; raw inputs are implicit leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionNode {
    pub recipe: Recipe,
    pub output_item: ItemRef,
    pub children: Vec<ProductionNode>,
    pub depth: usize,
}

impl ProductionNode {
    /// Pair every recipe input with the child that resolves it, if any.
    ///
    /// Children are consumed in order, so an input listed twice is matched
    /// against two distinct children.
    pub fn resolved_inputs(&self) -> Vec<(&ItemRef, Option<&ProductionNode>)> {
        let mut children = self.children.iter().peekable();
        self.recipe
            .inputs
            .iter()
            .map(|input| {
                let child = children.next_if(|c| c.output_item.id == input.id);
                (input, child)
            })
            .collect()
    }

    /// Number of tree nodes, this one included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ProductionNode::node_count).sum::<usize>()
    }
}

/// A terminal input with no producing recipe in the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMaterial {
    pub id: String,
    pub name: String,
}

/// A positioned card in the flow diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FlowNode {
    #[serde(rename_all = "camelCase")]
    Item {
        id: String,
        item_id: String,
        item_name: String,
        item_count: u32,
        is_raw: bool,
        is_output: bool,
        row: usize,
        col: usize,
        col_span: usize,
    },
    #[serde(rename_all = "camelCase")]
    Machine {
        id: String,
        machine_id: String,
        machine_name: String,
        craft_time_seconds: f64,
        power_watts: f64,
        row: usize,
        col: usize,
        col_span: usize,
    },
}

impl FlowNode {
    pub fn id(&self) -> &str {
        match self {
            FlowNode::Item { id, .. } | FlowNode::Machine { id, .. } => id,
        }
    }

    pub fn row(&self) -> usize {
        match self {
            FlowNode::Item { row, .. } | FlowNode::Machine { row, .. } => *row,
        }
    }

    pub fn col(&self) -> usize {
        match self {
            FlowNode::Item { col, .. } | FlowNode::Machine { col, .. } => *col,
        }
    }

    pub fn col_span(&self) -> usize {
        match self {
            FlowNode::Item { col_span, .. } | FlowNode::Machine { col_span, .. } => *col_span,
        }
    }

    pub fn is_machine(&self) -> bool {
        matches!(self, FlowNode::Machine { .. })
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, FlowNode::Item { is_raw: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub from_id: String,
    pub to_id: String,
}

/// Grid-positioned diagram of a production tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowLayout {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub total_rows: usize,
    pub total_cols: usize,
}

/// Per-minute consumption of one recipe input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRate {
    pub id: String,
    pub name: String,
    pub per_minute: f64,
}

/// Result of sizing a single recipe for a target output rate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResult {
    pub recipe_id: String,
    pub output_id: String,
    pub desired_per_minute: f64,
    pub output_per_cycle: u32,
    pub output_per_minute: f64,
    pub machines_needed: u64,
    pub actual_output: f64,
    pub total_power: f64,
    pub inputs_per_minute: Vec<InputRate>,
}
