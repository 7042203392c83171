//! Grid layout of a production tree for diagram rendering
//!
//! Every tree node becomes an item card with its machine directly below it;
//! the machine's inputs sit one row further down, side by side, each taking
//! as many columns as its own subtree needs. The requested item lands on
//! row 0 and rows grow toward the raw materials.

use crate::models::{FlowEdge, FlowLayout, FlowNode, ProductionNode};

/// Number of leaf columns the subtree under `node` occupies (at least 1)
pub fn subtree_width(node: &ProductionNode) -> usize {
    node.resolved_inputs()
        .into_iter()
        .map(|(_, child)| child.map_or(1, subtree_width))
        .sum::<usize>()
        .max(1)
}

/// Lay out a production tree on the integer grid.
///
/// Callers must not pass a raw item; a tree always has a root recipe.
pub fn layout_tree(root: &ProductionNode) -> FlowLayout {
    let widths = WidthTree::measure(root);
    let mut placer = Placer::default();
    placer.place(root, &widths, 0, 0);

    let total_rows = placer.nodes.iter().map(FlowNode::row).max().map_or(0, |r| r + 1);

    tracing::debug!(
        item = %root.output_item.id,
        nodes = placer.nodes.len(),
        edges = placer.edges.len(),
        total_rows,
        total_cols = widths.width,
        "laid out production tree"
    );

    FlowLayout {
        nodes: placer.nodes,
        edges: placer.edges,
        total_rows,
        total_cols: widths.width,
    }
}

/// Subtree widths computed once per layout, shaped like the tree itself
struct WidthTree {
    width: usize,
    children: Vec<WidthTree>,
}

impl WidthTree {
    fn measure(node: &ProductionNode) -> Self {
        let children: Vec<WidthTree> = node.children.iter().map(WidthTree::measure).collect();
        let resolved = node.resolved_inputs();
        let raw_inputs = resolved.iter().filter(|(_, child)| child.is_none()).count();
        let width = (children.iter().map(|c| c.width).sum::<usize>() + raw_inputs).max(1);
        WidthTree { width, children }
    }
}

#[derive(Default)]
struct Placer {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    next_id: usize,
}

impl Placer {
    fn next_id(&mut self, kind: &str) -> String {
        let id = format!("{kind}-{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Place `node` with its item card at `(row, col)`; returns the card id
    fn place(&mut self, node: &ProductionNode, widths: &WidthTree, col: usize, row: usize) -> String {
        let span = widths.width;
        let recipe = &node.recipe;

        let item_id = self.next_id("item");
        self.nodes.push(FlowNode::Item {
            id: item_id.clone(),
            item_id: node.output_item.id.clone(),
            item_name: node.output_item.name.clone(),
            item_count: node.output_item.count,
            is_raw: false,
            is_output: node.depth == 0,
            row,
            col,
            col_span: span,
        });

        let machine_id = self.next_id("machine");
        self.nodes.push(FlowNode::Machine {
            id: machine_id.clone(),
            machine_id: recipe.machine_id.clone(),
            machine_name: recipe.machine_name.clone(),
            craft_time_seconds: recipe.craft_time_seconds,
            power_watts: recipe.power_watts,
            row: row + 1,
            col,
            col_span: span,
        });
        self.edge(&machine_id, &item_id);

        let mut cursor = col;
        let mut child_widths = widths.children.iter();
        for (input, child) in node.resolved_inputs() {
            match (child, child.and_then(|_| child_widths.next())) {
                (Some(child), Some(child_width)) => {
                    let child_item = self.place(child, child_width, cursor, row + 2);
                    self.edge(&child_item, &machine_id);
                    cursor += child_width.width;
                }
                _ => {
                    let raw_id = self.next_id("raw");
                    self.nodes.push(FlowNode::Item {
                        id: raw_id.clone(),
                        item_id: input.id.clone(),
                        item_name: input.name.clone(),
                        item_count: input.count,
                        is_raw: true,
                        is_output: false,
                        row: row + 2,
                        col: cursor,
                        col_span: 1,
                    });
                    self.edge(&raw_id, &machine_id);
                    cursor += 1;
                }
            }
        }

        item_id
    }

    fn edge(&mut self, from: &str, to: &str) {
        self.edges.push(FlowEdge {
            from_id: from.to_string(),
            to_id: to.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RecipeIndex;
    use crate::models::{ItemRef, Recipe};
    use crate::tree::build_production_tree;

    fn item(id: &str, count: u32) -> ItemRef {
        ItemRef {
            id: id.to_string(),
            name: id.to_string(),
            count,
        }
    }

    fn recipe(id: &str, inputs: &[(&str, u32)], outputs: &[(&str, u32)]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: id.to_string(),
            machine_id: format!("{id}-machine"),
            machine_name: "Assembler".to_string(),
            inputs: inputs.iter().map(|(i, c)| item(i, *c)).collect(),
            outputs: outputs.iter().map(|(i, c)| item(i, *c)).collect(),
            craft_time_seconds: 10.0,
            power_watts: 150.0,
        }
    }

    fn find<'a>(layout: &'a FlowLayout, item_id: &str) -> &'a FlowNode {
        layout
            .nodes
            .iter()
            .find(|n| matches!(n, FlowNode::Item { item_id: id, .. } if id == item_id))
            .unwrap()
    }

    fn machine_of<'a>(layout: &'a FlowLayout, item_card: &FlowNode) -> &'a FlowNode {
        let edge = layout.edges.iter().find(|e| e.to_id == item_card.id()).unwrap();
        layout.nodes.iter().find(|n| n.id() == edge.from_id).unwrap()
    }

    #[test]
    fn single_stage_with_raw_inputs() {
        let index = RecipeIndex::build(&[recipe("gear", &[("plate", 2), ("bolt", 4)], &[("gear", 1)])]);
        let tree = build_production_tree(&index, "gear").unwrap();
        let layout = layout_tree(&tree);

        assert_eq!(layout.total_cols, 2);
        assert_eq!(layout.total_rows, 3);
        assert_eq!(layout.nodes.len(), 4);
        assert_eq!(layout.edges.len(), 3);

        let gear = find(&layout, "gear");
        assert!(matches!(gear, FlowNode::Item { is_output: true, is_raw: false, .. }));
        assert_eq!((gear.row(), gear.col(), gear.col_span()), (0, 0, 2));

        let machine = machine_of(&layout, gear);
        assert!(machine.is_machine());
        assert_eq!((machine.row(), machine.col(), machine.col_span()), (1, 0, 2));

        let plate = find(&layout, "plate");
        let bolt = find(&layout, "bolt");
        assert!(plate.is_raw() && bolt.is_raw());
        assert_eq!((plate.row(), plate.col()), (2, 0));
        assert_eq!((bolt.row(), bolt.col()), (2, 1));
    }

    #[test]
    fn nested_stages_share_columns_by_subtree_width() {
        let index = RecipeIndex::build(&[
            recipe("plate", &[("ore", 1), ("coal", 1)], &[("plate", 1)]),
            recipe("motor", &[("plate", 2), ("oil", 1)], &[("motor", 1)]),
        ]);
        let tree = build_production_tree(&index, "motor").unwrap();
        assert_eq!(subtree_width(&tree), 3);

        let layout = layout_tree(&tree);
        assert_eq!(layout.total_cols, 3);
        assert_eq!(layout.total_rows, 5);

        let plate = find(&layout, "plate");
        assert!(matches!(plate, FlowNode::Item { is_output: false, .. }));
        assert_eq!((plate.row(), plate.col(), plate.col_span()), (2, 0, 2));
        assert_eq!(find(&layout, "ore").row(), 4);
        assert_eq!(find(&layout, "coal").col(), 1);

        let oil = find(&layout, "oil");
        assert_eq!((oil.row(), oil.col(), oil.col_span()), (2, 2, 1));

        // plate card feeds the motor machine
        let motor_machine = machine_of(&layout, find(&layout, "motor"));
        assert!(
            layout
                .edges
                .iter()
                .any(|e| e.from_id == plate.id() && e.to_id == motor_machine.id())
        );
    }

    #[test]
    fn recipe_without_inputs_takes_one_column() {
        let index = RecipeIndex::build(&[recipe("water", &[], &[("water", 10)])]);
        let tree = build_production_tree(&index, "water").unwrap();
        assert_eq!(subtree_width(&tree), 1);

        let layout = layout_tree(&tree);
        assert_eq!(layout.nodes.len(), 2);
        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.total_rows, 2);
        assert_eq!(layout.total_cols, 1);
    }

    #[test]
    fn node_ids_are_unique_and_edges_span_the_tree() {
        let index = RecipeIndex::build(&[
            recipe("plate", &[("ore", 1)], &[("plate", 1)]),
            recipe("gear", &[("plate", 2)], &[("gear", 1)]),
            recipe("rod", &[("plate", 1)], &[("rod", 2)]),
            recipe("motor", &[("gear", 1), ("rod", 1), ("gear", 1)], &[("motor", 1)]),
        ]);
        let tree = build_production_tree(&index, "motor").unwrap();
        let layout = layout_tree(&tree);

        let mut ids: Vec<_> = layout.nodes.iter().map(FlowNode::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), layout.nodes.len());
        assert_eq!(layout.edges.len(), layout.nodes.len() - 1);

        let machines = layout.nodes.iter().filter(|n| n.is_machine()).count();
        assert_eq!(machines, tree.node_count());
        assert_eq!(layout.total_cols, 3);
    }

    #[test]
    fn sibling_columns_do_not_overlap() {
        let index = RecipeIndex::build(&[
            recipe("plate", &[("ore", 1), ("coal", 1)], &[("plate", 1)]),
            recipe("wire", &[("copper", 1)], &[("wire", 2)]),
            recipe("circuit", &[("wire", 3), ("plate", 1)], &[("circuit", 1)]),
        ]);
        let layout = layout_tree(&build_production_tree(&index, "circuit").unwrap());

        let wire = find(&layout, "wire");
        let plate = find(&layout, "plate");
        assert_eq!(wire.col() + wire.col_span(), plate.col());
        assert_eq!(plate.col() + plate.col_span(), layout.total_cols);
    }
}
