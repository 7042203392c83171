//! Production chain resolver for crafting games.
//!
//! Resolves the full manufacturing chain of an item from a flat recipe
//! list, lays it out on a grid for diagram rendering, collects the raw
//! materials it bottoms out in, and sizes machines for a target rate.
//!
//! ```
//! use chain_calculator::sample::sample_dataset;
//! use chain_calculator::{
//!     RecipeIndex, build_production_tree, compute_rate, layout_tree, subtree_width,
//! };
//!
//! let dataset = sample_dataset();
//! let index = RecipeIndex::build(&dataset.recipes);
//! let tree = build_production_tree(&index, "circuit").unwrap();
//! let layout = layout_tree(&tree);
//! assert_eq!(layout.total_cols, subtree_width(&tree));
//!
//! let rate = compute_rate(&tree.recipe, 120.0).unwrap();
//! assert_eq!(rate.machines_needed, 1);
//! ```

pub mod calculator;
pub mod dataset;
pub mod db;
pub mod index;
pub mod layout;
pub mod logging;
pub mod models;
pub mod sample;
pub mod tree;

pub use calculator::{ChainPlan, compute_rate, plan_chain};
pub use dataset::{DatasetError, load_dataset};
pub use index::RecipeIndex;
pub use layout::{layout_tree, subtree_width};
pub use models::{
    Dataset, FlowEdge, FlowLayout, FlowNode, ItemRef, ProductionNode, RateResult, RawMaterial,
    Recipe,
};
pub use tree::{MAX_DEPTH, TreeBuilder, build_production_tree, collect_raw_materials};
