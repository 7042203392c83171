//! Production chain calculator
//!
//! Resolves crafting chains from a recipe dataset and sizes them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use chain_calculator::calculator::{compute_rate, plan_chain};
use chain_calculator::sample::sample_dataset;
use chain_calculator::tree::format_production_tree;
use chain_calculator::{
    Dataset, ProductionNode, RecipeIndex, TreeBuilder, collect_raw_materials, layout_tree,
    load_dataset, logging,
};

#[derive(Parser)]
#[command(name = "chain-calculator")]
#[command(about = "Production chain resolver and rate calculator for crafting games")]
struct Cli {
    /// Path to the recipe dataset (.json, or a .db SQLite file)
    #[arg(short, long, default_value = "recipes.json")]
    dataset: PathBuf,

    /// Deepest chain stage to resolve before treating inputs as raw
    #[arg(long, default_value_t = chain_calculator::MAX_DEPTH)]
    max_depth: usize,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the production tree for an item
    Tree {
        /// Item id (e.g., "circuit")
        item: String,
    },

    /// Compute the grid layout of an item's production tree
    Layout { item: String },

    /// List the raw materials an item's chain bottoms out in
    Raw { item: String },

    /// Size one recipe for a target output rate
    Rate {
        /// Recipe id
        recipe: String,

        /// Desired output per minute
        #[arg(short, long)]
        rate: f64,
    },

    /// Size a whole production chain for a target output rate
    Plan {
        item: String,

        /// Desired output per minute
        #[arg(short, long, default_value = "60")]
        rate: f64,
    },

    /// List every recipe producing an item
    Recipes { item: String },

    /// List all producible items
    ListItems,

    /// Print the built-in sample dataset as JSON
    Sample,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Commands::Sample = cli.command {
        println!("{}", serde_json::to_string_pretty(&sample_dataset())?);
        return Ok(());
    }

    let dataset = load_dataset(&cli.dataset)
        .with_context(|| format!("Failed to load dataset {}", cli.dataset.display()))?;
    let index = RecipeIndex::build(&dataset.recipes);
    let builder = TreeBuilder::new(&index).with_max_depth(cli.max_depth);

    match cli.command {
        Commands::Tree { item } => {
            if let Some(tree) = resolve(&builder, &dataset, &item) {
                if cli.json {
                    print_json(&tree)?;
                } else {
                    println!("{}", format_production_tree(&tree, 0));
                }
            }
        }

        Commands::Layout { item } => {
            if let Some(tree) = resolve(&builder, &dataset, &item) {
                let layout = layout_tree(&tree);
                if cli.json {
                    print_json(&layout)?;
                } else {
                    println!(
                        "{} nodes, {} edges on a {}x{} grid",
                        layout.nodes.len(),
                        layout.edges.len(),
                        layout.total_cols,
                        layout.total_rows
                    );
                    for node in &layout.nodes {
                        println!(
                            "  {:<12} row {:>2} col {:>2} span {:>2}",
                            node.id(),
                            node.row(),
                            node.col(),
                            node.col_span()
                        );
                    }
                }
            }
        }

        Commands::Raw { item } => {
            if let Some(tree) = resolve(&builder, &dataset, &item) {
                let raw = collect_raw_materials(&tree);
                if cli.json {
                    print_json(&raw)?;
                } else if raw.is_empty() {
                    println!("No raw materials; every input resolves to a recipe.");
                } else {
                    println!("Raw materials for {}:", dataset.item_name(&item));
                    for r in raw {
                        println!("  {:<24} {}", r.id, r.name);
                    }
                }
            }
        }

        Commands::Rate { recipe, rate } => {
            let Some(found) = dataset.recipe(&recipe) else {
                println!("Recipe '{}' not found", recipe);
                return Ok(());
            };
            match compute_rate(found, rate) {
                Some(result) if cli.json => print_json(&result)?,
                Some(result) => println!("{}", result),
                None => println!("Enter a positive rate."),
            }
        }

        Commands::Plan { item, rate } => {
            if let Some(tree) = resolve(&builder, &dataset, &item) {
                match plan_chain(&tree, rate) {
                    Some(plan) if cli.json => print_json(&plan)?,
                    Some(plan) => println!("{}", plan),
                    None => println!("Enter a positive rate."),
                }
            }
        }

        Commands::Recipes { item } => {
            let producers = index.producers(&item);
            if producers.is_empty() {
                println!("'{}' is a raw material", dataset.item_name(&item));
            } else {
                let best = index.pick_best_recipe(&item).map(|r| r.id.as_str());
                println!("Recipes producing {}:", dataset.item_name(&item));
                for r in producers {
                    let marker = if Some(r.id.as_str()) == best { "*" } else { " " };
                    let inputs: Vec<String> = r
                        .inputs
                        .iter()
                        .map(|i| format!("{} x{}", i.name, i.count))
                        .collect();
                    println!(
                        " {} {:<24} {:<20} {}s  [{}]",
                        marker,
                        r.id,
                        r.machine_name,
                        r.craft_time_seconds,
                        inputs.join(", ")
                    );
                }
            }
        }

        Commands::ListItems => {
            if index.is_empty() {
                println!("No recipes in dataset.");
            } else {
                println!("Producible items:");
                for id in index.items() {
                    println!("  {:<24} {}", id, dataset.item_name(id));
                }
            }
        }

        // printed before the dataset is loaded
        Commands::Sample => {}
    }

    Ok(())
}

/// Build the tree for `item`, reporting raw or unknown items instead of failing
fn resolve(builder: &TreeBuilder<'_>, dataset: &Dataset, item: &str) -> Option<ProductionNode> {
    let tree = builder.build(item);
    if tree.is_none() {
        println!(
            "No production chain for '{}': it is a raw material or unknown.",
            dataset.item_name(item)
        );
    }
    tree
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
