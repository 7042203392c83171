//! Built-in sample dataset for trying the calculator without real data

use std::collections::BTreeMap;

use crate::models::{Building, Dataset, ItemRef, Recipe};

const ITEMS: &[(&str, &str)] = &[
    ("iron-ore", "Iron Ore"),
    ("copper-ore", "Copper Ore"),
    ("coal", "Coal"),
    ("crude-oil", "Crude Oil"),
    ("scrap", "Scrap Metal"),
    ("iron-plate", "Iron Plate"),
    ("copper-plate", "Copper Plate"),
    ("steel", "Steel Plate"),
    ("gear", "Iron Gear"),
    ("copper-wire", "Copper Wire"),
    ("circuit", "Electronic Circuit"),
    ("petroleum", "Petroleum Gas"),
    ("heavy-oil", "Heavy Oil"),
    ("plastic", "Plastic Bar"),
    ("advanced-circuit", "Advanced Circuit"),
    ("engine", "Engine Unit"),
];

const BUILDINGS: &[(&str, &str, f64)] = &[
    ("furnace", "Stone Furnace", 90_000.0),
    ("assembler", "Assembling Machine", 75_000.0),
    ("refinery", "Oil Refinery", 420_000.0),
    ("chem-plant", "Chemical Plant", 210_000.0),
];

fn refs(items: &[(&str, u32)]) -> Vec<ItemRef> {
    items
        .iter()
        .map(|&(id, count)| ItemRef {
            id: id.to_string(),
            name: name_of(id).to_string(),
            count,
        })
        .collect()
}

fn name_of(id: &str) -> &str {
    ITEMS.iter().find(|(i, _)| *i == id).map_or(id, |&(_, name)| name)
}

fn recipe(
    id: &str,
    machine_id: &str,
    inputs: &[(&str, u32)],
    outputs: &[(&str, u32)],
    craft_time_seconds: f64,
) -> Recipe {
    let (machine_name, power_watts) = BUILDINGS
        .iter()
        .find(|(b, _, _)| *b == machine_id)
        .map_or((machine_id, 0.0), |(_, name, power)| (*name, *power));

    Recipe {
        id: id.to_string(),
        name: name_of(outputs[0].0).to_string(),
        machine_id: machine_id.to_string(),
        machine_name: machine_name.to_string(),
        inputs: refs(inputs),
        outputs: refs(outputs),
        craft_time_seconds,
        power_watts,
    }
}

/// A small chain: smelting, gears (with a scrap alternative), circuits,
/// oil refining with two outputs, and an engine that pulls it together.
pub fn sample_dataset() -> Dataset {
    let recipes = vec![
        recipe("smelt-iron", "furnace", &[("iron-ore", 1)], &[("iron-plate", 1)], 3.2),
        recipe("smelt-copper", "furnace", &[("copper-ore", 1)], &[("copper-plate", 1)], 3.2),
        recipe("smelt-steel", "furnace", &[("iron-plate", 5)], &[("steel", 1)], 16.0),
        recipe("gear", "assembler", &[("iron-plate", 2)], &[("gear", 1)], 0.5),
        recipe("gear-from-scrap", "assembler", &[("scrap", 4)], &[("gear", 1)], 2.0),
        recipe("copper-wire", "assembler", &[("copper-plate", 1)], &[("copper-wire", 2)], 0.5),
        recipe(
            "circuit",
            "assembler",
            &[("iron-plate", 1), ("copper-wire", 3)],
            &[("circuit", 1)],
            0.5,
        ),
        recipe(
            "basic-refining",
            "refinery",
            &[("crude-oil", 100)],
            &[("petroleum", 45), ("heavy-oil", 25)],
            5.0,
        ),
        recipe(
            "plastic",
            "chem-plant",
            &[("petroleum", 20), ("coal", 1)],
            &[("plastic", 2)],
            1.0,
        ),
        recipe(
            "advanced-circuit",
            "assembler",
            &[("circuit", 2), ("plastic", 2), ("copper-wire", 4)],
            &[("advanced-circuit", 1)],
            6.0,
        ),
        recipe(
            "engine",
            "assembler",
            &[("steel", 1), ("gear", 1), ("iron-plate", 2)],
            &[("engine", 1)],
            10.0,
        ),
    ];

    Dataset {
        items: ITEMS
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect(),
        buildings: BUILDINGS
            .iter()
            .map(|(id, name, power)| {
                (
                    id.to_string(),
                    Building {
                        name: name.to_string(),
                        power: *power,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>(),
        recipes,
    }
}
