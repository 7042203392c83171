//! SQLite dataset source
//!
//! Datasets can also ship as a SQLite file using [`SCHEMA`]. The database is
//! only ever opened read-only.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::models::{Building, Dataset, ItemRef, Recipe};

/// Table layout a dataset database must follow
pub const SCHEMA: &str = r#"
    -- Display names for item ids
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS buildings (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        power REAL NOT NULL DEFAULT 0
    );

    -- position keeps dataset order, which recipe selection depends on
    CREATE TABLE IF NOT EXISTS recipes (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        machine_id TEXT NOT NULL,
        machine_name TEXT NOT NULL,
        craft_time_seconds REAL NOT NULL,
        power_watts REAL NOT NULL DEFAULT 0,
        position INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS recipe_inputs (
        recipe_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        item_id TEXT NOT NULL,
        count INTEGER NOT NULL,
        PRIMARY KEY (recipe_id, position)
    );

    CREATE TABLE IF NOT EXISTS recipe_outputs (
        recipe_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        item_id TEXT NOT NULL,
        count INTEGER NOT NULL,
        PRIMARY KEY (recipe_id, position)
    );
"#;

pub fn open_read_only(path: &Path) -> rusqlite::Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
}

/// Read a whole dataset from the database
pub fn load_dataset(conn: &Connection) -> rusqlite::Result<Dataset> {
    let mut dataset = Dataset::default();

    let mut stmt = conn.prepare("SELECT id, name FROM items")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    for row in rows {
        let (id, name): (String, String) = row?;
        dataset.items.insert(id, name);
    }

    let mut stmt = conn.prepare("SELECT id, name, power FROM buildings")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            Building {
                name: row.get(1)?,
                power: row.get(2)?,
            },
        ))
    })?;
    for row in rows {
        let (id, building) = row?;
        dataset.buildings.insert(id, building);
    }

    let mut stmt = conn.prepare(
        "SELECT id, name, machine_id, machine_name, craft_time_seconds, power_watts
         FROM recipes
         ORDER BY position",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Recipe {
            id: row.get(0)?,
            name: row.get(1)?,
            machine_id: row.get(2)?,
            machine_name: row.get(3)?,
            inputs: Vec::new(),
            outputs: Vec::new(),
            craft_time_seconds: row.get(4)?,
            power_watts: row.get(5)?,
        })
    })?;
    for row in rows {
        dataset.recipes.push(row?);
    }

    for recipe in &mut dataset.recipes {
        recipe.inputs = get_item_refs(conn, "recipe_inputs", &recipe.id)?;
        recipe.outputs = get_item_refs(conn, "recipe_outputs", &recipe.id)?;
    }

    Ok(dataset)
}

/// Item references of one recipe, named through the items table
fn get_item_refs(conn: &Connection, table: &str, recipe_id: &str) -> rusqlite::Result<Vec<ItemRef>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT r.item_id, COALESCE(i.name, r.item_id), r.count
         FROM {table} r
         LEFT JOIN items i ON i.id = r.item_id
         WHERE r.recipe_id = ?1
         ORDER BY r.position"
    ))?;

    let rows = stmt.query_map([recipe_id], |row| {
        Ok(ItemRef {
            id: row.get(0)?,
            name: row.get(1)?,
            count: row.get(2)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO items VALUES ('ore', 'Iron Ore'), ('plate', 'Iron Plate'), ('gear', 'Gear');
            INSERT INTO buildings VALUES ('furnace', 'Stone Furnace', 90000);
            INSERT INTO recipes VALUES
                ('gear', 'Gear', 'assembler', 'Assembler', 0.5, 75000, 2),
                ('plate', 'Iron Plate', 'furnace', 'Stone Furnace', 3.2, 90000, 1);
            INSERT INTO recipe_inputs VALUES
                ('plate', 0, 'ore', 1),
                ('gear', 0, 'plate', 2),
                ('gear', 1, 'bolt', 4);
            INSERT INTO recipe_outputs VALUES
                ('plate', 0, 'plate', 1),
                ('gear', 0, 'gear', 1);
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn recipes_come_back_in_position_order() {
        let dataset = load_dataset(&seeded()).unwrap();
        let ids: Vec<_> = dataset.recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["plate", "gear"]);
        assert_eq!(dataset.buildings["furnace"].name, "Stone Furnace");
        assert_eq!(dataset.items.len(), 3);
    }

    #[test]
    fn item_refs_keep_order_and_fall_back_to_id_for_names() {
        let dataset = load_dataset(&seeded()).unwrap();
        let gear = dataset.recipe("gear").unwrap();

        assert_eq!(gear.inputs.len(), 2);
        assert_eq!(gear.inputs[0].name, "Iron Plate");
        assert_eq!(gear.inputs[0].count, 2);
        assert_eq!(gear.inputs[1].id, "bolt");
        assert_eq!(gear.inputs[1].name, "bolt");
        assert_eq!(gear.outputs[0].id, "gear");
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn empty_database_is_an_empty_dataset() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert_eq!(load_dataset(&conn).unwrap(), Dataset::default());
    }
}
