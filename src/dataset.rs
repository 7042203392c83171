//! Dataset loading and validation
//!
//! The core only ever sees an in-memory [`Dataset`]; this module is the
//! boundary that reads one from disk and rejects recipes the calculators
//! cannot work with.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::db;
use crate::models::{Dataset, ItemRef, Recipe};

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unsupported dataset format: {file}")]
    UnsupportedFormat { file: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A recipe breaks a data invariant (empty outputs, zero craft time...).
    #[error("invalid recipe '{recipe}': {reason}")]
    InvalidRecipe { recipe: String, reason: String },

    #[error("duplicate recipe id '{recipe}'")]
    DuplicateRecipe { recipe: String },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported dataset file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Sqlite,
}

/// Detect the format of a dataset file from its extension.
pub fn detect_format(path: &Path) -> Result<Format, DatasetError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("db" | "sqlite" | "sqlite3") => Ok(Format::Sqlite),
        _ => Err(DatasetError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Read and validate a dataset from a JSON document or SQLite database.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let dataset = match detect_format(path)? {
        Format::Json => {
            let content = std::fs::read_to_string(path)?;
            parse_json(&content).map_err(|e| DatasetError::Parse {
                file: path.to_path_buf(),
                detail: e.to_string(),
            })?
        }
        Format::Sqlite => {
            let conn = db::open_read_only(path)?;
            db::load_dataset(&conn)?
        }
    };

    dataset.validate()?;
    tracing::info!(
        path = %path.display(),
        items = dataset.items.len(),
        recipes = dataset.recipes.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

pub fn parse_json(content: &str) -> Result<Dataset, serde_json::Error> {
    serde_json::from_str(content)
}

impl Dataset {
    /// Check the recipe invariants the calculators rely on.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut ids = HashSet::new();
        for recipe in &self.recipes {
            if !ids.insert(recipe.id.as_str()) {
                return Err(DatasetError::DuplicateRecipe {
                    recipe: recipe.id.clone(),
                });
            }
            if let Err(reason) = check_recipe(recipe) {
                tracing::warn!(recipe = %recipe.id, %reason, "rejecting recipe");
                return Err(DatasetError::InvalidRecipe {
                    recipe: recipe.id.clone(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Display name for an item id, falling back to the id itself
    pub fn item_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.items.get(id).map_or(id, String::as_str)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

fn check_recipe(recipe: &Recipe) -> Result<(), String> {
    if recipe.outputs.is_empty() {
        return Err("recipe has no outputs".to_string());
    }
    if !recipe.craft_time_seconds.is_finite() || recipe.craft_time_seconds <= 0.0 {
        return Err(format!("craft time must be positive, got {}", recipe.craft_time_seconds));
    }
    if !recipe.power_watts.is_finite() {
        return Err("power draw is not finite".to_string());
    }
    let zero_count = |items: &[ItemRef]| items.iter().find(|i| i.count == 0).map(|i| i.id.clone());
    if let Some(id) = zero_count(&recipe.inputs).or_else(|| zero_count(&recipe.outputs)) {
        return Err(format!("item '{id}' has a zero count"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GEAR_JSON: &str = r#"{
        "items": { "gear": "Gear", "plate": "Iron Plate" },
        "buildings": { "assembler": { "name": "Assembler", "power": 150 } },
        "recipes": [{
            "id": "gear",
            "name": "Gear",
            "machineId": "assembler",
            "machineName": "Assembler",
            "inputs": [{ "id": "plate", "name": "Iron Plate", "count": 2 }],
            "outputs": [{ "id": "gear", "name": "Gear", "count": 1 }],
            "craftTimeSeconds": 0.5,
            "powerWatts": 150
        }]
    }"#;

    fn gear_dataset() -> Dataset {
        parse_json(GEAR_JSON).unwrap()
    }

    #[test]
    fn parses_camel_case_document() {
        let dataset = gear_dataset();
        assert_eq!(dataset.recipes.len(), 1);
        assert_eq!(dataset.recipes[0].machine_id, "assembler");
        assert_eq!(dataset.recipes[0].craft_time_seconds, 0.5);
        assert_eq!(dataset.buildings["assembler"].power, 150.0);
        assert!(dataset.validate().is_ok());
    }

    #[test]
    fn item_name_falls_back_to_id() {
        let dataset = gear_dataset();
        assert_eq!(dataset.item_name("plate"), "Iron Plate");
        assert_eq!(dataset.item_name("mystery"), "mystery");
    }

    #[test]
    fn rejects_zero_craft_time() {
        let mut dataset = gear_dataset();
        dataset.recipes[0].craft_time_seconds = 0.0;
        assert!(matches!(
            dataset.validate(),
            Err(DatasetError::InvalidRecipe { recipe, .. }) if recipe == "gear"
        ));
    }

    #[test]
    fn rejects_empty_outputs_and_zero_counts() {
        let mut dataset = gear_dataset();
        dataset.recipes[0].outputs.clear();
        assert!(dataset.validate().is_err());

        let mut dataset = gear_dataset();
        dataset.recipes[0].inputs[0].count = 0;
        let err = dataset.validate().unwrap_err();
        assert!(err.to_string().contains("'plate' has a zero count"));
    }

    #[test]
    fn rejects_duplicate_recipe_ids() {
        let mut dataset = gear_dataset();
        dataset.recipes.push(dataset.recipes[0].clone());
        assert!(matches!(
            dataset.validate(),
            Err(DatasetError::DuplicateRecipe { .. })
        ));
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(detect_format(Path::new("a/recipes.json")).unwrap(), Format::Json);
        assert_eq!(detect_format(Path::new("recipes.db")).unwrap(), Format::Sqlite);
        assert!(matches!(
            detect_format(Path::new("recipes.yaml")),
            Err(DatasetError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn loads_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(GEAR_JSON.as_bytes()).unwrap();

        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.recipe("gear").unwrap().inputs[0].count, 2);
    }

    #[test]
    fn malformed_json_reports_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{ \"recipes\": [ ").unwrap();

        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }
}
