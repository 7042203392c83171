//! Throughput calculator logic

use serde::Serialize;

use crate::models::{InputRate, ItemRef, ProductionNode, RateResult, Recipe};
use crate::tree::format_power;

/// Size `recipe` to deliver `desired_per_minute` of its first output.
///
/// The machine count is rounded up, so `actual_output` can exceed the
/// request. Returns `None` for a non-positive or non-finite rate.
pub fn compute_rate(recipe: &Recipe, desired_per_minute: f64) -> Option<RateResult> {
    let primary = recipe.outputs.first()?;
    rate_for_output(recipe, primary, desired_per_minute)
}

fn rate_for_output(recipe: &Recipe, output: &ItemRef, desired_per_minute: f64) -> Option<RateResult> {
    if !desired_per_minute.is_finite() || desired_per_minute <= 0.0 {
        tracing::debug!(recipe = %recipe.id, desired_per_minute, "ignoring non-positive rate");
        return None;
    }

    let output_per_minute = per_minute(output.count, recipe.craft_time_seconds);
    if !output_per_minute.is_finite() || output_per_minute <= 0.0 {
        tracing::warn!(
            recipe = %recipe.id,
            output = %output.id,
            "recipe has no usable throughput; dataset was not validated"
        );
        return None;
    }

    let machines_needed = (desired_per_minute / output_per_minute).ceil() as u64;
    let machines = machines_needed as f64;

    let inputs_per_minute = recipe
        .inputs
        .iter()
        .map(|input| InputRate {
            id: input.id.clone(),
            name: input.name.clone(),
            per_minute: per_minute(input.count, recipe.craft_time_seconds) * machines,
        })
        .collect();

    Some(RateResult {
        recipe_id: recipe.id.clone(),
        output_id: output.id.clone(),
        desired_per_minute,
        output_per_cycle: output.count,
        output_per_minute,
        machines_needed,
        actual_output: machines * output_per_minute,
        total_power: machines * recipe.power_watts,
        inputs_per_minute,
    })
}

fn per_minute(count: u32, craft_time_seconds: f64) -> f64 {
    f64::from(count) / craft_time_seconds * 60.0
}

impl std::fmt::Display for RateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Rate: {} ===", self.recipe_id)?;
        writeln!(f, "Target: {} @ {:.2}/min", self.output_id, self.desired_per_minute)?;
        writeln!(f, "Per machine: {:.2}/min", self.output_per_minute)?;
        writeln!(f, "Machines needed: {}", self.machines_needed)?;
        writeln!(f, "Actual output: {:.2}/min", self.actual_output)?;
        writeln!(f, "Power: {}", format_power(self.total_power))?;

        if !self.inputs_per_minute.is_empty() {
            writeln!(f)?;
            writeln!(f, "Inputs:")?;
            for input in &self.inputs_per_minute {
                writeln!(f, "  {} @ {:.2}/min", input.name, input.per_minute)?;
            }
        }

        Ok(())
    }
}

/// One sized stage of a chain plan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStage {
    pub item_id: String,
    pub item_name: String,
    pub recipe_id: String,
    pub machine_id: String,
    pub machine_name: String,
    pub depth: usize,
    pub demand_per_minute: f64,
    pub machines_needed: u64,
    pub actual_output: f64,
    pub power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineCount {
    pub machine_id: String,
    pub machine_name: String,
    pub count: u64,
}

/// Summary of a whole production chain sized for a target rate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainPlan {
    pub target_id: String,
    pub target_name: String,
    pub target_rate: f64,
    pub stages: Vec<ChainStage>,
    pub machine_counts: Vec<MachineCount>,
    pub raw_inputs: Vec<InputRate>,
    pub total_power: f64,
}

/// Size every stage of a production tree for `desired_per_minute` of the root.
///
/// Each child is sized for what its parent's machines actually consume,
/// relative to the output entry the child was built for.
pub fn plan_chain(root: &ProductionNode, desired_per_minute: f64) -> Option<ChainPlan> {
    if !desired_per_minute.is_finite() || desired_per_minute <= 0.0 {
        return None;
    }

    let mut plan = ChainPlan {
        target_id: root.output_item.id.clone(),
        target_name: root.output_item.name.clone(),
        target_rate: desired_per_minute,
        stages: Vec::new(),
        machine_counts: Vec::new(),
        raw_inputs: Vec::new(),
        total_power: 0.0,
    };
    plan_recursive(root, desired_per_minute, &mut plan);
    Some(plan)
}

fn plan_recursive(node: &ProductionNode, demand: f64, plan: &mut ChainPlan) {
    let Some(result) = rate_for_output(&node.recipe, &node.output_item, demand) else {
        tracing::debug!(item = %node.output_item.id, demand, "stage skipped");
        return;
    };

    let recipe = &node.recipe;
    plan.stages.push(ChainStage {
        item_id: node.output_item.id.clone(),
        item_name: node.output_item.name.clone(),
        recipe_id: recipe.id.clone(),
        machine_id: recipe.machine_id.clone(),
        machine_name: recipe.machine_name.clone(),
        depth: node.depth,
        demand_per_minute: demand,
        machines_needed: result.machines_needed,
        actual_output: result.actual_output,
        power: result.total_power,
    });
    plan.total_power += result.total_power;

    match plan.machine_counts.iter_mut().find(|m| m.machine_id == recipe.machine_id) {
        Some(entry) => entry.count += result.machines_needed,
        None => plan.machine_counts.push(MachineCount {
            machine_id: recipe.machine_id.clone(),
            machine_name: recipe.machine_name.clone(),
            count: result.machines_needed,
        }),
    }

    for ((input, child), consumed) in node.resolved_inputs().into_iter().zip(&result.inputs_per_minute) {
        match child {
            Some(child) => plan_recursive(child, consumed.per_minute, plan),
            None => match plan.raw_inputs.iter_mut().find(|r| r.id == input.id) {
                Some(entry) => entry.per_minute += consumed.per_minute,
                None => plan.raw_inputs.push(consumed.clone()),
            },
        }
    }
}

impl std::fmt::Display for ChainPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Production Plan ===")?;
        writeln!(f, "Target: {} @ {:.2}/min", self.target_name, self.target_rate)?;
        writeln!(f)?;

        writeln!(f, "Stages:")?;
        for stage in &self.stages {
            writeln!(
                f,
                "  {}{}x {} -> {} @ {:.2}/min (needs {:.2}/min)",
                "  ".repeat(stage.depth),
                stage.machines_needed,
                stage.machine_name,
                stage.item_name,
                stage.actual_output,
                stage.demand_per_minute
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Machines required:")?;
        for machine in &self.machine_counts {
            writeln!(f, "  {}x {}", machine.count, machine.machine_name)?;
        }
        writeln!(f)?;

        writeln!(f, "Raw inputs required:")?;
        for raw in &self.raw_inputs {
            writeln!(f, "  {} @ {:.2}/min", raw.name, raw.per_minute)?;
        }
        writeln!(f)?;

        writeln!(f, "Power: {}", format_power(self.total_power))?;

        Ok(())
    }
}
