//! `solidcom variables`: the derived variable set, in definition order.

use serde::Serialize;
use tabled::Tabled;

use solidcom_core::{Controller, VariableValue};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct VariableEntry {
    id: String,
    label: String,
    value: VariableValue,
}

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "Variable")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn to_row(e: &VariableEntry) -> VariableRow {
    VariableRow {
        id: e.id.clone(),
        label: e.label.clone(),
        value: e.value.to_string(),
    }
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = util::snapshot(controller).await?;
    let entries: Vec<VariableEntry> = snapshot
        .variables
        .iter()
        .map(|(def, value)| VariableEntry {
            id: def.variable_id.clone(),
            label: def.name.clone(),
            value: value.clone(),
        })
        .collect();

    let out = output::render_list(global.output, &entries, to_row, |e| {
        format!("{}={}", e.id, e.value)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
