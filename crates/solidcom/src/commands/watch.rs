//! `solidcom watch`: follow status and variable changes while polling.

use chrono::Local;
use serde_json::json;

use solidcom_core::{Controller, VariableSet};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    controller: &Controller,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if controller.config().poll_interval.is_zero() {
        tracing::warn!("polling is disabled; only the initial snapshot will be shown");
    }

    let color = util::color(global);
    let mut status_rx = controller.status();
    let mut variables_rx = controller.variables();

    let initial = status_rx.borrow_and_update().clone();
    emit_status(global, &output::status_text(&initial, color), initial.label());

    let mut previous = variables_rx.borrow_and_update().clone();
    print_variables(global, &previous, &VariableSet::default());

    let mut updates = 0u64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = status_rx.borrow_and_update().clone();
                emit_status(global, &output::status_text(&status, color), status.label());
            }
            changed = variables_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = variables_rx.borrow_and_update().clone();
                if args.all {
                    print_variables(global, &current, &VariableSet::default());
                } else {
                    print_variables(global, &current, &previous);
                }
                previous = current;

                updates += 1;
                if args.count.is_some_and(|n| updates >= n) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

fn emit_status(global: &GlobalOpts, text: &str, label: &str) {
    let line = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            json!({ "time": timestamp(), "status": label }).to_string()
        }
        OutputFormat::Table | OutputFormat::Plain => format!("[{}] status: {text}", timestamp()),
    };
    output::print_output(&line, global.quiet);
}

/// Print every variable in `current` whose value differs from `previous`.
fn print_variables(global: &GlobalOpts, current: &VariableSet, previous: &VariableSet) {
    let time = timestamp();
    for id in current.changed_since(previous) {
        let Some(value) = current.get(id) else {
            continue;
        };
        let line = match global.output {
            OutputFormat::Json | OutputFormat::JsonCompact => {
                json!({ "time": time, "variable": id, "value": value }).to_string()
            }
            OutputFormat::Plain => format!("{id}={value}"),
            OutputFormat::Table => format!("[{time}] {id} = {value}"),
        };
        output::print_output(&line, global.quiet);
    }
}
