//! `solidcom status`: connection state and base station summary.

use serde::Serialize;

use solidcom_core::{Controller, DeviceStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StatusReport {
    host: String,
    status: String,
    message: Option<String>,
    station: Option<StationSummary>,
    roles: usize,
    data_age_ms: Option<i64>,
}

#[derive(Serialize)]
struct StationSummary {
    id: u32,
    name: String,
    serial_number: String,
    ip: String,
    online: bool,
    headsets: usize,
    headsets_online: usize,
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    // A failed fetch is still a status worth reporting.
    if let Err(err) = util::snapshot(controller).await {
        tracing::debug!(error = %err, "status without snapshot");
    }

    let store = controller.store();
    let status = controller.current_status();
    let report = StatusReport {
        host: controller.config().host.clone(),
        status: status.label().to_owned(),
        message: status.message().map(str::to_owned),
        station: store.current_base_station().map(|station| StationSummary {
            id: station.id,
            name: station.name.clone(),
            serial_number: station.serial_number.clone(),
            ip: station.ip.clone(),
            online: station.is_online(),
            headsets: station.headsets.len(),
            headsets_online: station.headsets.iter().filter(|h| h.is_online()).count(),
        }),
        roles: store.current_roles().len(),
        data_age_ms: store.data_age().map(|age| age.num_milliseconds()),
    };

    let color = util::color(global);
    let out = output::render_single(
        global.output,
        &report,
        |r| detail(r, &status, color),
        |r| r.status.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(report: &StatusReport, status: &DeviceStatus, color: bool) -> String {
    let mut lines = vec![
        format!("Host:      {}", report.host),
        format!("Status:    {}", output::status_text(status, color)),
    ];
    match report.station {
        Some(ref station) => {
            lines.push(format!("Station:   {} (id {})", station.name, station.id));
            lines.push(format!("Serial:    {}", station.serial_number));
            lines.push(format!("IP:        {}", station.ip));
            lines.push(format!(
                "Headsets:  {} online of {}",
                station.headsets_online, station.headsets
            ));
        }
        None => lines.push("Station:   (no data)".into()),
    }
    lines.push(format!("Roles:     {}", report.roles));
    if let Some(ms) = report.data_age_ms {
        lines.push(format!("Data age:  {}.{}s", ms / 1000, (ms % 1000) / 100));
    }
    lines.join("\n")
}
