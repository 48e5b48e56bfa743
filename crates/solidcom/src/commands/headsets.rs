//! `solidcom headsets`: list beltpacks on the primary base station.

use tabled::Tabled;

use solidcom_core::feedback::{
    CellPalette, OnlinePalette, RssiPalette, cell_style, online_style, role_style, rssi_style,
};
use solidcom_core::{BusLabel, Controller, Headset, TalkMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct HeadsetRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Online")]
    online: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Talk Mode")]
    talk_mode: String,
    #[tabled(rename = "Bus A")]
    bus_a: String,
    #[tabled(rename = "Bus B")]
    bus_b: String,
}

struct Palettes {
    online: OnlinePalette,
    rssi: RssiPalette,
    cell: CellPalette,
}

fn to_row(h: &Headset, palettes: &Palettes, color: bool) -> HeadsetRow {
    let online = if h.is_online() { "yes" } else { "no" };
    let role = h.role.as_ref().map_or_else(
        || "-".to_owned(),
        |r| {
            if r.head == 1 {
                format!("{} (head)", r.name)
            } else {
                r.name.clone()
            }
        },
    );
    HeadsetRow {
        id: h.id,
        name: h.name.clone(),
        online: output::paint(online, &online_style(h, palettes.online), color),
        battery: output::paint(
            &format!("{}/7", h.cell),
            &cell_style(h, &palettes.cell),
            color,
        ),
        signal: output::paint(
            &format!("{}/4", h.rssi),
            &rssi_style(h, &palettes.rssi),
            color,
        ),
        role: output::paint(&role, &role_style(h), color),
        talk_mode: TalkMode::from_code(h.talk_mode)
            .map_or_else(|| format!("code {}", h.talk_mode), |m| m.label().to_owned()),
        bus_a: util::slot_list(&h.slots_for(BusLabel::A.as_str())),
        bus_b: util::slot_list(&h.slots_for(BusLabel::B.as_str())),
    }
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = util::snapshot(controller).await?;
    let headsets: &[Headset] = snapshot
        .base_station()
        .map(|s| s.headsets.as_slice())
        .unwrap_or_default();

    let palettes = Palettes {
        online: OnlinePalette::default(),
        rssi: RssiPalette::default(),
        cell: CellPalette::default(),
    };
    let color = util::color(global);
    let out = output::render_list(
        global.output,
        headsets,
        |h| to_row(h, &palettes, color),
        |h| h.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
