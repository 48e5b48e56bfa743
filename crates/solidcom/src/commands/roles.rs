//! `solidcom roles`: the base station's role catalog.

use tabled::Tabled;

use solidcom_core::{Controller, Role};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Head")]
    head: String,
}

fn to_row(r: &Role) -> RoleRow {
    RoleRow {
        id: r.id,
        name: r.name.clone(),
        head: if r.head == 0 {
            "-".into()
        } else {
            r.head.to_string()
        },
    }
}

pub async fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    util::snapshot(controller).await?;
    let roles = controller.store().current_roles();

    let out = output::render_list(global.output, roles.as_slice(), to_row, |r| r.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
