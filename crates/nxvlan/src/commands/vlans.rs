//! VLAN command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use nxvlan_core::lookup;
use nxvlan_core::{ConfigOutcome, CoreError, Switch, VlanCommand, VlanId, VlanRecord};

use crate::cli::{GlobalOpts, OutputFormat, VlanView, VlansArgs, VlansCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct VlanRow {
    #[tabled(rename = "VLAN ID")]
    id: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Ports")]
    ports: String,
}

impl VlanRow {
    pub(crate) fn new(v: &VlanRecord, color: bool) -> Self {
        Self {
            id: v.id().get(),
            name: v.name().to_owned(),
            status: output::paint_state(v.state(), color),
            ports: v.ports().join(", "),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct VlanNameRow {
    #[tabled(rename = "VLAN Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Shut State")]
    shut_state: String,
}

impl VlanNameRow {
    pub(crate) fn new(v: &VlanRecord, color: bool) -> Self {
        Self {
            name: v.name().to_owned(),
            state: output::paint_state(v.state(), color),
            shut_state: v.shut_state().to_owned(),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct VlanIdRow {
    #[tabled(rename = "VLAN ID")]
    id: u16,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Shut State")]
    shut_state: String,
}

impl VlanIdRow {
    pub(crate) fn new(v: &VlanRecord, color: bool) -> Self {
        Self {
            id: v.id().get(),
            state: output::paint_state(v.state(), color),
            shut_state: v.shut_state().to_owned(),
        }
    }
}

/// Render a VLAN listing with the columns of `view`.
pub(crate) fn render_vlans(
    format: OutputFormat,
    vlans: &[VlanRecord],
    view: VlanView,
    color: bool,
) -> Result<String, CliError> {
    let id = |v: &VlanRecord| v.id().to_string();
    match view {
        VlanView::All => output::render_list(format, vlans, |v| VlanRow::new(v, color), id),
        VlanView::Name => output::render_list(
            format,
            vlans,
            |v| VlanNameRow::new(v, color),
            |v| v.name().to_owned(),
        ),
        VlanView::Id => output::render_list(format, vlans, |v| VlanIdRow::new(v, color), id),
    }
}

fn detail(v: &VlanRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "VLAN ID:     {}", v.id());
    let _ = writeln!(out, "Name:        {}", v.name());
    let _ = writeln!(out, "State:       {}", v.state());
    let _ = writeln!(out, "Shut State:  {}", v.shut_state());
    if v.ports().is_empty() {
        let _ = write!(out, "Ports:       -");
    } else {
        let _ = write!(out, "Ports:       {}", v.ports().join(", "));
    }
    out
}

fn render_one(global: &GlobalOpts, vlan: &VlanRecord) -> Result<(), CliError> {
    let out = output::render_single(global.output_format(), vlan, detail, |v| v.id().to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn use_color(global: &GlobalOpts) -> bool {
    global.output_format() == OutputFormat::Table && output::should_color(global.color_mode())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(switch: &Switch, args: VlansArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VlansCommand::List { view } => {
            let vlans = switch.fetch_vlans().await?;
            let out = render_vlans(global.output_format(), &vlans, view, use_color(global))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VlansCommand::Get { id } => {
            let vlans = switch.fetch_vlans().await?;
            let vlan = lookup::find_by_id(&vlans, id).ok_or_else(|| CliError::NotFound {
                identifier: id.to_string(),
            })?;
            render_one(global, vlan)
        }

        VlansCommand::Find { name } => {
            let vlans = switch.fetch_vlans().await?;
            let hits: Vec<VlanRecord> = lookup::find_by_name(&vlans, &name)
                .into_iter()
                .cloned()
                .collect();
            let format = global.output_format();
            if hits.is_empty() && format == OutputFormat::Table {
                if !global.quiet {
                    eprintln!("No VLAN names contain '{name}'");
                }
                return Ok(());
            }
            let out = render_vlans(format, &hits, VlanView::All, use_color(global))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VlansCommand::Count => {
            let count = switch.fetch_vlans().await?.len();
            let out = output::render_single(
                global.output_format(),
                &serde_json::json!({ "count": count }),
                |_| format!("There are {count} VLANs configured"),
                |_| count.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VlansCommand::Show { id } => {
            let id = VlanId::new(id)?;
            let vlan = switch
                .query_vlan(id)
                .await?
                .ok_or_else(|| CoreError::VlanNotFound {
                    identifier: id.to_string(),
                })?;
            render_one(global, &vlan)
        }

        VlansCommand::Create { id, name } => {
            let command = VlanCommand::Create {
                id: VlanId::new(id)?,
                name,
            };
            let outcome = switch.execute(&command).await?;
            report_applied(global, &command, &outcome);
            Ok(())
        }

        VlansCommand::Delete { id } => {
            let command = VlanCommand::Delete {
                id: VlanId::new(id)?,
            };
            if !util::confirm(&format!("Delete VLAN {id}?"), global.yes)? {
                return Ok(());
            }
            let outcome = switch.execute(&command).await?;
            report_applied(global, &command, &outcome);
            Ok(())
        }
    }
}

/// Status line for a successful config batch.
pub(crate) fn report_applied(global: &GlobalOpts, command: &VlanCommand, outcome: &ConfigOutcome) {
    if global.quiet {
        return;
    }
    let color = output::should_color(global.color_mode());
    match outcome {
        ConfigOutcome::Unverified { reason } => eprintln!(
            "{} {} (not verified: {reason})",
            output::mark(true, color),
            command.describe()
        ),
        _ => eprintln!("{} {}", output::mark(true, color), command.describe()),
    }
}
