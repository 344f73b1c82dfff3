//! Interactive VLAN menu.
//!
//! Drives the infallible switch operations from dialoguer prompts. Failure
//! reasons are collected from the diagnostic sink and shown after each
//! action; the loop only ends on Exit or a broken terminal.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use dialoguer::{Confirm, Input, Select};

use nxvlan_core::{
    CollectingSink, DeviceConfig, Diagnostic, PortMode, Severity, Switch, VlanRecord,
};

use crate::cli::{GlobalOpts, OutputFormat, VlanView};
use crate::error::CliError;
use crate::output;

use super::export::write_export;
use super::util::prompt_err;
use super::vlans::render_vlans;

const MAIN_ITEMS: &[&str] = &["Read", "Create/Update", "Delete", "Export to CSV", "Exit"];
const READ_ITEMS: &[&str] = &[
    "Show all VLANs",
    "Show VLANs by name",
    "Show VLAN by id",
    "Count VLANs",
    "Back",
];

struct Menu {
    switch: Switch,
    sink: Arc<CollectingSink>,
    color: bool,
}

pub async fn run(device: DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "menu".into(),
            reason: "the interactive menu needs a terminal; use the vlans subcommands instead"
                .into(),
        });
    }

    let sink = Arc::new(CollectingSink::new());
    let switch = Switch::new(device)?.with_sink(sink.clone());
    let menu = Menu {
        switch,
        sink,
        color: output::should_color(global.color_mode()),
    };

    eprintln!("nxvlan: {} as {}\n", menu.switch.endpoint(), menu.switch.username());

    loop {
        let choice = Select::new()
            .with_prompt("Main menu")
            .items(MAIN_ITEMS)
            .default(0)
            .interact_opt()
            .map_err(prompt_err)?;

        match choice {
            Some(0) => menu.read().await?,
            Some(1) => menu.create().await?,
            Some(2) => menu.delete().await?,
            Some(3) => menu.export().await?,
            _ => break,
        }
    }
    Ok(())
}

impl Menu {
    // ── Read ─────────────────────────────────────────────────────────

    async fn read(&self) -> Result<(), CliError> {
        loop {
            let choice = Select::new()
                .with_prompt("Read")
                .items(READ_ITEMS)
                .default(0)
                .interact_opt()
                .map_err(prompt_err)?;

            match choice {
                Some(0) => {
                    let vlans = self.switch.list_vlans().await;
                    if self.flush().is_none() {
                        self.show(&vlans, VlanView::All)?;
                    }
                }
                Some(1) => {
                    let needle = prompt_text("VLAN name contains")?;
                    let vlans = self.switch.find_vlans_by_name(&needle).await;
                    if self.flush().is_some() {
                        continue;
                    }
                    if vlans.is_empty() {
                        println!("No VLAN names contain '{needle}'");
                    } else {
                        self.show(&vlans, VlanView::Name)?;
                    }
                }
                Some(2) => {
                    let id = prompt_vlan_id()?;
                    let vlan = self.switch.find_vlan_by_id(id).await;
                    if self.flush().is_some() {
                        continue;
                    }
                    match vlan {
                        Some(vlan) => self.show(&[vlan], VlanView::Id)?,
                        None => println!("VLAN {id} not found"),
                    }
                }
                Some(3) => {
                    let count = self.switch.count_vlans().await;
                    if self.flush().is_none() {
                        println!("There are {count} VLANs configured");
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    // ── Create / Update ──────────────────────────────────────────────

    async fn create(&self) -> Result<(), CliError> {
        if !self.switch.test_authentication().await {
            self.flush();
            return Ok(());
        }

        let id = prompt_vlan_id()?;
        let name = prompt_text("VLAN name")?;
        let created = self.switch.create_vlan(id, &name).await;
        self.outcome(created, &format!("VLAN {id} ({name}) saved"));
        if !created {
            return Ok(());
        }

        let assign = Confirm::new()
            .with_prompt(format!("Assign an interface to VLAN {id}?"))
            .default(false)
            .interact()
            .map_err(prompt_err)?;
        if assign {
            let interface = prompt_text("Interface (e.g. Ethernet1/5)")?;
            let mode = match Select::new()
                .with_prompt("Switchport mode")
                .items(&["access", "trunk"])
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => PortMode::Access,
                _ => PortMode::Trunk,
            };
            let ok = self.switch.assign_port(id, &interface, mode).await;
            self.outcome(ok, &format!("{interface} assigned to VLAN {id} ({mode})"));
        }
        Ok(())
    }

    // ── Delete ───────────────────────────────────────────────────────

    async fn delete(&self) -> Result<(), CliError> {
        let vlans = self.switch.list_vlans().await;
        if self.flush().is_some() {
            return Ok(());
        }
        self.show(&vlans, VlanView::All)?;

        let id = prompt_vlan_id()?;
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete VLAN {id}?"))
            .default(false)
            .interact()
            .map_err(prompt_err)?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }

        let deleted = self.switch.delete_vlan(id).await;
        self.outcome(deleted, &format!("VLAN {id} deleted"));
        Ok(())
    }

    // ── Export ───────────────────────────────────────────────────────

    async fn export(&self) -> Result<(), CliError> {
        let file: String = Input::new()
            .with_prompt("File name")
            .default("vlan_export".into())
            .interact_text()
            .map_err(prompt_err)?;

        let vlans = self.switch.list_vlans().await;
        if self.flush().is_some() {
            return Ok(());
        }
        match write_export(&vlans, &PathBuf::from(file))? {
            Some(path) => println!(
                "{} Exported {} VLANs to {}",
                output::mark(true, self.color),
                vlans.len(),
                path.display()
            ),
            None => println!("{} No VLANs to export", output::mark(false, self.color)),
        }
        Ok(())
    }

    // ── Output ───────────────────────────────────────────────────────

    fn show(&self, vlans: &[VlanRecord], view: VlanView) -> Result<(), CliError> {
        if vlans.is_empty() {
            println!("No VLANs found");
            return Ok(());
        }
        println!("{}", render_vlans(OutputFormat::Table, vlans, view, self.color)?);
        Ok(())
    }

    /// Print a status line for a contract call, with the failure reason
    /// taken from the sink.
    fn outcome(&self, ok: bool, success: &str) {
        if ok {
            println!("{} {success}", output::mark(true, self.color));
            for diag in self.sink.take() {
                println!("  note: {}", diag.message);
            }
        } else if self.flush().is_none() {
            println!("{} failed", output::mark(false, self.color));
        }
    }

    /// Drain the sink, printing failures. Returns the first error, if any.
    fn flush(&self) -> Option<Diagnostic> {
        let diags = self.sink.take();
        for diag in &diags {
            match diag.severity {
                Severity::Error => println!("{} {}", output::mark(false, self.color), describe(diag)),
                Severity::Warning => println!("  warning: {}", diag.message),
                Severity::Info => {}
            }
        }
        diags.into_iter().find(|d| d.severity == Severity::Error)
    }
}

fn describe(diag: &Diagnostic) -> String {
    match diag.context_value("command") {
        Some(command) => format!("{} (command: {command})", diag.message),
        None => diag.message.clone(),
    }
}

fn prompt_vlan_id() -> Result<u16, CliError> {
    Input::<u16>::new()
        .with_prompt("VLAN id (1-4094)")
        .validate_with(|id: &u16| {
            if (1..=4094).contains(id) {
                Ok(())
            } else {
                Err("VLAN id must be between 1 and 4094")
            }
        })
        .interact_text()
        .map_err(prompt_err)
}

fn prompt_text(prompt: &str) -> Result<String, CliError> {
    Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(|value: &String| {
            if value.trim().is_empty() {
                Err("value cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map(|value| value.trim().to_owned())
        .map_err(prompt_err)
}
