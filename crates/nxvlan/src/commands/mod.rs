//! Command dispatch: bridges CLI args -> `Switch` operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod export;
pub mod menu;
pub mod ports;
pub mod util;
pub mod vlans;

use nxvlan_core::{DeviceConfig, Switch};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a switch-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    device: DeviceConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        // The menu installs its own diagnostic sink
        Command::Menu => menu::run(device, global).await,
        cmd => {
            let switch = Switch::new(device)?;
            match cmd {
                Command::Vlans(args) => vlans::handle(&switch, args, global).await,
                Command::Ports(args) => ports::handle(&switch, args, global).await,
                Command::Auth(args) => auth::handle(&switch, args, global).await,
                Command::Export(args) => export::handle(&switch, args, global).await,
                // Menu, Config and Completions are handled before this point
                Command::Menu | Command::Config(_) | Command::Completions(_) => Ok(()),
            }
        }
    }
}
