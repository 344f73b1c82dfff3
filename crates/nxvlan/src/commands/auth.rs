//! Credential check.

use nxvlan_core::Switch;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(switch: &Switch, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Test => {
            switch.check_authentication().await?;
            if !global.quiet {
                eprintln!(
                    "{} Authenticated to {} as {}",
                    output::mark(true, output::should_color(global.color_mode())),
                    switch.endpoint(),
                    switch.username()
                );
            }
            Ok(())
        }
    }
}
