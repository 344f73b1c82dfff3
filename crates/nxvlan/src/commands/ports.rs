//! Interface-to-VLAN binding.

use nxvlan_core::{PortMode, Switch, VlanCommand, VlanId};

use crate::cli::{GlobalOpts, PortModeArg, PortsArgs, PortsCommand};
use crate::error::CliError;

use super::vlans::report_applied;

impl From<PortModeArg> for PortMode {
    fn from(mode: PortModeArg) -> Self {
        match mode {
            PortModeArg::Access => Self::Access,
            PortModeArg::Trunk => Self::Trunk,
        }
    }
}

pub async fn handle(switch: &Switch, args: PortsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PortsCommand::Assign {
            interface,
            vlan,
            mode,
        } => {
            let command = VlanCommand::AssignPort {
                vlan: VlanId::new(vlan)?,
                interface,
                mode: mode.into(),
            };
            let outcome = switch.execute(&command).await?;
            report_applied(global, &command, &outcome);
            Ok(())
        }
    }
}
