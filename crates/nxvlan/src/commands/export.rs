//! CSV export of the VLAN table.

use std::path::{Path, PathBuf};

use tabled::Tabled;

use nxvlan_core::{Switch, VlanRecord};

use crate::cli::{ExportArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ExportRow {
    #[tabled(rename = "VLAN_ID")]
    id: u16,
    #[tabled(rename = "VLAN_Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Shut_State")]
    shut_state: String,
}

impl From<&VlanRecord> for ExportRow {
    fn from(v: &VlanRecord) -> Self {
        Self {
            id: v.id().get(),
            name: v.name().to_owned(),
            status: v.state().to_owned(),
            shut_state: v.shut_state().to_owned(),
        }
    }
}

/// `vlans` without an extension gets `.csv`; explicit extensions are kept.
pub(crate) fn export_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("csv")
    }
}

/// Write `vlans` to `path`. Returns the written path, or `None` when
/// there was nothing to export.
pub(crate) fn write_export(vlans: &[VlanRecord], path: &Path) -> Result<Option<PathBuf>, CliError> {
    if vlans.is_empty() {
        tracing::warn!("no VLANs to export");
        return Ok(None);
    }
    let path = export_path(path);
    let rows: Vec<ExportRow> = vlans.iter().map(ExportRow::from).collect();
    output::write_csv(std::fs::File::create(&path)?, &rows)?;
    tracing::info!(path = %path.display(), rows = vlans.len(), "VLAN table exported");
    Ok(Some(path))
}

pub async fn handle(switch: &Switch, args: ExportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let vlans = switch.fetch_vlans().await?;
    let written = write_export(&vlans, &args.file)?;
    if global.quiet {
        return Ok(());
    }
    let color = output::should_color(global.color_mode());
    match written {
        Some(path) => eprintln!(
            "{} Exported {} VLANs to {}",
            output::mark(true, color),
            vlans.len(),
            path.display()
        ),
        None => eprintln!("{} No VLANs to export", output::mark(false, color)),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_added_only_when_missing() {
        assert_eq!(export_path(Path::new("vlans")), PathBuf::from("vlans.csv"));
        assert_eq!(export_path(Path::new("out/vlans.txt")), PathBuf::from("out/vlans.txt"));
        assert_eq!(export_path(Path::new("vlans.csv")), PathBuf::from("vlans.csv"));
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let rows = vec![ExportRow {
            id: 20,
            name: "lab, east".into(),
            status: "active".into(),
            shut_state: "noshutdown".into(),
        }];
        let bytes = output::write_csv(Vec::new(), &rows).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "VLAN_ID,VLAN_Name,Status,Shut_State\n20,\"lab, east\",active,noshutdown\n"
        );
    }

    #[test]
    fn empty_list_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("never");
        let written = write_export(&[], &target).unwrap();
        assert!(written.is_none());
        assert!(!export_path(&target).exists());
    }
}
