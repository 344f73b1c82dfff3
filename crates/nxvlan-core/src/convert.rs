// ── API-to-domain conversions ──
//
// Bridges normalized `nxvlan_api` rows into `VlanRecord`s: parses the id,
// fills the device default name, and drops rows that cannot be typed.

use nxvlan_api::{Diagnostic, DiagnosticCode, Normalized, VlanBriefRow};

use crate::error::CoreError;
use crate::model::{VlanId, VlanRecord};

impl TryFrom<VlanBriefRow> for VlanRecord {
    type Error = CoreError;

    fn try_from(row: VlanBriefRow) -> Result<Self, Self::Error> {
        let id: VlanId = row.id.parse()?;
        Ok(Self {
            id,
            name: row.name.unwrap_or_else(|| Self::default_name(id)),
            state: row.state.unwrap_or_default(),
            shut_state: row.shut_state.unwrap_or_default(),
            ports: row.ports,
        })
    }
}

/// Convert normalized rows, carrying their diagnostics forward and adding
/// one for every row whose id is not a valid VLAN id.
pub fn vlan_records(rows: Normalized<Vec<VlanBriefRow>>) -> Normalized<Vec<VlanRecord>> {
    let (rows, mut diagnostics) = rows.into_parts();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let raw_id = row.id.clone();
        match VlanRecord::try_from(row) {
            Ok(record) => records.push(record),
            Err(e) => diagnostics.push(
                Diagnostic::warning(DiagnosticCode::MalformedRow, "skipping VLAN row with invalid id")
                    .with("id", raw_id)
                    .with("reason", e),
            ),
        }
    }

    Normalized {
        value: records,
        diagnostics,
    }
}
