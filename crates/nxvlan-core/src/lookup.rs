// ── Derived lookups over a VLAN listing ──

use std::fmt::Display;

use crate::model::{VlanId, VlanRecord};

/// First record whose id matches `id`.
///
/// The id is compared in normalized form, so `10`, `"10"` and `" 010 "`
/// all find VLAN 10. Input that is not a valid VLAN id matches nothing.
pub fn find_by_id<'a>(records: &'a [VlanRecord], id: impl Display) -> Option<&'a VlanRecord> {
    let wanted: VlanId = id.to_string().parse().ok()?;
    records.iter().find(|r| r.id() == wanted)
}

/// All records whose name contains `needle`, ignoring case.
pub fn find_by_name<'a>(records: &'a [VlanRecord], needle: &str) -> Vec<&'a VlanRecord> {
    let needle = needle.trim().to_lowercase();
    records
        .iter()
        .filter(|r| r.name().to_lowercase().contains(&needle))
        .collect()
}
