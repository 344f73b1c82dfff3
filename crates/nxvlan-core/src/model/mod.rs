// ── Domain model ──
//
// Canonical VLAN types. Records are only ever built from a decoded device
// reply and are immutable once built; a new query yields new records.

pub mod vlan;

pub use vlan::{PortMode, VlanId, VlanRecord};
