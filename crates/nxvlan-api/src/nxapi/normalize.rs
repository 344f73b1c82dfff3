// Response normalizer
//
// Turns decoded replies into uniform values: the show body, VLAN table rows
// with canonical field names, and a single outcome for a config batch.
// Nothing here fails outright; unknown layouts degrade to empty results
// with a diagnostic attached.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::nxapi::models::{DeviceResponse, OneOrMany};

/// Table/row key pairs in probe order. The first table key present wins.
const VLAN_TABLES: [(&str, &str); 3] = [
    ("TABLE_vlanbriefxbrief", "ROW_vlanbriefxbrief"),
    ("TABLE_vlanbriefid", "ROW_vlanbriefid"),
    ("TABLE_vlanbrief", "ROW_vlanbrief"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VlanField {
    Id,
    Name,
    State,
    ShutState,
    Ports,
}

/// Device field-name variants for each canonical field, in preference order.
const FIELD_ALIASES: [(VlanField, &[&str]); 5] = [
    (VlanField::Id, &["vlanshowbr-vlanid-utf", "vlanshowbr-vlanid"]),
    (VlanField::Name, &["vlanshowbr-vlanname"]),
    (VlanField::State, &["vlanshowbr-vlanstate"]),
    (VlanField::ShutState, &["vlanshowbr-shutstate"]),
    (VlanField::Ports, &["vlanshowplist-ifidx"]),
];

const UNKNOWN_ERROR: &str = "Unknown error";

// ── Normalized wrapper ───────────────────────────────────────────────

/// A normalized value plus the diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Normalized<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

// ── VLAN rows ────────────────────────────────────────────────────────

/// One VLAN table row with device field names resolved to canonical ones.
///
/// Values are kept as the device reported them; `nxvlan-core` turns these
/// into typed records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VlanBriefRow {
    pub id: String,
    pub name: Option<String>,
    pub state: Option<String>,
    pub shut_state: Option<String>,
    pub ports: Vec<String>,
}

impl VlanBriefRow {
    fn resolve(row: &Map<String, Value>) -> Option<Self> {
        let mut out = Self::default();
        let mut has_id = false;
        for (field, aliases) in FIELD_ALIASES {
            let Some(value) = aliases
                .iter()
                .filter_map(|key| row.get(*key))
                .find(|v| !v.is_null())
            else {
                continue;
            };
            match field {
                VlanField::Id => {
                    if let Some(id) = scalar_text(value) {
                        out.id = id;
                        has_id = true;
                    }
                }
                VlanField::Name => out.name = scalar_text(value),
                VlanField::State => out.state = scalar_text(value),
                VlanField::ShutState => out.shut_state = scalar_text(value),
                VlanField::Ports => out.ports = port_list(value),
            }
        }
        has_id.then_some(out)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Ports arrive as `"Eth1/1, Eth1/2"` or as a one-or-many list of such strings.
fn port_list(value: &Value) -> Vec<String> {
    OneOrMany::from_value(value.clone())
        .into_vec()
        .iter()
        .filter_map(Value::as_str)
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

// ── Show bodies ──────────────────────────────────────────────────────

/// Locate the show-command `body`, whether the reply held one output or a list.
pub fn extract_show_body(resp: &DeviceResponse) -> Option<&Value> {
    resp.outputs.iter().find_map(|o| o.body.as_ref())
}

/// Extract VLAN rows from a show body.
///
/// Probes the known table keys in fixed order, reads the matching row key,
/// and wraps a lone row object into a one-element list. Unknown layouts
/// produce no rows and a `ShapeError` diagnostic.
pub fn parse_vlan_table(body: &Value) -> Normalized<Vec<VlanBriefRow>> {
    let Some(obj) = body.as_object() else {
        let diag = Diagnostic::warning(
            DiagnosticCode::ShapeError,
            "show body is not a JSON object",
        )
        .with("kind", json_kind(body));
        return Normalized {
            value: Vec::new(),
            diagnostics: vec![diag],
        };
    };

    let Some((table_key, row_key, table)) = VLAN_TABLES
        .iter()
        .find_map(|(t, r)| obj.get(*t).map(|table| (*t, *r, table)))
    else {
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let diag = Diagnostic::warning(
            DiagnosticCode::ShapeError,
            "unrecognized VLAN table layout",
        )
        .with("keys", keys.join(","));
        return Normalized {
            value: Vec::new(),
            diagnostics: vec![diag],
        };
    };

    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();

    let raw_rows = OneOrMany::from_value(table.clone())
        .into_vec()
        .into_iter()
        .filter_map(|t| match t {
            Value::Object(mut m) => m.remove(row_key),
            _ => None,
        })
        .flat_map(|r| OneOrMany::from_value(r).into_vec());

    for (idx, raw) in raw_rows.enumerate() {
        match raw.as_object().and_then(VlanBriefRow::resolve) {
            Some(row) => rows.push(row),
            None => diagnostics.push(
                Diagnostic::warning(DiagnosticCode::MalformedRow, "skipping VLAN row without an id")
                    .with("table", table_key)
                    .with("row", idx),
            ),
        }
    }

    Normalized {
        value: rows,
        diagnostics,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Config outcomes ──────────────────────────────────────────────────

/// Result of a config batch as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConfigOutcome {
    /// Every command reported success.
    Applied { commands: usize },
    /// The first command with a non-success code. Earlier commands may
    /// already be applied on the device.
    Rejected {
        index: usize,
        command: Option<String>,
        code: String,
        message: String,
    },
    /// HTTP 200 without per-command results; treated as success.
    Unverified { reason: String },
}

impl ConfigOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }

    /// Device message of the failing command.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The diagnostic worth surfacing for this outcome, if any.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Self::Applied { .. } => None,
            Self::Rejected {
                index,
                command,
                code,
                message,
            } => {
                let mut diag = Diagnostic::error(DiagnosticCode::DeviceError, message.clone())
                    .with("index", index)
                    .with("code", code);
                if let Some(cmd) = command {
                    diag = diag.with("command", cmd);
                }
                Some(diag)
            }
            Self::Unverified { reason } => Some(Diagnostic::warning(
                DiagnosticCode::UnverifiedOutcome,
                format!("config batch accepted without verification: {reason}"),
            )),
        }
    }
}

/// Reduce a config reply to one outcome.
///
/// Any located non-success code decides the result, even when sibling
/// outputs could not be read. Without one, a reply with unreadable or no
/// outputs counts as unverified success, since the HTTP exchange itself
/// returned 200.
pub fn evaluate_config_outcome(resp: &DeviceResponse) -> ConfigOutcome {
    if resp.outputs.is_empty() {
        let reason = if resp.raw_body.is_some() {
            "reply body could not be decoded"
        } else {
            "reply carried no command outputs"
        };
        return ConfigOutcome::Unverified {
            reason: reason.into(),
        };
    }

    match resp.first_failure() {
        Some((index, output)) => ConfigOutcome::Rejected {
            index,
            command: output.input.clone(),
            code: output.code.clone().unwrap_or_default(),
            message: output
                .msg
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.into()),
        },
        None if !resp.unreadable.is_empty() => ConfigOutcome::Unverified {
            reason: format!(
                "{} of {} command outputs could not be read",
                resp.unreadable.len(),
                resp.outputs.len()
            ),
        },
        None => ConfigOutcome::Applied {
            commands: resp.outputs.len(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::nxapi::models::CommandOutput;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn output(code: &str, msg: Option<&str>) -> CommandOutput {
        CommandOutput {
            code: Some(code.into()),
            msg: msg.map(Into::into),
            ..CommandOutput::default()
        }
    }

    // ── parse_vlan_table ─────────────────────────────────────────────

    #[test]
    fn single_row_object_is_wrapped() {
        let body = json!({
            "TABLE_vlanbriefxbrief": {
                "ROW_vlanbriefxbrief": {
                    "vlanshowbr-vlanid": 1,
                    "vlanshowbr-vlanid-utf": "1",
                    "vlanshowbr-vlanname": "default",
                    "vlanshowbr-vlanstate": "active",
                    "vlanshowbr-shutstate": "noshutdown"
                }
            }
        });
        let parsed = parse_vlan_table(&body);
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(
            parsed.value,
            vec![VlanBriefRow {
                id: "1".into(),
                name: Some("default".into()),
                state: Some("active".into()),
                shut_state: Some("noshutdown".into()),
                ports: vec![],
            }]
        );
    }

    #[test]
    fn row_list_is_read_in_order() {
        let body = json!({
            "TABLE_vlanbrief": {
                "ROW_vlanbrief": [
                    { "vlanshowbr-vlanid-utf": "1", "vlanshowbr-vlanname": "default" },
                    { "vlanshowbr-vlanid-utf": "10", "vlanshowbr-vlanname": "guest-wifi" },
                    { "vlanshowbr-vlanid-utf": "20", "vlanshowbr-vlanname": "Finance" }
                ]
            }
        });
        let ids: Vec<String> = parse_vlan_table(&body).value.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "10", "20"]);
    }

    #[test]
    fn unknown_layout_is_empty_with_shape_error() {
        let body = json!({ "TABLE_interface": { "ROW_interface": [] } });
        let parsed = parse_vlan_table(&body);
        assert!(parsed.value.is_empty());
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].code, DiagnosticCode::ShapeError);
        assert_eq!(parsed.diagnostics[0].context_value("keys"), Some("TABLE_interface"));
    }

    #[test]
    fn non_object_body_is_a_shape_error() {
        let parsed = parse_vlan_table(&json!("% Invalid command"));
        assert!(parsed.value.is_empty());
        assert_eq!(parsed.diagnostics[0].context_value("kind"), Some("string"));
    }

    #[test]
    fn probe_order_prefers_xbrief() {
        let body = json!({
            "TABLE_vlanbrief": { "ROW_vlanbrief": { "vlanshowbr-vlanid-utf": "99" } },
            "TABLE_vlanbriefxbrief": { "ROW_vlanbriefxbrief": { "vlanshowbr-vlanid-utf": "5" } }
        });
        let parsed = parse_vlan_table(&body);
        assert_eq!(parsed.value.len(), 1);
        assert_eq!(parsed.value[0].id, "5");
    }

    #[test]
    fn id_falls_back_to_numeric_field() {
        let body = json!({
            "TABLE_vlanbriefid": { "ROW_vlanbriefid": { "vlanshowbr-vlanid": 300 } }
        });
        let parsed = parse_vlan_table(&body);
        assert_eq!(parsed.value[0].id, "300");
        assert_eq!(parsed.value[0].name, None);
    }

    #[test]
    fn rows_without_id_are_skipped_with_diagnostic() {
        let body = json!({
            "TABLE_vlanbrief": { "ROW_vlanbrief": [
                { "vlanshowbr-vlanname": "orphan" },
                { "vlanshowbr-vlanid-utf": "30" },
                "garbage"
            ] }
        });
        let parsed = parse_vlan_table(&body);
        assert_eq!(parsed.value.len(), 1);
        assert_eq!(parsed.diagnostics.len(), 2);
        assert!(parsed
            .diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::MalformedRow));
        assert_eq!(parsed.diagnostics[1].context_value("row"), Some("2"));
    }

    #[test]
    fn port_lists_accept_string_or_list() {
        let body = json!({
            "TABLE_vlanbriefxbrief": { "ROW_vlanbriefxbrief": [
                { "vlanshowbr-vlanid-utf": "1", "vlanshowplist-ifidx": "Ethernet1/1, Ethernet1/2" },
                { "vlanshowbr-vlanid-utf": "2", "vlanshowplist-ifidx": ["Ethernet1/3", "Ethernet1/4,Ethernet1/5"] }
            ] }
        });
        let rows = parse_vlan_table(&body).value;
        assert_eq!(rows[0].ports, vec!["Ethernet1/1", "Ethernet1/2"]);
        assert_eq!(rows[1].ports, vec!["Ethernet1/3", "Ethernet1/4", "Ethernet1/5"]);
    }

    #[test]
    fn empty_table_is_empty_without_diagnostic() {
        let parsed = parse_vlan_table(&json!({ "TABLE_vlanbrief": {} }));
        assert!(parsed.value.is_empty());
        assert!(parsed.diagnostics.is_empty());
    }

    // ── extract_show_body ────────────────────────────────────────────

    #[test]
    fn show_body_found_in_single_and_list_forms() {
        let single = DeviceResponse::from_json(
            &json!({ "ins_api": { "outputs": { "output": { "code": "200", "body": { "x": 1 } } } } })
                .to_string(),
        )
        .unwrap();
        assert_eq!(extract_show_body(&single), Some(&json!({ "x": 1 })));

        let list = DeviceResponse::from_json(
            &json!({ "ins_api": { "outputs": { "output": [ { "code": "200", "body": { "y": 2 } } ] } } })
                .to_string(),
        )
        .unwrap();
        assert_eq!(extract_show_body(&list), Some(&json!({ "y": 2 })));
    }

    #[test]
    fn show_body_absent() {
        let resp = DeviceResponse::from_outputs(vec![output("200", None)]);
        assert_eq!(extract_show_body(&resp), None);
        assert_eq!(extract_show_body(&DeviceResponse::default()), None);
    }

    // ── evaluate_config_outcome ──────────────────────────────────────

    #[test]
    fn all_success_is_applied() {
        let resp = DeviceResponse::from_outputs(vec![
            output("200", None),
            output("200", None),
            output("200", None),
        ]);
        let outcome = evaluate_config_outcome(&resp);
        assert_eq!(outcome, ConfigOutcome::Applied { commands: 3 });
        assert!(outcome.is_success());
        assert!(outcome.diagnostic().is_none());
    }

    #[test]
    fn second_failure_decides_outcome() {
        let resp = DeviceResponse::from_outputs(vec![
            output("200", None),
            output("400", Some("Invalid VLAN")),
            output("500", Some("later failure")),
        ]);
        let outcome = evaluate_config_outcome(&resp);
        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_reason(), Some("Invalid VLAN"));
        let diag = outcome.diagnostic().unwrap();
        assert_eq!(diag.code, DiagnosticCode::DeviceError);
        assert_eq!(diag.context_value("index"), Some("1"));
    }

    #[test]
    fn single_object_failure_without_message() {
        let resp = DeviceResponse::from_outputs(vec![output("501", None)]);
        assert_eq!(
            evaluate_config_outcome(&resp),
            ConfigOutcome::Rejected {
                index: 0,
                command: None,
                code: "501".into(),
                message: "Unknown error".into(),
            }
        );
    }

    #[test]
    fn unreadable_sibling_keeps_located_rejection() {
        let body = json!({ "ins_api": { "outputs": { "output": [
            { "code": "400", "msg": "Invalid command", "input": "bogus" },
            null
        ] } } })
        .to_string();
        let outcome = evaluate_config_outcome(&DeviceResponse::from_json(&body).unwrap());
        assert_eq!(
            outcome,
            ConfigOutcome::Rejected {
                index: 0,
                command: Some("bogus".into()),
                code: "400".into(),
                message: "Invalid command".into(),
            }
        );
    }

    #[test]
    fn unreadable_outputs_without_failure_are_unverified() {
        let body = json!({ "ins_api": { "outputs": { "output": [
            { "code": "200" },
            "garbage"
        ] } } })
        .to_string();
        let outcome = evaluate_config_outcome(&DeviceResponse::from_json(&body).unwrap());
        assert!(outcome.is_success());
        assert_eq!(
            outcome,
            ConfigOutcome::Unverified {
                reason: "1 of 2 command outputs could not be read".into()
            }
        );
    }

    #[test]
    fn missing_outputs_is_unverified_success() {
        let outcome = evaluate_config_outcome(&DeviceResponse::undecoded("not json".into()));
        assert!(outcome.is_success());
        assert!(matches!(outcome, ConfigOutcome::Unverified { ref reason } if reason.contains("decoded")));
        assert_eq!(
            outcome.diagnostic().map(|d| d.code),
            Some(DiagnosticCode::UnverifiedOutcome)
        );
    }
}
