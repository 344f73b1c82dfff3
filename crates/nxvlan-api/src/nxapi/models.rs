// NX-API envelope types
//
// Request and reply shapes for the `ins_api` JSON-RPC-like envelope. The
// device drops array wrappers whenever a list has exactly one element, so
// every such position decodes through `OneOrMany`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::error::Error;

/// Separator joining a batch into the single `input` field.
pub const COMMAND_SEPARATOR: &str = ";";

/// Per-command status code meaning success.
pub const SUCCESS_CODE: &str = "200";

const ENVELOPE_VERSION: &str = "1.0";
const CHUNK: &str = "0";
const SESSION_ID: &str = "1";
const OUTPUT_FORMAT: &str = "json";

// ── One-or-many ──────────────────────────────────────────────────────

/// A position where the device sends either one object or a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Flatten into a sequence, wrapping a lone object.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Many(items) => items.len(),
            Self::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl OneOrMany<Value> {
    /// Classify an already-decoded JSON value. `null` counts as no items.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Many(items),
            Value::Null => Self::Many(Vec::new()),
            other => Self::One(other),
        }
    }
}

// ── Request ──────────────────────────────────────────────────────────

/// Envelope `type`: read-only show or state-changing config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum CommandMode {
    #[serde(rename = "cli_show")]
    #[strum(serialize = "cli_show")]
    Show,
    #[serde(rename = "cli_conf")]
    #[strum(serialize = "cli_conf")]
    Config,
}

/// An ordered batch of CLI commands submitted in one envelope.
///
/// Order is preserved on the wire and on the device. The exchange is one
/// HTTP request; the device may still apply a prefix of a config batch
/// before failing on a later command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBatch {
    mode: CommandMode,
    commands: Vec<String>,
}

impl CommandBatch {
    pub fn new<I, S>(mode: CommandMode, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode,
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    /// A read-only batch (`cli_show`).
    pub fn show<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(CommandMode::Show, commands)
    }

    /// A state-changing batch (`cli_conf`).
    pub fn config<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(CommandMode::Config, commands)
    }

    pub fn mode(&self) -> CommandMode {
        self.mode
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Reject batches the device would misparse.
    ///
    /// A command may not be blank, nor contain the separator or a line
    /// break, since either would split it into extra device commands.
    pub fn validate(&self) -> Result<(), Error> {
        if self.commands.is_empty() {
            return Err(Error::InvalidBatch {
                reason: "batch contains no commands".into(),
            });
        }
        for (idx, cmd) in self.commands.iter().enumerate() {
            if cmd.trim().is_empty() {
                return Err(Error::InvalidBatch {
                    reason: format!("command #{} is empty", idx + 1),
                });
            }
            if cmd.contains(COMMAND_SEPARATOR) || cmd.contains(['\n', '\r']) {
                return Err(Error::InvalidBatch {
                    reason: format!("command #{} contains a separator or line break: {cmd:?}", idx + 1),
                });
            }
        }
        Ok(())
    }

    /// The joined `input` field.
    pub fn input(&self) -> String {
        self.commands.join(COMMAND_SEPARATOR)
    }

    pub(crate) fn envelope(&self) -> InsRequest {
        InsRequest {
            ins_api: InsApiRequest {
                version: ENVELOPE_VERSION,
                kind: self.mode,
                chunk: CHUNK,
                sid: SESSION_ID,
                input: self.input(),
                output_format: OUTPUT_FORMAT,
            },
        }
    }
}

/// `{ "ins_api": { ... } }` request wrapper.
#[derive(Debug, Serialize)]
pub(crate) struct InsRequest {
    pub ins_api: InsApiRequest,
}

#[derive(Debug, Serialize)]
pub(crate) struct InsApiRequest {
    pub version: &'static str,
    #[serde(rename = "type")]
    pub kind: CommandMode,
    pub chunk: &'static str,
    pub sid: &'static str,
    pub input: String,
    pub output_format: &'static str,
}

// ── Reply ────────────────────────────────────────────────────────────

/// How to treat a config reply that arrives with HTTP 200 but cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigDecodePolicy {
    /// Report success without per-command verification (logged at warn).
    #[default]
    Lenient,
    /// Report a decode error like a show request would.
    Strict,
}

/// One per-command result object from `outputs.output`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CommandOutput {
    /// Echo of the submitted command (not sent by every firmware).
    pub input: Option<String>,
    pub code: Option<String>,
    pub msg: Option<String>,
    /// Command-specific payload for show commands.
    pub body: Option<Value>,
}

impl CommandOutput {
    /// A missing code is not a failure; only an explicit non-200 is.
    pub fn is_success(&self) -> bool {
        self.code.as_deref().is_none_or(|c| c == SUCCESS_CODE)
    }

    /// Read one element of `outputs.output`.
    ///
    /// `msg` and `input` take whatever text the device sent. Only a
    /// non-object element or a `code` that is neither string nor number
    /// makes the element unreadable.
    fn from_element(element: Value) -> Result<Self, String> {
        let mut fields = match element {
            Value::Object(fields) => fields,
            other => return Err(format!("expected an object, got {other}")),
        };
        let code = match fields.remove("code") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => return Err(format!("unreadable code {other}")),
        };
        Ok(Self {
            input: fields.remove("input").and_then(loose_text),
            code,
            msg: fields.remove("msg").and_then(loose_text),
            body: fields.remove("body").filter(|b| !b.is_null()),
        })
    }
}

/// Decoded reply envelope with `outputs.output` normalized to a sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceResponse {
    /// Per-command outputs in submission order. Unreadable elements keep
    /// their position as an empty output.
    pub outputs: Vec<CommandOutput>,
    /// Positions in `outputs` whose element could not be read.
    pub unreadable: Vec<usize>,
    /// Set when a config reply was accepted without being decodable.
    pub raw_body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsReply {
    ins_api: InsApiReply,
}

#[derive(Debug, Deserialize)]
struct InsApiReply {
    #[serde(default)]
    outputs: Option<Outputs>,
}

#[derive(Debug, Deserialize)]
struct Outputs {
    #[serde(default)]
    output: Option<Value>,
}

impl DeviceResponse {
    /// Decode a reply body.
    ///
    /// The `ins_api` key is required; a missing `outputs` or `output`
    /// yields an empty output list rather than an error. Each element of
    /// `output` is read on its own, so one odd sibling never hides the
    /// codes of the others.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let reply: InsReply = serde_json::from_str(body)?;
        let elements = reply
            .ins_api
            .outputs
            .and_then(|o| o.output)
            .map(|v| OneOrMany::from_value(v).into_vec())
            .unwrap_or_default();

        let mut resp = Self::default();
        for (index, element) in elements.into_iter().enumerate() {
            match CommandOutput::from_element(element) {
                Ok(output) => resp.outputs.push(output),
                Err(cause) => {
                    Diagnostic::warning(
                        DiagnosticCode::MalformedRow,
                        "skipping unreadable command output",
                    )
                    .with("index", index)
                    .with("cause", cause)
                    .emit();
                    resp.outputs.push(CommandOutput::default());
                    resp.unreadable.push(index);
                }
            }
        }
        Ok(resp)
    }

    pub fn from_outputs(outputs: Vec<CommandOutput>) -> Self {
        Self {
            outputs,
            ..Self::default()
        }
    }

    /// A config reply kept only as its raw text.
    pub fn undecoded(body: String) -> Self {
        Self {
            raw_body: Some(body),
            ..Self::default()
        }
    }

    /// Index and output of the first non-success command.
    pub fn first_failure(&self) -> Option<(usize, &CommandOutput)> {
        self.outputs.iter().enumerate().find(|(_, o)| !o.is_success())
    }
}

/// Text of a loosely typed field. Lists of strings are joined.
fn loose_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(loose_text).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn envelope_matches_wire_contract() {
        let batch = CommandBatch::config(["vlan 50", "name Finance", "exit"]);
        let value = serde_json::to_value(batch.envelope()).unwrap();
        assert_eq!(
            value,
            json!({
                "ins_api": {
                    "version": "1.0",
                    "type": "cli_conf",
                    "chunk": "0",
                    "sid": "1",
                    "input": "vlan 50;name Finance;exit",
                    "output_format": "json"
                }
            })
        );
    }

    #[test]
    fn show_mode_serializes_as_cli_show() {
        let batch = CommandBatch::show(["show vlan brief"]);
        let value = serde_json::to_value(batch.envelope()).unwrap();
        assert_eq!(value["ins_api"]["type"], "cli_show");
        assert_eq!(value["ins_api"]["input"], "show vlan brief");
    }

    #[test]
    fn validate_rejects_bad_batches() {
        assert!(CommandBatch::show(Vec::<String>::new()).validate().is_err());
        assert!(CommandBatch::config(["vlan 10", "  "]).validate().is_err());
        assert!(CommandBatch::config(["name a;no vlan 1"]).validate().is_err());
        assert!(CommandBatch::config(["name a\nexit"]).validate().is_err());
        assert!(CommandBatch::config(["vlan 10", "exit"]).validate().is_ok());
    }

    #[test]
    fn single_output_object_becomes_one_element_list() {
        let body = json!({
            "ins_api": { "outputs": { "output": { "code": "200", "msg": "Success", "body": {} } } }
        })
        .to_string();
        let resp = DeviceResponse::from_json(&body).unwrap();
        assert_eq!(resp.outputs.len(), 1);
        assert!(resp.outputs[0].is_success());
        assert!(resp.first_failure().is_none());
    }

    #[test]
    fn output_list_keeps_order_and_numeric_codes() {
        let body = json!({
            "ins_api": { "outputs": { "output": [
                { "code": 200, "input": "vlan 50" },
                { "code": "400", "msg": "Invalid command", "input": "bogus" }
            ] } }
        })
        .to_string();
        let resp = DeviceResponse::from_json(&body).unwrap();
        assert_eq!(resp.outputs[0].code.as_deref(), Some("200"));
        let (idx, failed) = resp.first_failure().unwrap();
        assert_eq!(idx, 1);
        assert_eq!(failed.msg.as_deref(), Some("Invalid command"));
    }

    #[test]
    fn null_sibling_does_not_hide_a_failure() {
        let body = json!({
            "ins_api": { "outputs": { "output": [
                { "code": "400", "msg": "Invalid command" },
                null
            ] } }
        })
        .to_string();
        let resp = DeviceResponse::from_json(&body).unwrap();
        assert_eq!(resp.outputs.len(), 2);
        assert_eq!(resp.unreadable, vec![1]);
        let (idx, failed) = resp.first_failure().unwrap();
        assert_eq!(idx, 0);
        assert_eq!(failed.msg.as_deref(), Some("Invalid command"));
    }

    #[test]
    fn odd_field_types_are_read_loosely() {
        let body = json!({
            "ins_api": { "outputs": { "output": [
                { "code": "200", "input": 50 },
                { "code": "400", "msg": ["CLI execution error"] },
                { "code": { "value": "200" }, "msg": "?" }
            ] } }
        })
        .to_string();
        let resp = DeviceResponse::from_json(&body).unwrap();
        assert_eq!(resp.outputs[0].input.as_deref(), Some("50"));
        assert_eq!(resp.outputs[1].msg.as_deref(), Some("CLI execution error"));
        assert_eq!(resp.unreadable, vec![2]);
        assert_eq!(resp.first_failure().unwrap().0, 1);
    }

    #[test]
    fn missing_outputs_is_an_empty_response() {
        let resp = DeviceResponse::from_json(r#"{"ins_api": {"version": "1.0"}}"#).unwrap();
        assert!(resp.outputs.is_empty());
    }

    #[test]
    fn missing_envelope_key_fails_to_decode() {
        assert!(DeviceResponse::from_json(r#"{"other": {}}"#).is_err());
        assert!(DeviceResponse::from_json("<html>").is_err());
    }

    #[test]
    fn one_or_many_from_value() {
        assert_eq!(OneOrMany::from_value(json!({"a": 1})).into_vec().len(), 1);
        assert_eq!(OneOrMany::from_value(json!([1, 2, 3])).len(), 3);
        assert!(OneOrMany::from_value(Value::Null).is_empty());
    }
}
