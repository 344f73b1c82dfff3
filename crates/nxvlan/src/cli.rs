//! Clap derive structures for the `nxvlan` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nxvlan -- VLAN management for Cisco Nexus switches
#[derive(Debug, Parser)]
#[command(
    name = "nxvlan",
    version,
    about = "Manage VLANs on Cisco Nexus switches over NX-API",
    long_about = "Create, list, look up and delete VLANs and bind interfaces to them\n\
        on Cisco Nexus switches through the NX-API JSON endpoint.\n\n\
        Run `nxvlan config init` to set up a switch profile, or pass\n\
        --host/--username/--password directly.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Switch profile to use
    #[arg(long, short = 'p', env = "NXVLAN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Switch management address or URL (overrides profile)
    #[arg(long, short = 'H', env = "NXVLAN_HOST", global = true)]
    pub host: Option<String>,

    /// NX-API username (overrides profile)
    #[arg(long, short = 'u', env = "NXVLAN_USERNAME", global = true)]
    pub username: Option<String>,

    /// NX-API password (prefer the environment or keyring)
    #[arg(
        long,
        env = "NXVLAN_PASSWORD",
        global = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Output format [default: `defaults.output` from the config, else table]
    #[arg(long, short = 'o', env = "NXVLAN_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: `defaults.color` from the config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "NXVLAN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NXVLAN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
    /// Comma-separated values with a header row
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect, create and delete VLANs
    #[command(alias = "vlan", alias = "v")]
    Vlans(VlansArgs),

    /// Bind switch interfaces to VLANs
    #[command(alias = "port")]
    Ports(PortsArgs),

    /// Check switch credentials
    Auth(AuthArgs),

    /// Export the VLAN table to a CSV file
    Export(ExportArgs),

    /// Interactive VLAN menu
    Menu,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VLANS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VlansArgs {
    #[command(subcommand)]
    pub command: VlansCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlansCommand {
    /// List all VLANs (`show vlan brief`)
    #[command(alias = "ls")]
    List {
        /// Columns to show
        #[arg(long, default_value = "all")]
        view: VlanView,
    },

    /// Look up one VLAN by id in the VLAN listing
    Get {
        /// VLAN id (1-4094)
        #[arg(value_parser = vlan_id_parser())]
        id: u16,
    },

    /// Find VLANs whose name contains a string (case-insensitive)
    Find {
        /// Name fragment
        name: String,
    },

    /// Count configured VLANs
    Count,

    /// Query one VLAN on the switch (`show vlan id N`)
    Show {
        /// VLAN id (1-4094)
        #[arg(value_parser = vlan_id_parser())]
        id: u16,
    },

    /// Create a VLAN, or rename an existing one
    #[command(alias = "update")]
    Create {
        /// VLAN id (1-4094)
        #[arg(value_parser = vlan_id_parser())]
        id: u16,

        /// VLAN name
        #[arg(long, short = 'n')]
        name: String,
    },

    /// Delete a VLAN
    #[command(alias = "rm")]
    Delete {
        /// VLAN id (1-4094)
        #[arg(value_parser = vlan_id_parser())]
        id: u16,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VlanView {
    /// Id, name, status and member ports
    All,
    /// Name, state and shut state
    Name,
    /// Id, state and shut state
    Id,
}

fn vlan_id_parser() -> clap::builder::RangedI64ValueParser<u16> {
    clap::value_parser!(u16).range(1..=4094)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PortsArgs {
    #[command(subcommand)]
    pub command: PortsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortsCommand {
    /// Put an interface into a VLAN
    Assign {
        /// Interface name (e.g. Ethernet1/5)
        interface: String,

        /// VLAN id (1-4094)
        #[arg(long, value_parser = vlan_id_parser())]
        vlan: u16,

        /// Switchport mode
        #[arg(long, short = 'm', default_value = "access")]
        mode: PortModeArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PortModeArg {
    /// Untagged member of one VLAN
    Access,
    /// Tagged; the VLAN is added to the allowed list
    Trunk,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Send `show version` to confirm the credentials are accepted
    Test,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EXPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Destination file (`.csv` is appended when there is no extension)
    #[arg(long, short = 'f', default_value = "vlan_export.csv")]
    pub file: PathBuf,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
