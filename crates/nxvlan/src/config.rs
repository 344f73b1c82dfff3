//! CLI configuration: thin wrapper around `nxvlan_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--host, --username, etc.).

use clap::ValueEnum;
use secrecy::SecretString;

use nxvlan_core::DeviceConfig;
use nxvlan_core::config::DEFAULT_ENDPOINT_PATH;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use nxvlan_config::{
    Config, Defaults, Profile, config_path, load_config, save_config, store_password,
};

// ── Display defaults ────────────────────────────────────────────────

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }

    /// Fill `--output` and `--color` from `[defaults]` when not given.
    pub fn apply_defaults(&mut self, defaults: &Defaults) -> Result<(), CliError> {
        if self.output.is_none() {
            self.output = Some(parse_default("defaults.output", &defaults.output)?);
        }
        if self.color.is_none() {
            self.color = Some(parse_default("defaults.color", &defaults.color)?);
        }
        Ok(())
    }
}

fn parse_default<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `DeviceConfig` from the config file, profile and CLI overrides.
///
/// Without a matching profile, `--host` plus credentials from flags or
/// the environment are enough.
pub fn resolve_device_config(global: &GlobalOpts, cfg: &Config) -> Result<DeviceConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match (cfg.profiles.get(&profile_name), global.host.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(host)) => Profile {
            host: host.to_owned(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.into(),
            ..Profile::default()
        },
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: cfg.profile_names(),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    // Flag overrides
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let username = match global.username {
        Some(ref user) => user.clone(),
        None => nxvlan_config::resolve_username(&profile, &profile_name)?,
    };
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => nxvlan_config::resolve_password(&profile, &profile_name)?,
    };

    Ok(nxvlan_config::device_config(
        &profile,
        &cfg.defaults,
        username,
        password,
    )?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["nxvlan"];
        argv.extend_from_slice(args);
        argv.extend(["auth", "test"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn defaults(output: &str, color: &str) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
            ..Defaults::default()
        }
    }

    #[test]
    fn config_defaults_fill_unset_flags() {
        let mut opts = global(&[]);
        opts.apply_defaults(&defaults("json", "never")).unwrap();
        assert_eq!(opts.output_format(), OutputFormat::Json);
        assert!(matches!(opts.color_mode(), ColorMode::Never));
    }

    #[test]
    fn flags_win_over_config_defaults() {
        let mut opts = global(&["-o", "plain", "--color", "always"]);
        opts.apply_defaults(&defaults("JSON-compact", "never")).unwrap();
        assert_eq!(opts.output_format(), OutputFormat::Plain);
        assert!(matches!(opts.color_mode(), ColorMode::Always));
    }

    #[test]
    fn unknown_default_format_is_rejected() {
        let mut opts = global(&[]);
        let err = opts.apply_defaults(&defaults("xml", "auto")).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "defaults.output"));
    }

    #[test]
    fn built_in_fallbacks_without_defaults() {
        let opts = global(&[]);
        assert_eq!(opts.output_format(), OutputFormat::Table);
        assert!(matches!(opts.color_mode(), ColorMode::Auto));
    }
}
