//! TOML-based configuration for quarry.
//!
//! A config file (`quarry.toml`) picks the dialect and optionally adjusts
//! the default profile. String values support environment variable
//! expansion.
//!
//! Example configuration:
//! ```toml
//! [dialect]
//! vendor = "oracle"
//!
//! [dialect.overrides]
//! join_syntax = "sql92"
//! enable = ["locking_with_distinct"]
//! disable = ["having"]
//! max_column_name_length = 28
//! reserved_words = ["SIZE", "LEVEL"]
//! for_update_clause = "FOR UPDATE NOWAIT"
//! delimit_identifiers = true
//!
//! [dialect.overrides.type_names]
//! varchar = "VARCHAR2{0} CHAR"
//! ```
//!
//! Instead of a vendor, `[dialect]` may describe the server the way a
//! driver reports it (`product`, `version`, `url`); the profile is then
//! detected from those.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::sql::dialect::{
    Capability, ConstraintNameMode, DialectProfile, JoinSyntax, QuoteStyle, RangePosition, Vendor,
    VendorProbe,
};
use crate::sql::types::TypeCode;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub dialect: DialectSettings,
}

/// Which profile to use, and how to adjust it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DialectSettings {
    /// Vendor whose default profile is the starting point.
    pub vendor: Option<Vendor>,

    /// Reported product name; detection is used when set.
    pub product: Option<String>,

    /// Reported product version (supports ${ENV_VAR} expansion).
    pub version: Option<String>,

    /// Connection URL (supports ${ENV_VAR} expansion).
    pub url: Option<String>,

    pub overrides: ProfileOverrides,
}

/// Adjustments applied on top of the starting profile.
///
/// Every field is optional; unset fields keep the profile's value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileOverrides {
    pub join_syntax: Option<JoinSyntax>,
    pub range_position: Option<RangePosition>,
    pub enable: Vec<Capability>,
    pub disable: Vec<Capability>,
    pub max_table_name_length: Option<usize>,
    pub max_column_name_length: Option<usize>,
    pub max_constraint_name_length: Option<usize>,
    pub max_index_name_length: Option<usize>,
    pub max_sequence_name_length: Option<usize>,
    pub max_auto_assign_name_length: Option<usize>,
    /// Added to the profile's reserved words.
    pub reserved_words: Vec<String>,
    /// Keyed by generic type name (`varchar`, `bigint`, ...).
    pub type_names: BTreeMap<String, String>,
    pub for_update_clause: Option<String>,
    pub delimit_identifiers: Option<bool>,
    pub quote_style: Option<QuoteStyle>,
    pub constraint_name_mode: Option<ConstraintNameMode>,
    pub use_triggers_for_auto_assign: Option<bool>,
}

impl ProfileOverrides {
    pub fn is_empty(&self) -> bool {
        *self == ProfileOverrides::default()
    }

    /// A new profile: `base` with these overrides applied.
    pub fn apply(&self, base: &DialectProfile) -> Result<DialectProfile, SettingsError> {
        if let Some(cap) = self.enable.iter().find(|cap| self.disable.contains(cap)) {
            return Err(SettingsError::InvalidConfig(format!(
                "capability {:?} is both enabled and disabled",
                cap
            )));
        }

        let mut p = base.clone();
        if let Some(syntax) = self.join_syntax {
            p = p.with_join_syntax(syntax);
        }
        if let Some(position) = self.range_position {
            p.range_position = position;
        }
        for cap in &self.enable {
            p = p.with_capability(*cap, true);
        }
        for cap in &self.disable {
            p = p.with_capability(*cap, false);
        }

        let lengths = [
            (self.max_table_name_length, &mut p.naming.max_table_name_length),
            (self.max_column_name_length, &mut p.naming.max_column_name_length),
            (self.max_constraint_name_length, &mut p.naming.max_constraint_name_length),
            (self.max_index_name_length, &mut p.naming.max_index_name_length),
            (self.max_sequence_name_length, &mut p.naming.max_sequence_name_length),
            (self.max_auto_assign_name_length, &mut p.naming.max_auto_assign_name_length),
        ];
        for (value, target) in lengths {
            match value {
                Some(0) => {
                    return Err(SettingsError::InvalidConfig(
                        "name length limits must be positive".to_string(),
                    ))
                }
                Some(n) => *target = n,
                None => {}
            }
        }

        p.naming
            .reserved_words
            .extend(self.reserved_words.iter().map(|w| w.to_ascii_uppercase()));
        for (code, name) in &self.type_names {
            let code: TypeCode = code.parse().map_err(SettingsError::InvalidConfig)?;
            p = p.with_type_name(code, name.clone());
        }
        if let Some(clause) = &self.for_update_clause {
            p.clauses.for_update = Some(clause.clone());
        }
        if let Some(delimit) = self.delimit_identifiers {
            p = p.with_delimited_identifiers(delimit);
        }
        if let Some(style) = self.quote_style {
            p.naming.quote_style = style;
        }
        if let Some(mode) = self.constraint_name_mode {
            p.naming.constraint_name_mode = mode;
        }
        if let Some(triggers) = self.use_triggers_for_auto_assign {
            p = p.with_trigger_auto_assign(triggers);
        }
        Ok(p)
    }
}

impl DialectSettings {
    /// Probe built from the reported server fields, if a product is named.
    pub fn probe(&self) -> Result<Option<VendorProbe>, SettingsError> {
        let Some(product) = &self.product else {
            return Ok(None);
        };
        let mut probe = VendorProbe::new(expand_env_vars(product)?);
        if let Some(version) = &self.version {
            probe = probe.with_version(expand_env_vars(version)?);
        }
        if let Some(url) = &self.url {
            probe = probe.with_url(expand_env_vars(url)?);
        }
        Ok(Some(probe))
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `QUARRY_CONFIG`
    /// 2. `./quarry.toml`
    /// 3. `~/.config/quarry/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("QUARRY_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("quarry.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("quarry").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// The configured profile.
    ///
    /// Detection from the reported product wins over a named vendor; with
    /// neither the generic profile is used. Overrides always yield a new
    /// value and never touch the shared defaults.
    pub fn resolve_profile(&self) -> Result<DialectProfile, SettingsError> {
        let base = match self.dialect.probe()? {
            Some(probe) => DialectProfile::detect(&probe),
            None => self.dialect.vendor.unwrap_or_default().profile().clone(),
        };
        if self.dialect.overrides.is_empty() {
            return Ok(base);
        }
        debug!(dialect = %base.platform, "applying profile overrides");
        self.dialect.overrides.apply(&base)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // A lone $ is kept.
                result.push('$');
                continue;
            }
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
