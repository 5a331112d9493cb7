//! Contract configuration
//!
//! The contract is resolved in three layers: built-in defaults, then
//! `ROOT/.navsync.json` (or an explicit `--config` file), then CLI/env
//! overrides. String values in the file may reference environment
//! variables as `${VAR}` or `${VAR:-default}`.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::dom::Selector;
use crate::sync::{DanglingAnchorPolicy, DomContract, EmptySectionsPolicy, ScrollBehavior};

pub const CONFIG_FILE_NAME: &str = ".navsync.json";

static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("Invalid ENV_VAR_RE regex")
});

/// Values given on the command line or through `NAVSYNC_*` variables
#[derive(Debug, Clone, Default)]
pub struct ContractOverrides {
    pub anchor: Option<Selector>,
    pub container: Option<Selector>,
    pub section: Option<Selector>,
    pub nav_item: Option<Selector>,
    pub ref_attr: Option<String>,
    pub active_class: Option<String>,
    pub scroll_behavior: Option<ScrollBehavior>,
    pub on_dangling: Option<DanglingAnchorPolicy>,
    pub on_empty: Option<EmptySectionsPolicy>,
}

impl ContractOverrides {
    pub fn apply(self, contract: &mut DomContract) {
        if let Some(anchor) = self.anchor {
            contract.anchor = anchor;
        }
        if let Some(container) = self.container {
            contract.container = container;
        }
        if let Some(section) = self.section {
            contract.section = section;
        }
        if let Some(nav_item) = self.nav_item {
            contract.nav_item = nav_item;
        }
        if let Some(ref_attr) = self.ref_attr {
            contract.ref_attr = ref_attr;
        }
        if let Some(active_class) = self.active_class {
            contract.active_class = active_class;
        }
        if let Some(behavior) = self.scroll_behavior {
            contract.scroll_behavior = behavior;
        }
        if let Some(policy) = self.on_dangling {
            contract.on_dangling = policy;
        }
        if let Some(policy) = self.on_empty {
            contract.on_empty = policy;
        }
    }
}

pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Replace `${VAR}` and `${VAR:-default}` with environment values.
/// Unset variables without a default become empty strings.
pub fn substitute_env_vars(input: &str) -> String {
    ENV_VAR_RE
        .replace_all(input, |caps: &Captures| {
            let name = &caps[1];
            match (std::env::var(name), caps.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) => {
                    tracing::warn!(var = name, "environment variable not set");
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Substitute inside every string of a parsed document, leaving its structure alone
fn expand_strings(value: &mut Value) {
    match value {
        Value::String(s) => *s = substitute_env_vars(s),
        Value::Array(items) => items.iter_mut().for_each(expand_strings),
        Value::Object(map) => map.values_mut().for_each(expand_strings),
        _ => {}
    }
}

/// Parse a contract file's contents
pub fn parse_contract(json: &str) -> Result<DomContract> {
    let mut value: Value = serde_json::from_str(json)?;
    expand_strings(&mut value);
    let contract: DomContract = serde_json::from_value(value)?;
    Ok(contract)
}

/// Resolve the effective contract. An explicit `config` path must exist;
/// the default `ROOT/.navsync.json` is optional.
pub fn load_contract(
    root: &Path,
    config: Option<&Path>,
    overrides: ContractOverrides,
) -> Result<DomContract> {
    let (path, required) = match config {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_path(root), false),
    };

    let mut contract = if path.is_file() || required {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let contract = parse_contract(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded contract config");
        contract
    } else {
        DomContract::default()
    };

    overrides.apply(&mut contract);
    Ok(contract)
}
