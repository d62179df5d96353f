//! Reading and persisting the machine-wide environment variables.

use tracing::{info, warn};

use crate::path_list::{self, has_env_token};
use crate::store::{
    AccessMode, ConfigStore, Hive, StoreError, StoreHandle, StoreResult, StoreValue, ValueKind,
};

pub const ENVIRONMENT_KEY: &str = r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";
pub const PATH_VAR: &str = "Path";
pub const DEFAULT_HOME_VAR: &str = "JAVA_HOME";

/// Home and path values as they were when the run started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub home: String,
    pub path: StoreValue,
}

impl EnvironmentSnapshot {
    pub fn read<S: ConfigStore>(store: &S, home_var: &str) -> StoreResult<Self> {
        let env = store.open(Hive::LocalMachine, ENVIRONMENT_KEY, AccessMode::QUERY)?;

        let home = match env.read_string(home_var)? {
            Some(home) => home,
            None => {
                warn!("system {home_var} is not set");
                String::new()
            }
        };
        let path = match env.read_value(PATH_VAR)? {
            Some(path) => path,
            None => {
                warn!("system {PATH_VAR} is not set");
                StoreValue::expand_string("")
            }
        };
        Ok(Self { home, path })
    }

    pub fn current_home(&self) -> Option<&str> {
        let home = self.home.trim();
        (!home.is_empty()).then_some(home)
    }

    /// The path value without the current home's `bin` directory, with
    /// empty segments dropped either way.
    pub fn path_without_home(&self) -> String {
        match path_list::bin_dir(&self.home) {
            Some(bin) => path_list::remove(&self.path.data, &bin),
            None => path_list::join_path(&path_list::split_path(&self.path.data)),
        }
    }
}

/// Values to write for one switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub home: String,
    pub path: StoreValue,
}

impl PlannedChange {
    /// Drops the old home's `bin` from the path and puts the new one in front.
    pub fn new(snapshot: &EnvironmentSnapshot, new_home: &str) -> Self {
        let stripped = snapshot.path_without_home();
        let path = match path_list::bin_dir(new_home) {
            Some(bin) => path_list::prepend(&stripped, &bin),
            None => stripped,
        };
        let kind = if snapshot.path.kind == ValueKind::ExpandString || has_env_token(&path) {
            ValueKind::ExpandString
        } else {
            ValueKind::String
        };
        Self {
            home: new_home.to_string(),
            path: StoreValue { data: path, kind },
        }
    }
}

/// Outcome of each write. They are independent: one can succeed while the
/// other fails, and nothing is rolled back.
#[derive(Debug)]
pub struct PublishReport {
    pub home_var: String,
    pub home: StoreResult<()>,
    pub path: StoreResult<()>,
}

impl PublishReport {
    pub fn is_complete(&self) -> bool {
        self.home.is_ok() && self.path.is_ok()
    }

    pub fn any_written(&self) -> bool {
        self.home.is_ok() || self.path.is_ok()
    }

    /// `(variable, error)` for every write that failed.
    pub fn failures(&self) -> Vec<(&str, &StoreError)> {
        let mut failures = Vec::new();
        if let Err(err) = &self.home {
            failures.push((self.home_var.as_str(), err));
        }
        if let Err(err) = &self.path {
            failures.push((PATH_VAR, err));
        }
        failures
    }
}

pub fn set_home_variable<S: ConfigStore>(store: &S, name: &str, home: &str) -> StoreResult<()> {
    write_variable(store, name, &StoreValue::string(home))
}

pub fn set_path_variable<S: ConfigStore>(store: &S, path: &StoreValue) -> StoreResult<()> {
    write_variable(store, PATH_VAR, path)
}

fn write_variable<S: ConfigStore>(store: &S, name: &str, value: &StoreValue) -> StoreResult<()> {
    let env = store.open(Hive::LocalMachine, ENVIRONMENT_KEY, AccessMode::WRITE)?;
    env.write_value(name, value)
}

/// Writes both variables, then broadcasts the change if anything was written.
pub fn publish<S: ConfigStore>(store: &S, home_var: &str, change: &PlannedChange) -> PublishReport {
    let home = set_home_variable(store, home_var, &change.home);
    match &home {
        Ok(()) => info!("set {home_var} to {}", change.home),
        Err(err) => warn!("failed to set {home_var}: {err}"),
    }

    let path = set_path_variable(store, &change.path);
    match &path {
        Ok(()) => info!("updated {PATH_VAR}"),
        Err(err) => warn!("failed to update {PATH_VAR}: {err}"),
    }

    let report = PublishReport {
        home_var: home_var.to_string(),
        home,
        path,
    };
    if report.any_written() {
        store.announce_change();
    }
    report
}
