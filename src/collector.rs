//! JDKs registered by hand as `<prefix><label>` system variables.

use tracing::{debug, warn};

use crate::environment::ENVIRONMENT_KEY;
use crate::store::{location, AccessMode, ConfigStore, Hive, StoreHandle};
use crate::versions::VersionEntry;

pub const DEFAULT_PREFIX: &str = "JAVA_SDK_";

/// A variable name carrying the prefix, with the label part split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub suffix: &'a str,
}

/// Names that start with `prefix` exactly (case-sensitive) and have something after it.
pub fn registrations<'a, I>(names: I, prefix: &str) -> Vec<Registration<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            name.strip_prefix(prefix)
                .filter(|suffix| !suffix.is_empty())
                .map(|suffix| Registration { name, suffix })
        })
        .collect()
}

pub fn collect_manual<S: ConfigStore>(store: &S, prefix: &str) -> Vec<VersionEntry> {
    let env = match store.open(Hive::LocalMachine, ENVIRONMENT_KEY, AccessMode::READ) {
        Ok(env) => env,
        Err(err) => {
            warn!("cannot open system environment: {err}");
            return Vec::new();
        }
    };
    let names = match env.value_names() {
        Ok(names) => names,
        Err(err) => {
            warn!(
                "cannot list variables in {}: {err}",
                location(Hive::LocalMachine, ENVIRONMENT_KEY)
            );
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for registration in registrations(names.iter().map(String::as_str), prefix) {
        let home = match env.read_string(registration.name) {
            Ok(Some(value)) if !value.trim().is_empty() => value.trim().to_string(),
            Ok(_) => {
                debug!("{} is empty or not a string", registration.name);
                continue;
            }
            Err(err) => {
                debug!("cannot read {}: {err}", registration.name);
                continue;
            }
        };
        found.push(VersionEntry::new(home, format!("(env) {}", registration.suffix)));
    }
    found
}
