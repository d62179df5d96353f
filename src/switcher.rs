//! One run of the tool: discover, let the user pick, rewrite the environment.

use tracing::info;

use crate::collector::{self, DEFAULT_PREFIX};
use crate::environment::{self, EnvironmentSnapshot, PlannedChange, PublishReport, DEFAULT_HOME_VAR};
use crate::error::{Result, SwitchError};
use crate::scanner;
use crate::store::ConfigStore;
use crate::versions::{VersionEntry, VersionRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Name prefix of manually registered JDK variables.
    pub prefix: String,
    /// Variable that receives the selected installation path.
    pub home_var: String,
    /// Compute the change but do not write it.
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            home_var: DEFAULT_HOME_VAR.to_string(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based position in the version list.
    Index(usize),
    Cancel,
}

/// Presents the versions and returns the user's choice.
pub trait Selector {
    fn select(&mut self, versions: &[VersionEntry], current_home: Option<&str>) -> Result<Selection>;
}

#[derive(Debug)]
pub enum Outcome {
    Cancelled,
    /// Dry run: what would have been written.
    Planned {
        entry: VersionEntry,
        change: PlannedChange,
    },
    Applied {
        entry: VersionEntry,
        change: PlannedChange,
        report: PublishReport,
    },
}

/// Installer-registered JDKs first, then manual registrations.
pub fn discover<S: ConfigStore>(store: &S, prefix: &str) -> VersionRegistry {
    let scanned = scanner::scan_installed(store);
    let manual = collector::collect_manual(store, prefix);
    info!(
        scanned = scanned.len(),
        manual = manual.len(),
        "discovered JDK installations"
    );
    VersionRegistry::merge(scanned, manual)
}

pub fn run<S, P>(store: &S, selector: &mut P, settings: &Settings) -> Result<Outcome>
where
    S: ConfigStore,
    P: Selector + ?Sized,
{
    let versions = discover(store, &settings.prefix);
    if versions.is_empty() {
        return Err(SwitchError::NoVersionsFound {
            prefix: settings.prefix.clone(),
        });
    }

    let snapshot = EnvironmentSnapshot::read(store, &settings.home_var)?;

    let entry = match selector.select(versions.entries(), snapshot.current_home())? {
        Selection::Cancel => return Ok(Outcome::Cancelled),
        Selection::Index(index) => versions.get(index).cloned().ok_or_else(|| {
            SwitchError::InvalidSelection(format!(
                "{} is not one of the {} listed versions",
                index + 1,
                versions.len()
            ))
        })?,
    };
    info!(path = %entry.path, label = %entry.label, "selected");

    let change = PlannedChange::new(&snapshot, &entry.path);
    if settings.dry_run {
        return Ok(Outcome::Planned { entry, change });
    }

    let report = environment::publish(store, &settings.home_var, &change);
    Ok(Outcome::Applied {
        entry,
        change,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{ENVIRONMENT_KEY, PATH_VAR};
    use crate::scanner::{JAVA_HOME_VALUE, JDK_KEY};
    use crate::store::memory::MemoryStore;
    use crate::store::{Hive, StoreValue, View};

    struct Fixed(Selection);

    impl Selector for Fixed {
        fn select(&mut self, _: &[VersionEntry], _: Option<&str>) -> Result<Selection> {
            Ok(self.0)
        }
    }

    fn machine() -> MemoryStore {
        let store = MemoryStore::new();
        store.set_value(
            Hive::LocalMachine,
            View::Wow64,
            &format!(r"{JDK_KEY}\17"),
            JAVA_HOME_VALUE,
            StoreValue::string(r"C:\jdk17"),
        );
        store.set_value(
            Hive::LocalMachine,
            View::Native,
            ENVIRONMENT_KEY,
            PATH_VAR,
            StoreValue::string(r"C:\Windows"),
        );
        store
    }

    #[test]
    fn out_of_range_index_is_rejected_without_writes() {
        let store = machine();
        let err = run(&store, &mut Fixed(Selection::Index(5)), &Settings::default()).unwrap_err();
        assert!(matches!(err, SwitchError::InvalidSelection(_)));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn dry_run_plans_but_does_not_write() {
        let store = machine();
        let settings = Settings {
            dry_run: true,
            ..Settings::default()
        };
        let outcome = run(&store, &mut Fixed(Selection::Index(0)), &settings).unwrap();
        match outcome {
            Outcome::Planned { entry, change } => {
                assert_eq!(entry.label, "(x64) 17");
                assert_eq!(change.path.data, r"C:\jdk17\bin;C:\Windows");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(store.writes().is_empty());
        assert_eq!(store.announcements(), 0);
    }
}
