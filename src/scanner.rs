//! Discovery of JDKs registered by their installers.

use tracing::{debug, info, warn};

use crate::store::{location, AccessMode, ConfigStore, Hive, StoreHandle, StoreResult, View};
use crate::versions::VersionEntry;

pub const JDK_KEY: &str = r"SOFTWARE\JavaSoft\JDK";
pub const LEGACY_JDK_KEY: &str = r"SOFTWARE\JavaSoft\Java Development Kit";
pub const JAVA_HOME_VALUE: &str = "JavaHome";

/// One well-known location read through one registry view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTarget {
    pub subpath: &'static str,
    pub view: View,
    pub arch: &'static str,
}

/// Fixed order; earlier targets win when the same path shows up twice.
pub const SCAN_TARGETS: [ScanTarget; 4] = [
    ScanTarget {
        subpath: JDK_KEY,
        view: View::Wow32,
        arch: "x86",
    },
    ScanTarget {
        subpath: LEGACY_JDK_KEY,
        view: View::Wow32,
        arch: "x86",
    },
    ScanTarget {
        subpath: JDK_KEY,
        view: View::Wow64,
        arch: "x64",
    },
    ScanTarget {
        subpath: LEGACY_JDK_KEY,
        view: View::Wow64,
        arch: "x64",
    },
];

pub fn scan_installed<S: ConfigStore>(store: &S) -> Vec<VersionEntry> {
    SCAN_TARGETS
        .iter()
        .flat_map(|target| scan_target(store, target))
        .collect()
}

/// Reads one location. A missing location is normal (that installer layout
/// is simply absent) and yields nothing.
pub fn scan_target<S: ConfigStore>(store: &S, target: &ScanTarget) -> Vec<VersionEntry> {
    let place = format!("{} ({})", location(Hive::LocalMachine, target.subpath), target.arch);
    let access = AccessMode::READ.with_view(target.view);

    let root = match store.open(Hive::LocalMachine, target.subpath, access) {
        Ok(root) => root,
        Err(err) if err.is_not_found() => {
            info!("registry key not found: {place}");
            return Vec::new();
        }
        Err(err) => {
            warn!("cannot open {place}: {err}");
            return Vec::new();
        }
    };

    let names = match root.child_names() {
        Ok(names) => names,
        Err(err) => {
            warn!("cannot list versions under {place}: {err}");
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for name in names {
        match read_java_home(&root, &name) {
            Ok(Some(home)) => {
                debug!(version = %name, home = %home, arch = target.arch, "found JDK");
                found.push(VersionEntry::new(home, format!("({}) {name}", target.arch)));
            }
            Ok(None) => debug!("{place}\\{name} has no {JAVA_HOME_VALUE}"),
            Err(err) => debug!("skipping {place}\\{name}: {err}"),
        }
    }
    found
}

fn read_java_home<H: StoreHandle>(root: &H, name: &str) -> StoreResult<Option<String>> {
    let version = root.open_child(name, AccessMode::QUERY)?;
    let home = version.read_string(JAVA_HOME_VALUE)?;
    Ok(home
        .map(|home| home.trim().to_string())
        .filter(|home| !home.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::StoreValue;

    fn install(store: &MemoryStore, view: View, root: &str, version: &str, home: &str) {
        store.set_value(
            Hive::LocalMachine,
            view,
            &format!(r"{root}\{version}"),
            JAVA_HOME_VALUE,
            StoreValue::string(home),
        );
    }

    #[test]
    fn empty_store_yields_nothing() {
        let store = MemoryStore::new();
        assert!(scan_installed(&store).is_empty());
        assert_eq!(store.open_handles(), 0);
    }

    #[test]
    fn labels_carry_arch_and_version() {
        let store = MemoryStore::new();
        install(&store, View::Wow64, JDK_KEY, "17.0.2", r"C:\Program Files\Java\jdk-17.0.2");
        install(&store, View::Wow32, LEGACY_JDK_KEY, "1.8", r"C:\Program Files (x86)\Java\jdk1.8");

        let found = scan_installed(&store);
        assert_eq!(
            found,
            vec![
                VersionEntry::new(r"C:\Program Files (x86)\Java\jdk1.8", "(x86) 1.8"),
                VersionEntry::new(r"C:\Program Files\Java\jdk-17.0.2", "(x64) 17.0.2"),
            ]
        );
    }

    #[test]
    fn scan_order_is_fixed() {
        let store = MemoryStore::new();
        install(&store, View::Wow64, LEGACY_JDK_KEY, "d", r"C:\d");
        install(&store, View::Wow64, JDK_KEY, "c", r"C:\c");
        install(&store, View::Wow32, LEGACY_JDK_KEY, "b", r"C:\b");
        install(&store, View::Wow32, JDK_KEY, "a", r"C:\a");

        let labels: Vec<_> = scan_installed(&store).into_iter().map(|e| e.label).collect();
        assert_eq!(labels, ["(x86) a", "(x86) b", "(x64) c", "(x64) d"]);
    }

    #[test]
    fn blank_or_missing_marker_is_skipped() {
        let store = MemoryStore::new();
        install(&store, View::Wow64, JDK_KEY, "blank", "   ");
        store.insert_key(Hive::LocalMachine, View::Wow64, &format!(r"{JDK_KEY}\CurrentVersion"));
        install(&store, View::Wow64, JDK_KEY, "21", r"C:\jdk-21");

        let found = scan_installed(&store);
        assert_eq!(found, vec![VersionEntry::new(r"C:\jdk-21", "(x64) 21")]);
    }

    #[test]
    fn denied_locations_do_not_stop_the_scan() {
        let store = MemoryStore::new();
        install(&store, View::Wow32, JDK_KEY, "11", r"C:\jdk-11");
        install(&store, View::Wow64, JDK_KEY, "bad", r"C:\jdk-bad");
        install(&store, View::Wow64, JDK_KEY, "21", r"C:\jdk-21");
        store.deny(Hive::LocalMachine, View::Wow64, &format!(r"{JDK_KEY}\bad"));
        store.deny(Hive::LocalMachine, View::Wow32, JDK_KEY);

        let found = scan_installed(&store);
        assert_eq!(found, vec![VersionEntry::new(r"C:\jdk-21", "(x64) 21")]);
        assert_eq!(store.open_handles(), 0);
    }
}
