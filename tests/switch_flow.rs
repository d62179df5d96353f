//! End-to-end runs against the in-memory registry.

use jdk_switcher_native::environment::{ENVIRONMENT_KEY, PATH_VAR};
use jdk_switcher_native::scanner::{JAVA_HOME_VALUE, JDK_KEY, LEGACY_JDK_KEY};
use jdk_switcher_native::store::memory::MemoryStore;
use jdk_switcher_native::store::{Hive, StoreValue, ValueKind, View};
use jdk_switcher_native::{run, Outcome, Selection, Selector, Settings, SwitchError, VersionEntry};

/// Returns a fixed choice and remembers what it was shown.
struct Scripted {
    choice: Selection,
    shown: Option<Vec<VersionEntry>>,
    home: Option<String>,
}

impl Scripted {
    fn new(choice: Selection) -> Self {
        Self {
            choice,
            shown: None,
            home: None,
        }
    }
}

impl Selector for Scripted {
    fn select(
        &mut self,
        versions: &[VersionEntry],
        current_home: Option<&str>,
    ) -> jdk_switcher_native::Result<Selection> {
        self.shown = Some(versions.to_vec());
        self.home = current_home.map(ToOwned::to_owned);
        Ok(self.choice)
    }
}

fn install(store: &MemoryStore, view: View, root: &str, version: &str, home: &str) {
    store.set_value(
        Hive::LocalMachine,
        view,
        &format!(r"{root}\{version}"),
        JAVA_HOME_VALUE,
        StoreValue::string(home),
    );
}

fn env_var(store: &MemoryStore, name: &str, value: StoreValue) {
    store.set_value(Hive::LocalMachine, View::Native, ENVIRONMENT_KEY, name, value);
}

fn machine() -> MemoryStore {
    let store = MemoryStore::new();
    install(&store, View::Wow32, JDK_KEY, "1.8", r"C:\Program Files (x86)\Java\jdk1.8");
    install(&store, View::Wow64, LEGACY_JDK_KEY, "17", r"C:\Program Files\Java\jdk-17");
    env_var(&store, "JAVA_HOME", StoreValue::string(r"C:\Program Files (x86)\Java\jdk1.8"));
    env_var(
        &store,
        PATH_VAR,
        StoreValue::expand_string(
            r"C:\Program Files (x86)\Java\jdk1.8\bin;%SystemRoot%\system32;%SystemRoot%",
        ),
    );
    env_var(&store, "JAVA_SDK_21", StoreValue::string(r"D:\jdks\21"));
    store
}

#[test]
fn selecting_a_version_rewrites_home_and_path() {
    let store = machine();
    let mut selector = Scripted::new(Selection::Index(1));

    let outcome = run(&store, &mut selector, &Settings::default()).unwrap();

    let Outcome::Applied { entry, report, .. } = outcome else {
        panic!("expected the change to be applied");
    };
    assert_eq!(entry.label, "(x64) 17");
    assert!(report.is_complete());
    assert_eq!(
        selector.home.as_deref(),
        Some(r"C:\Program Files (x86)\Java\jdk1.8")
    );

    let env = |name| store.value(Hive::LocalMachine, View::Native, ENVIRONMENT_KEY, name);
    assert_eq!(
        env("JAVA_HOME"),
        Some(StoreValue::string(r"C:\Program Files\Java\jdk-17"))
    );
    let path = env(PATH_VAR).unwrap();
    assert_eq!(path.kind, ValueKind::ExpandString);
    assert_eq!(
        path.data,
        r"C:\Program Files\Java\jdk-17\bin;%SystemRoot%\system32;%SystemRoot%"
    );
    assert_eq!(store.announcements(), 1);
    assert_eq!(store.open_handles(), 0);
}

#[test]
fn menu_lists_scanned_versions_before_manual_ones() {
    let store = machine();
    let mut selector = Scripted::new(Selection::Cancel);
    run(&store, &mut selector, &Settings::default()).unwrap();

    let labels: Vec<_> = selector
        .shown
        .unwrap()
        .into_iter()
        .map(|entry| entry.label)
        .collect();
    assert_eq!(labels, ["(x86) 1.8", "(x64) 17", "(env) 21"]);
}

#[test]
fn switching_twice_does_not_accumulate_bin_entries() {
    let store = machine();
    for _ in 0..2 {
        run(&store, &mut Scripted::new(Selection::Index(2)), &Settings::default()).unwrap();
    }
    let path = store
        .value(Hive::LocalMachine, View::Native, ENVIRONMENT_KEY, PATH_VAR)
        .unwrap();
    assert_eq!(path.data, r"D:\jdks\21\bin;%SystemRoot%\system32;%SystemRoot%");
}

#[test]
fn no_versions_found_performs_no_writes() {
    let store = MemoryStore::new();
    env_var(&store, PATH_VAR, StoreValue::string(r"C:\Windows"));
    env_var(&store, "OTHER_VAR", StoreValue::string(r"C:\jdk"));

    let mut selector = Scripted::new(Selection::Index(0));
    let err = run(&store, &mut selector, &Settings::default()).unwrap_err();

    assert!(matches!(err, SwitchError::NoVersionsFound { .. }));
    assert!(selector.shown.is_none());
    assert!(store.writes().is_empty());
}

#[test]
fn exit_choice_performs_no_writes() {
    let store = machine();
    let outcome = run(&store, &mut Scripted::new(Selection::Cancel), &Settings::default()).unwrap();
    assert!(matches!(outcome, Outcome::Cancelled));
    assert!(store.writes().is_empty());
    assert_eq!(store.announcements(), 0);
}

#[test]
fn same_path_from_both_sources_keeps_scanner_label() {
    let store = machine();
    env_var(&store, "JAVA_SDK_17", StoreValue::string(r"C:\Program Files\Java\jdk-17"));
    let mut selector = Scripted::new(Selection::Cancel);
    run(&store, &mut selector, &Settings::default()).unwrap();

    let shown = selector.shown.unwrap();
    let matching: Vec<_> = shown
        .iter()
        .filter(|entry| entry.path == r"C:\Program Files\Java\jdk-17")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].label, "(x64) 17");
}

#[test]
fn failed_path_write_is_reported_not_rolled_back() {
    let store = machine();
    store.fail_writes_to(PATH_VAR);

    let outcome = run(&store, &mut Scripted::new(Selection::Index(1)), &Settings::default()).unwrap();
    let Outcome::Applied { report, .. } = outcome else {
        panic!("expected an applied outcome");
    };
    assert!(report.home.is_ok());
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].0, PATH_VAR);
    assert_eq!(
        store.value(Hive::LocalMachine, View::Native, ENVIRONMENT_KEY, "JAVA_HOME"),
        Some(StoreValue::string(r"C:\Program Files\Java\jdk-17"))
    );
}

#[test]
fn custom_home_variable_and_prefix() {
    let store = machine();
    env_var(&store, "JDK_corretto", StoreValue::string(r"D:\corretto"));
    let settings = Settings {
        prefix: "JDK_".to_string(),
        home_var: "JDK_HOME".to_string(),
        dry_run: false,
    };
    let mut selector = Scripted::new(Selection::Index(2));
    let outcome = run(&store, &mut selector, &settings).unwrap();

    let Outcome::Applied { entry, .. } = outcome else {
        panic!("expected an applied outcome");
    };
    assert_eq!(entry.label, "(env) corretto");
    assert_eq!(selector.home, None);
    assert_eq!(
        store.value(Hive::LocalMachine, View::Native, ENVIRONMENT_KEY, "JDK_HOME"),
        Some(StoreValue::string(r"D:\corretto"))
    );
}

#[test]
fn unset_home_with_untidy_path_is_cleaned_up() {
    let store = MemoryStore::new();
    install(&store, View::Wow64, JDK_KEY, "17", r"C:\Program Files\Java\jdk-17");
    env_var(
        &store,
        PATH_VAR,
        StoreValue::expand_string(r"%SystemRoot%\system32;;C:\tools;"),
    );

    let mut selector = Scripted::new(Selection::Index(0));
    let outcome = run(&store, &mut selector, &Settings::default()).unwrap();
    assert!(matches!(outcome, Outcome::Applied { .. }));
    assert_eq!(selector.home, None);

    let path = store
        .value(Hive::LocalMachine, View::Native, ENVIRONMENT_KEY, PATH_VAR)
        .unwrap();
    assert_eq!(
        path.data,
        r"C:\Program Files\Java\jdk-17\bin;%SystemRoot%\system32;C:\tools"
    );
    assert_eq!(path.kind, ValueKind::ExpandString);
}
