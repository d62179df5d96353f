//! Uniform access to the hierarchical configuration store (the registry).
//!
//! The engine only talks to [`ConfigStore`] and [`StoreHandle`]; the winreg
//! backed implementation lives in [`registry`] and an in-memory one in
//! [`memory`]. Handles release their underlying resource on `Drop`, so a
//! handle never outlives the function that opened it.

use thiserror::Error;

pub mod memory;
#[cfg(windows)]
pub mod registry;

/// Predefined root a key path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
}

impl Hive {
    pub fn short_name(self) -> &'static str {
        match self {
            Hive::LocalMachine => "HKLM",
            Hive::CurrentUser => "HKCU",
        }
    }
}

/// Registry redirection layer to open a key through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum View {
    /// Whatever the process bitness selects.
    Native,
    /// `KEY_WOW64_32KEY`
    Wow32,
    /// `KEY_WOW64_64KEY`
    Wow64,
}

/// What the caller intends to do with an opened key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Enumerate subkeys and values, query values (`KEY_READ`).
    Read,
    /// Query values only (`KEY_QUERY_VALUE`).
    Query,
    /// Set values only (`KEY_SET_VALUE`).
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessMode {
    pub intent: Intent,
    pub view: View,
}

impl AccessMode {
    pub const READ: AccessMode = AccessMode::new(Intent::Read, View::Native);
    pub const READ_32: AccessMode = AccessMode::new(Intent::Read, View::Wow32);
    pub const READ_64: AccessMode = AccessMode::new(Intent::Read, View::Wow64);
    pub const QUERY: AccessMode = AccessMode::new(Intent::Query, View::Native);
    pub const WRITE: AccessMode = AccessMode::new(Intent::Write, View::Native);

    pub const fn new(intent: Intent, view: View) -> Self {
        Self { intent, view }
    }

    /// Same intent, opened through `view`. Child keys inherit the parent view.
    pub const fn with_view(self, view: View) -> Self {
        Self { intent: self.intent, view }
    }

    pub fn can_read(self) -> bool {
        matches!(self.intent, Intent::Read | Intent::Query)
    }

    pub fn can_enumerate(self) -> bool {
        self.intent == Intent::Read
    }

    pub fn can_write(self) -> bool {
        self.intent == Intent::Write
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `REG_SZ`
    String,
    /// `REG_EXPAND_SZ`
    ExpandString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreValue {
    pub data: String,
    pub kind: ValueKind,
}

impl StoreValue {
    pub fn string(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            kind: ValueKind::String,
        }
    }

    pub fn expand_string(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            kind: ValueKind::ExpandString,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("store unavailable: {location}: {reason}")]
    Unavailable { location: String, reason: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Entry point into a configuration store.
pub trait ConfigStore {
    type Handle: StoreHandle;

    fn open(&self, hive: Hive, subpath: &str, access: AccessMode) -> StoreResult<Self::Handle>;

    /// Tells running processes that persisted environment settings changed.
    fn announce_change(&self) {}
}

/// An open key. Dropping it closes the key.
pub trait StoreHandle: Sized {
    fn open_child(&self, name: &str, access: AccessMode) -> StoreResult<Self>;

    fn child_names(&self) -> StoreResult<Vec<String>>;

    fn value_names(&self) -> StoreResult<Vec<String>>;

    /// `Ok(None)` when the value is absent or not a string.
    fn read_value(&self, name: &str) -> StoreResult<Option<StoreValue>>;

    fn write_value(&self, name: &str, value: &StoreValue) -> StoreResult<()>;

    fn read_string(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self.read_value(name)?.map(|value| value.data))
    }
}

/// Printable `HKLM\path` form used in logs and errors.
pub fn location(hive: Hive, subpath: &str) -> String {
    format!(r"{}\{subpath}", hive.short_name())
}
