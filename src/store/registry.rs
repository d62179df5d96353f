use std::io;

use winreg::enums::{
    RegType, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE, KEY_READ, KEY_SET_VALUE,
    KEY_WOW64_32KEY, KEY_WOW64_64KEY, REG_EXPAND_SZ, REG_SZ,
};
use winreg::{RegKey, RegValue, HKEY};

use super::{
    location, AccessMode, ConfigStore, Hive, Intent, StoreError, StoreHandle, StoreResult,
    StoreValue, ValueKind, View,
};
use crate::platform;

/// The Windows registry, through winreg.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryStore;

#[derive(Debug)]
pub struct RegistryHandle {
    key: RegKey,
    location: String,
    view: View,
}

impl ConfigStore for RegistryStore {
    type Handle = RegistryHandle;

    fn open(&self, hive: Hive, subpath: &str, access: AccessMode) -> StoreResult<RegistryHandle> {
        let location = location(hive, subpath);
        let key = RegKey::predef(predef(hive))
            .open_subkey_with_flags(subpath, sam(access))
            .map_err(|err| classify(&location, err))?;
        Ok(RegistryHandle {
            key,
            location,
            view: access.view,
        })
    }

    fn announce_change(&self) {
        platform::broadcast_env_change();
    }
}

impl StoreHandle for RegistryHandle {
    fn open_child(&self, name: &str, access: AccessMode) -> StoreResult<Self> {
        let location = format!(r"{}\{name}", self.location);
        let access = if access.view == View::Native {
            access.with_view(self.view)
        } else {
            access
        };
        let key = self
            .key
            .open_subkey_with_flags(name, sam(access))
            .map_err(|err| classify(&location, err))?;
        Ok(RegistryHandle {
            key,
            location,
            view: access.view,
        })
    }

    fn child_names(&self) -> StoreResult<Vec<String>> {
        self.key
            .enum_keys()
            .collect::<io::Result<Vec<_>>>()
            .map_err(|err| classify(&self.location, err))
    }

    fn value_names(&self) -> StoreResult<Vec<String>> {
        self.key
            .enum_values()
            .map(|entry| entry.map(|(name, _)| name))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|err| classify(&self.location, err))
    }

    fn read_value(&self, name: &str) -> StoreResult<Option<StoreValue>> {
        let raw = match self.key.get_raw_value(name) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(classify(&format!(r"{}\{name}", self.location), err)),
        };
        let kind = match raw.vtype {
            REG_SZ => ValueKind::String,
            REG_EXPAND_SZ => ValueKind::ExpandString,
            _ => return Ok(None),
        };
        Ok(Some(StoreValue {
            data: decode_utf16_reg(&raw.bytes),
            kind,
        }))
    }

    fn write_value(&self, name: &str, value: &StoreValue) -> StoreResult<()> {
        let vtype: RegType = match value.kind {
            ValueKind::String => REG_SZ,
            ValueKind::ExpandString => REG_EXPAND_SZ,
        };
        let raw = RegValue {
            bytes: encode_utf16_reg(&value.data).into(),
            vtype,
        };
        self.key
            .set_raw_value(name, &raw)
            .map_err(|err| classify(&format!(r"{}\{name}", self.location), err))
    }
}

fn predef(hive: Hive) -> HKEY {
    match hive {
        Hive::LocalMachine => HKEY_LOCAL_MACHINE,
        Hive::CurrentUser => HKEY_CURRENT_USER,
    }
}

fn sam(access: AccessMode) -> u32 {
    let intent = match access.intent {
        Intent::Read => KEY_READ,
        Intent::Query => KEY_QUERY_VALUE,
        Intent::Write => KEY_SET_VALUE,
    };
    let view = match access.view {
        View::Native => 0,
        View::Wow32 => KEY_WOW64_32KEY,
        View::Wow64 => KEY_WOW64_64KEY,
    };
    intent | view
}

fn classify(location: &str, err: io::Error) -> StoreError {
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(location.to_string()),
        io::ErrorKind::PermissionDenied => StoreError::AccessDenied(location.to_string()),
        _ => StoreError::Unavailable {
            location: location.to_string(),
            reason: err.to_string(),
        },
    }
}

fn decode_utf16_reg(bytes: &[u8]) -> String {
    if bytes.len() < 2 {
        return String::new();
    }

    let mut utf16 = Vec::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks_exact(2) {
        utf16.push(u16::from_le_bytes([chunk[0], chunk[1]]));
    }

    while utf16.last() == Some(&0) {
        utf16.pop();
    }

    String::from_utf16_lossy(&utf16)
}

fn encode_utf16_reg(value: &str) -> Vec<u8> {
    value
        .encode_utf16()
        .chain(Some(0))
        .flat_map(|u| u.to_le_bytes())
        .collect()
}
