//! In-memory configuration store.
//!
//! Mirrors the registry semantics the engine depends on: separate 32-bit and
//! 64-bit views (native resolves to the 64-bit view), case-insensitive key and
//! value names, access checks per intent, and scoped handles. It also records
//! writes, counts live handles, and can be told to deny keys or fail writes.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use super::{
    location, AccessMode, ConfigStore, Hive, StoreError, StoreHandle, StoreResult, StoreValue,
    View,
};

type KeyId = (Hive, View, String);

#[derive(Debug, Default)]
struct Node {
    name: String,
    values: Vec<(String, StoreValue)>,
}

#[derive(Debug, Default)]
struct Tree {
    keys: BTreeMap<KeyId, Node>,
    denied: HashSet<KeyId>,
    failing_writes: HashSet<String>,
    writes: Vec<(String, StoreValue)>,
    open_handles: usize,
    announcements: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tree: Rc<RefCell<Tree>>,
}

#[derive(Debug)]
pub struct MemoryHandle {
    tree: Rc<RefCell<Tree>>,
    hive: Hive,
    view: View,
    path: String,
    access: AccessMode,
}

fn resolve(view: View) -> View {
    match view {
        View::Native => View::Wow64,
        other => other,
    }
}

fn key_id(hive: Hive, view: View, path: &str) -> KeyId {
    (hive, resolve(view), path.trim_matches('\\').to_lowercase())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `path` and all of its ancestors.
    pub fn insert_key(&self, hive: Hive, view: View, path: &str) -> &Self {
        let mut tree = self.tree.borrow_mut();
        let mut prefix = String::new();
        for segment in path.split('\\').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('\\');
            }
            prefix.push_str(segment);
            tree.keys
                .entry(key_id(hive, view, &prefix))
                .or_insert_with(|| Node {
                    name: segment.to_string(),
                    values: Vec::new(),
                });
        }
        self
    }

    pub fn set_value(
        &self,
        hive: Hive,
        view: View,
        path: &str,
        name: &str,
        value: StoreValue,
    ) -> &Self {
        self.insert_key(hive, view, path);
        let mut tree = self.tree.borrow_mut();
        if let Some(node) = tree.keys.get_mut(&key_id(hive, view, path)) {
            put_value(node, name, value);
        }
        self
    }

    pub fn value(&self, hive: Hive, view: View, path: &str, name: &str) -> Option<StoreValue> {
        let tree = self.tree.borrow();
        let node = tree.keys.get(&key_id(hive, view, path))?;
        find_value(node, name).cloned()
    }

    /// Opening `path` through `view` fails with `AccessDenied` from now on.
    pub fn deny(&self, hive: Hive, view: View, path: &str) -> &Self {
        self.tree
            .borrow_mut()
            .denied
            .insert(key_id(hive, view, path));
        self
    }

    /// Writes to a value called `name` fail with `AccessDenied` from now on.
    pub fn fail_writes_to(&self, name: &str) -> &Self {
        self.tree
            .borrow_mut()
            .failing_writes
            .insert(name.to_lowercase());
        self
    }

    /// Successful writes in the order they happened.
    pub fn writes(&self) -> Vec<(String, StoreValue)> {
        self.tree.borrow().writes.clone()
    }

    pub fn open_handles(&self) -> usize {
        self.tree.borrow().open_handles
    }

    pub fn announcements(&self) -> usize {
        self.tree.borrow().announcements
    }

    fn handle(&self, hive: Hive, view: View, path: String, access: AccessMode) -> MemoryHandle {
        self.tree.borrow_mut().open_handles += 1;
        MemoryHandle {
            tree: Rc::clone(&self.tree),
            hive,
            view,
            path,
            access,
        }
    }
}

fn find_value<'a>(node: &'a Node, name: &str) -> Option<&'a StoreValue> {
    node.values
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn put_value(node: &mut Node, name: &str, value: StoreValue) {
    match node
        .values
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some(slot) => slot.1 = value,
        None => node.values.push((name.to_string(), value)),
    }
}

fn check_open(tree: &Tree, id: &KeyId, display: &str) -> StoreResult<()> {
    if !tree.keys.contains_key(id) {
        return Err(StoreError::NotFound(display.to_string()));
    }
    if tree.denied.contains(id) {
        return Err(StoreError::AccessDenied(display.to_string()));
    }
    Ok(())
}

impl ConfigStore for MemoryStore {
    type Handle = MemoryHandle;

    fn open(&self, hive: Hive, subpath: &str, access: AccessMode) -> StoreResult<MemoryHandle> {
        let id = key_id(hive, access.view, subpath);
        check_open(&self.tree.borrow(), &id, &location(hive, subpath))?;
        Ok(self.handle(hive, resolve(access.view), subpath.to_string(), access))
    }

    fn announce_change(&self) {
        self.tree.borrow_mut().announcements += 1;
    }
}

impl MemoryHandle {
    fn id(&self) -> KeyId {
        key_id(self.hive, self.view, &self.path)
    }

    fn display(&self) -> String {
        location(self.hive, &self.path)
    }
}

impl StoreHandle for MemoryHandle {
    fn open_child(&self, name: &str, access: AccessMode) -> StoreResult<Self> {
        let path = format!(r"{}\{name}", self.path);
        let view = match access.view {
            View::Native => self.view,
            other => resolve(other),
        };
        let id = key_id(self.hive, view, &path);
        check_open(&self.tree.borrow(), &id, &location(self.hive, &path))?;
        self.tree.borrow_mut().open_handles += 1;
        Ok(MemoryHandle {
            tree: Rc::clone(&self.tree),
            hive: self.hive,
            view,
            path,
            access: access.with_view(view),
        })
    }

    fn child_names(&self) -> StoreResult<Vec<String>> {
        if !self.access.can_enumerate() {
            return Err(StoreError::AccessDenied(self.display()));
        }
        let (hive, view, parent) = self.id();
        let prefix = format!("{parent}\\");
        let tree = self.tree.borrow();
        Ok(tree
            .keys
            .iter()
            .filter(|((h, v, path), _)| {
                *h == hive
                    && *v == view
                    && path
                        .strip_prefix(&prefix)
                        .is_some_and(|rest| !rest.contains('\\'))
            })
            .map(|(_, node)| node.name.clone())
            .collect())
    }

    fn value_names(&self) -> StoreResult<Vec<String>> {
        if !self.access.can_enumerate() {
            return Err(StoreError::AccessDenied(self.display()));
        }
        let tree = self.tree.borrow();
        let node = tree
            .keys
            .get(&self.id())
            .ok_or_else(|| StoreError::NotFound(self.display()))?;
        Ok(node.values.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_value(&self, name: &str) -> StoreResult<Option<StoreValue>> {
        if !self.access.can_read() {
            return Err(StoreError::AccessDenied(self.display()));
        }
        let tree = self.tree.borrow();
        Ok(tree
            .keys
            .get(&self.id())
            .and_then(|node| find_value(node, name))
            .cloned())
    }

    fn write_value(&self, name: &str, value: &StoreValue) -> StoreResult<()> {
        let target = format!(r"{}\{name}", self.display());
        if !self.access.can_write() {
            return Err(StoreError::AccessDenied(target));
        }
        let id = self.id();
        let mut tree = self.tree.borrow_mut();
        if tree.failing_writes.contains(&name.to_lowercase()) {
            return Err(StoreError::AccessDenied(target));
        }
        let node = tree
            .keys
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(self.display()))?;
        put_value(node, name, value.clone());
        tree.writes.push((name.to_string(), value.clone()));
        Ok(())
    }
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        let mut tree = self.tree.borrow_mut();
        tree.open_handles = tree.open_handles.saturating_sub(1);
    }
}
