use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use patchrun_core::RegistryValueKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KEY_SEPARATOR: char = '\\';

pub trait KeyValueStore: Send {
    fn create_sub_key(&mut self, parent: &str, name: &str) -> Result<()>;
    fn delete_sub_key(&mut self, parent: &str, name: &str) -> Result<()>;
    fn set_value(
        &mut self,
        key: &str,
        name: &str,
        value: &Value,
        kind: RegistryValueKind,
    ) -> Result<()>;
    fn delete_value(&mut self, key: &str, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub kind: RegistryValueKind,
    pub value: Value,
}

pub struct JsonFileStore {
    path: PathBuf,
    keys: BTreeMap<String, BTreeMap<String, StoredValue>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let keys = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse store file: {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read store file: {}", path.display()));
            }
        };
        Ok(Self { path, keys })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn value(&self, key: &str, name: &str) -> Option<&StoredValue> {
        self.keys.get(key).and_then(|values| values.get(name))
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.keys).context("failed to encode store")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write store file: {}", self.path.display()))
    }
}

fn join_key(parent: &str, name: &str) -> String {
    let trimmed = parent.trim_end_matches(KEY_SEPARATOR);
    format!("{trimmed}{KEY_SEPARATOR}{name}")
}

impl KeyValueStore for JsonFileStore {
    fn create_sub_key(&mut self, parent: &str, name: &str) -> Result<()> {
        let key = join_key(parent, name);
        self.keys.entry(key).or_default();
        self.persist()
    }

    fn delete_sub_key(&mut self, parent: &str, name: &str) -> Result<()> {
        let key = join_key(parent, name);
        if self.keys.remove(&key).is_none() {
            return Err(anyhow!("subkey not found: {key}"));
        }
        let child_prefix = format!("{key}{KEY_SEPARATOR}");
        self.keys.retain(|path, _| !path.starts_with(&child_prefix));
        self.persist()
    }

    fn set_value(
        &mut self,
        key: &str,
        name: &str,
        value: &Value,
        kind: RegistryValueKind,
    ) -> Result<()> {
        self.keys.entry(key.to_string()).or_default().insert(
            name.to_string(),
            StoredValue {
                kind,
                value: value.clone(),
            },
        );
        self.persist()
    }

    fn delete_value(&mut self, key: &str, name: &str) -> Result<()> {
        let removed = self
            .keys
            .get_mut(key)
            .and_then(|values| values.remove(name));
        if removed.is_none() {
            return Err(anyhow!("value '{name}' not found under key: {key}"));
        }
        self.persist()
    }
}
