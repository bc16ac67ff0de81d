use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationArea {
    Files,
    Registry,
    Processes,
    Services,
}

impl OperationArea {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Registry => "registry",
            Self::Processes => "processes",
            Self::Services => "services",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationMethod {
    Create,
    Delete,
    Rename,
    SetValue,
    DeleteValue,
    Start,
    Stop,
}

impl OperationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Rename => "rename",
            Self::SetValue => "set-value",
            Self::DeleteValue => "delete-value",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryValueKind {
    String,
    ExpandString,
    Binary,
    Dword,
    MultiString,
    Qword,
}

impl RegistryValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::ExpandString => "expand-string",
            Self::Binary => "binary",
            Self::Dword => "dword",
            Self::MultiString => "multi-string",
            Self::Qword => "qword",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryValueEntry {
    pub name: String,
    pub value: Value,
    pub kind: RegistryValueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationKind {
    DeleteFiles { files: Vec<String> },
    RenameFile { new_name: String },
    CreateSubKeys { sub_keys: Vec<String> },
    DeleteSubKeys { sub_keys: Vec<String> },
    SetValues { entries: Vec<RegistryValueEntry> },
    DeleteValues { names: Vec<String> },
    StartProcess { arguments: String },
    StopProcess,
    StartService { arguments: Vec<String> },
    StopService,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub area: OperationArea,
    pub method: OperationMethod,
    pub target: String,
    pub kind: OperationKind,
}

impl Operation {
    pub fn tracked_for_progress(&self) -> bool {
        self.area != OperationArea::Registry
            && !(self.area == OperationArea::Files && self.method == OperationMethod::Delete)
    }

    pub(crate) fn decode(raw: RawOperation) -> Result<Self> {
        let RawOperation {
            area,
            method,
            target,
            payload,
        } = raw;
        let kind = match (area, method) {
            (OperationArea::Files, OperationMethod::Delete) => OperationKind::DeleteFiles {
                files: string_list(&payload, "a list of file names")?,
            },
            (OperationArea::Files, OperationMethod::Rename) => OperationKind::RenameFile {
                new_name: single_string(&payload, "the new file name")?,
            },
            (OperationArea::Registry, OperationMethod::Create) => OperationKind::CreateSubKeys {
                sub_keys: string_list(&payload, "a list of subkey names")?,
            },
            (OperationArea::Registry, OperationMethod::Delete) => OperationKind::DeleteSubKeys {
                sub_keys: string_list(&payload, "a list of subkey names")?,
            },
            (OperationArea::Registry, OperationMethod::SetValue) => OperationKind::SetValues {
                entries: value_entries(&payload)?,
            },
            (OperationArea::Registry, OperationMethod::DeleteValue) => {
                OperationKind::DeleteValues {
                    names: string_list(&payload, "a list of value names")?,
                }
            }
            (OperationArea::Processes, OperationMethod::Start) => OperationKind::StartProcess {
                arguments: optional_string(&payload, "an argument string")?,
            },
            (OperationArea::Processes, OperationMethod::Stop) => OperationKind::StopProcess,
            (OperationArea::Services, OperationMethod::Start) => OperationKind::StartService {
                arguments: optional_string_list(&payload, "an argument list")?,
            },
            (OperationArea::Services, OperationMethod::Stop) => OperationKind::StopService,
            _ => OperationKind::Unsupported,
        };

        if target.trim().is_empty() {
            return Err(anyhow!(
                "operation {}/{} has an empty target",
                area.as_str(),
                method.as_str()
            ));
        }

        Ok(Self {
            area,
            method,
            target,
            kind,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOperation {
    pub area: OperationArea,
    pub method: OperationMethod,
    pub target: String,
    #[serde(default)]
    pub payload: Value,
}

fn string_list(payload: &Value, expected: &str) -> Result<Vec<String>> {
    let items = payload
        .as_array()
        .ok_or_else(|| anyhow!("payload must be {expected}, got {payload}"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("payload must be {expected}, got element {item}"))
        })
        .collect()
}

fn single_string(payload: &Value, expected: &str) -> Result<String> {
    payload
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("payload must be {expected}, got {payload}"))
}

fn optional_string(payload: &Value, expected: &str) -> Result<String> {
    if payload.is_null() {
        return Ok(String::new());
    }
    single_string(payload, expected)
}

fn optional_string_list(payload: &Value, expected: &str) -> Result<Vec<String>> {
    if payload.is_null() {
        return Ok(Vec::new());
    }
    string_list(payload, expected)
}

fn value_entries(payload: &Value) -> Result<Vec<RegistryValueEntry>> {
    let items = payload
        .as_array()
        .ok_or_else(|| anyhow!("payload must be a list of value entries, got {payload}"))?;
    items
        .iter()
        .map(|item| {
            serde_json::from_value(item.clone())
                .map_err(|err| anyhow!("invalid value entry {item}: {err}"))
        })
        .collect()
}
