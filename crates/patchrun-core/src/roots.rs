use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootToken {
    Program,
    AppData,
    Temp,
    Desktop,
}

impl RootToken {
    pub const ALL: [RootToken; 4] = [
        RootToken::Program,
        RootToken::AppData,
        RootToken::Temp,
        RootToken::Desktop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::AppData => "AppData",
            Self::Temp => "Temp",
            Self::Desktop => "Desktop",
        }
    }

    pub fn parse(input: &str) -> Result<Self, RootError> {
        match input {
            "Program" => Ok(Self::Program),
            "AppData" => Ok(Self::AppData),
            "Temp" => Ok(Self::Temp),
            "Desktop" => Ok(Self::Desktop),
            _ => Err(RootError::UnknownRoot(input.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RootError {
    #[error("unknown root token: '{0}'")]
    UnknownRoot(String),
    #[error("target path is empty")]
    EmptyTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    program: PathBuf,
    app_data: PathBuf,
    temp: PathBuf,
    desktop: PathBuf,
}

impl Roots {
    pub fn new(
        program: impl Into<PathBuf>,
        app_data: impl Into<PathBuf>,
        temp: impl Into<PathBuf>,
        desktop: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            app_data: app_data.into(),
            temp: temp.into(),
            desktop: desktop.into(),
        }
    }

    pub fn discover(program_dir: impl Into<PathBuf>) -> Self {
        let program = program_dir.into();
        let app_data = dirs::data_dir().unwrap_or_else(|| program.clone());
        let desktop = dirs::desktop_dir().unwrap_or_else(|| program.clone());
        let temp = env::temp_dir();
        Self {
            program,
            app_data,
            temp,
            desktop,
        }
    }

    pub fn resolve(&self, token: RootToken) -> &Path {
        match token {
            RootToken::Program => &self.program,
            RootToken::AppData => &self.app_data,
            RootToken::Temp => &self.temp,
            RootToken::Desktop => &self.desktop,
        }
    }

    pub fn resolve_target(&self, target: &str) -> Result<PathBuf, RootError> {
        let (token, relative) = split_rooted_path(target)?;
        Ok(match relative {
            Some(relative) => self.resolve(token).join(relative),
            None => self.resolve(token).to_path_buf(),
        })
    }
}

pub fn split_rooted_path(target: &str) -> Result<(RootToken, Option<PathBuf>), RootError> {
    let mut segments = target.split(['\\', '/']).filter(|s| !s.is_empty());
    let first = segments.next().ok_or(RootError::EmptyTarget)?;
    let token = RootToken::parse(first)?;
    let rest: PathBuf = segments.collect();
    if rest.as_os_str().is_empty() {
        Ok((token, None))
    } else {
        Ok((token, Some(rest)))
    }
}
