use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use super::target_path::TargetPath;

/// `-p` を指定しない場合のモジュールプレフィックス
pub const DEFAULT_MODULE_PREFIX: &str = "github.com/example/project";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModulePathError {
    #[error("Invalid module prefix '{0}': expected slash-separated path elements of letters, digits and '.-_~+'")]
    InvalidPrefix(String),
}

fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._~+-]+(/[A-Za-z0-9._~+-]+)*$").expect("prefix pattern is valid")
    })
}

/// モジュール名のプレフィックス（例: `github.com/example/project`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePrefix(String);

impl ModulePrefix {
    /// プレフィックスを検証して作成する。末尾の `/` は取り除く。
    pub fn new(prefix: impl AsRef<str>) -> Result<Self, ModulePathError> {
        let original = prefix.as_ref();
        let trimmed = original.trim().trim_end_matches('/');

        if !prefix_pattern().is_match(trimmed) {
            return Err(ModulePathError::InvalidPrefix(original.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModulePrefix {
    fn default() -> Self {
        Self(DEFAULT_MODULE_PREFIX.to_string())
    }
}

impl fmt::Display for ModulePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `go mod init` に渡すモジュールパス
///
/// ルート対象では `<prefix>`、それ以外では `<prefix>/<target>` になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePath(String);

impl ModulePath {
    pub fn for_target(prefix: &ModulePrefix, target: &TargetPath) -> Self {
        match target.module_suffix() {
            Some(suffix) => Self(format!("{}/{}", prefix.as_str(), suffix)),
            None => Self(prefix.as_str().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
