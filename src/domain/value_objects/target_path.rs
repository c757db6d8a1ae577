use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// ベースディレクトリ自身を表す正規化済みパス
pub const ROOT_TARGET: &str = ".";

/// 処理対象ディレクトリ（正規化済みの相対パス）
///
/// init / tidy / clean の全操作で同じ正規化規則を使う:
///
/// 1. 前後の空白を除去
/// 2. 先頭の `./` をすべて除去（`././a` → `a`）
/// 3. 末尾の `/` を除去
/// 4. 空文字列または `.` になった場合はベースディレクトリ（`.`）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPath {
    /// 正規化後の値
    normalized: String,
}

impl TargetPath {
    /// 新しいTargetPathを作成
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            normalized: Self::normalize(&raw.into()),
        }
    }

    fn normalize(raw: &str) -> String {
        let mut path = raw.trim();

        while let Some(rest) = path.strip_prefix("./") {
            path = rest;
        }

        let path = path.trim_end_matches('/');

        if path.is_empty() || path == ROOT_TARGET {
            ROOT_TARGET.to_string()
        } else {
            path.to_string()
        }
    }

    /// 正規化後のパス文字列
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// ベースディレクトリ自身を指すか
    pub fn is_root(&self) -> bool {
        self.normalized == ROOT_TARGET
    }

    /// モジュールパスに付加するサフィックス（ルートの場合はNone）
    pub fn module_suffix(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            Some(&self.normalized)
        }
    }

    /// ベースディレクトリを基準に実際のディレクトリパスを解決
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        match self.module_suffix() {
            Some(suffix) => base_dir.join(suffix),
            None => base_dir.to_path_buf(),
        }
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized)
    }
}

impl Serialize for TargetPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.normalized)
    }
}

impl From<&str> for TargetPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TargetPath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
