use chrono::{DateTime, Datelike, Utc};
use std::fmt;
use thiserror::Error;

/// 擬似バージョンのベースとなるバージョン
pub const PSEUDO_VERSION_BASE: &str = "v0.0.0";

/// コミットハッシュから使用する文字数
pub const HASH_PREFIX_LEN: usize = 12;

/// タイムスタンプ部分のフォーマット（UTC, 14桁）
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// コマンドラインの使い方（引数エラー時に表示）
pub const USAGE: &str = "usage: modbatch pseudo-version <EPOCH_SECONDS> <COMMIT_HASH>";

/// PseudoVersion関連のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PseudoVersionError {
    #[error("expected 2 arguments, got {given}")]
    MissingArguments { given: usize },

    #[error("epoch seconds must be an integer, got '{0}'")]
    InvalidEpoch(String),

    #[error("epoch seconds {0} is outside the supported range (years 0000-9999)")]
    EpochOutOfRange(i64),
}

/// 未タグのコミットを表す擬似バージョン
///
/// `@v0.0.0-<YYYYMMDDHHMMSS>-<hash12>` の形式で表示される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoVersion {
    timestamp: DateTime<Utc>,
    hash_prefix: String,
}

impl PseudoVersion {
    /// エポック秒（UTC）とコミットハッシュから作成
    pub fn new(epoch_seconds: i64, commit_hash: &str) -> Result<Self, PseudoVersionError> {
        let timestamp = DateTime::from_timestamp(epoch_seconds, 0)
            .filter(|ts| (0..=9999).contains(&ts.year()))
            .ok_or(PseudoVersionError::EpochOutOfRange(epoch_seconds))?;

        let hash_prefix = commit_hash.chars().take(HASH_PREFIX_LEN).collect();

        Ok(Self {
            timestamp,
            hash_prefix,
        })
    }

    /// 位置引数 `<EPOCH_SECONDS> <COMMIT_HASH>` から作成
    ///
    /// 3つ目以降の引数は無視する。
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, PseudoVersionError> {
        let (epoch, hash) = match args {
            [epoch, hash, ..] => (epoch.as_ref(), hash.as_ref()),
            _ => return Err(PseudoVersionError::MissingArguments { given: args.len() }),
        };

        let epoch_seconds = epoch
            .trim()
            .parse::<i64>()
            .map_err(|_| PseudoVersionError::InvalidEpoch(epoch.to_string()))?;

        Self::new(epoch_seconds, hash)
    }

    /// `YYYYMMDDHHMMSS` 形式のタイムスタンプ
    pub fn timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// 先頭12文字に切り詰めたハッシュ
    pub fn hash_prefix(&self) -> &str {
        &self.hash_prefix
    }

    /// 先頭の `@` を含まないバージョン文字列
    pub fn version(&self) -> String {
        format!(
            "{}-{}-{}",
            PSEUDO_VERSION_BASE,
            self.timestamp(),
            self.hash_prefix
        )
    }
}

impl fmt::Display for PseudoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.version())
    }
}

/// エポック秒とコミットハッシュから `@v0.0.0-...` 文字列を生成
pub fn format_pseudo_version(
    epoch_seconds: i64,
    commit_hash: &str,
) -> Result<String, PseudoVersionError> {
    Ok(PseudoVersion::new(epoch_seconds, commit_hash)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_epoch_zero() {
        assert_eq!(
            format_pseudo_version(0, "abcdef1234567890").unwrap(),
            "@v0.0.0-19700101000000-abcdef123456"
        );
    }

    #[test]
    fn test_short_hash_is_used_as_is() {
        let version = PseudoVersion::new(1_700_000_000, "ab").unwrap();
        assert_eq!(version.hash_prefix(), "ab");
        assert_eq!(version.to_string(), "@v0.0.0-20231114221320-ab");
    }

    #[test]
    fn test_exactly_twelve_chars() {
        let version = PseudoVersion::new(86_399, "0123456789ab").unwrap();
        assert_eq!(version.version(), "v0.0.0-19700101235959-0123456789ab");
    }

    #[test]
    fn test_shape_and_determinism() {
        let shape = Regex::new(r"^@v0\.0\.0-\d{14}-.{0,12}$").unwrap();
        let samples: [(i64, &str); 6] = [
            (0, ""),
            (1, "f"),
            (951_782_400, "deadbeefcafebabe0011"),
            (1_234_567_890, "0123456789abcdef"),
            (-1, "neg"),
            (253_402_300_799, "max-year-hash-value"),
        ];

        for (epoch, hash) in samples {
            let first = format_pseudo_version(epoch, hash).unwrap();
            let second = format_pseudo_version(epoch, hash).unwrap();
            assert!(shape.is_match(&first), "unexpected shape: {}", first);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_negative_epoch_before_1970() {
        assert_eq!(
            format_pseudo_version(-1, "abc").unwrap(),
            "@v0.0.0-19691231235959-abc"
        );
    }

    #[test]
    fn test_epoch_out_of_range() {
        assert_eq!(
            PseudoVersion::new(253_402_300_800, "abc"),
            Err(PseudoVersionError::EpochOutOfRange(253_402_300_800))
        );
        assert!(PseudoVersion::new(i64::MAX, "abc").is_err());
    }

    #[test]
    fn test_from_args_requires_two_arguments() {
        let none: [&str; 0] = [];
        assert_eq!(
            PseudoVersion::from_args(&none),
            Err(PseudoVersionError::MissingArguments { given: 0 })
        );
        assert_eq!(
            PseudoVersion::from_args(&["0"]),
            Err(PseudoVersionError::MissingArguments { given: 1 })
        );
    }

    #[test]
    fn test_from_args_ignores_extra_arguments() {
        let version = PseudoVersion::from_args(&["0", "abcdef1234567890", "extra"]).unwrap();
        assert_eq!(version.to_string(), "@v0.0.0-19700101000000-abcdef123456");
    }

    #[test]
    fn test_from_args_rejects_non_integer_epoch() {
        assert_eq!(
            PseudoVersion::from_args(&["yesterday", "abc"]),
            Err(PseudoVersionError::InvalidEpoch("yesterday".to_string()))
        );
    }

    #[test]
    fn test_hash_truncation_counts_characters() {
        let version = PseudoVersion::new(0, "ééééééééééééééé").unwrap();
        assert_eq!(version.hash_prefix().chars().count(), 12);
    }
}
