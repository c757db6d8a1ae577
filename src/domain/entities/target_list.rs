use serde::Serialize;

use crate::domain::value_objects::target_path::TargetPath;

/// 対象ディレクトリがどこから指定されたか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    /// コマンドライン引数
    Argument,
    /// use.list ファイル
    UseList,
}

/// コマンドラインでの対象指定1件
///
/// `UseList` は現れた位置で use.list の内容に展開される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// use.list の全エントリ
    UseList,
    /// ディレクトリ1件
    Dir(String),
}

/// 処理対象ディレクトリの順序付きリスト
///
/// 重複は取り除かない。use.list に同じパスが2回あれば2回処理される。
#[derive(Debug, Clone, Default)]
pub struct TargetList {
    entries: Vec<(TargetPath, TargetSource)>,
}

impl TargetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// コマンドライン引数からリストを作成
    pub fn from_arguments<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        list.extend(args, TargetSource::Argument);
        list
    }

    /// 末尾に1件追加
    pub fn push(&mut self, raw: impl Into<String>, source: TargetSource) {
        self.entries.push((TargetPath::new(raw), source));
    }

    /// 末尾に複数件追加
    pub fn extend<I, S>(&mut self, raws: I, source: TargetSource)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for raw in raws {
            self.push(raw, source);
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetPath> {
        self.entries.iter().map(|(target, _)| target)
    }

    pub fn entries(&self) -> &[(TargetPath, TargetSource)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
