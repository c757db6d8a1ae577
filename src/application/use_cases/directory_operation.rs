use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::{debug, info};

use crate::common::error::ModbatchError;
use crate::common::result::ModbatchResult;
use crate::domain::value_objects::{
    module_path::{ModulePath, ModulePrefix},
    target_path::TargetPath,
};
use crate::infrastructure::filesystem::config_store::Settings;
use crate::infrastructure::process::command_executor::{
    CommandExecutorError, ExecutionConfig, ExecutionResult, Invocation, ProcessRunner,
};

/// ディレクトリ単位の操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// マニフェストを作り直す（`go mod init <module>`）
    Init,
    /// 依存関係を整理する（`go mod tidy`）
    Tidy,
    /// クリーンアップスクリプトを実行する（`sh clean.sh <dir>`）
    Clean,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Tidy => "tidy",
            Self::Clean => "clean",
        }
    }

    /// 対象ディレクトリ内でツールを実行するか（cleanはベースディレクトリで実行）
    pub fn runs_in_target(&self) -> bool {
        matches!(self, Self::Init | Self::Tidy)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// DirectoryOperation関連のエラー
#[derive(Debug, Error)]
pub enum DirectoryOperationError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Failed to remove {}: {source}", .path.display())]
    ManifestRemovalFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Command(#[from] CommandExecutorError),
}

/// 操作に共通する設定
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSettings {
    /// 相対パスの基準ディレクトリ（プロセスのカレントディレクトリは変更しない）
    pub base_dir: PathBuf,

    /// initで使うモジュールプレフィックス
    pub prefix: ModulePrefix,

    /// init前に削除するマニフェストファイル名
    pub manifest_file: String,

    /// ビルドツールのコマンド（例: `go`）
    pub go_command: Invocation,

    /// クリーンアップスクリプトを実行するシェル
    pub shell_command: Invocation,

    /// クリーンアップスクリプトのパス
    pub clean_script: String,

    /// 1回の外部コマンド実行のタイムアウト（秒）
    pub timeout_seconds: Option<u64>,
}

impl OperationSettings {
    /// デフォルト設定で作成
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            prefix: ModulePrefix::default(),
            manifest_file: "go.mod".to_string(),
            go_command: Invocation::new("go"),
            shell_command: Invocation::new("sh"),
            clean_script: "clean.sh".to_string(),
            timeout_seconds: None,
        }
    }

    /// 設定ファイルの内容から作成
    pub fn from_settings(base_dir: impl Into<PathBuf>, settings: &Settings) -> ModbatchResult<Self> {
        let parse = |field: &str, value: &str| {
            Invocation::from_command_line(value).map_err(|e| {
                ModbatchError::validation_error(field, e.to_string(), Some(value.to_string()))
            })
        };

        Ok(Self {
            base_dir: base_dir.into(),
            prefix: ModulePrefix::new(&settings.prefix)?,
            manifest_file: settings.manifest_file.clone(),
            go_command: parse("go_binary", &settings.go_binary)?,
            shell_command: parse("shell", &settings.shell)?,
            clean_script: settings.clean_script.clone(),
            timeout_seconds: settings.timeout_seconds,
        })
    }

    /// プレフィックスを上書き
    pub fn with_prefix(mut self, prefix: ModulePrefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// タイムアウトを上書き
    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// 1ディレクトリ分の実行計画
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOperation {
    /// 正規化済みの対象
    pub target: TargetPath,

    /// 外部コマンドの作業ディレクトリ
    pub working_directory: PathBuf,

    /// 実行する外部コマンド
    pub invocation: Invocation,

    /// initの場合のモジュールパス
    pub module_path: Option<ModulePath>,

    /// initの場合に削除するマニフェスト（存在する場合のみ削除）
    pub manifest_to_remove: Option<PathBuf>,
}

/// 1つのディレクトリに init / tidy / clean を適用する
#[derive(Debug, Clone)]
pub struct DirectoryOperation {
    kind: OperationKind,
    settings: OperationSettings,
}

impl DirectoryOperation {
    pub fn new(kind: OperationKind, settings: OperationSettings) -> Self {
        Self { kind, settings }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn settings(&self) -> &OperationSettings {
        &self.settings
    }

    /// 対象に対して何を実行するかを決める
    ///
    /// init / tidy は対象ディレクトリが存在しない場合 `DirectoryNotFound` になる。
    /// clean はスクリプト側でパスを扱うため存在確認をしない。
    pub fn plan(&self, target: &TargetPath) -> Result<PlannedOperation, DirectoryOperationError> {
        let base_dir = &self.settings.base_dir;

        if !self.kind.runs_in_target() {
            let invocation = self
                .settings
                .shell_command
                .clone()
                .arg(&self.settings.clean_script)
                .arg(target.as_str());

            return Ok(PlannedOperation {
                target: target.clone(),
                working_directory: base_dir.clone(),
                invocation,
                module_path: None,
                manifest_to_remove: None,
            });
        }

        let directory = target.resolve(base_dir);
        if !directory.is_dir() {
            return Err(DirectoryOperationError::DirectoryNotFound(directory));
        }

        let plan = match self.kind {
            OperationKind::Init => {
                let module_path = ModulePath::for_target(&self.settings.prefix, target);
                PlannedOperation {
                    target: target.clone(),
                    invocation: self
                        .settings
                        .go_command
                        .clone()
                        .args(["mod", "init", module_path.as_str()]),
                    module_path: Some(module_path),
                    manifest_to_remove: Some(directory.join(&self.settings.manifest_file)),
                    working_directory: directory,
                }
            }
            _ => PlannedOperation {
                target: target.clone(),
                invocation: self.settings.go_command.clone().args(["mod", "tidy"]),
                module_path: None,
                manifest_to_remove: None,
                working_directory: directory,
            },
        };

        Ok(plan)
    }

    /// 計画を実行する
    ///
    /// 外部コマンドの終了コードは結果として返す。非ゼロ終了はエラーではない。
    pub async fn apply<R: ProcessRunner + ?Sized>(
        &self,
        plan: &PlannedOperation,
        runner: &R,
    ) -> Result<ExecutionResult, DirectoryOperationError> {
        if let Some(manifest) = &plan.manifest_to_remove {
            let is_file = async_fs::metadata(manifest)
                .await
                .map(|metadata| metadata.is_file())
                .unwrap_or(false);
            // 同名のディレクトリ等は消さずにツールの判断に任せる
            if is_file {
                debug!("Removing existing {}", manifest.display());
                async_fs::remove_file(manifest).await.map_err(|source| {
                    DirectoryOperationError::ManifestRemovalFailed {
                        path: manifest.clone(),
                        source,
                    }
                })?;
            }
        }

        if let Some(module_path) = &plan.module_path {
            info!("Initializing module {} in {}", module_path, plan.target);
        }

        let config = ExecutionConfig::new()
            .with_working_directory(&plan.working_directory)
            .with_timeout(self.settings.timeout_seconds);

        Ok(runner.run(&plan.invocation, &config).await?)
    }
}
