use serde::Serialize;
use tokio::fs as async_fs;
use tracing::debug;

use super::directory_operation::{DirectoryOperation, OperationKind};
use crate::common::result::{ModbatchResult, ResultExt};
use crate::domain::entities::target_list::{TargetList, TargetSource, TargetSpec};
use crate::domain::value_objects::target_path::TargetPath;
use crate::infrastructure::filesystem::use_list_store::UseListStore;
use crate::infrastructure::process::command_executor::ProcessRunner;

/// バッチ実行の設定
#[derive(Debug, Clone, Default)]
pub struct BatchOperationConfig {
    /// コマンドラインで指定された順の対象（`-u` の位置に use.list を展開する）
    pub targets: Vec<TargetSpec>,

    /// 実行せずに計画だけを表示するか
    pub dry_run: bool,
}

impl BatchOperationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在の位置に use.list の内容を追加
    pub fn with_use_list(mut self) -> Self {
        self.targets.push(TargetSpec::UseList);
        self
    }

    /// ディレクトリを末尾に追加
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets
            .extend(targets.into_iter().map(|t| TargetSpec::Dir(t.into())));
        self
    }

    /// 指定順の対象をまとめて追加
    pub fn with_specs(mut self, specs: impl IntoIterator<Item = TargetSpec>) -> Self {
        self.targets.extend(specs);
        self
    }

    /// ドライランを設定
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// 1対象の実行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    /// 成功
    Success,
    /// 失敗（ディレクトリなし、非ゼロ終了、起動失敗、タイムアウト）
    Failed,
    /// スキップ（ドライラン）
    Skipped,
}

/// 1対象の実行結果
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult {
    /// 正規化済みの対象
    pub target: TargetPath,

    /// 対象の指定元（引数 / use.list）
    pub source: TargetSource,

    /// 実行ステータス
    pub status: OperationStatus,

    /// 実行した（ドライランでは実行予定の）コマンド
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<String>,

    /// 終了コード
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,

    /// 標準出力
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,

    /// 標準エラー出力
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,

    /// 実行時間（ミリ秒）
    pub execution_time_ms: u64,

    /// エラーメッセージ（失敗時）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl OperationResult {
    /// 新しいOperationResultを作成
    pub fn new(target: TargetPath) -> Self {
        Self {
            target,
            source: TargetSource::Argument,
            status: OperationStatus::Skipped,
            invocation: None,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            execution_time_ms: 0,
            error_message: None,
        }
    }

    /// 指定元を記録
    pub fn with_source(mut self, source: TargetSource) -> Self {
        self.source = source;
        self
    }

    /// 実行したコマンドを記録
    pub fn with_invocation(mut self, invocation: impl Into<String>) -> Self {
        self.invocation = Some(invocation.into());
        self
    }

    /// 成功状態に設定
    pub fn with_success(
        mut self,
        exit_code: i32,
        stdout: String,
        stderr: String,
        execution_time: u64,
    ) -> Self {
        self.status = OperationStatus::Success;
        self.exit_code = Some(exit_code);
        self.stdout = stdout;
        self.stderr = stderr;
        self.execution_time_ms = execution_time;
        self
    }

    /// 失敗状態に設定
    pub fn with_failure(mut self, exit_code: Option<i32>, error: String, execution_time: u64) -> Self {
        self.status = OperationStatus::Failed;
        self.exit_code = exit_code;
        self.error_message = Some(error);
        self.execution_time_ms = execution_time;
        self
    }

    /// 出力を記録（失敗時の詳細表示用）
    pub fn with_output(mut self, stdout: String, stderr: String) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    /// スキップ状態に設定
    pub fn with_skip(mut self, reason: String) -> Self {
        self.status = OperationStatus::Skipped;
        self.error_message = Some(reason);
        self
    }

    /// 成功したかチェック
    pub fn is_success(&self) -> bool {
        matches!(self.status, OperationStatus::Success)
    }

    /// 失敗したかチェック
    pub fn is_failure(&self) -> bool {
        matches!(self.status, OperationStatus::Failed)
    }
}

/// バッチ全体の実行結果
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// 実行した操作
    pub operation: OperationKind,

    /// 各対象での実行結果（実行順）
    pub results: Vec<OperationResult>,

    /// 成功した対象数
    pub success_count: usize,

    /// 失敗した対象数
    pub failure_count: usize,

    /// スキップされた対象数
    pub skipped_count: usize,

    /// 総実行時間（ミリ秒）
    pub total_execution_time_ms: u64,

    /// ドライランだったか
    pub dry_run: bool,

    /// 致命的でない警告（use.list がない等）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl BatchSummary {
    pub fn new(operation: OperationKind, dry_run: bool) -> Self {
        Self {
            operation,
            results: Vec::new(),
            success_count: 0,
            failure_count: 0,
            skipped_count: 0,
            total_execution_time_ms: 0,
            dry_run,
            warnings: Vec::new(),
        }
    }

    /// 実行結果を追加
    pub fn add_result(&mut self, result: OperationResult) {
        match result.status {
            OperationStatus::Success => self.success_count += 1,
            OperationStatus::Failed => self.failure_count += 1,
            OperationStatus::Skipped => self.skipped_count += 1,
        }

        self.total_execution_time_ms += result.execution_time_ms;
        self.results.push(result);
    }

    /// 失敗が1件もないか
    pub fn is_success(&self) -> bool {
        self.failure_count == 0
    }

    /// 合計対象数
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// 失敗した結果のみを取得
    pub fn failed_results(&self) -> Vec<&OperationResult> {
        self.results.iter().filter(|r| r.is_failure()).collect()
    }
}

/// バッチ実行の進捗を受け取る
pub trait BatchObserver {
    /// 致命的でない警告
    fn on_warning(&mut self, _message: &str) {}

    /// 対象の処理開始（indexは0始まり）
    fn on_start(&mut self, _index: usize, _total: usize, _target: &TargetPath) {}

    /// 対象の処理完了
    fn on_finish(&mut self, _result: &OperationResult) {}
}

/// 何もしないObserver
#[derive(Debug, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// init / tidy / clean を対象リストに順番に適用するユースケース
pub struct BatchOperationUseCase<R: ProcessRunner> {
    operation: DirectoryOperation,
    use_list_store: UseListStore,
    runner: R,
    config: BatchOperationConfig,
}

impl<R: ProcessRunner> BatchOperationUseCase<R> {
    /// 新しいBatchOperationUseCaseインスタンスを作成
    pub fn new(
        operation: DirectoryOperation,
        use_list_store: UseListStore,
        runner: R,
        config: BatchOperationConfig,
    ) -> Self {
        Self {
            operation,
            use_list_store,
            runner,
            config,
        }
    }

    /// バッチ実行
    pub async fn execute(&self) -> ModbatchResult<BatchSummary> {
        self.execute_with(&mut NoopObserver).await
    }

    /// 進捗をObserverに通知しながらバッチ実行
    ///
    /// 1つの対象の失敗で残りの対象の処理は止まらない。
    pub async fn execute_with(
        &self,
        observer: &mut dyn BatchObserver,
    ) -> ModbatchResult<BatchSummary> {
        let base_dir = &self.operation.settings().base_dir;
        async_fs::metadata(base_dir)
            .await
            .with_filesystem_error("Base directory is not accessible", Some(base_dir.clone()))?;

        let mut summary = BatchSummary::new(self.operation.kind(), self.config.dry_run);

        // 1. 対象リストの決定
        let targets = self.resolve_targets(&mut summary, observer).await?;
        if targets.is_empty() {
            let message = format!("No targets given for {}", self.operation.kind());
            debug!("{}", message);
            observer.on_warning(&message);
            summary.warnings.push(message);
            return Ok(summary);
        }

        // 2. 順番に実行
        let total = targets.len();
        for (index, (target, source)) in targets.entries().iter().enumerate() {
            observer.on_start(index, total, target);
            let result = self.run_target(target, *source).await;
            observer.on_finish(&result);
            summary.add_result(result);
        }

        debug!(
            "{} finished: {} succeeded, {} failed, {} skipped",
            self.operation.kind(),
            summary.success_count,
            summary.failure_count,
            summary.skipped_count
        );

        Ok(summary)
    }

    /// 指定順に対象リストを作る。`-u` が現れるたびにその位置で use.list を読み込む。
    async fn resolve_targets(
        &self,
        summary: &mut BatchSummary,
        observer: &mut dyn BatchObserver,
    ) -> ModbatchResult<TargetList> {
        let mut targets = TargetList::new();
        let base_dir = &self.operation.settings().base_dir;

        for spec in &self.config.targets {
            match spec {
                TargetSpec::Dir(raw) => targets.push(raw.clone(), TargetSource::Argument),
                TargetSpec::UseList => match self.use_list_store.load(base_dir).await {
                    Ok(entries) => targets.extend(entries, TargetSource::UseList),
                    Err(e) if e.is_not_found() => {
                        let message = e.to_string();
                        debug!("{}", message);
                        observer.on_warning(&message);
                        summary.warnings.push(message);
                    }
                    Err(e) => return Err(e.into()),
                },
            }
        }

        Ok(targets)
    }

    /// 1つの対象を処理する。エラーは結果に変換して返す。
    async fn run_target(&self, target: &TargetPath, source: TargetSource) -> OperationResult {
        let result = OperationResult::new(target.clone()).with_source(source);

        let plan = match self.operation.plan(target) {
            Ok(plan) => plan,
            Err(e) => {
                debug!("{}: {}", target, e);
                return result.with_failure(None, e.to_string(), 0);
            }
        };

        let result = result.with_invocation(plan.invocation.to_string());

        if self.config.dry_run {
            return result.with_skip("dry run".to_string());
        }

        match self.operation.apply(&plan, &self.runner).await {
            Ok(exec) if exec.success => {
                result.with_success(exec.exit_code, exec.stdout, exec.stderr, exec.execution_time_ms)
            }
            Ok(exec) => {
                let message = exec.failure_message();
                debug!("{}: {}", target, message);
                result
                    .with_failure(Some(exec.exit_code), message, exec.execution_time_ms)
                    .with_output(exec.stdout, exec.stderr)
            }
            Err(e) => {
                debug!("{}: {}", target, e);
                result.with_failure(None, e.to_string(), 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::directory_operation::OperationSettings;
    use crate::common::error::ModbatchError;
    use crate::domain::value_objects::module_path::ModulePrefix;
    use crate::infrastructure::process::command_executor::{
        CommandExecutorError, ExecutionResult, MockProcessRunner,
    };
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn ok() -> Result<ExecutionResult, CommandExecutorError> {
        Ok(ExecutionResult::new(0, "ok\n".to_string(), String::new(), 2))
    }

    fn use_case(
        temp_dir: &TempDir,
        kind: OperationKind,
        runner: MockProcessRunner,
        config: BatchOperationConfig,
    ) -> BatchOperationUseCase<MockProcessRunner> {
        let settings = OperationSettings::new(temp_dir.path())
            .with_prefix(ModulePrefix::new("github.com/acme/lang").unwrap());
        BatchOperationUseCase::new(
            DirectoryOperation::new(kind, settings),
            UseListStore::new(),
            runner,
            config,
        )
    }

    #[derive(Default)]
    struct RecordingObserver {
        warnings: Vec<String>,
        started: Vec<(usize, usize, String)>,
        finished: Vec<OperationStatus>,
    }

    impl BatchObserver for RecordingObserver {
        fn on_warning(&mut self, message: &str) {
            self.warnings.push(message.to_string());
        }

        fn on_start(&mut self, index: usize, total: usize, target: &TargetPath) {
            self.started.push((index, total, target.to_string()));
        }

        fn on_finish(&mut self, result: &OperationResult) {
            self.finished.push(result.status);
        }
    }

    #[test]
    fn test_summary_counting() {
        let mut summary = BatchSummary::new(OperationKind::Tidy, false);

        summary.add_result(
            OperationResult::new(TargetPath::new("a")).with_success(0, String::new(), String::new(), 100),
        );
        summary.add_result(
            OperationResult::new(TargetPath::new("b")).with_failure(Some(1), "error".to_string(), 200),
        );
        summary.add_result(OperationResult::new(TargetPath::new("c")).with_skip("dry run".to_string()));

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.skipped_count, 1);
        assert_eq!(summary.total_count(), 3);
        assert_eq!(summary.total_execution_time_ms, 300);
        assert!(!summary.is_success());

        let failed = summary.failed_results();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].target.as_str(), "b");
    }

    #[tokio::test]
    async fn test_missing_use_list_means_no_targets() {
        let temp_dir = TempDir::new().unwrap();
        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();

        let config = BatchOperationConfig::new().with_use_list();
        let mut observer = RecordingObserver::default();
        let summary = use_case(&temp_dir, OperationKind::Tidy, runner, config)
            .execute_with(&mut observer)
            .await
            .unwrap();

        assert_eq!(summary.total_count(), 0);
        assert!(summary.is_success());
        assert_eq!(observer.warnings[0], "no file named use.list");
        assert_eq!(summary.warnings.len(), 2);
    }

    fn recording_runner(times: usize) -> (MockProcessRunner, Arc<Mutex<Vec<PathBuf>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_mock = seen.clone();
        let mut runner = MockProcessRunner::new();
        runner.expect_run().times(times).returning(move |_, config| {
            let dir = config.working_directory.clone().unwrap();
            seen_in_mock.lock().unwrap().push(dir);
            ok()
        });
        (runner, seen)
    }

    #[tokio::test]
    async fn test_use_list_entries_come_before_later_arguments() {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["lexer", "parser", "ir"] {
            std::fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        std::fs::write(temp_dir.path().join("use.list"), "./lexer\nparser\n").unwrap();

        let (runner, seen) = recording_runner(3);
        let config = BatchOperationConfig::new()
            .with_use_list()
            .with_targets(["ir"]);
        let summary = use_case(&temp_dir, OperationKind::Tidy, runner, config)
            .execute()
            .await
            .unwrap();

        let targets: Vec<&str> = summary.results.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, vec!["lexer", "parser", "ir"]);
        assert_eq!(summary.success_count, 3);
        assert_eq!(summary.results[0].source, TargetSource::UseList);
        assert_eq!(summary.results[2].source, TargetSource::Argument);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                temp_dir.path().join("lexer"),
                temp_dir.path().join("parser"),
                temp_dir.path().join("ir"),
            ]
        );
    }

    #[tokio::test]
    async fn test_use_list_is_expanded_where_it_appears() {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["a", "b", "lexer"] {
            std::fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        std::fs::write(temp_dir.path().join("use.list"), "lexer\n").unwrap();

        let (runner, seen) = recording_runner(4);
        let config = BatchOperationConfig::new().with_specs([
            TargetSpec::Dir("a".to_string()),
            TargetSpec::UseList,
            TargetSpec::Dir("b".to_string()),
            TargetSpec::UseList,
        ]);
        let summary = use_case(&temp_dir, OperationKind::Tidy, runner, config)
            .execute()
            .await
            .unwrap();

        let targets: Vec<&str> = summary.results.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, vec!["a", "lexer", "b", "lexer"]);
        let sources: Vec<TargetSource> = summary.results.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![
                TargetSource::Argument,
                TargetSource::UseList,
                TargetSource::Argument,
                TargetSource::UseList,
            ]
        );
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_missing_directory_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("types")).unwrap();

        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|invocation, _| invocation.args == vec!["mod", "init", "github.com/acme/lang/types"])
            .times(1)
            .returning(|_, _| ok());

        let config = BatchOperationConfig::new().with_targets(["missing", "./types"]);
        let mut observer = RecordingObserver::default();
        let summary = use_case(&temp_dir, OperationKind::Init, runner, config)
            .execute_with(&mut observer)
            .await
            .unwrap();

        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.success_count, 1);
        assert!(summary.results[0]
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("Directory not found"));
        assert_eq!(
            observer.started,
            vec![(0, 2, "missing".to_string()), (1, 2, "types".to_string())]
        );
        assert_eq!(
            observer.finished,
            vec![OperationStatus::Failed, OperationStatus::Success]
        );
    }

    #[tokio::test]
    async fn test_tool_failures_are_collected() {
        let temp_dir = TempDir::new().unwrap();

        let mut runner = MockProcessRunner::new();
        let mut calls = 0;
        runner.expect_run().times(3).returning(move |_, _| {
            calls += 1;
            match calls {
                1 => Ok(ExecutionResult::new(2, String::new(), "rm: cannot remove\n".to_string(), 4)),
                2 => Err(CommandExecutorError::Timeout { timeout_seconds: 1 }),
                _ => ok(),
            }
        });

        let config = BatchOperationConfig::new().with_targets(["a", "b", ""]);
        let summary = use_case(&temp_dir, OperationKind::Clean, runner, config)
            .execute()
            .await
            .unwrap();

        assert_eq!(summary.failure_count, 2);
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.results[0].exit_code, Some(2));
        assert_eq!(summary.results[0].error_message.as_deref(), Some("rm: cannot remove"));
        assert_eq!(
            summary.results[1].error_message.as_deref(),
            Some("Command timed out after 1 seconds")
        );
        assert_eq!(summary.results[2].invocation.as_deref(), Some("sh clean.sh ."));
    }

    #[tokio::test]
    async fn test_dry_run_spawns_nothing_and_keeps_manifest() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("go.mod"), "module keep\n").unwrap();

        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();

        let config = BatchOperationConfig::new()
            .with_targets(["."])
            .with_dry_run(true);
        let summary = use_case(&temp_dir, OperationKind::Init, runner, config)
            .execute()
            .await
            .unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.skipped_count, 1);
        assert_eq!(
            summary.results[0].invocation.as_deref(),
            Some("go mod init github.com/acme/lang")
        );
        assert!(temp_dir.path().join("go.mod").exists());
    }

    #[tokio::test]
    async fn test_missing_base_dir_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let gone = temp_dir.path().join("gone");
        let settings = OperationSettings::new(&gone);

        let use_case = BatchOperationUseCase::new(
            DirectoryOperation::new(OperationKind::Tidy, settings),
            UseListStore::new(),
            MockProcessRunner::new(),
            BatchOperationConfig::new().with_targets(["a"]),
        );

        let err = use_case.execute().await.unwrap_err();
        assert!(matches!(err, ModbatchError::FileSystemError { path: Some(ref p), .. } if *p == gone));
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let mut summary = BatchSummary::new(OperationKind::Clean, false);
        summary.add_result(
            OperationResult::new(TargetPath::new("./x"))
                .with_invocation("sh clean.sh x")
                .with_success(0, String::new(), String::new(), 1),
        );

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["operation"], "clean");
        assert_eq!(value["results"][0]["target"], "x");
        assert_eq!(value["results"][0]["status"], "success");
        assert_eq!(value["results"][0]["source"], "argument");
        assert!(value["results"][0].get("stdout").is_none());
        assert!(value.get("warnings").is_none());
    }
}
