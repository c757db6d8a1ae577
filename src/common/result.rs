use crate::common::error::ModbatchError;

/// modbatch全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use modbatch::common::result::ModbatchResult;
/// use modbatch::common::error::ModbatchError;
///
/// fn example_function() -> ModbatchResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> ModbatchResult<()> {
///     Err(ModbatchError::config_error("Something went wrong"))
/// }
/// ```
pub type ModbatchResult<T> = Result<T, ModbatchError>;

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T, E> {
    /// ファイルシステムエラーとしてModbatchResultに変換
    ///
    /// # Examples
    ///
    /// ```
    /// use modbatch::common::result::{ModbatchResult, ResultExt};
    ///
    /// let result: Result<String, std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::NotFound, "file not found"
    /// ));
    /// let converted: ModbatchResult<String> = result.with_filesystem_error("read failed", None);
    /// assert!(converted.is_err());
    /// ```
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> ModbatchResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> ModbatchResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| {
            let io_error = e.into();
            ModbatchError::filesystem_error_with_source(message, path, io_error)
        })
    }
}
