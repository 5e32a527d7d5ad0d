//! # Logging モジュール
//!
//! 捜索成立性スタディのログ出力を設定します。
//!
//! スイープの評価点ごとの判定（不成立理由、反復上限到達、旋回幾何エラー）を
//! 追えるように、コンソールには簡潔な形式、ファイルには JSON 形式で出力します。
//! ファイル出力は tracing-appender の非同期ライターを使い、評価ワーカーの
//! 処理を書き込みで待たせません。
//!
//! ## 設定可能な出力先
//!
//! - `Console`: コンソールのみ
//! - `File`: ファイルのみ（logs/searchcalc.YYYY-MM-DD）
//! - `Both`: コンソールとファイルの両方

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// ログ出力先の設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogOutput {
    /// コンソールのみ
    Console,
    /// ファイルのみ
    File,
    /// コンソールとファイルの両方
    Both,
}

impl LogOutput {
    /// ファイルへ書き出すかどうか
    pub fn writes_file(&self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(format!("無効な出力先: {}. 利用可能: console, file, both", s)),
        }
    }
}

/// ログ設定構造体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// ログレベル
    pub level: Level,
    /// 出力先
    pub output: LogOutput,
    /// ログファイルのディレクトリ（File または Both の場合）
    pub log_dir: String,
    /// ログファイル名のプレフィックス
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            output: LogOutput::Console,
            log_dir: "logs".to_string(),
            file_prefix: "searchcalc".to_string(),
        }
    }
}

/// ログ初期化のエラー
#[derive(Debug, Error)]
pub enum LoggingError {
    /// ログディレクトリを作成できない
    #[error("ログディレクトリを作成できません: {0}")]
    Directory(#[source] std::io::Error),
    /// グローバルサブスクライバーの登録に失敗（二重初期化など）
    #[error("ログの初期化に失敗: {0}")]
    Subscriber(String),
}

/// ログシステムを初期化
///
/// 環境変数 `RUST_LOG` が設定されていればそちらを優先し、
/// なければ `config.level` をフィルタとして使います。
///
/// # 戻り値
///
/// ファイル出力時は非同期ライターのガード。プロセス終了まで保持すること。
/// 破棄するとバッファ中のログが書き出されずに失われます。
///
/// # 例
///
/// ```rust,no_run
/// use searchcalc::logging::{LogConfig, LogOutput, init_logging};
/// use tracing::Level;
///
/// let config = LogConfig {
///     level: Level::DEBUG,
///     output: LogOutput::Both,
///     ..LogConfig::default()
/// };
///
/// let _guard = init_logging(config).expect("ログ初期化に失敗");
/// ```
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.to_string()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if config.output.writes_file() {
        ensure_log_directory(&config.log_dir).map_err(LoggingError::Directory)?;
    }

    match config.output {
        LogOutput::Console => {
            Registry::default()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact()
                )
                .try_init()
                .map_err(|e| LoggingError::Subscriber(e.to_string()))?;
            Ok(None)
        }
        LogOutput::File | LogOutput::Both => {
            let file_appender = rolling::daily(&config.log_dir, &config.file_prefix);
            let (non_blocking_appender, guard) = non_blocking(file_appender);

            // Both のときだけコンソールにも出す
            let console_layer = (config.output == LogOutput::Both).then(|| {
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact()
            });

            Registry::default()
                .with(env_filter)
                .with(console_layer)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking_appender)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(false)
                        .with_line_number(false)
                        .json()
                )
                .try_init()
                .map_err(|e| LoggingError::Subscriber(e.to_string()))?;
            Ok(Some(guard))
        }
    }
}

/// ログレベルを文字列から解析
///
/// # 引数
///
/// * `level_str` - ログレベル文字列 ("trace", "debug", "info", "warn", "error")
///
/// # 戻り値
///
/// 解析されたログレベル、無効な場合はWARN
pub fn parse_log_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!("警告: 無効なログレベル '{}'. WARNを使用します", level_str);
            Level::WARN
        }
    }
}

/// `-v` の指定回数からログレベルを決める
///
/// 0: WARN（反復上限・旋回幾何エラーのみ）、1: INFO（スイープ進行）、
/// 2: DEBUG（評価点ごとの判定）、3以上: TRACE
pub fn level_from_verbosity(count: u8) -> Level {
    match count {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// ログディレクトリを作成
pub fn ensure_log_directory(log_dir: &str) -> Result<(), std::io::Error> {
    std::fs::create_dir_all(log_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_output_from_str() {
        assert_eq!(LogOutput::from_str("console"), Ok(LogOutput::Console));
        assert_eq!(LogOutput::from_str("FILE"), Ok(LogOutput::File));
        assert_eq!(LogOutput::from_str("both"), Ok(LogOutput::Both));
        assert!(LogOutput::from_str("syslog").is_err());
    }

    #[test]
    fn test_writes_file() {
        assert!(!LogOutput::Console.writes_file());
        assert!(LogOutput::File.writes_file());
        assert!(LogOutput::Both.writes_file());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level("INFO"), Level::INFO);
        assert_eq!(parse_log_level("invalid"), Level::WARN);
    }

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(0), Level::WARN);
        assert_eq!(level_from_verbosity(1), Level::INFO);
        assert_eq!(level_from_verbosity(2), Level::DEBUG);
        assert_eq!(level_from_verbosity(7), Level::TRACE);
    }

    #[test]
    fn test_init_logging_with_file_output() {
        // グローバルサブスクライバーはプロセスに1つだけなので、初期化はこのテストでのみ行う
        let log_dir = std::env::temp_dir().join(format!("searchcalc-logs-{}", std::process::id()));
        let config = LogConfig {
            level: Level::DEBUG,
            output: LogOutput::Both,
            log_dir: log_dir.to_string_lossy().into_owned(),
            file_prefix: "searchcalc-test".to_string(),
        };

        let guard = init_logging(config.clone()).unwrap();
        assert!(guard.is_some());
        assert!(log_dir.is_dir());

        // 二重初期化はパニックせずエラーになる
        let second = init_logging(LogConfig {
            output: LogOutput::Console,
            ..config
        });
        assert!(matches!(second, Err(LoggingError::Subscriber(_))));

        drop(guard);
        let _ = std::fs::remove_dir_all(&log_dir);
    }

    #[test]
    fn test_logging_error_messages() {
        let err = LoggingError::Subscriber("already set".to_string());
        assert!(err.to_string().contains("already set"));
        let err = LoggingError::Directory(std::io::Error::other("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_default_prefix() {
        let config = LogConfig::default();
        assert_eq!(config.file_prefix, "searchcalc");
        assert_eq!(config.output, LogOutput::Console);
    }
}
