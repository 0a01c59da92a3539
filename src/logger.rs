// 日志初始化 - 控制台 + 按天滚动的日志文件

use std::path::Path;

use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use crate::models::LoggerSettings;

/// 解析日志级别，无法识别时使用 INFO
pub fn parse_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// 初始化日志系统
///
/// 启用文件日志时返回写入线程的 guard，调用方需在程序生命周期内持有
pub fn init(
    settings: &LoggerSettings,
    log_dir: &Path,
) -> Result<Option<WorkerGuard>, SetGlobalDefaultError> {
    let (writer, guard) = if settings.enable_file_logging {
        // 创建日志目录
        std::fs::create_dir_all(log_dir).ok();

        // 配置日志输出到文件（每天轮转）
        let file_appender = tracing_appender::rolling::daily(log_dir, "app.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // 同时输出到控制台和文件
        (
            BoxMakeWriter::new(std::io::stdout.and(non_blocking)),
            Some(guard),
        )
    } else {
        (BoxMakeWriter::new(std::io::stdout), None)
    };

    // 使用本地时区
    let timer = LocalTime::new(time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(parse_level(&settings.level))
        .with_writer(writer)
        .with_timer(timer)
        .with_ansi(cfg!(debug_assertions)) // release 版本不使用颜色代码
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if guard.is_some() {
        eprintln!("日志文件位置: {:?}", log_dir);
    }
    Ok(guard)
}
