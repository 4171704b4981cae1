//! 日志由配置文件中的 logging 段驱动
//!
//! 全局订阅者每个进程只能安装一次，因此单独放在一个测试二进制中

use deployment_composition::{DiscoveryBuilder, LoggingConfig};
use std::io::Write;
use tracing::level_filters::LevelFilter;

#[test]
fn test_configured_trace_level_enables_trace() {
    let mut config_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config_file, "[logging]\nlevel = \"trace\"\njson = false").unwrap();

    let runtime = DiscoveryBuilder::new()
        .add_config_toml(config_file.path())
        .unwrap()
        .with_logging_from_settings(LoggingConfig::default().with_stderr())
        .build()
        .unwrap();

    assert_eq!(runtime.settings().logging.level, "trace");
    assert_eq!(LevelFilter::current(), LevelFilter::TRACE);
    assert!(tracing::enabled!(tracing::Level::TRACE));
}
