//! 配置源
//!
//! 按添加顺序合并文件配置，环境变量最后合并，优先级最高

use config::{Config, Environment, File, FileFormat};
use deployment_common::{ConfigError, ConfigResult, DiscoverySettings};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "DISCOVERY";
/// 环境变量层级分隔符
pub const ENV_SEPARATOR: &str = "__";

/// 配置源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSourceType {
    /// TOML 文件
    Toml,
    /// JSON 文件
    Json,
}

impl ConfigSourceType {
    /// 根据扩展名推断
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Some(Self::Toml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }

    const fn format(self) -> FileFormat {
        match self {
            Self::Toml => FileFormat::Toml,
            Self::Json => FileFormat::Json,
        }
    }
}

/// 文件配置源描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSourceDescriptor {
    /// 文件路径
    pub path: PathBuf,
    /// 文件格式
    pub source_type: ConfigSourceType,
    /// 文件不存在时是否报错
    pub required: bool,
}

/// 发现配置加载器
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    files: Vec<ConfigSourceDescriptor>,
    env_prefix: Option<String>,
    env_source: Option<HashMap<String, String>>,
}

impl SettingsLoader {
    /// 创建空加载器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文件配置源
    pub fn add_file(mut self, path: impl Into<PathBuf>, source_type: ConfigSourceType, required: bool) -> Self {
        self.files.push(ConfigSourceDescriptor {
            path: path.into(),
            source_type,
            required,
        });
        self
    }

    /// 启用环境变量配置源
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 用给定的变量表代替进程环境变量
    pub fn with_env_source(mut self, source: HashMap<String, String>) -> Self {
        self.env_source = Some(source);
        self
    }

    /// 已添加的文件配置源
    pub fn files(&self) -> &[ConfigSourceDescriptor] {
        &self.files
    }

    /// 环境变量前缀
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// 加载并验证配置
    pub fn load(&self) -> ConfigResult<DiscoverySettings> {
        let mut builder = Config::builder();

        for source in &self.files {
            if source.required && !source.path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: source.path.display().to_string(),
                });
            }
            debug!("添加配置文件: {} ({:?})", source.path.display(), source.source_type);
            builder = builder.add_source(
                File::from(source.path.as_path())
                    .format(source.source_type.format())
                    .required(source.required),
            );
        }

        if let Some(prefix) = &self.env_prefix {
            debug!("添加环境变量配置源，前缀: {}", prefix);
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("families")
                    .with_list_parse_key("skip_deployment_types")
                    .source(self.env_source.clone()),
            );
        }

        let settings: DiscoverySettings = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| {
                error!("配置解析失败: {}", e);
                ConfigError::ParseError { source: Box::new(e) }
            })?;

        settings.validate()?;
        info!(
            "发现配置加载完成: 组件族 {:?}, 跳过类型 {:?}",
            settings.families, settings.skip_deployment_types
        );
        Ok(settings)
    }
}
