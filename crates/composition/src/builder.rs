//! 组件发现构建器

use crate::config_sources::{ConfigSourceType, SettingsLoader};
use crate::pipeline::DeploymentPipeline;
use deployment_common::{
    CompositionError, CompositionResult, ConfigError, DeploymentResult, DiscoverySettings,
    DotName, ListenerAttributes, LoggingSettings, EJB_ENDPOINT_FAMILY, POJO_ENDPOINT_FAMILY,
};
use discovery_abstractions::{DeploymentUnit, DiscoveryOutcome, ServiceNaming};
use discovery_impl::{
    ejb_endpoint_family, pojo_endpoint_family, ComponentDescriptionFactory, ComponentFamily,
    EndpointServiceNaming, FamilyTable,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// 组件发现构建器
///
/// 使用建造者模式组装配置、组件族表和部署流水线
pub struct DiscoveryBuilder {
    /// 配置加载器
    loader: SettingsLoader,
    /// 直接指定的配置，优先于配置源
    settings: Option<DiscoverySettings>,
    /// 自定义组件族
    custom_families: Vec<ComponentFamily>,
    /// 自定义服务命名
    naming: Option<Arc<dyn ServiceNaming>>,
    /// 日志配置，为空时不初始化日志
    logging_config: Option<LoggingConfig>,
    /// 是否以配置中的 `logging` 段覆盖日志级别和格式
    logging_from_settings: bool,
}

impl DiscoveryBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            loader: SettingsLoader::new(),
            settings: None,
            custom_families: Vec::new(),
            naming: None,
            logging_config: None, // 默认不初始化日志
            logging_from_settings: false,
        }
    }

    /// 添加 TOML 配置文件
    pub fn add_config_toml<P: AsRef<Path>>(self, path: P) -> CompositionResult<Self> {
        self.add_config_file(path.as_ref(), ConfigSourceType::Toml)
    }

    /// 添加 JSON 配置文件
    pub fn add_config_json<P: AsRef<Path>>(self, path: P) -> CompositionResult<Self> {
        self.add_config_file(path.as_ref(), ConfigSourceType::Json)
    }

    /// 按扩展名添加配置文件
    pub fn add_config_path<P: AsRef<Path>>(self, path: P) -> CompositionResult<Self> {
        let path = path.as_ref();
        let source_type = ConfigSourceType::from_path(path).ok_or_else(|| {
            CompositionError::BootstrapFailed {
                message: format!("无法识别的配置文件格式: {}", path.display()),
            }
        })?;
        self.add_config_file(path, source_type)
    }

    fn add_config_file(mut self, path: &Path, source_type: ConfigSourceType) -> CompositionResult<Self> {
        if !path.exists() {
            return Err(CompositionError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 {:?} 配置文件: {}", source_type, path.display());
        self.loader = self.loader.add_file(path, source_type, true);
        Ok(self)
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.loader = self.loader.with_env_prefix(prefix);
        self
    }

    /// 使用自定义配置加载器
    pub fn with_loader(mut self, loader: SettingsLoader) -> Self {
        self.loader = loader;
        self
    }

    /// 直接指定配置，不再读取配置源
    pub fn with_settings(mut self, settings: DiscoverySettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// 注册自定义组件族
    ///
    /// 自定义组件族始终启用，排在内置组件族之后
    pub fn with_family(mut self, family: ComponentFamily) -> Self {
        debug!("添加自定义组件族: {}", family.name());
        self.custom_families.push(family);
        self
    }

    /// 使用自定义服务命名
    pub fn with_naming(mut self, naming: Arc<dyn ServiceNaming>) -> Self {
        self.naming = Some(naming);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self.logging_from_settings = false;
        self
    }

    /// 按加载后的配置初始化日志
    ///
    /// 过滤表达式和 JSON 开关取自 `logging` 段，其余输出选项取自 `base`
    pub fn with_logging_from_settings(mut self, base: LoggingConfig) -> Self {
        self.logging_config = Some(base);
        self.logging_from_settings = true;
        self
    }

    /// 构建组件发现运行时
    pub fn build(self) -> CompositionResult<DiscoveryRuntime> {
        let settings = match self.settings {
            Some(settings) => {
                settings.validate()?;
                settings
            }
            None => self.loader.load()?,
        };

        // 只有在明确配置了日志时才初始化，避免测试中重复初始化
        if let Some(config) = self.logging_config {
            let config = if self.logging_from_settings {
                config.with_settings(&settings.logging)
            } else {
                config
            };
            initialize_logging(&config)?;
        }

        info!("开始构建组件发现运行时");
        let naming: Arc<dyn ServiceNaming> = match self.naming {
            Some(naming) => naming,
            None => Arc::new(EndpointServiceNaming::new(settings.endpoint_service_prefix.clone())),
        };

        let mut families = FamilyTable::new();
        for name in &settings.families {
            match name.as_str() {
                POJO_ENDPOINT_FAMILY => families.register(pojo_endpoint_family(
                    Arc::clone(&naming),
                    settings.required_contract.as_deref().map(DotName::new),
                )),
                EJB_ENDPOINT_FAMILY => families.register(ejb_endpoint_family(Arc::clone(&naming))),
                other => {
                    return Err(ConfigError::validation(format!("未知的组件族: {other}")).into());
                }
            }
        }
        for family in self.custom_families {
            families.register(family);
        }

        let factory = ComponentDescriptionFactory::new(Arc::new(families))
            .with_skip_types(settings.skip_deployment_types.iter().copied());

        info!("组件发现运行时构建完成，{} 个组件族", factory.families().len());
        Ok(DiscoveryRuntime {
            settings,
            factory: Arc::new(factory),
            listener_attributes: Arc::new(ListenerAttributes::standard()),
        })
    }
}

impl Default for DiscoveryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 组件发现运行时
#[derive(Debug, Clone)]
pub struct DiscoveryRuntime {
    settings: DiscoverySettings,
    factory: Arc<ComponentDescriptionFactory>,
    listener_attributes: Arc<ListenerAttributes>,
}

impl DiscoveryRuntime {
    /// 生效的配置
    pub const fn settings(&self) -> &DiscoverySettings {
        &self.settings
    }

    /// 发现处理器
    pub fn factory(&self) -> &ComponentDescriptionFactory {
        &self.factory
    }

    /// 监听器属性定义
    pub fn listener_attributes(&self) -> &ListenerAttributes {
        &self.listener_attributes
    }

    /// 只执行组件发现
    pub fn discover(&self, unit: &DeploymentUnit) -> DeploymentResult<DiscoveryOutcome> {
        self.factory.discover(unit)
    }

    /// 以发现处理器为第一阶段的部署流水线
    pub fn pipeline(&self) -> DeploymentPipeline {
        DeploymentPipeline::new().with_processor(self.factory.clone())
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志过滤表达式
    pub filter: String,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
    /// 是否输出到标准错误
    pub to_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
            to_stderr: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            filter: "debug".to_string(),
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
            to_stderr: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            filter: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
            to_stderr: false,
        }
    }

    /// 由配置文件中的日志设置创建
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self::default().with_settings(settings)
    }

    /// 用配置文件中的日志设置覆盖过滤表达式和格式
    pub fn with_settings(mut self, settings: &LoggingSettings) -> Self {
        self.filter = settings.level.clone();
        self.json_format = settings.json;
        self
    }

    /// 输出到标准错误
    pub fn with_stderr(mut self) -> Self {
        self.to_stderr = true;
        self
    }
}

/// 初始化日志系统
pub fn initialize_logging(config: &LoggingConfig) -> CompositionResult<()> {
    let filter = EnvFilter::try_new(&config.filter).map_err(|e| CompositionError::BootstrapFailed {
        message: format!("日志过滤表达式无效: {}: {}", config.filter, e),
    })?;

    let writer = if config.to_stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| CompositionError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_registers_both_endpoint_families() {
        let runtime = DiscoveryBuilder::new().build().unwrap();
        let names: Vec<_> = runtime.factory().families().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec![POJO_ENDPOINT_FAMILY, EJB_ENDPOINT_FAMILY]);
        assert_eq!(runtime.pipeline().processor_names(), vec!["component-description-factory"]);
    }

    #[test]
    fn unknown_family_is_rejected() {
        let settings = DiscoverySettings {
            families: vec!["mdb-endpoint".to_string()],
            ..DiscoverySettings::default()
        };
        let result = DiscoveryBuilder::new().with_settings(settings).build();
        assert!(matches!(
            result,
            Err(CompositionError::Config {
                source: ConfigError::ValidationError { .. }
            })
        ));
    }

    #[test]
    fn missing_config_file_fails_early() {
        let result = DiscoveryBuilder::new().add_config_toml("/nonexistent/discovery.toml");
        assert!(matches!(result, Err(CompositionError::BootstrapFailed { .. })));
    }

    #[test]
    fn logging_settings_map_to_config() {
        let config = LoggingConfig::from_settings(&LoggingSettings {
            level: "discovery_impl=trace".to_string(),
            json: true,
        });
        assert_eq!(config.filter, "discovery_impl=trace");
        assert!(config.json_format);
        assert!(LoggingConfig::production().json_format);
    }

    #[test]
    fn settings_override_keeps_output_options() {
        let config = LoggingConfig::development()
            .with_stderr()
            .with_settings(&LoggingSettings {
                level: "trace".to_string(),
                json: false,
            });
        assert_eq!(config.filter, "trace");
        assert!(config.to_stderr);
        assert!(config.show_file);
        assert!(!config.json_format);
    }
}
