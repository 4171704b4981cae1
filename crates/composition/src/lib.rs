//! # 部署组合层
//!
//! 将配置、组件族表、发现处理器和部署流水线组合成可运行的整体。
//!
//! ## 主要功能
//!
//! - **组件发现构建器**: 根据配置组装内置和自定义组件族
//! - **配置源管理**: TOML/JSON 文件和环境变量
//! - **索引加载**: 从 JSON 索引文档构建组合索引
//! - **部署流水线**: 顺序执行处理器，失败时逆序回滚
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use deployment_common::{DeploymentType, ModuleDescription};
//! use deployment_composition::{load_index, DiscoveryBuilder};
//! use discovery_abstractions::DeploymentUnit;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = DiscoveryBuilder::new()
//!         .add_config_toml("discovery.toml")?
//!         .add_config_env_vars("DISCOVERY")
//!         .build()?;
//!
//!     let index = load_index(&["orders-index.json"]).await?;
//!     let module = Arc::new(ModuleDescription::new("orders"));
//!     let unit = DeploymentUnit::new("orders.war", DeploymentType::War)
//!         .with_index(Arc::new(index))
//!         .with_module_description(Arc::clone(&module));
//!
//!     runtime.pipeline().deploy(&unit)?;
//!     for component in module.components() {
//!         println!("{} -> {:?}", component.name(), component.dependencies());
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config_sources;
pub mod index_loader;
pub mod pipeline;


// 重新导出主要类型
pub use builder::{initialize_logging, DiscoveryBuilder, DiscoveryRuntime, LoggingConfig};
pub use config_sources::{
    ConfigSourceDescriptor, ConfigSourceType, SettingsLoader, DEFAULT_ENV_PREFIX, ENV_SEPARATOR,
};
pub use index_loader::{load_document, load_index, ArchiveDocument, IndexDocument};
pub use pipeline::{failure_summary, DeploymentPipeline, PipelineReport, StageOutcome};

// 重新导出错误类型
pub use deployment_common::CompositionError;
