//! 发现流程的配置定义

use crate::deployment::DeploymentType;
use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 普通类端点组件族名称
pub const POJO_ENDPOINT_FAMILY: &str = "pojo-endpoint";
/// 会话 Bean 端点组件族名称
pub const EJB_ENDPOINT_FAMILY: &str = "ejb-endpoint";

/// 内置组件族名称
pub const BUILTIN_FAMILIES: [&str; 2] = [POJO_ENDPOINT_FAMILY, EJB_ENDPOINT_FAMILY];

/// 组件发现配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// 跳过的部署单元类型
    pub skip_deployment_types: Vec<DeploymentType>,
    /// 端点服务名称前缀
    pub endpoint_service_prefix: String,
    /// 启用的组件族
    pub families: Vec<String>,
    /// 普通类端点必须实现的契约
    pub required_contract: Option<String>,
    /// 日志配置
    pub logging: LoggingSettings,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            skip_deployment_types: vec![DeploymentType::Ear],
            endpoint_service_prefix: "endpoint-service".to_string(),
            families: vec![
                POJO_ENDPOINT_FAMILY.to_string(),
                EJB_ENDPOINT_FAMILY.to_string(),
            ],
            required_contract: None,
            logging: LoggingSettings::default(),
        }
    }
}

impl DiscoverySettings {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.endpoint_service_prefix.trim().is_empty() {
            return Err(ConfigError::validation("endpoint_service_prefix 不能为空"));
        }

        let mut seen = BTreeSet::new();
        for family in &self.families {
            if family.trim().is_empty() {
                return Err(ConfigError::validation("组件族名称不能为空"));
            }
            if !seen.insert(family.as_str()) {
                return Err(ConfigError::validation(format!("组件族重复: {family}")));
            }
            if !BUILTIN_FAMILIES.contains(&family.as_str()) {
                return Err(ConfigError::validation(format!("未知的组件族: {family}")));
            }
        }

        if let Some(contract) = &self.required_contract {
            if contract.trim().is_empty() {
                return Err(ConfigError::validation("required_contract 不能为空字符串"));
            }
        }

        Ok(())
    }

    /// 是否启用指定组件族
    pub fn is_family_enabled(&self, family: &str) -> bool {
        self.families.iter().any(|name| name == family)
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别过滤表达式
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
