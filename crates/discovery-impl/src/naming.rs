//! 默认服务命名

use deployment_common::{DotName, ServiceName};
use discovery_abstractions::{DeploymentUnit, ServiceNaming};

/// 默认端点服务名称前缀
pub const DEFAULT_ENDPOINT_SERVICE_PREFIX: &str = "endpoint-service";

/// 端点服务命名
///
/// 端点服务名称挂在部署单元服务名称之下，最后一段为 `<前缀>:<类名>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointServiceNaming {
    prefix: String,
}

impl EndpointServiceNaming {
    /// 使用指定前缀创建
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// 名称前缀
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for EndpointServiceNaming {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT_SERVICE_PREFIX)
    }
}

impl ServiceNaming for EndpointServiceNaming {
    fn endpoint_service_name(&self, unit: &DeploymentUnit, class_name: &DotName) -> ServiceName {
        unit.service_name()
            .append(format!("{}:{}", self.prefix, class_name))
    }
}
