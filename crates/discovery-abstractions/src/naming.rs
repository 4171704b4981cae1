//! 服务命名抽象接口

use crate::unit::DeploymentUnit;
use deployment_common::{DotName, ServiceName};
use std::fmt::Debug;

/// 服务命名 trait
///
/// 把逻辑服务标识解析为依赖边使用的服务名称，是 (部署单元, 类名) 的纯函数
pub trait ServiceNaming: Send + Sync + Debug {
    /// 指定类在部署单元中的端点服务名称
    fn endpoint_service_name(&self, unit: &DeploymentUnit, class_name: &DotName) -> ServiceName;
}
