//! 部署单元

use crate::index::AnnotationIndex;
use deployment_common::{
    DeploymentError, DeploymentResult, DeploymentType, ModuleDescription, ServiceName,
};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// 模块描述附件名称
pub const MODULE_DESCRIPTION_ATTACHMENT: &str = "module-description";

/// 部署单元
///
/// 流经部署流水线的一个归档，携带其注解索引和模块描述附件
#[derive(Clone)]
pub struct DeploymentUnit {
    id: Uuid,
    name: String,
    parent: Option<String>,
    deployment_type: DeploymentType,
    index: Option<Arc<dyn AnnotationIndex>>,
    module_description: Option<Arc<ModuleDescription>>,
}

impl DeploymentUnit {
    /// 创建新的部署单元
    pub fn new(name: impl Into<String>, deployment_type: DeploymentType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent: None,
            deployment_type,
            index: None,
            module_description: None,
        }
    }

    /// 设置父部署单元
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// 附加注解索引
    pub fn with_index(mut self, index: Arc<dyn AnnotationIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// 附加模块描述
    pub fn with_module_description(mut self, module_description: Arc<ModuleDescription>) -> Self {
        self.module_description = Some(module_description);
        self
    }

    /// 部署单元ID
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// 部署单元名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 父部署单元名称
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// 部署单元类型
    pub const fn deployment_type(&self) -> DeploymentType {
        self.deployment_type
    }

    /// 是否为指定类型
    pub fn is_type(&self, deployment_type: DeploymentType) -> bool {
        self.deployment_type == deployment_type
    }

    /// 注解索引
    pub fn index(&self) -> Option<&dyn AnnotationIndex> {
        self.index.as_deref()
    }

    /// 模块描述
    pub const fn module_description(&self) -> Option<&Arc<ModuleDescription>> {
        self.module_description.as_ref()
    }

    /// 模块描述，未附加时报错
    pub fn require_module_description(&self) -> DeploymentResult<&Arc<ModuleDescription>> {
        self.module_description
            .as_ref()
            .ok_or_else(|| DeploymentError::missing_attachment(&self.name, MODULE_DESCRIPTION_ATTACHMENT))
    }

    /// 部署单元的服务名称
    pub fn service_name(&self) -> ServiceName {
        match &self.parent {
            Some(parent) => ServiceName::of(["deployment", "subunit", parent.as_str(), self.name.as_str()]),
            None => ServiceName::of(["deployment", "unit", self.name.as_str()]),
        }
    }
}

impl fmt::Debug for DeploymentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentUnit")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("deployment_type", &self.deployment_type)
            .field("has_index", &self.index.is_some())
            .field("module_description", &self.module_description.as_ref().map(|m| m.module_name()))
            .finish()
    }
}

impl fmt::Display for DeploymentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "deployment \"{}\" (subdeployment of \"{}\")", self.name, parent),
            None => write!(f, "deployment \"{}\"", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_reflects_parent() {
        let top = DeploymentUnit::new("orders.war", DeploymentType::War);
        assert_eq!(top.service_name().to_string(), "deployment.unit.orders.war");

        let sub = DeploymentUnit::new("orders.war", DeploymentType::War).with_parent("shop.ear");
        assert_eq!(
            sub.service_name().to_string(),
            "deployment.subunit.shop.ear.orders.war"
        );
    }

    #[test]
    fn missing_module_description_is_an_error() {
        let unit = DeploymentUnit::new("orders.war", DeploymentType::War);
        let error = unit
            .require_module_description()
            .expect_err("module description is not attached");
        assert!(matches!(error, DeploymentError::MissingAttachment { .. }));
        assert_eq!(error.unit(), "orders.war");
    }

    #[test]
    fn attached_module_description_is_returned() {
        let module = Arc::new(ModuleDescription::new("orders"));
        let unit = DeploymentUnit::new("orders.war", DeploymentType::War)
            .with_module_description(Arc::clone(&module));

        let attached = unit.require_module_description().expect("attached");
        assert!(Arc::ptr_eq(attached, &module));
        assert!(unit.index().is_none());
    }
}
