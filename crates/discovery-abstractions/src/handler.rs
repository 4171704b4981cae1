//! 组件注册处理器抽象接口

use crate::index::AnnotationIndex;
use crate::unit::DeploymentUnit;
use deployment_common::{AnnotationInstance, ClassInfo, DeploymentResult, ModuleDescription};
use std::sync::Arc;

/// 注册上下文
///
/// 一次发现过程中传给处理器的部署单元和索引
#[derive(Debug, Clone, Copy)]
pub struct RegistrationContext<'a> {
    unit: &'a DeploymentUnit,
    index: &'a dyn AnnotationIndex,
}

impl<'a> RegistrationContext<'a> {
    /// 创建新的注册上下文
    pub const fn new(unit: &'a DeploymentUnit, index: &'a dyn AnnotationIndex) -> Self {
        Self { unit, index }
    }

    /// 当前部署单元
    pub const fn unit(&self) -> &'a DeploymentUnit {
        self.unit
    }

    /// 当前索引
    pub const fn index(&self) -> &'a dyn AnnotationIndex {
        self.index
    }

    /// 部署单元的模块描述，未附加时报错
    pub fn module_description(&self) -> DeploymentResult<&'a Arc<ModuleDescription>> {
        self.unit.require_module_description()
    }
}

/// 组件注册处理器 trait
///
/// 对通过匹配器的注解出现位置执行注册和依赖边插入
pub trait RegistrationHandler: Send + Sync {
    /// 处理一个类级别注解
    ///
    /// 注解内容无法解释时返回错误，整个发现过程随之终止
    fn process_annotation(
        &self,
        context: &RegistrationContext<'_>,
        class: &ClassInfo,
        annotation: &AnnotationInstance,
    ) -> DeploymentResult<()>;
}
