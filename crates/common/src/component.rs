//! 组件描述
//!
//! 发现阶段注册的组件记录，后续阶段按名称引用

use crate::metadata::DotName;
use crate::service::{DependencyType, ServiceName};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::trace;

/// 组件类别
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// 普通类实现的端点
    PojoEndpoint,
    /// 会话 Bean 实现的端点
    EjbEndpoint,
    /// 自定义组件类别
    Custom(String),
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PojoEndpoint => f.write_str("pojo-endpoint"),
            Self::EjbEndpoint => f.write_str("ejb-endpoint"),
            Self::Custom(kind) => f.write_str(kind),
        }
    }
}

/// 依赖边
///
/// 边的身份是 (目标服务, 依赖强度)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DependencyEdge {
    /// 目标服务
    pub target: ServiceName,
    /// 依赖强度
    pub dependency_type: DependencyType,
}

impl DependencyEdge {
    /// 创建新的依赖边
    pub const fn new(target: ServiceName, dependency_type: DependencyType) -> Self {
        Self {
            target,
            dependency_type,
        }
    }
}

/// 组件描述
#[derive(Debug)]
pub struct ComponentDescription {
    name: String,
    class_name: DotName,
    module_name: String,
    owner: ServiceName,
    kind: ComponentKind,
    dependencies: RwLock<BTreeSet<DependencyEdge>>,
}

impl ComponentDescription {
    /// 创建新的组件描述
    pub fn new(
        name: impl Into<String>,
        class_name: DotName,
        module_name: impl Into<String>,
        owner: ServiceName,
        kind: ComponentKind,
    ) -> Self {
        Self {
            name: name.into(),
            class_name,
            module_name: module_name.into(),
            owner,
            kind,
            dependencies: RwLock::new(BTreeSet::new()),
        }
    }

    /// 组件名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 实现类
    pub const fn class_name(&self) -> &DotName {
        &self.class_name
    }

    /// 所属模块名称
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// 所属部署单元的服务名称
    pub const fn owner(&self) -> &ServiceName {
        &self.owner
    }

    /// 组件类别
    pub const fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// 添加依赖边
    ///
    /// 边已存在时不做任何修改并返回 `false`
    pub fn add_dependency(&self, target: ServiceName, dependency_type: DependencyType) -> bool {
        let edge = DependencyEdge::new(target, dependency_type);
        let inserted = self.dependencies.write().insert(edge.clone());
        if inserted {
            trace!(
                "组件 {} 添加依赖: {} ({})",
                self.name,
                edge.target,
                edge.dependency_type
            );
        }
        inserted
    }

    /// 所有依赖边，按目标排序
    pub fn dependencies(&self) -> Vec<DependencyEdge> {
        self.dependencies.read().iter().cloned().collect()
    }

    /// 依赖边数量
    pub fn dependency_count(&self) -> usize {
        self.dependencies.read().len()
    }

    /// 是否依赖指定服务（任意强度）
    pub fn depends_on(&self, target: &ServiceName) -> bool {
        self.dependencies
            .read()
            .iter()
            .any(|edge| &edge.target == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component() -> ComponentDescription {
        ComponentDescription::new(
            "OrderEndpoint",
            DotName::new("com.acme.OrderEndpoint"),
            "orders",
            ServiceName::of(["deployment", "unit", "orders.war"]),
            ComponentKind::PojoEndpoint,
        )
    }

    #[test]
    fn repeated_edges_collapse() {
        let component = component();
        let target = ServiceName::of(["endpoint-service:A"]);

        assert!(component.add_dependency(target.clone(), DependencyType::Required));
        for _ in 0..5 {
            assert!(!component.add_dependency(target.clone(), DependencyType::Required));
        }

        assert_eq!(component.dependency_count(), 1);
        assert!(component.depends_on(&target));
    }

    #[test]
    fn strength_is_part_of_edge_identity() {
        let component = component();
        let target = ServiceName::of(["cache"]);

        component.add_dependency(target.clone(), DependencyType::Required);
        component.add_dependency(target.clone(), DependencyType::Optional);

        let edges = component.dependencies();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].dependency_type, DependencyType::Required);
        assert_eq!(edges[1].dependency_type, DependencyType::Optional);
    }
}
