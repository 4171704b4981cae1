//! 依赖图构建与快照
//!
//! 构建器只负责去重地记录依赖边，不做环检测。
//! 快照供后续阶段按组件或按目标服务查询。

use deployment_common::{
    ComponentDescription, ComponentKind, DependencyEdge, DependencyType, DotName,
    ModuleDescription, ServiceName,
};
use discovery_abstractions::{DeploymentUnit, ServiceNaming};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// 依赖图构建器
#[derive(Debug, Clone)]
pub struct DependencyGraphBuilder {
    naming: Arc<dyn ServiceNaming>,
}

impl DependencyGraphBuilder {
    /// 创建新的构建器
    pub fn new(naming: Arc<dyn ServiceNaming>) -> Self {
        Self { naming }
    }

    /// 服务命名
    pub fn naming(&self) -> &dyn ServiceNaming {
        self.naming.as_ref()
    }

    /// 添加依赖边，边已存在时返回 `false`
    pub fn add_dependency(
        &self,
        component: &ComponentDescription,
        target: ServiceName,
        dependency_type: DependencyType,
    ) -> bool {
        component.add_dependency(target, dependency_type)
    }

    /// 添加对类端点服务的必需依赖
    pub fn require_endpoint(
        &self,
        unit: &DeploymentUnit,
        component: &ComponentDescription,
        class_name: &DotName,
    ) -> bool {
        let target = self.naming.endpoint_service_name(unit, class_name);
        let inserted = self.add_dependency(component, target.clone(), DependencyType::Required);
        if !inserted {
            debug!("组件 {} 已依赖 {}", component.name(), target);
        }
        inserted
    }
}

/// 组件节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentNode {
    /// 组件名称
    pub name: String,
    /// 实现类
    pub class_name: DotName,
    /// 组件类别
    pub kind: ComponentKind,
    /// 所属部署单元的服务名称
    pub owner: ServiceName,
    /// 依赖边
    pub dependencies: Vec<DependencyEdge>,
}

impl From<&ComponentDescription> for ComponentNode {
    fn from(component: &ComponentDescription) -> Self {
        Self {
            name: component.name().to_string(),
            class_name: component.class_name().clone(),
            kind: component.kind().clone(),
            owner: component.owner().clone(),
            dependencies: component.dependencies(),
        }
    }
}

/// 依赖图快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    module_name: String,
    components: BTreeMap<String, ComponentNode>,
    dependents: BTreeMap<ServiceName, BTreeSet<String>>,
}

impl DependencyGraph {
    /// 由模块描述构建快照
    pub fn from_module(module: &ModuleDescription) -> Self {
        let mut graph = Self {
            module_name: module.module_name().to_string(),
            ..Self::default()
        };

        for component in module.components() {
            let node = ComponentNode::from(component.as_ref());
            for edge in &node.dependencies {
                graph
                    .dependents
                    .entry(edge.target.clone())
                    .or_default()
                    .insert(node.name.clone());
            }
            graph.components.insert(node.name.clone(), node);
        }
        graph
    }

    /// 模块名称
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// 组件节点，按名称排序
    pub fn components(&self) -> impl Iterator<Item = &ComponentNode> {
        self.components.values()
    }

    /// 按名称查找组件节点
    pub fn component(&self, name: &str) -> Option<&ComponentNode> {
        self.components.get(name)
    }

    /// 组件的依赖边
    pub fn dependencies_of(&self, name: &str) -> &[DependencyEdge] {
        self.components
            .get(name)
            .map(|node| node.dependencies.as_slice())
            .unwrap_or_default()
    }

    /// 依赖指定服务的组件名称
    pub fn dependents_of(&self, target: &ServiceName) -> Vec<&str> {
        self.dependents
            .get(target)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// 所有被依赖的服务
    pub fn targets(&self) -> impl Iterator<Item = &ServiceName> {
        self.dependents.keys()
    }

    /// 边总数
    pub fn edge_count(&self) -> usize {
        self.components.values().map(|node| node.dependencies.len()).sum()
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// 是否没有组件
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::EndpointServiceNaming;
    use deployment_common::DeploymentType;

    fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new(Arc::new(EndpointServiceNaming::default()))
    }

    #[test]
    fn repeated_edges_collapse() {
        let unit = DeploymentUnit::new("orders.war", DeploymentType::War);
        let module = ModuleDescription::new("orders");
        let class = DotName::new("A");
        let component =
            module.register_or_get("A", &class, &unit.service_name(), ComponentKind::PojoEndpoint);

        let builder = builder();
        assert!(builder.require_endpoint(&unit, &component, &class));
        for _ in 0..5 {
            assert!(!builder.require_endpoint(&unit, &component, &class));
        }
        assert_eq!(component.dependency_count(), 1);
    }

    #[test]
    fn snapshot_has_forward_and_reverse_views() {
        let unit = DeploymentUnit::new("orders.war", DeploymentType::War);
        let module = ModuleDescription::new("orders");
        let shared = ServiceName::of(["jboss", "txn"]);
        let builder = builder();

        for name in ["B", "A"] {
            let class = DotName::new(name);
            let component =
                module.register_or_get(name, &class, &unit.service_name(), ComponentKind::PojoEndpoint);
            builder.require_endpoint(&unit, &component, &class);
            builder.add_dependency(&component, shared.clone(), DependencyType::Optional);
        }

        let graph = DependencyGraph::from_module(&module);
        let names: Vec<_> = graph.components().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(graph.dependencies_of("A").len(), 2);
        assert!(graph.dependencies_of("missing").is_empty());
        assert_eq!(graph.dependents_of(&shared), vec!["A", "B"]);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.targets().count(), 3);
    }
}
