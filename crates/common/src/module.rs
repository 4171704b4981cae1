//! 模块描述
//!
//! 单个部署单元拥有的组件注册表。组件名称在模块内唯一，
//! 重复注册返回已有实例（先注册者生效）。

use crate::component::{ComponentDescription, ComponentKind};
use crate::metadata::DotName;
use crate::service::ServiceName;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 模块描述
#[derive(Debug)]
pub struct ModuleDescription {
    module_name: String,
    application_name: Option<String>,
    created_at: DateTime<Utc>,
    undeployed_at: RwLock<Option<DateTime<Utc>>>,
    components: DashMap<String, Arc<ComponentDescription>>,
}

impl ModuleDescription {
    /// 创建新的模块描述
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            application_name: None,
            created_at: Utc::now(),
            undeployed_at: RwLock::new(None),
            components: DashMap::new(),
        }
    }

    /// 设置所属应用名称
    pub fn with_application_name(mut self, application_name: impl Into<String>) -> Self {
        self.application_name = Some(application_name.into());
        self
    }

    /// 模块名称
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// 所属应用名称
    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    /// 创建时间
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 按名称查找组件
    pub fn component_by_name(&self, name: &str) -> Option<Arc<ComponentDescription>> {
        self.components.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// 添加组件描述
    ///
    /// 名称已被占用时丢弃传入的描述，返回已有实例
    pub fn add_component(&self, description: ComponentDescription) -> Arc<ComponentDescription> {
        match self.components.entry(description.name().to_string()) {
            Entry::Occupied(entry) => {
                let existing = Arc::clone(entry.get());
                Self::report_conflict(&existing, description.class_name());
                existing
            }
            Entry::Vacant(entry) => {
                let description = Arc::new(description);
                entry.insert(Arc::clone(&description));
                debug!(
                    "模块 {} 注册组件: {} ({})",
                    self.module_name,
                    description.name(),
                    description.class_name()
                );
                description
            }
        }
    }

    /// 注册组件或返回已有组件
    ///
    /// 检查与插入在同一个分片锁内完成。已有组件的实现类和所有者不会被覆盖。
    pub fn register_or_get(
        &self,
        name: &str,
        class_name: &DotName,
        owner: &ServiceName,
        kind: ComponentKind,
    ) -> Arc<ComponentDescription> {
        match self.components.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                let existing = Arc::clone(entry.get());
                Self::report_conflict(&existing, class_name);
                existing
            }
            Entry::Vacant(entry) => {
                let description = Arc::new(ComponentDescription::new(
                    name,
                    class_name.clone(),
                    self.module_name.as_str(),
                    owner.clone(),
                    kind,
                ));
                entry.insert(Arc::clone(&description));
                debug!("模块 {} 注册组件: {} ({})", self.module_name, name, class_name);
                description
            }
        }
    }

    fn report_conflict(existing: &ComponentDescription, class_name: &DotName) {
        if existing.class_name() != class_name {
            warn!(
                "组件名称 {} 已由 {} 注册，忽略 {}",
                existing.name(),
                existing.class_name(),
                class_name
            );
        }
    }

    /// 所有组件，按名称排序
    pub fn components(&self) -> Vec<Arc<ComponentDescription>> {
        let mut components: Vec<_> = self
            .components
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        components.sort_by(|a, b| a.name().cmp(b.name()));
        components
    }

    /// 组件数量
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// 标记模块已卸载
    pub fn mark_undeployed(&self) {
        let mut undeployed_at = self.undeployed_at.write();
        if undeployed_at.is_none() {
            *undeployed_at = Some(Utc::now());
            info!("模块 {} 已标记为卸载", self.module_name);
        }
    }

    /// 模块是否已卸载
    pub fn is_undeployed(&self) -> bool {
        self.undeployed_at.read().is_some()
    }

    /// 卸载时间
    pub fn undeployed_at(&self) -> Option<DateTime<Utc>> {
        *self.undeployed_at.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn owner() -> ServiceName {
        ServiceName::of(["deployment", "unit", "orders.war"])
    }

    #[test]
    fn register_or_get_returns_same_instance() {
        let module = ModuleDescription::new("orders");
        let first = module.register_or_get(
            "OrderEndpoint",
            &DotName::new("com.acme.OrderEndpoint"),
            &owner(),
            ComponentKind::PojoEndpoint,
        );
        let second = module.register_or_get(
            "OrderEndpoint",
            &DotName::new("com.acme.OtherEndpoint"),
            &ServiceName::of(["other"]),
            ComponentKind::EjbEndpoint,
        );

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.class_name().as_str(), "com.acme.OrderEndpoint");
        assert_eq!(second.owner(), &owner());
        assert_eq!(second.kind(), &ComponentKind::PojoEndpoint);
        assert_eq!(module.component_count(), 1);
    }

    #[test]
    fn add_component_keeps_first_registration() {
        let module = ModuleDescription::new("orders");
        let first = module.add_component(ComponentDescription::new(
            "Orders",
            DotName::new("com.acme.A"),
            "orders",
            owner(),
            ComponentKind::PojoEndpoint,
        ));
        let second = module.add_component(ComponentDescription::new(
            "Orders",
            DotName::new("com.acme.B"),
            "orders",
            owner(),
            ComponentKind::PojoEndpoint,
        ));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            module
                .component_by_name("Orders")
                .map(|c| c.class_name().clone()),
            Some(DotName::new("com.acme.A"))
        );
    }

    #[test]
    fn components_are_sorted_by_name() {
        let module = ModuleDescription::new("orders");
        for name in ["Zeta", "Alpha", "Mid"] {
            module.register_or_get(name, &DotName::new(name), &owner(), ComponentKind::PojoEndpoint);
        }

        let names: Vec<_> = module
            .components()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn concurrent_registration_creates_one_component() {
        let module = Arc::new(ModuleDescription::new("orders"));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let module = Arc::clone(&module);
                thread::spawn(move || {
                    module.register_or_get(
                        "Shared",
                        &DotName::new(format!("com.acme.Impl{i}")),
                        &ServiceName::of(["unit"]),
                        ComponentKind::PojoEndpoint,
                    )
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("registration thread panicked"))
            .collect();

        assert_eq!(module.component_count(), 1);
        assert!(results.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[test]
    fn undeploy_is_recorded_once() {
        let module = ModuleDescription::new("orders");
        assert!(!module.is_undeployed());

        module.mark_undeployed();
        let first = module.undeployed_at();
        module.mark_undeployed();

        assert!(module.is_undeployed());
        assert_eq!(module.undeployed_at(), first);
    }
}
