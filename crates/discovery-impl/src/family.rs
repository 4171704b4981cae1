//! 组件族表
//!
//! 每个组件族由一组标记、一个匹配器和一个注册处理器组成。
//! 表在启动时构建，驱动器按注册顺序遍历。

use deployment_common::{ComponentKind, DotName};
use discovery_abstractions::{ComponentMatcher, RegistrationHandler};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 组件族
pub struct ComponentFamily {
    name: String,
    kind: ComponentKind,
    markers: Vec<DotName>,
    matcher: Arc<dyn ComponentMatcher>,
    handler: Arc<dyn RegistrationHandler>,
}

impl ComponentFamily {
    /// 创建新的组件族
    pub fn new(
        name: impl Into<String>,
        kind: ComponentKind,
        matcher: Arc<dyn ComponentMatcher>,
        handler: Arc<dyn RegistrationHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            markers: Vec::new(),
            matcher,
            handler,
        }
    }

    /// 添加要查找的标记
    pub fn with_marker(mut self, marker: impl Into<DotName>) -> Self {
        let marker = marker.into();
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    /// 组件族名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 组件类别
    pub const fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// 标记列表
    pub fn markers(&self) -> &[DotName] {
        &self.markers
    }

    /// 匹配器
    pub fn matcher(&self) -> &dyn ComponentMatcher {
        self.matcher.as_ref()
    }

    /// 注册处理器
    pub fn handler(&self) -> &dyn RegistrationHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for ComponentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentFamily")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("markers", &self.markers)
            .field("matcher", &self.matcher.describe())
            .field("handler", &"<handler>")
            .finish()
    }
}

/// 组件族表
#[derive(Debug, Default)]
pub struct FamilyTable {
    families: Vec<ComponentFamily>,
}

impl FamilyTable {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册组件族，同名组件族会被替换
    pub fn register(&mut self, family: ComponentFamily) {
        debug!(
            "注册组件族: {} (标记: {:?}, 匹配器: {})",
            family.name,
            family.markers,
            family.matcher.describe()
        );
        match self.families.iter_mut().find(|f| f.name == family.name) {
            Some(existing) => *existing = family,
            None => self.families.push(family),
        }
    }

    /// 注册组件族（链式）
    pub fn with_family(mut self, family: ComponentFamily) -> Self {
        self.register(family);
        self
    }

    /// 按注册顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ComponentFamily> {
        self.families.iter()
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Option<&ComponentFamily> {
        self.families.iter().find(|family| family.name == name)
    }

    /// 所有 (标记, 组件族) 条目
    pub fn entries(&self) -> impl Iterator<Item = (&DotName, &ComponentFamily)> {
        self.families
            .iter()
            .flat_map(|family| family.markers.iter().map(move |marker| (marker, family)))
    }

    /// 组件族数量
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deployment_common::{AnnotationInstance, ClassInfo, DeploymentResult};
    use discovery_abstractions::{AcceptAll, RegistrationContext};

    struct NoopHandler;

    impl RegistrationHandler for NoopHandler {
        fn process_annotation(
            &self,
            _context: &RegistrationContext<'_>,
            _class: &ClassInfo,
            _annotation: &AnnotationInstance,
        ) -> DeploymentResult<()> {
            Ok(())
        }
    }

    fn family(name: &str, markers: &[&str]) -> ComponentFamily {
        markers.iter().fold(
            ComponentFamily::new(
                name,
                ComponentKind::Custom(name.to_string()),
                Arc::new(AcceptAll),
                Arc::new(NoopHandler),
            ),
            |family, marker| family.with_marker(*marker),
        )
    }

    #[test]
    fn entries_follow_registration_order() {
        let table = FamilyTable::new()
            .with_family(family("first", &["a.One", "a.Two"]))
            .with_family(family("second", &["b.One"]));

        let entries: Vec<_> = table
            .entries()
            .map(|(marker, family)| format!("{}->{}", marker, family.name()))
            .collect();
        assert_eq!(entries, vec!["a.One->first", "a.Two->first", "b.One->second"]);
    }

    #[test]
    fn same_name_replaces_family() {
        let table = FamilyTable::new()
            .with_family(family("custom", &["a.One"]))
            .with_family(family("custom", &["a.Two"]));

        assert_eq!(table.len(), 1);
        let markers = table.get("custom").map(ComponentFamily::markers);
        assert_eq!(markers, Some(&[DotName::new("a.Two")][..]));
    }

    #[test]
    fn duplicate_markers_are_ignored() {
        let family = family("custom", &["a.One", "a.One"]);
        assert_eq!(family.markers().len(), 1);
    }
}
