//! 常用匹配器组合

use deployment_common::{ClassInfo, DotName};
use discovery_abstractions::{AnnotationIndex, ComponentMatcher};

/// 可实例化的类（非接口、非抽象）
#[derive(Debug, Default, Clone, Copy)]
pub struct ConcreteClass;

impl ComponentMatcher for ConcreteClass {
    fn matches(&self, class: &ClassInfo, _index: &dyn AnnotationIndex) -> bool {
        class.is_concrete()
    }

    fn describe(&self) -> String {
        "concrete-class".to_string()
    }
}

/// 实现指定契约的类
#[derive(Debug, Clone)]
pub struct ImplementsContract {
    contract: DotName,
}

impl ImplementsContract {
    /// 创建契约匹配器
    pub fn new(contract: impl Into<DotName>) -> Self {
        Self {
            contract: contract.into(),
        }
    }
}

impl ComponentMatcher for ImplementsContract {
    fn matches(&self, class: &ClassInfo, index: &dyn AnnotationIndex) -> bool {
        index.implements(class, &self.contract)
    }

    fn describe(&self) -> String {
        format!("implements({})", self.contract)
    }
}

/// 携带任一指定标记的类
#[derive(Debug, Clone)]
pub struct AnyMarker {
    markers: Vec<DotName>,
}

impl AnyMarker {
    /// 创建标记匹配器
    pub fn new<I, N>(markers: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<DotName>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// 类上携带的第一个匹配标记
    pub fn first_present<'a>(&'a self, class: &ClassInfo) -> Option<&'a DotName> {
        self.markers.iter().find(|marker| class.has_annotation(marker))
    }
}

impl ComponentMatcher for AnyMarker {
    fn matches(&self, class: &ClassInfo, _index: &dyn AnnotationIndex) -> bool {
        self.first_present(class).is_some()
    }

    fn describe(&self) -> String {
        let names: Vec<_> = self.markers.iter().map(DotName::as_str).collect();
        format!("any-of({})", names.join(", "))
    }
}

/// 不携带任何指定标记的类
#[derive(Debug, Clone)]
pub struct NoneOf(pub AnyMarker);

impl ComponentMatcher for NoneOf {
    fn matches(&self, class: &ClassInfo, index: &dyn AnnotationIndex) -> bool {
        !self.0.matches(class, index)
    }

    fn describe(&self) -> String {
        format!("not {}", self.0.describe())
    }
}

/// 所有条件都满足
#[derive(Default)]
pub struct AllOf {
    matchers: Vec<Box<dyn ComponentMatcher>>,
}

impl AllOf {
    /// 创建空组合，匹配所有类
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加条件
    pub fn and(mut self, matcher: impl ComponentMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }
}

impl ComponentMatcher for AllOf {
    fn matches(&self, class: &ClassInfo, index: &dyn AnnotationIndex) -> bool {
        self.matchers.iter().all(|matcher| matcher.matches(class, index))
    }

    fn describe(&self) -> String {
        let parts: Vec<_> = self.matchers.iter().map(|matcher| matcher.describe()).collect();
        parts.join(" && ")
    }
}
