//! 组件匹配抽象接口

use crate::index::AnnotationIndex;
use deployment_common::ClassInfo;

/// 组件匹配器 trait
///
/// 纯谓词，判断携带标记的类是否可以成为某个组件族的组件。
/// 可以查询索引检查同时出现的其他标记，但不能有副作用。
pub trait ComponentMatcher: Send + Sync {
    /// 判断类是否匹配
    fn matches(&self, class: &ClassInfo, index: &dyn AnnotationIndex) -> bool;

    /// 匹配条件描述，用于日志
    fn describe(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("matcher")
            .to_string()
    }
}

/// 基于闭包的匹配器
pub struct FnMatcher<F> {
    description: String,
    predicate: F,
}

impl<F> FnMatcher<F>
where
    F: Fn(&ClassInfo, &dyn AnnotationIndex) -> bool + Send + Sync,
{
    /// 创建新的闭包匹配器
    pub fn new(description: impl Into<String>, predicate: F) -> Self {
        Self {
            description: description.into(),
            predicate,
        }
    }
}

impl<F> ComponentMatcher for FnMatcher<F>
where
    F: Fn(&ClassInfo, &dyn AnnotationIndex) -> bool + Send + Sync,
{
    fn matches(&self, class: &ClassInfo, index: &dyn AnnotationIndex) -> bool {
        (self.predicate)(class, index)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// 接受所有类的匹配器
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl ComponentMatcher for AcceptAll {
    fn matches(&self, _class: &ClassInfo, _index: &dyn AnnotationIndex) -> bool {
        true
    }

    fn describe(&self) -> String {
        "accept-all".to_string()
    }
}
