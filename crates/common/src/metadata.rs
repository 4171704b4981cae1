//! 类元数据定义
//!
//! 描述注解索引中出现的类、注解实例以及注解元素的取值

use crate::errors::{PayloadError, PayloadResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// 点分隔的全限定名称
///
/// 用于标识类和注解（标记）类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DotName(String);

impl DotName {
    /// 创建新的名称
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 完整名称
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 最后一段名称（简单类名）
    pub fn local(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// 包名部分
    pub fn package(&self) -> Option<&str> {
        self.0.rfind('.').map(|idx| &self.0[..idx])
    }
}

impl fmt::Display for DotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DotName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DotName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// 类信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// 类名
    pub name: DotName,
    /// 父类
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<DotName>,
    /// 直接实现的接口
    #[serde(default)]
    pub interfaces: Vec<DotName>,
    /// 是否为接口
    #[serde(default)]
    pub is_interface: bool,
    /// 是否为抽象类
    #[serde(default)]
    pub is_abstract: bool,
    /// 类级别注解名称
    #[serde(default)]
    pub annotations: Vec<DotName>,
}

impl ClassInfo {
    /// 创建新的类信息
    pub fn new(name: impl Into<DotName>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            is_interface: false,
            is_abstract: false,
            annotations: Vec::new(),
        }
    }

    /// 设置父类
    pub fn with_superclass(mut self, superclass: impl Into<DotName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// 添加实现的接口
    pub fn with_interface(mut self, interface: impl Into<DotName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 标记为接口
    pub fn as_interface(mut self) -> Self {
        self.is_interface = true;
        self
    }

    /// 标记为抽象类
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// 添加类级别注解
    pub fn with_annotation(mut self, annotation: impl Into<DotName>) -> Self {
        let annotation = annotation.into();
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
        self
    }

    /// 是否可实例化
    pub fn is_concrete(&self) -> bool {
        !self.is_interface && !self.is_abstract
    }

    /// 是否直接携带指定注解
    pub fn has_annotation(&self, annotation: &DotName) -> bool {
        self.annotations.contains(annotation)
    }

    /// 简单类名
    pub fn simple_name(&self) -> &str {
        self.name.local()
    }
}

/// 注解元素取值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    /// 字符串
    String(String),
    /// 整数
    Integer(i64),
    /// 布尔值
    Boolean(bool),
    /// 类字面量
    Class(DotName),
    /// 数组
    Array(Vec<AnnotationValue>),
    /// 嵌套注解
    Nested(BTreeMap<String, AnnotationValue>),
}

impl AnnotationValue {
    /// 取值类型名称，用于错误信息
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Class(_) => "class",
            Self::Array(_) => "array",
            Self::Nested(_) => "nested",
        }
    }

    /// 字符串取值
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// 注解出现的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationTarget {
    /// 类级别
    Class(Arc<ClassInfo>),
    /// 方法级别
    Method { class: DotName, method: String },
    /// 字段级别
    Field { class: DotName, field: String },
}

impl AnnotationTarget {
    /// 所属类名
    pub fn declaring_class(&self) -> &DotName {
        match self {
            Self::Class(class) => &class.name,
            Self::Method { class, .. } | Self::Field { class, .. } => class,
        }
    }
}

/// 注解实例
///
/// 标记名称、出现位置和元素取值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationInstance {
    /// 注解名称
    pub name: DotName,
    /// 出现位置
    pub target: AnnotationTarget,
    /// 元素取值
    pub values: BTreeMap<String, AnnotationValue>,
}

impl AnnotationInstance {
    /// 创建新的注解实例
    pub fn new(name: impl Into<DotName>, target: AnnotationTarget) -> Self {
        Self {
            name: name.into(),
            target,
            values: BTreeMap::new(),
        }
    }

    /// 添加元素取值
    pub fn with_value(mut self, element: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.values.insert(element.into(), value.into());
        self
    }

    /// 获取元素取值
    pub fn value(&self, element: &str) -> Option<&AnnotationValue> {
        self.values.get(element)
    }

    /// 类级别注解的目标类
    pub fn target_class(&self) -> Option<&ClassInfo> {
        match &self.target {
            AnnotationTarget::Class(class) => Some(class),
            _ => None,
        }
    }

    /// 读取可选的字符串元素
    ///
    /// 元素不存在时返回 `None`，类型不符时报错
    pub fn string_element(&self, element: &str) -> PayloadResult<Option<&str>> {
        match self.values.get(element) {
            None => Ok(None),
            Some(AnnotationValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(PayloadError::wrong_type(element, "string", other.kind())),
        }
    }

    /// 读取可选的非空字符串元素
    pub fn non_blank_string_element(&self, element: &str) -> PayloadResult<Option<&str>> {
        match self.string_element(element)? {
            Some(value) if value.trim().is_empty() => Err(PayloadError::blank_value(element)),
            other => Ok(other),
        }
    }
}
