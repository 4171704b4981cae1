//! 内存注解索引
//!
//! 每个归档一个 [`ClassIndex`]，部署单元通过 [`CompositeIndex`] 查询所有归档

use deployment_common::{AnnotationInstance, AnnotationTarget, AnnotationValue, ClassInfo, DotName};
use discovery_abstractions::AnnotationIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// 注解出现位置描述
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TargetSpec {
    /// 类级别
    #[default]
    Class,
    /// 方法级别
    Method { name: String },
    /// 字段级别
    Field { name: String },
}

/// 注解描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSpec {
    /// 注解名称
    pub name: DotName,
    /// 出现位置
    #[serde(default)]
    pub target: TargetSpec,
    /// 元素取值
    #[serde(default)]
    pub values: BTreeMap<String, AnnotationValue>,
}

impl AnnotationSpec {
    /// 类级别注解
    pub fn on_class(name: impl Into<DotName>) -> Self {
        Self {
            name: name.into(),
            target: TargetSpec::Class,
            values: BTreeMap::new(),
        }
    }

    /// 方法级别注解
    pub fn on_method(name: impl Into<DotName>, method: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: TargetSpec::Method { name: method.into() },
            values: BTreeMap::new(),
        }
    }

    /// 字段级别注解
    pub fn on_field(name: impl Into<DotName>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: TargetSpec::Field { name: field.into() },
            values: BTreeMap::new(),
        }
    }

    /// 添加元素取值
    pub fn with_value(mut self, element: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.values.insert(element.into(), value.into());
        self
    }
}

/// 类条目：类信息及其上的注解
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// 类信息
    #[serde(flatten)]
    pub class: ClassInfo,
    /// 注解列表（类、方法、字段级别）
    #[serde(default, rename = "annotated")]
    pub annotations: Vec<AnnotationSpec>,
}

impl ClassEntry {
    /// 创建新的类条目
    pub fn new(class: ClassInfo) -> Self {
        Self {
            class,
            annotations: Vec::new(),
        }
    }

    /// 添加注解
    pub fn annotated(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// 单个归档的注解索引
#[derive(Debug, Default)]
pub struct ClassIndex {
    name: String,
    classes: HashMap<DotName, Arc<ClassInfo>>,
    annotations: HashMap<DotName, Vec<AnnotationInstance>>,
}

impl ClassIndex {
    /// 创建空索引
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 由类条目构建索引
    pub fn from_entries(name: impl Into<String>, entries: impl IntoIterator<Item = ClassEntry>) -> Self {
        let mut index = Self::new(name);
        for entry in entries {
            index.index_class(entry);
        }
        debug!(
            "索引 {} 构建完成: {} 个类, {} 种注解",
            index.name,
            index.classes.len(),
            index.annotations.len()
        );
        index
    }

    /// 索引名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 类数量
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// 添加一个类及其注解
    ///
    /// 类级别注解名称会同步到类信息上
    pub fn index_class(&mut self, entry: ClassEntry) -> Arc<ClassInfo> {
        let ClassEntry { mut class, annotations } = entry;
        for spec in &annotations {
            if spec.target == TargetSpec::Class && !class.has_annotation(&spec.name) {
                class.annotations.push(spec.name.clone());
            }
        }

        let class = Arc::new(class);
        for spec in annotations {
            let target = match spec.target {
                TargetSpec::Class => AnnotationTarget::Class(Arc::clone(&class)),
                TargetSpec::Method { name } => AnnotationTarget::Method {
                    class: class.name.clone(),
                    method: name,
                },
                TargetSpec::Field { name } => AnnotationTarget::Field {
                    class: class.name.clone(),
                    field: name,
                },
            };
            let instance = AnnotationInstance {
                name: spec.name.clone(),
                target,
                values: spec.values,
            };
            self.annotations.entry(spec.name).or_default().push(instance);
        }

        self.classes.insert(class.name.clone(), Arc::clone(&class));
        class
    }
}

impl AnnotationIndex for ClassIndex {
    fn annotations<'a>(
        &'a self,
        marker: &DotName,
    ) -> Box<dyn Iterator<Item = &'a AnnotationInstance> + 'a> {
        match self.annotations.get(marker) {
            Some(instances) => Box::new(instances.iter()),
            None => Box::new(std::iter::empty()),
        }
    }

    fn class_by_name(&self, name: &DotName) -> Option<&ClassInfo> {
        self.classes.get(name).map(Arc::as_ref)
    }
}

/// 组合索引
///
/// 部署单元及其依赖归档的索引集合，按添加顺序查询
#[derive(Debug, Default)]
pub struct CompositeIndex {
    indexes: Vec<ClassIndex>,
}

impl CompositeIndex {
    /// 创建空的组合索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加子索引
    pub fn with_index(mut self, index: ClassIndex) -> Self {
        self.indexes.push(index);
        self
    }

    /// 添加子索引
    pub fn push(&mut self, index: ClassIndex) {
        self.indexes.push(index);
    }

    /// 子索引
    pub fn indexes(&self) -> &[ClassIndex] {
        &self.indexes
    }

    /// 所有子索引中的类数量
    pub fn class_count(&self) -> usize {
        self.indexes.iter().map(ClassIndex::class_count).sum()
    }
}

impl AnnotationIndex for CompositeIndex {
    fn annotations<'a>(
        &'a self,
        marker: &DotName,
    ) -> Box<dyn Iterator<Item = &'a AnnotationInstance> + 'a> {
        let marker = marker.clone();
        Box::new(
            self.indexes
                .iter()
                .flat_map(move |index| index.annotations(&marker)),
        )
    }

    fn class_by_name(&self, name: &DotName) -> Option<&ClassInfo> {
        self.indexes.iter().find_map(|index| index.class_by_name(name))
    }
}
