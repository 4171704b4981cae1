//! 注解索引抽象接口
//!
//! 索引由外部平台构建，发现流程只读取

use deployment_common::{AnnotationInstance, ClassInfo, DotName};
use std::collections::HashSet;
use std::fmt::Debug;

/// 注解索引 trait
///
/// 将注解（标记）名称映射到其在部署代码中的所有出现位置
pub trait AnnotationIndex: Send + Sync + Debug {
    /// 查询指定标记的全部出现位置
    ///
    /// 每次调用都重新查询，返回的迭代器不可重启
    fn annotations<'a>(
        &'a self,
        marker: &DotName,
    ) -> Box<dyn Iterator<Item = &'a AnnotationInstance> + 'a>;

    /// 按名称查找类
    fn class_by_name(&self, name: &DotName) -> Option<&ClassInfo>;

    /// 查找类上指定标记的类级别注解实例
    fn class_annotation(&self, class: &DotName, marker: &DotName) -> Option<&AnnotationInstance> {
        self.annotations(marker).find(|annotation| {
            annotation
                .target_class()
                .is_some_and(|target| &target.name == class)
        })
    }

    /// 类是否实现指定契约
    ///
    /// 沿父类链和父接口查找，索引中不存在的类型视为叶子
    fn implements(&self, class: &ClassInfo, contract: &DotName) -> bool {
        let mut visited = HashSet::new();
        let mut pending: Vec<&DotName> = class
            .interfaces
            .iter()
            .chain(class.superclass.as_ref())
            .collect();

        while let Some(name) = pending.pop() {
            if name == contract {
                return true;
            }
            if !visited.insert(name) {
                continue;
            }
            if let Some(parent) = self.class_by_name(name) {
                pending.extend(parent.interfaces.iter().chain(parent.superclass.as_ref()));
            }
        }

        false
    }
}
