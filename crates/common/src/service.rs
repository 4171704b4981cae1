//! 服务名称和依赖类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 层级化的服务名称
///
/// 由若干段组成，显示时以 `.` 连接
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct ServiceName {
    segments: Vec<String>,
}

impl ServiceName {
    /// 由多段名称创建服务名称
    pub fn of<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// 追加一段名称，返回子服务名称
    pub fn append(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// 父服务名称
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// 最后一段名称
    pub fn simple_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// 所有名称段
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// 是否以指定服务名称为前缀
    pub fn is_child_of(&self, parent: &Self) -> bool {
        self.segments.len() > parent.segments.len() && self.segments.starts_with(&parent.segments)
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<ServiceName> for String {
    fn from(name: ServiceName) -> Self {
        name.to_string()
    }
}

/// 依赖强度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// 必需依赖，目标服务不可用时组件不能启动
    Required,
    /// 可选依赖
    Optional,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("REQUIRED"),
            Self::Optional => f.write_str("OPTIONAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_hierarchy() {
        let unit = ServiceName::of(["deployment", "unit", "orders.war"]);
        let endpoint = unit.append("endpoint-service:A");

        assert_eq!(endpoint.to_string(), "deployment.unit.orders.war.endpoint-service:A");
        assert_eq!(endpoint.simple_name(), "endpoint-service:A");
        assert_eq!(endpoint.parent(), Some(unit.clone()));
        assert!(endpoint.is_child_of(&unit));
        assert!(!unit.is_child_of(&endpoint));
    }

    #[test]
    fn single_segment_has_no_parent() {
        assert!(ServiceName::of(["root"]).parent().is_none());
    }
}
