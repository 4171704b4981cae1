//! 部署处理器抽象接口

use crate::unit::DeploymentUnit;
use deployment_common::{DeploymentResult, DeploymentType};
use serde::Serialize;
use std::fmt;

/// 跳过原因
///
/// 跳过不是错误，流水线照常继续
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SkipReason {
    /// 该类型的部署单元不会包含此类组件
    UnsupportedDeploymentType { deployment_type: DeploymentType },
    /// 部署单元没有注解索引
    MissingIndex,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDeploymentType { deployment_type } => {
                write!(f, "不处理 {deployment_type} 类型的部署单元")
            }
            Self::MissingIndex => f.write_str("没有注解索引"),
        }
    }
}

/// 一次发现过程的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// 查询到的标记出现次数
    pub occurrences: usize,
    /// 忽略的方法/字段级别出现次数
    pub ignored_targets: usize,
    /// 被匹配器拒绝的候选类次数
    pub rejected: usize,
    /// 交给处理器的次数
    pub handled: usize,
}

/// 发现结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum DiscoveryOutcome {
    /// 发现过程完成
    Completed { report: DiscoveryReport },
    /// 跳过该部署单元
    Skipped { reason: SkipReason },
}

impl DiscoveryOutcome {
    /// 创建完成结果
    pub const fn completed(report: DiscoveryReport) -> Self {
        Self::Completed { report }
    }

    /// 创建跳过结果
    pub const fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    /// 是否被跳过
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// 统计信息（仅完成时）
    pub const fn report(&self) -> Option<&DiscoveryReport> {
        match self {
            Self::Completed { report } => Some(report),
            Self::Skipped { .. } => None,
        }
    }
}

/// 部署单元处理器 trait
///
/// 部署流水线中的一个阶段。同一部署单元的各阶段由平台串行调度。
pub trait DeploymentUnitProcessor: Send + Sync {
    /// 处理器名称
    fn name(&self) -> &str;

    /// 处理部署单元
    fn deploy(&self, unit: &DeploymentUnit) -> DeploymentResult<DiscoveryOutcome>;

    /// 撤销部署单元，默认不做任何事
    fn undeploy(&self, _unit: &DeploymentUnit) {}
}
