//! 部署流水线
//!
//! 按顺序对部署单元执行各处理器。某个处理器失败时，已执行的处理器按逆序撤销，
//! 模块描述被标记为已撤销部署。

use deployment_common::{CompositionResult, DeploymentError};
use discovery_abstractions::{DeploymentUnit, DeploymentUnitProcessor, DiscoveryOutcome};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 单个阶段的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    /// 处理器名称
    pub processor: String,
    /// 处理结果
    pub outcome: DiscoveryOutcome,
}

/// 一次流水线执行的结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// 部署单元名称
    pub unit: String,
    /// 各阶段结果，按执行顺序
    pub stages: Vec<StageOutcome>,
}

impl PipelineReport {
    /// 按处理器名称查找阶段结果
    pub fn stage(&self, processor: &str) -> Option<&DiscoveryOutcome> {
        self.stages
            .iter()
            .find(|stage| stage.processor == processor)
            .map(|stage| &stage.outcome)
    }
}

/// 部署流水线
#[derive(Clone, Default)]
pub struct DeploymentPipeline {
    processors: Vec<Arc<dyn DeploymentUnitProcessor>>,
}

impl DeploymentPipeline {
    /// 创建空流水线
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加处理器
    pub fn with_processor(mut self, processor: Arc<dyn DeploymentUnitProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// 处理器名称，按执行顺序
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// 部署单元
    pub fn deploy(&self, unit: &DeploymentUnit) -> CompositionResult<PipelineReport> {
        info!("开始部署 {}", unit);
        let mut report = PipelineReport {
            unit: unit.name().to_string(),
            stages: Vec::with_capacity(self.processors.len()),
        };

        for (position, processor) in self.processors.iter().enumerate() {
            debug!("{}: 执行 {}", unit, processor.name());
            match processor.deploy(unit) {
                Ok(outcome) => report.stages.push(StageOutcome {
                    processor: processor.name().to_string(),
                    outcome,
                }),
                Err(e) => {
                    warn!("{} 在 {} 阶段失败，回滚已执行的阶段", unit, processor.name());
                    self.rollback(unit, position);
                    return Err(e.into());
                }
            }
        }

        info!("{} 部署完成，共 {} 个阶段", unit, report.stages.len());
        Ok(report)
    }

    /// 撤销部署单元
    pub fn undeploy(&self, unit: &DeploymentUnit) {
        self.rollback(unit, self.processors.len());
    }

    /// 逆序撤销前 `completed` 个处理器
    fn rollback(&self, unit: &DeploymentUnit, completed: usize) {
        for processor in self.processors[..completed].iter().rev() {
            debug!("{}: 撤销 {}", unit, processor.name());
            processor.undeploy(unit);
        }
        if let Some(module) = unit.module_description() {
            module.mark_undeployed();
        }
    }
}

impl std::fmt::Debug for DeploymentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentPipeline")
            .field("processors", &self.processor_names())
            .finish()
    }
}

/// 失败信息中的部署单元和类
pub fn failure_summary(error: &DeploymentError) -> String {
    match error.class_name() {
        Some(class_name) => format!("部署单元 {} 中的类 {}: {}", error.unit(), class_name, error),
        None => format!("部署单元 {}: {}", error.unit(), error),
    }
}
