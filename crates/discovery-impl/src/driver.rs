//! 发现驱动器
//!
//! 遍历组件族表中的标记，查询索引，用匹配器过滤候选类，
//! 再交给组件族处理器完成注册。

use crate::family::FamilyTable;
use deployment_common::{DeploymentResult, DeploymentType};
use discovery_abstractions::{
    DeploymentUnit, DeploymentUnitProcessor, DiscoveryOutcome, DiscoveryReport,
    RegistrationContext, SkipReason,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// 组件描述工厂
///
/// 部署流水线中负责注解驱动组件发现的处理器
#[derive(Debug, Clone)]
pub struct ComponentDescriptionFactory {
    families: Arc<FamilyTable>,
    skip_types: BTreeSet<DeploymentType>,
}

impl ComponentDescriptionFactory {
    /// 创建新的工厂，默认跳过 EAR 部署单元
    pub fn new(families: Arc<FamilyTable>) -> Self {
        Self {
            families,
            skip_types: BTreeSet::from([DeploymentType::Ear]),
        }
    }

    /// 设置跳过的部署单元类型
    pub fn with_skip_types(mut self, skip_types: impl IntoIterator<Item = DeploymentType>) -> Self {
        self.skip_types = skip_types.into_iter().collect();
        self
    }

    /// 组件族表
    pub fn families(&self) -> &FamilyTable {
        &self.families
    }

    /// 是否跳过指定类型
    pub fn skips(&self, deployment_type: DeploymentType) -> bool {
        self.skip_types.contains(&deployment_type)
    }

    /// 对部署单元执行一次发现
    pub fn discover(&self, unit: &DeploymentUnit) -> DeploymentResult<DiscoveryOutcome> {
        if self.skips(unit.deployment_type()) {
            debug!("跳过 {}: {} 类型不包含端点组件", unit, unit.deployment_type());
            return Ok(DiscoveryOutcome::skipped(
                SkipReason::UnsupportedDeploymentType {
                    deployment_type: unit.deployment_type(),
                },
            ));
        }

        let Some(index) = unit.index() else {
            trace!("{} 没有注解索引，跳过组件发现", unit);
            return Ok(DiscoveryOutcome::skipped(SkipReason::MissingIndex));
        };

        let context = RegistrationContext::new(unit, index);
        let mut report = DiscoveryReport::default();

        for family in self.families.iter() {
            for marker in family.markers() {
                for annotation in index.annotations(marker) {
                    report.occurrences += 1;

                    let Some(class) = annotation.target_class() else {
                        report.ignored_targets += 1;
                        continue;
                    };

                    if !family.matcher().matches(class, index) {
                        debug!("{}: 类 {} 不满足 {}", family.name(), class.name, family.matcher().describe());
                        report.rejected += 1;
                        continue;
                    }

                    debug!("{}: 处理 {} 上的 @{}", family.name(), class.name, marker.local());
                    if let Err(e) = family.handler().process_annotation(&context, class, annotation) {
                        error!("{} 组件发现失败: {}", unit, e);
                        return Err(e);
                    }
                    report.handled += 1;
                }
            }
        }

        info!(
            "{} 组件发现完成: 出现 {} 次, 忽略 {} 次, 拒绝 {} 次, 处理 {} 次",
            unit, report.occurrences, report.ignored_targets, report.rejected, report.handled
        );
        Ok(DiscoveryOutcome::completed(report))
    }
}

impl DeploymentUnitProcessor for ComponentDescriptionFactory {
    fn name(&self) -> &str {
        "component-description-factory"
    }

    fn deploy(&self, unit: &DeploymentUnit) -> DeploymentResult<DiscoveryOutcome> {
        self.discover(unit)
    }
}
