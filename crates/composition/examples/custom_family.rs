//! 自定义组件族示例
//!
//! 在内置端点组件族之外注册一个定时任务组件族，并对内存中的索引执行一次部署

use deployment_common::{
    AnnotationInstance, ClassInfo, ComponentKind, DependencyType, DeploymentResult,
    DeploymentType, ModuleDescription, ServiceName,
};
use deployment_composition::{DiscoveryBuilder, LoggingConfig};
use discovery_abstractions::{
    AnnotationIndex, DeploymentUnit, FnMatcher, RegistrationContext, RegistrationHandler,
};
use discovery_impl::{
    AnnotationSpec, ClassEntry, ClassIndex, ComponentFamily, CompositeIndex, DependencyGraph,
};
use std::sync::Arc;

const SCHEDULED: &str = "com.acme.Scheduled";

// 定时任务依赖定时服务
struct ScheduledHandler;

impl RegistrationHandler for ScheduledHandler {
    fn process_annotation(
        &self,
        context: &RegistrationContext<'_>,
        class: &ClassInfo,
        _annotation: &AnnotationInstance,
    ) -> DeploymentResult<()> {
        let component = context.module_description()?.register_or_get(
            class.simple_name(),
            &class.name,
            &context.unit().service_name(),
            ComponentKind::Custom("scheduled".to_string()),
        );
        component.add_dependency(ServiceName::of(["timer", "service"]), DependencyType::Required);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let family = ComponentFamily::new(
        "scheduled",
        ComponentKind::Custom("scheduled".to_string()),
        Arc::new(FnMatcher::new("concrete", |class: &ClassInfo, _: &dyn AnnotationIndex| {
            class.is_concrete()
        })),
        Arc::new(ScheduledHandler),
    )
    .with_marker(SCHEDULED);

    let runtime = DiscoveryBuilder::new()
        .with_family(family)
        .with_logging(LoggingConfig::development())
        .build()?;

    let index = CompositeIndex::new().with_index(ClassIndex::from_entries(
        "jobs.jar",
        vec![
            ClassEntry::new(ClassInfo::new("com.acme.NightlyReport"))
                .annotated(AnnotationSpec::on_class(SCHEDULED)),
            ClassEntry::new(ClassInfo::new("com.acme.OrderEndpoint"))
                .annotated(AnnotationSpec::on_class("javax.jws.WebService")),
        ],
    ));

    let module = Arc::new(ModuleDescription::new("jobs"));
    let unit = DeploymentUnit::new("jobs.jar", DeploymentType::Jar)
        .with_index(Arc::new(index))
        .with_module_description(Arc::clone(&module));

    runtime.pipeline().deploy(&unit)?;

    let graph = DependencyGraph::from_module(&module);
    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}
