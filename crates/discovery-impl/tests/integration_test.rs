//! 组件发现的集成测试

use deployment_common::{
    AnnotationValue, ClassInfo, ComponentKind, DependencyType, DeploymentError, DeploymentType,
    DotName, ModuleDescription, PayloadError, ServiceName,
};
use discovery_abstractions::{
    AnnotationIndex, DeploymentUnit, DeploymentUnitProcessor, DiscoveryOutcome, FnMatcher,
    RegistrationContext, RegistrationHandler, SkipReason,
};
use discovery_impl::{
    ejb_endpoint_family, pojo_endpoint_family, AnnotationSpec, ClassEntry, ClassIndex,
    ComponentDescriptionFactory, ComponentFamily, CompositeIndex, DependencyGraph,
    EndpointServiceNaming, FamilyTable,
};
use std::sync::Arc;

const WEB_SERVICE: &str = "javax.jws.WebService";
const CONTRACT: &str = "com.acme.Endpoint";

fn naming() -> Arc<EndpointServiceNaming> {
    Arc::new(EndpointServiceNaming::default())
}

fn contract_factory() -> ComponentDescriptionFactory {
    let table = FamilyTable::new()
        .with_family(pojo_endpoint_family(naming(), Some(DotName::new(CONTRACT))));
    ComponentDescriptionFactory::new(Arc::new(table))
}

fn endpoint(class: ClassInfo) -> ClassEntry {
    ClassEntry::new(class).annotated(AnnotationSpec::on_class(WEB_SERVICE))
}

fn war(index: ClassIndex, module: &Arc<ModuleDescription>) -> DeploymentUnit {
    DeploymentUnit::new("orders.war", DeploymentType::War)
        .with_index(Arc::new(index))
        .with_module_description(Arc::clone(module))
}

#[test]
fn test_contract_matcher_registers_only_implementing_class() {
    let module = Arc::new(ModuleDescription::new("orders"));
    let index = ClassIndex::from_entries(
        "orders.war",
        vec![
            endpoint(ClassInfo::new("A").with_interface(CONTRACT)),
            endpoint(ClassInfo::new("B")),
        ],
    );
    let unit = war(index, &module);

    let outcome = contract_factory().deploy(&unit).unwrap();
    let report = outcome.report().copied().unwrap();
    assert_eq!(report.occurrences, 2);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.handled, 1);

    // 只有 A 被注册
    assert_eq!(module.component_count(), 1);
    assert!(module.component_by_name("B").is_none());

    let component = module.component_by_name("A").unwrap();
    assert_eq!(component.class_name(), &DotName::new("A"));
    assert_eq!(component.owner(), &unit.service_name());

    let edges = component.dependencies();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].dependency_type, DependencyType::Required);
    assert_eq!(edges[0].target.simple_name(), "endpoint-service:A");
}

#[test]
fn test_repeated_passes_are_idempotent() {
    let module = Arc::new(ModuleDescription::new("orders"));
    let index = ClassIndex::from_entries(
        "orders.war",
        vec![endpoint(ClassInfo::new("A").with_interface(CONTRACT))],
    );
    let unit = war(index, &module);
    let factory = contract_factory();

    factory.deploy(&unit).unwrap();
    let first = module.component_by_name("A").unwrap();
    factory.deploy(&unit).unwrap();
    factory.deploy(&unit).unwrap();
    let second = module.component_by_name("A").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(module.component_count(), 1);
    assert_eq!(second.dependency_count(), 1);
}

#[test]
fn test_two_markers_on_same_class_register_once() {
    let module = Arc::new(ModuleDescription::new("orders"));
    let index = ClassIndex::from_entries(
        "orders.war",
        vec![endpoint(ClassInfo::new("A"))
            .annotated(AnnotationSpec::on_class("javax.xml.ws.WebServiceProvider"))],
    );
    let unit = war(index, &module);
    let factory = ComponentDescriptionFactory::new(Arc::new(
        FamilyTable::new().with_family(pojo_endpoint_family(naming(), None)),
    ));

    let report = factory.deploy(&unit).unwrap().report().copied().unwrap();
    assert_eq!(report.handled, 2);
    assert_eq!(module.component_count(), 1);
    assert_eq!(module.component_by_name("A").unwrap().dependency_count(), 1);
}

#[test]
fn test_annotation_name_overrides_simple_name() {
    let module = Arc::new(ModuleDescription::new("orders"));
    let index = ClassIndex::from_entries(
        "orders.war",
        vec![ClassEntry::new(ClassInfo::new("com.acme.OrderEndpoint"))
            .annotated(AnnotationSpec::on_class(WEB_SERVICE).with_value("name", "Orders"))],
    );
    let unit = war(index, &module);
    let factory = ComponentDescriptionFactory::new(Arc::new(
        FamilyTable::new().with_family(pojo_endpoint_family(naming(), None)),
    ));

    factory.deploy(&unit).unwrap();
    let component = module.component_by_name("Orders").unwrap();
    assert_eq!(component.kind(), &ComponentKind::PojoEndpoint);
    assert_eq!(
        component.dependencies()[0].target.simple_name(),
        "endpoint-service:com.acme.OrderEndpoint"
    );
}

#[test]
fn test_session_beans_go_to_ejb_family() {
    let module = Arc::new(ModuleDescription::new("orders"));
    let index = ClassIndex::from_entries(
        "orders.jar",
        vec![
            endpoint(ClassInfo::new("com.acme.Pojo")),
            endpoint(ClassInfo::new("com.acme.Bean")).annotated(
                AnnotationSpec::on_class("javax.ejb.Stateless").with_value("name", "OrdersBean"),
            ),
        ],
    );
    let unit = DeploymentUnit::new("orders.jar", DeploymentType::EjbJar)
        .with_index(Arc::new(index))
        .with_module_description(Arc::clone(&module));
    let table = FamilyTable::new()
        .with_family(pojo_endpoint_family(naming(), None))
        .with_family(ejb_endpoint_family(naming()));

    ComponentDescriptionFactory::new(Arc::new(table))
        .deploy(&unit)
        .unwrap();

    let names: Vec<_> = module
        .components()
        .iter()
        .map(|c| (c.name().to_string(), c.kind().clone()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("OrdersBean".to_string(), ComponentKind::EjbEndpoint),
            ("Pojo".to_string(), ComponentKind::PojoEndpoint),
        ]
    );
}

#[test]
fn test_absent_index_leaves_module_unchanged() {
    let module = Arc::new(ModuleDescription::new("orders"));
    let unit = DeploymentUnit::new("orders.war", DeploymentType::War)
        .with_module_description(Arc::clone(&module));

    let outcome = contract_factory().deploy(&unit).unwrap();
    assert_eq!(outcome, DiscoveryOutcome::skipped(SkipReason::MissingIndex));
    assert_eq!(module.component_count(), 0);
}

#[test]
fn test_malformed_payload_stops_pass_and_keeps_earlier_components() {
    let module = Arc::new(ModuleDescription::new("orders"));
    let index = CompositeIndex::new()
        .with_index(ClassIndex::from_entries("a.jar", vec![endpoint(ClassInfo::new("A"))]))
        .with_index(ClassIndex::from_entries(
            "b.jar",
            vec![ClassEntry::new(ClassInfo::new("B")).annotated(
                AnnotationSpec::on_class(WEB_SERVICE).with_value("name", AnnotationValue::Integer(3)),
            )],
        ))
        .with_index(ClassIndex::from_entries("c.jar", vec![endpoint(ClassInfo::new("C"))]));
    let unit = DeploymentUnit::new("orders.war", DeploymentType::War)
        .with_index(Arc::new(index))
        .with_module_description(Arc::clone(&module));
    let factory = ComponentDescriptionFactory::new(Arc::new(
        FamilyTable::new().with_family(pojo_endpoint_family(naming(), None)),
    ));

    let error = factory.deploy(&unit).unwrap_err();
    match &error {
        DeploymentError::MalformedAnnotation {
            unit,
            class_name,
            marker,
            source,
        } => {
            assert_eq!(unit, "orders.war");
            assert_eq!(class_name, "B");
            assert_eq!(marker, WEB_SERVICE);
            assert!(matches!(source, PayloadError::WrongType { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    // A 在失败前注册，C 未被处理
    assert!(module.component_by_name("A").is_some());
    assert!(module.component_by_name("C").is_none());
}

#[test]
fn test_custom_family_with_closure_matcher() {
    struct MarkOnly;

    impl RegistrationHandler for MarkOnly {
        fn process_annotation(
            &self,
            context: &RegistrationContext<'_>,
            class: &ClassInfo,
            _annotation: &deployment_common::AnnotationInstance,
        ) -> deployment_common::DeploymentResult<()> {
            let module = context.module_description()?;
            let component = module.register_or_get(
                class.simple_name(),
                &class.name,
                &context.unit().service_name(),
                ComponentKind::Custom("timer".to_string()),
            );
            component.add_dependency(ServiceName::of(["timer", "service"]), DependencyType::Optional);
            Ok(())
        }
    }

    let matcher = FnMatcher::new("has-superclass", |class: &ClassInfo, _: &dyn AnnotationIndex| {
        class.superclass.is_some()
    });
    let family = ComponentFamily::new(
        "timer",
        ComponentKind::Custom("timer".to_string()),
        Arc::new(matcher),
        Arc::new(MarkOnly),
    )
    .with_marker("com.acme.Timer");

    let module = Arc::new(ModuleDescription::new("jobs"));
    let index = ClassIndex::from_entries(
        "jobs.jar",
        vec![
            ClassEntry::new(ClassInfo::new("com.acme.Nightly").with_superclass("com.acme.Job"))
                .annotated(AnnotationSpec::on_class("com.acme.Timer")),
            ClassEntry::new(ClassInfo::new("com.acme.Loose"))
                .annotated(AnnotationSpec::on_class("com.acme.Timer")),
        ],
    );
    let unit = DeploymentUnit::new("jobs.jar", DeploymentType::Jar)
        .with_index(Arc::new(index))
        .with_module_description(Arc::clone(&module));

    ComponentDescriptionFactory::new(Arc::new(FamilyTable::new().with_family(family)))
        .deploy(&unit)
        .unwrap();

    let graph = DependencyGraph::from_module(&module);
    assert_eq!(graph.len(), 1);
    assert_eq!(
        graph.dependents_of(&ServiceName::of(["timer", "service"])),
        vec!["Nightly"]
    );
}
