//! Web 服务端点组件族
//!
//! 普通类端点和会话 Bean 端点使用相同的标记，由匹配器区分。
//! 两者注册的组件都必需依赖对应类的端点服务。

use crate::family::ComponentFamily;
use crate::graph::DependencyGraphBuilder;
use crate::matchers::{AllOf, AnyMarker, ConcreteClass, ImplementsContract, NoneOf};
use deployment_common::{
    AnnotationInstance, ClassInfo, ComponentKind, DeploymentError, DeploymentResult, DotName,
    PayloadResult, EJB_ENDPOINT_FAMILY, POJO_ENDPOINT_FAMILY,
};
use discovery_abstractions::{
    AnnotationIndex, ComponentMatcher, RegistrationContext, RegistrationHandler, ServiceNaming,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// `@WebService`
pub const WEB_SERVICE: &str = "javax.jws.WebService";
/// `@WebServiceProvider`
pub const WEB_SERVICE_PROVIDER: &str = "javax.xml.ws.WebServiceProvider";
/// `@Stateless`
pub const STATELESS: &str = "javax.ejb.Stateless";
/// `@Singleton`
pub const SINGLETON: &str = "javax.ejb.Singleton";

/// 端点标记
pub const ENDPOINT_MARKERS: [&str; 2] = [WEB_SERVICE, WEB_SERVICE_PROVIDER];
/// 会话 Bean 标记
pub const SESSION_BEAN_MARKERS: [&str; 2] = [STATELESS, SINGLETON];

/// 端点注解内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EndpointAnnotation {
    /// 组件名称，覆盖类的简单名称
    pub name: Option<String>,
    /// `serviceName`
    pub service_name: Option<String>,
    /// `portName`
    pub port_name: Option<String>,
    /// `targetNamespace`
    pub target_namespace: Option<String>,
    /// `endpointInterface`
    pub endpoint_interface: Option<String>,
    /// `wsdlLocation`
    pub wsdl_location: Option<String>,
}

impl EndpointAnnotation {
    /// 解析端点注解
    ///
    /// 元素类型不符或 `name` 为空白时报错
    pub fn parse(annotation: &AnnotationInstance) -> PayloadResult<Self> {
        let text = |element: &str| -> PayloadResult<Option<String>> {
            Ok(annotation.string_element(element)?.map(str::to_string))
        };

        Ok(Self {
            name: annotation.non_blank_string_element("name")?.map(str::to_string),
            service_name: text("serviceName")?,
            port_name: text("portName")?,
            target_namespace: text("targetNamespace")?,
            endpoint_interface: text("endpointInterface")?,
            wsdl_location: text("wsdlLocation")?,
        })
    }
}

/// 会话 Bean 注解内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionBeanAnnotation {
    /// Bean 名称，覆盖类的简单名称
    pub name: Option<String>,
}

impl SessionBeanAnnotation {
    /// 解析会话 Bean 注解
    pub fn parse(annotation: &AnnotationInstance) -> PayloadResult<Self> {
        Ok(Self {
            name: annotation.non_blank_string_element("name")?.map(str::to_string),
        })
    }
}

/// 普通类端点匹配器
///
/// 可实例化、不是会话 Bean，并且在配置了契约时实现该契约
pub struct PojoEndpointMatcher {
    inner: AllOf,
}

impl PojoEndpointMatcher {
    /// 创建匹配器
    pub fn new(required_contract: Option<DotName>) -> Self {
        let mut inner = AllOf::new()
            .and(ConcreteClass)
            .and(NoneOf(AnyMarker::new(SESSION_BEAN_MARKERS)));
        if let Some(contract) = required_contract {
            inner = inner.and(ImplementsContract::new(contract));
        }
        Self { inner }
    }
}

impl ComponentMatcher for PojoEndpointMatcher {
    fn matches(&self, class: &ClassInfo, index: &dyn AnnotationIndex) -> bool {
        self.inner.matches(class, index)
    }

    fn describe(&self) -> String {
        format!("pojo-endpoint({})", self.inner.describe())
    }
}

/// 会话 Bean 端点匹配器
#[derive(Debug, Clone)]
pub struct EjbEndpointMatcher {
    session_beans: AnyMarker,
}

impl EjbEndpointMatcher {
    /// 创建匹配器
    pub fn new() -> Self {
        Self {
            session_beans: AnyMarker::new(SESSION_BEAN_MARKERS),
        }
    }

    /// 类上的会话 Bean 标记
    pub fn session_bean_marker<'a>(&'a self, class: &ClassInfo) -> Option<&'a DotName> {
        self.session_beans.first_present(class)
    }
}

impl Default for EjbEndpointMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentMatcher for EjbEndpointMatcher {
    fn matches(&self, class: &ClassInfo, index: &dyn AnnotationIndex) -> bool {
        self.session_beans.matches(class, index)
    }

    fn describe(&self) -> String {
        format!("ejb-endpoint({})", self.session_beans.describe())
    }
}

/// 端点注册处理器
pub struct EndpointRegistrationHandler {
    kind: ComponentKind,
    graph: DependencyGraphBuilder,
    session_beans: Option<EjbEndpointMatcher>,
}

impl EndpointRegistrationHandler {
    /// 普通类端点处理器
    pub fn pojo(graph: DependencyGraphBuilder) -> Self {
        Self {
            kind: ComponentKind::PojoEndpoint,
            graph,
            session_beans: None,
        }
    }

    /// 会话 Bean 端点处理器
    pub fn ejb(graph: DependencyGraphBuilder) -> Self {
        Self {
            kind: ComponentKind::EjbEndpoint,
            graph,
            session_beans: Some(EjbEndpointMatcher::new()),
        }
    }

    /// 组件类别
    pub const fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    fn component_name(
        &self,
        context: &RegistrationContext<'_>,
        class: &ClassInfo,
        endpoint: EndpointAnnotation,
    ) -> DeploymentResult<String> {
        let Some(session_beans) = &self.session_beans else {
            return Ok(endpoint.name.unwrap_or_else(|| class.simple_name().to_string()));
        };

        let bean_name = match session_beans.session_bean_marker(class) {
            Some(marker) => match context.index().class_annotation(&class.name, marker) {
                Some(annotation) => SessionBeanAnnotation::parse(annotation)
                    .map_err(|source| {
                        DeploymentError::malformed(
                            context.unit().name(),
                            class.name.as_str(),
                            marker.as_str(),
                            source,
                        )
                    })?
                    .name,
                None => None,
            },
            None => None,
        };
        Ok(bean_name.unwrap_or_else(|| class.simple_name().to_string()))
    }
}

impl RegistrationHandler for EndpointRegistrationHandler {
    fn process_annotation(
        &self,
        context: &RegistrationContext<'_>,
        class: &ClassInfo,
        annotation: &AnnotationInstance,
    ) -> DeploymentResult<()> {
        let unit = context.unit();
        let endpoint = EndpointAnnotation::parse(annotation).map_err(|source| {
            DeploymentError::malformed(unit.name(), class.name.as_str(), annotation.name.as_str(), source)
        })?;
        let name = self.component_name(context, class, endpoint)?;

        let module = context.module_description()?;
        let component =
            module.register_or_get(&name, &class.name, &unit.service_name(), self.kind.clone());

        if component.class_name() == &class.name {
            self.graph.require_endpoint(unit, &component, &class.name);
        } else {
            debug!("组件 {} 属于 {}，不为 {} 添加依赖", name, component.class_name(), class.name);
        }
        Ok(())
    }
}

/// 普通类端点组件族
pub fn pojo_endpoint_family(
    naming: Arc<dyn ServiceNaming>,
    required_contract: Option<DotName>,
) -> ComponentFamily {
    let handler = EndpointRegistrationHandler::pojo(DependencyGraphBuilder::new(naming));
    ENDPOINT_MARKERS.iter().fold(
        ComponentFamily::new(
            POJO_ENDPOINT_FAMILY,
            ComponentKind::PojoEndpoint,
            Arc::new(PojoEndpointMatcher::new(required_contract)),
            Arc::new(handler),
        ),
        |family, marker| family.with_marker(*marker),
    )
}

/// 会话 Bean 端点组件族
pub fn ejb_endpoint_family(naming: Arc<dyn ServiceNaming>) -> ComponentFamily {
    let handler = EndpointRegistrationHandler::ejb(DependencyGraphBuilder::new(naming));
    ENDPOINT_MARKERS.iter().fold(
        ComponentFamily::new(
            EJB_ENDPOINT_FAMILY,
            ComponentKind::EjbEndpoint,
            Arc::new(EjbEndpointMatcher::new()),
            Arc::new(handler),
        ),
        |family, marker| family.with_marker(*marker),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use deployment_common::{AnnotationTarget, AnnotationValue, PayloadError};

    fn annotation() -> AnnotationInstance {
        AnnotationInstance::new(
            WEB_SERVICE,
            AnnotationTarget::Class(Arc::new(ClassInfo::new("com.acme.A"))),
        )
    }

    #[test]
    fn parse_reads_optional_elements() {
        let parsed = EndpointAnnotation::parse(
            &annotation()
                .with_value("name", "Orders")
                .with_value("serviceName", "OrderService")
                .with_value("wsdlLocation", "META-INF/orders.wsdl"),
        )
        .expect("well formed");

        assert_eq!(parsed.name.as_deref(), Some("Orders"));
        assert_eq!(parsed.service_name.as_deref(), Some("OrderService"));
        assert_eq!(parsed.wsdl_location.as_deref(), Some("META-INF/orders.wsdl"));
        assert!(parsed.port_name.is_none());
    }

    #[test]
    fn parse_rejects_wrong_type() {
        let error = EndpointAnnotation::parse(&annotation().with_value("portName", 7_i64))
            .expect_err("integer port name");
        assert!(matches!(error, PayloadError::WrongType { .. }));
    }

    #[test]
    fn parse_rejects_blank_name() {
        let error = EndpointAnnotation::parse(
            &annotation().with_value("name", AnnotationValue::String("  ".to_string())),
        )
        .expect_err("blank name");
        assert!(matches!(error, PayloadError::BlankValue { .. }));
    }

    #[test]
    fn pojo_matcher_excludes_session_beans_and_abstract_classes() {
        let index = crate::index::ClassIndex::new("empty");
        let matcher = PojoEndpointMatcher::new(None);

        assert!(matcher.matches(&ClassInfo::new("A"), &index));
        assert!(!matcher.matches(&ClassInfo::new("B").as_abstract(), &index));
        assert!(!matcher.matches(&ClassInfo::new("C").with_annotation(STATELESS), &index));
    }

    #[test]
    fn ejb_matcher_requires_session_bean_marker() {
        let index = crate::index::ClassIndex::new("empty");
        let matcher = EjbEndpointMatcher::new();

        assert!(matcher.matches(&ClassInfo::new("A").with_annotation(SINGLETON), &index));
        assert!(!matcher.matches(&ClassInfo::new("B"), &index));
    }

    #[test]
    fn families_share_endpoint_markers() {
        let naming: Arc<dyn ServiceNaming> = Arc::new(crate::naming::EndpointServiceNaming::default());
        let pojo = pojo_endpoint_family(Arc::clone(&naming), None);
        let ejb = ejb_endpoint_family(naming);

        assert_eq!(pojo.markers(), ejb.markers());
        assert_eq!(pojo.name(), POJO_ENDPOINT_FAMILY);
        assert_eq!(ejb.kind(), &ComponentKind::EjbEndpoint);
    }
}
