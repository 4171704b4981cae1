//! # 组件发现具体实现
//!
//! 提供注解索引、组件族表、发现驱动器以及依赖图的具体实现。
//!
//! 数据单向流动：驱动器读取索引，经匹配器过滤，交给组件族处理器，
//! 处理器在模块描述中幂等注册组件并插入依赖边。

pub mod driver;
pub mod endpoint;
pub mod family;
pub mod graph;
pub mod index;
pub mod matchers;
pub mod naming;

pub use driver::ComponentDescriptionFactory;
pub use endpoint::{
    ejb_endpoint_family, pojo_endpoint_family, EjbEndpointMatcher, EndpointAnnotation,
    EndpointRegistrationHandler, PojoEndpointMatcher, SessionBeanAnnotation,
};
pub use family::{ComponentFamily, FamilyTable};
pub use graph::{ComponentNode, DependencyGraph, DependencyGraphBuilder};
pub use index::{AnnotationSpec, ClassEntry, ClassIndex, CompositeIndex, TargetSpec};
pub use matchers::{AllOf, AnyMarker, ConcreteClass, ImplementsContract, NoneOf};
pub use naming::{EndpointServiceNaming, DEFAULT_ENDPOINT_SERVICE_PREFIX};
