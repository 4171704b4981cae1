//! # Discovery Abstractions
//!
//! 组件发现抽象层，定义发现流程各环节之间的接口。
//!
//! ## 核心接口
//!
//! - [`AnnotationIndex`] - 只读注解索引
//! - [`ComponentMatcher`] - 组件族匹配谓词
//! - [`RegistrationHandler`] - 组件族注册处理器
//! - [`ServiceNaming`] - 服务命名
//! - [`DeploymentUnitProcessor`] - 部署流水线阶段

pub mod handler;
pub mod index;
pub mod matcher;
pub mod naming;
pub mod processor;
pub mod unit;

pub use handler::*;
pub use index::*;
pub use matcher::*;
pub use naming::*;
pub use processor::*;
pub use unit::*;
