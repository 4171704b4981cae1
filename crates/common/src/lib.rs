//! # Deployment Common
//!
//! 这个 crate 提供了部署期组件发现流程共享的数据模型和错误类型。
//!
//! ## 核心类型
//!
//! - [`DotName`] / [`ClassInfo`] / [`AnnotationInstance`] - 注解索引中的类元数据
//! - [`ServiceName`] - 层级化的服务名称
//! - [`ComponentDescription`] - 已注册的组件描述
//! - [`ModuleDescription`] - 单个部署单元拥有的组件注册表
//! - [`ListenerAttributes`] - 监听器配置属性定义集合
//!
//! ## 设计原则
//!
//! - 同一模块内组件名称唯一，先注册者生效
//! - 依赖边是集合而非序列
//! - 配置定义是不可变的值，构造一次后按引用传递

pub mod component;
pub mod configuration;
pub mod deployment;
pub mod errors;
pub mod listener;
pub mod metadata;
pub mod module;
pub mod service;

pub use component::*;
pub use configuration::*;
pub use deployment::*;
pub use errors::*;
pub use listener::*;
pub use metadata::*;
pub use module::*;
pub use service::*;
