//! 监听器配置属性定义
//!
//! 套接字绑定、工作线程池、缓冲池以及 HTTP 协议解析限制等属性的声明式定义。
//! 组件激活后由下游服务读取，发现流程本身不读写这些属性。

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// 属性值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// 字符串
    String,
    /// 布尔值
    Boolean,
    /// 32 位整数
    Int,
    /// 64 位整数
    Long,
}

/// 属性修改后需要重启的范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartFlag {
    /// 不需要重启
    None,
    /// 重启该资源的服务
    ResourceServices,
    /// 重启所有服务
    AllServices,
}

/// 计量单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    /// 字节
    Bytes,
    /// 毫秒
    Milliseconds,
}

/// 属性定义
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDefinition {
    /// 属性名称
    pub name: &'static str,
    /// 值类型
    pub value_type: AttributeType,
    /// 是否允许为空
    pub nullable: bool,
    /// 默认值
    pub default_value: Option<Value>,
    /// 是否允许表达式
    pub allow_expression: bool,
    /// 重启范围
    pub restart: RestartFlag,
    /// 字符串最小长度
    pub min_length: Option<usize>,
    /// 计量单位
    pub unit: Option<MeasurementUnit>,
}

impl AttributeDefinition {
    /// 创建新的属性定义，默认可为空、无默认值
    pub const fn new(name: &'static str, value_type: AttributeType) -> Self {
        Self {
            name,
            value_type,
            nullable: true,
            default_value: None,
            allow_expression: false,
            restart: RestartFlag::None,
            min_length: None,
            unit: None,
        }
    }

    /// 设置为必需
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// 设置默认值
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// 允许表达式
    pub fn allow_expression(mut self) -> Self {
        self.allow_expression = true;
        self
    }

    /// 设置重启范围
    pub fn with_restart(mut self, restart: RestartFlag) -> Self {
        self.restart = restart;
        self
    }

    /// 设置字符串最小长度
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// 设置计量单位
    pub fn with_unit(mut self, unit: MeasurementUnit) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// 监听器属性集合
///
/// 进程启动时构造一次，之后按引用传递给需要的组件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListenerAttributes {
    /// 核心属性
    pub core: Vec<AttributeDefinition>,
    /// 协议选项
    pub listener_options: Vec<AttributeDefinition>,
    /// 套接字选项
    pub socket_options: Vec<AttributeDefinition>,
}

impl ListenerAttributes {
    /// 标准监听器属性集合
    pub fn standard() -> Self {
        use AttributeType as T;

        let core = vec![
            AttributeDefinition::new("socket-binding", T::String)
                .required()
                .with_restart(RestartFlag::AllServices)
                .with_min_length(1),
            AttributeDefinition::new("worker", T::String)
                .with_restart(RestartFlag::AllServices)
                .with_min_length(1)
                .with_default(json!("default")),
            AttributeDefinition::new("buffer-pool", T::String)
                .with_restart(RestartFlag::AllServices)
                .with_min_length(1)
                .with_default(json!("default")),
            AttributeDefinition::new("enabled", T::Boolean)
                .with_restart(RestartFlag::AllServices)
                .with_default(json!(true))
                .allow_expression(),
            AttributeDefinition::new("redirect-socket", T::String)
                .with_restart(RestartFlag::ResourceServices)
                .with_default(json!("https")),
            AttributeDefinition::new("resolve-peer-address", T::Boolean)
                .with_restart(RestartFlag::ResourceServices)
                .with_default(json!(false))
                .allow_expression(),
        ];

        let option = |name, value_type, default: Option<Value>| {
            let definition = AttributeDefinition::new(name, value_type).allow_expression();
            match default {
                Some(value) => definition.with_default(value),
                None => definition,
            }
        };

        let listener_options = vec![
            option("max-header-size", T::Int, Some(json!(1_048_576))).with_unit(MeasurementUnit::Bytes),
            option("max-post-size", T::Long, Some(json!(10_485_760_i64))).with_unit(MeasurementUnit::Bytes),
            option("buffer-pipelined-data", T::Boolean, Some(json!(true))),
            option("max-parameters", T::Int, Some(json!(1000))),
            option("max-headers", T::Int, Some(json!(200))),
            option("max-cookies", T::Int, Some(json!(200))),
            option("allow-encoded-slash", T::Boolean, Some(json!(false))),
            option("decode-url", T::Boolean, Some(json!(true))),
            option("url-charset", T::String, Some(json!("UTF-8"))),
            option("always-set-keep-alive", T::Boolean, Some(json!(true))),
            option("max-buffered-request-size", T::Int, Some(json!(16384))).with_unit(MeasurementUnit::Bytes),
            option("record-request-start-time", T::Boolean, Some(json!(false))),
            option("allow-equals-in-cookie-value", T::Boolean, Some(json!(false))),
            option("no-request-timeout", T::Int, Some(json!(-1))).with_unit(MeasurementUnit::Milliseconds),
            option("request-parse-timeout", T::Int, Some(json!(-1))).with_unit(MeasurementUnit::Milliseconds),
        ];

        let socket_options = vec![
            option("tcp-backlog", T::Int, None),
            option("receive-buffer", T::Int, None).with_unit(MeasurementUnit::Bytes),
            option("send-buffer", T::Int, None).with_unit(MeasurementUnit::Bytes),
            option("tcp-keep-alive", T::Boolean, None),
            option("read-timeout", T::Int, None).with_unit(MeasurementUnit::Milliseconds),
            option("write-timeout", T::Int, None).with_unit(MeasurementUnit::Milliseconds),
        ];

        Self {
            core,
            listener_options,
            socket_options,
        }
    }

    /// 按声明顺序遍历所有属性
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.core
            .iter()
            .chain(&self.listener_options)
            .chain(&self.socket_options)
    }

    /// 按名称查找属性
    pub fn find(&self, name: &str) -> Option<&AttributeDefinition> {
        self.iter().find(|definition| definition.name == name)
    }

    /// 所有带默认值的属性
    pub fn defaults(&self) -> BTreeMap<&'static str, Value> {
        self.iter()
            .filter_map(|definition| {
                definition
                    .default_value
                    .clone()
                    .map(|value| (definition.name, value))
            })
            .collect()
    }

    /// 属性总数
    pub fn len(&self) -> usize {
        self.core.len() + self.listener_options.len() + self.socket_options.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_is_complete() {
        let attributes = ListenerAttributes::standard();
        assert_eq!(attributes.core.len(), 6);
        assert_eq!(attributes.listener_options.len(), 15);
        assert_eq!(attributes.socket_options.len(), 6);
        assert_eq!(attributes.len(), 27);
    }

    #[test]
    fn socket_binding_is_required() {
        let attributes = ListenerAttributes::standard();
        let binding = attributes.find("socket-binding").expect("socket-binding defined");
        assert!(!binding.nullable);
        assert_eq!(binding.restart, RestartFlag::AllServices);
        assert!(binding.default_value.is_none());
    }

    #[test]
    fn defaults_match_protocol_limits() {
        let defaults = ListenerAttributes::standard().defaults();
        assert_eq!(defaults.get("max-post-size"), Some(&json!(10_485_760_i64)));
        assert_eq!(defaults.get("worker"), Some(&json!("default")));
        assert_eq!(defaults.get("no-request-timeout"), Some(&json!(-1)));
        assert!(!defaults.contains_key("tcp-backlog"));
    }
}
