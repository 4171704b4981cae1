//! 错误类型定义

use thiserror::Error;

/// 部署处理错误类型
///
/// 任何一个变体都会让当前部署单元的发现过程失败
#[derive(Error, Debug)]
pub enum DeploymentError {
    #[error("部署单元 {unit} 中类 {class_name} 的注解 {marker} 无效: {source}")]
    MalformedAnnotation {
        unit: String,
        class_name: String,
        marker: String,
        #[source]
        source: PayloadError,
    },

    #[error("部署单元 {unit} 缺少必需的附件: {attachment}")]
    MissingAttachment { unit: String, attachment: String },

    #[error("部署单元 {unit} 处理失败: {message}")]
    ProcessingFailed { unit: String, message: String },
}

impl DeploymentError {
    /// 创建注解内容无效错误
    pub fn malformed(
        unit: impl Into<String>,
        class_name: impl Into<String>,
        marker: impl Into<String>,
        source: PayloadError,
    ) -> Self {
        Self::MalformedAnnotation {
            unit: unit.into(),
            class_name: class_name.into(),
            marker: marker.into(),
            source,
        }
    }

    /// 创建缺少附件错误
    pub fn missing_attachment(unit: impl Into<String>, attachment: impl Into<String>) -> Self {
        Self::MissingAttachment {
            unit: unit.into(),
            attachment: attachment.into(),
        }
    }

    /// 出错的部署单元名称
    pub fn unit(&self) -> &str {
        match self {
            Self::MalformedAnnotation { unit, .. }
            | Self::MissingAttachment { unit, .. }
            | Self::ProcessingFailed { unit, .. } => unit,
        }
    }

    /// 出错的类名（如果有）
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::MalformedAnnotation { class_name, .. } => Some(class_name),
            _ => None,
        }
    }
}

/// 注解内容解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("缺少必需元素: {element}")]
    MissingElement { element: String },

    #[error("元素 {element} 类型错误: 期望 {expected}, 实际 {actual}")]
    WrongType {
        element: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("元素 {element} 不能为空")]
    BlankValue { element: String },
}

impl PayloadError {
    /// 创建缺少元素错误
    pub fn missing_element(element: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
        }
    }

    /// 创建类型错误
    pub fn wrong_type(element: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::WrongType {
            element: element.into(),
            expected,
            actual,
        }
    }

    /// 创建空值错误
    pub fn blank_value(element: impl Into<String>) -> Self {
        Self::BlankValue {
            element: element.into(),
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// 组合层错误类型
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("部署错误: {source}")]
    Deployment {
        #[from]
        source: DeploymentError,
    },

    #[error("索引加载失败: {path}, 原因: {message}")]
    IndexLoadFailed { path: String, message: String },

    #[error("启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type DeploymentResult<T> = Result<T, DeploymentError>;
pub type PayloadResult<T> = Result<T, PayloadError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type CompositionResult<T> = Result<T, CompositionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_error_names_unit_and_class() {
        let error = DeploymentError::malformed(
            "orders.war",
            "com.acme.OrderEndpoint",
            "javax.jws.WebService",
            PayloadError::blank_value("name"),
        );

        let message = error.to_string();
        assert!(message.contains("orders.war"));
        assert!(message.contains("com.acme.OrderEndpoint"));
        assert_eq!(error.unit(), "orders.war");
        assert_eq!(error.class_name(), Some("com.acme.OrderEndpoint"));
    }

    #[test]
    fn missing_attachment_has_no_class() {
        let error = DeploymentError::missing_attachment("app.jar", "module-description");
        assert_eq!(error.unit(), "app.jar");
        assert!(error.class_name().is_none());
    }
}
