//! 部署单元类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 部署单元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentType {
    /// 企业应用归档，只包含子部署
    Ear,
    /// Web 应用归档
    War,
    /// EJB 模块
    EjbJar,
    /// 普通库或应用归档
    Jar,
}

impl DeploymentType {
    /// 根据归档名称后缀推断类型
    pub fn from_archive_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".ear") {
            Self::Ear
        } else if lower.ends_with(".war") {
            Self::War
        } else {
            Self::Jar
        }
    }

    /// 类型名称
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ear => "ear",
            Self::War => "war",
            Self::EjbJar => "ejb-jar",
            Self::Jar => "jar",
        }
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ear" => Ok(Self::Ear),
            "war" => Ok(Self::War),
            "ejb-jar" | "ejb" => Ok(Self::EjbJar),
            "jar" => Ok(Self::Jar),
            other => Err(format!("未知的部署类型: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_type_from_archive_name() {
        assert_eq!(DeploymentType::from_archive_name("shop.EAR"), DeploymentType::Ear);
        assert_eq!(DeploymentType::from_archive_name("orders.war"), DeploymentType::War);
        assert_eq!(DeploymentType::from_archive_name("lib.jar"), DeploymentType::Jar);
    }

    #[test]
    fn parses_names() {
        assert_eq!("ejb".parse::<DeploymentType>(), Ok(DeploymentType::EjbJar));
        assert!("zip".parse::<DeploymentType>().is_err());
    }
}
