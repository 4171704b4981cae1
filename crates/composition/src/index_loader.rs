//! 注解索引文档加载
//!
//! 索引文档是 JSON 格式，每个归档一个子索引:
//!
//! ```json
//! {
//!   "archives": [
//!     {
//!       "name": "orders.war",
//!       "classes": [
//!         {
//!           "name": "com.acme.OrderEndpoint",
//!           "interfaces": ["com.acme.Endpoint"],
//!           "annotated": [
//!             { "name": "javax.jws.WebService",
//!               "values": { "name": { "type": "string", "value": "Orders" } } }
//!           ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use deployment_common::{CompositionError, CompositionResult};
use discovery_impl::{ClassEntry, ClassIndex, CompositeIndex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// 单个归档的索引内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDocument {
    /// 归档名称
    pub name: String,
    /// 归档中的类
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

/// 索引文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// 归档列表
    #[serde(default)]
    pub archives: Vec<ArchiveDocument>,
}

impl IndexDocument {
    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// 添加归档
    pub fn with_archive(mut self, name: impl Into<String>, classes: Vec<ClassEntry>) -> Self {
        self.archives.push(ArchiveDocument {
            name: name.into(),
            classes,
        });
        self
    }

    /// 将所有归档加入组合索引
    pub fn append_to(self, composite: &mut CompositeIndex) {
        for archive in self.archives {
            composite.push(ClassIndex::from_entries(archive.name, archive.classes));
        }
    }

    /// 转换为组合索引
    pub fn into_index(self) -> CompositeIndex {
        let mut composite = CompositeIndex::new();
        self.append_to(&mut composite);
        composite
    }
}

/// 读取并解析一个索引文档
pub async fn load_document(path: impl AsRef<Path>) -> CompositionResult<IndexDocument> {
    let path = path.as_ref();
    let index_failed = |message: String| CompositionError::IndexLoadFailed {
        path: path.display().to_string(),
        message,
    };

    debug!("读取索引文档: {}", path.display());
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| index_failed(e.to_string()))?;
    IndexDocument::from_json(&text).map_err(|e| index_failed(e.to_string()))
}

/// 读取多个索引文档，按顺序合并为一个组合索引
pub async fn load_index<P: AsRef<Path>>(paths: &[P]) -> CompositionResult<CompositeIndex> {
    let mut composite = CompositeIndex::new();
    for path in paths {
        load_document(path).await?.append_to(&mut composite);
    }
    info!(
        "注解索引加载完成: {} 个归档, {} 个类",
        composite.indexes().len(),
        composite.class_count()
    );
    Ok(composite)
}
