//! 配置模块，负责加载字段映射、运算符映射和引用类型的JSON配置文件

use crate::mapping::FieldMapper;
use crate::reference::ReferenceRegistry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置文件不存在: {}", .0.display())]
    Missing(PathBuf),

    #[error("无法读取配置文件 {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析JSON配置文件 {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 单个对象类型的字段映射, 例如：`{"fields": {"value": ["source_ipaddr"]}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMapping {
    pub fields: HashMap<String, Vec<String>>,
}

/// 字段与运算符映射配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// 对象类型 -> 字段 -> 数据库列
    pub fields: HashMap<String, ObjectMapping>,
    /// 逻辑运算符 -> 数据库运算符
    pub operators: HashMap<String, String>,
}

/// 读取并解析一个JSON文件
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    // 检查文件是否存在
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl MappingConfig {
    /// 从字段映射文件和运算符映射文件加载配置
    pub fn from_json_files<P: AsRef<Path>, Q: AsRef<Path>>(fields_path: P, operators_path: Q) -> Result<Self, ConfigError> {
        let fields = read_json(fields_path.as_ref())?;
        let operators = read_json(operators_path.as_ref())?;
        Ok(Self { fields, operators })
    }

    /// 示例事件表的默认映射（用于测试或fallback）
    pub fn sample() -> Self {
        let mut fields: HashMap<String, ObjectMapping> = HashMap::new();
        let mut insert = |object: &str, field: &str, columns: &[&str]| {
            fields
                .entry(object.to_string())
                .or_insert_with(ObjectMapping::default)
                .fields
                .insert(field.to_string(), columns.iter().map(|c| c.to_string()).collect());
        };

        insert("ipv4-addr", "value", &["source_ipaddr", "dest_ipaddr"]);
        insert("ipv6-addr", "value", &["source_ipaddr"]);
        insert("network-traffic", "src_ref.value", &["source_ipaddr"]);
        insert("network-traffic", "dst_ref.value", &["dest_ipaddr"]);
        insert("network-traffic", "src_port", &["source_port"]);
        insert("network-traffic", "dst_port", &["dest_port"]);
        insert("network-traffic", "protocols[*]", &["protocol"]);
        insert("network-traffic", "start", &["entry_time"]);
        insert("network-traffic", "end", &["entry_time"]);
        insert("file", "name", &["filename"]);
        insert("file", "hashes.'SHA-256'", &["sha256hash"]);
        insert("file", "hashes.MD5", &["md5hash"]);
        insert("file", "created", &["file_created_time"]);
        insert("user-account", "user_id", &["username"]);
        insert("process", "name", &["process_name", "parent_process_name"]);
        insert("process", "pid", &["process_id"]);

        let operators = [
            ("ComparisonExpressionOperators.And", "AND"),
            ("ComparisonExpressionOperators.Or", "OR"),
            ("ComparisonComparators.GreaterThan", ">"),
            ("ComparisonComparators.GreaterThanOrEqual", ">="),
            ("ComparisonComparators.LessThan", "<"),
            ("ComparisonComparators.LessThanOrEqual", "<="),
            ("ComparisonComparators.Equal", "="),
            ("ComparisonComparators.NotEqual", "!="),
            ("ComparisonComparators.Like", "LIKE"),
            ("ComparisonComparators.In", "IN"),
            ("ComparisonComparators.Matches", "~"),
            ("ObservationOperators.And", "AND"),
            ("ObservationOperators.Or", "OR"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { fields, operators }
    }
}

impl FieldMapper for MappingConfig {
    fn map_field(&self, object_type: &str, field: &str) -> Vec<String> {
        self.fields
            .get(object_type)
            .and_then(|object| object.fields.get(field))
            .cloned()
            .unwrap_or_default()
    }

    fn map_comparator(&self) -> HashMap<String, String> {
        self.operators.clone()
    }
}

/// 从JSON文件加载引用字段的类型表, 例如：`{"source_ipaddr": ["ipv4", "ipv6"]}`
pub fn load_reference_registry<P: AsRef<Path>>(path: P) -> Result<ReferenceRegistry, ConfigError> {
    read_json(path.as_ref())
}
