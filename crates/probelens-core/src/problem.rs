//! 问题记录（对外暴露的数据模型）
use serde::{Deserialize, Serialize};

/// 严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

/// 发现来源类别
/// - Scan：由扫描产生，下一次 `request_scan` 时会被整体清除
/// - 其余类别由调用方自行维护，清理扫描时保留
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    #[default]
    Unknown,
    Live,
    Scan,
    Permanent,
}

/// 源码位置（可选的行列号）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub url: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
}

/// 单条诊断问题
///
/// 相等性为完整值比较：id 相同但描述不同的两条记录视为不同问题。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub problem_id: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    /// 关联对象（例如对象地址或名称）
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub locations: Vec<SourceLocation>,
    #[serde(default)]
    pub finding_category: FindingCategory,
}

impl Problem {
    pub fn new(problem_id: impl Into<String>, finding_category: FindingCategory) -> Self {
        Self {
            problem_id: problem_id.into(),
            severity: Severity::default(),
            description: String::new(),
            object: None,
            locations: Vec::new(),
            finding_category,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.locations.push(location);
        self
    }

    /// 是否由扫描产生
    pub fn is_scan_finding(&self) -> bool {
        self.finding_category == FindingCategory::Scan
    }
}
