use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 上游返回的行情列表：有序列名 + 有序行
///
/// 列名来自数据源，可能是中文表头（如 `代码`、`名称`），
/// 单元格保留原始值，由规范化阶段统一转成文本。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingTable {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl ListingTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 单元格转文本并去掉首尾空白，缺失或 null 返回空串
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        match self.rows.get(row).and_then(|r| r.get(column)) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string().trim().to_string(),
        }
    }
}
