use crate::models::listing::ListingTable;
use crate::scrapers::base::ListingSource;
use crate::errors::{Result, SymbolsError};
use async_trait::async_trait;
use calamine::{open_workbook_auto, DataType, Reader};
use log::{info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};

const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 从本地表格导出文件读取股票列表，第一行为表头
pub struct SpreadsheetSource {
    path: PathBuf,
}

impl SpreadsheetSource {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.is_file() {
            return Err(SymbolsError::DependencyMissing(format!(
                "Listing export {} not found. Export the A-share list to a spreadsheet first, \
                 or omit --input to fetch it online.",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(SymbolsError::DependencyMissing(format!(
                "Cannot read {}: supported formats are {}",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }

        Ok(Self { path })
    }
}

/// 单元格转为 JSON 值；整数值的浮点数按整数输出，避免出现 "600519.0"
pub(crate) fn cell_value(cell: &DataType) -> Value {
    match cell {
        DataType::Empty => Value::Null,
        DataType::String(s) => Value::String(s.clone()),
        DataType::Int(i) => Value::from(*i),
        DataType::Float(f) if f.is_finite() && f.fract() == 0.0 => Value::from(*f as i64),
        DataType::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        DataType::Bool(b) => Value::Bool(*b),
        other => Value::String(other.to_string()),
    }
}

#[async_trait]
impl ListingSource for SpreadsheetSource {
    fn source_name(&self) -> &'static str {
        "Spreadsheet"
    }

    async fn fetch_listing(&self) -> Result<ListingTable> {
        info!("读取本地股票列表文件: {}", self.path.display());

        let mut workbook = open_workbook_auto(&self.path)?;

        // 获取第一个工作表
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SymbolsError::DataError("工作簿中没有工作表".to_string()))??;

        let mut rows = range.rows();
        let columns = match rows.next() {
            Some(header) => header.iter().map(|cell| cell.to_string()).collect(),
            None => {
                warn!("{} 为空表", self.path.display());
                Vec::new()
            }
        };

        let mut table = ListingTable::new(columns);
        for row in rows {
            table.push_row(row.iter().map(cell_value).collect());
        }

        info!("从 {} 读取到 {} 行", self.path.display(), table.len());
        Ok(table)
    }
}
