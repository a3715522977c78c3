use crate::models::listing::ListingTable;
use crate::scrapers::base::ListingSource;
use crate::errors::{Result, SymbolsError};
use async_trait::async_trait;
use log::info;
use std::path::{Path, PathBuf};

/// 从 JSON 导出文件读取股票列表：`{"columns": [...], "rows": [[...], ...]}`
pub struct JsonTableSource {
    path: PathBuf,
}

impl JsonTableSource {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.is_file() {
            return Err(SymbolsError::DependencyMissing(format!(
                "Listing export {} not found. Save the A-share list as JSON first, \
                 or omit --input to fetch it online.",
                path.display()
            )));
        }

        Ok(Self { path })
    }

    /// 按扩展名判断是否为 JSON 导出
    pub fn accepts(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("json"))
    }
}

#[async_trait]
impl ListingSource for JsonTableSource {
    fn source_name(&self) -> &'static str {
        "JSON export"
    }

    async fn fetch_listing(&self) -> Result<ListingTable> {
        info!("读取本地股票列表文件: {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path).await?;
        let table: ListingTable = serde_json::from_str(&content)?;

        info!("从 {} 读取到 {} 行", self.path.display(), table.len());
        Ok(table)
    }
}
