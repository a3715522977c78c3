use crate::config::Config;
use crate::errors::Result;
use crate::scrapers::base::ListingSource;
use crate::scrapers::eastmoney::EastmoneyScraper;
use crate::scrapers::json_table::JsonTableSource;
use crate::scrapers::spreadsheet::SpreadsheetSource;
use crate::services::normalizer;
use crate::util;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub count: usize,
    pub output_path: PathBuf,
}

/// 代码表服务：抓取 -> 规范化 -> 写入
pub struct SymbolService {
    config: Config,
    source: Arc<dyn ListingSource + Send + Sync>,
}

impl SymbolService {
    pub fn new(config: Config, source: Arc<dyn ListingSource + Send + Sync>) -> Self {
        Self { config, source }
    }

    /// 按配置选择数据源：指定了本地文件则按扩展名读 JSON 或表格，否则抓取东方财富
    pub fn load_source(config: &Config) -> Result<Arc<dyn ListingSource + Send + Sync>> {
        match &config.input_file {
            Some(path) if JsonTableSource::accepts(path) => Ok(Arc::new(JsonTableSource::new(path)?)),
            Some(path) => Ok(Arc::new(SpreadsheetSource::new(path)?)),
            None => Ok(Arc::new(EastmoneyScraper::new(
                config.page_size,
                config.request_timeout,
                config.request_interval,
            )?)),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        info!("Fetching listing from {}", self.source.source_name());
        let table = self.source.fetch_listing().await?;

        // 表头不符时在写文件之前失败
        let outcome = normalizer::normalize(&table)?;
        if outcome.symbols.is_empty() {
            warn!("No valid symbols found in {} rows", table.len());
        }

        util::write_symbols_json(&self.config.output_path, &outcome.symbols)?;

        Ok(RunSummary {
            count: outcome.symbols.len(),
            output_path: self.config.output_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SymbolsError;
    use crate::models::listing::ListingTable;
    use async_trait::async_trait;
    use serde_json::json;
    use std::fs;

    struct StaticSource {
        table: ListingTable,
    }

    #[async_trait]
    impl ListingSource for StaticSource {
        fn source_name(&self) -> &'static str {
            "Static"
        }

        async fn fetch_listing(&self) -> Result<ListingTable> {
            Ok(self.table.clone())
        }
    }

    fn service(name: &str, columns: &[&str], rows: Vec<Vec<serde_json::Value>>) -> SymbolService {
        let output = std::env::temp_dir()
            .join(format!("tickerone_service_{}_{}", name, std::process::id()))
            .join("stocks.json");
        let table = ListingTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        };
        SymbolService::new(
            Config::new().with_output_path(output),
            Arc::new(StaticSource { table }),
        )
    }

    fn cleanup(summary_path: &std::path::Path) {
        if let Some(dir) = summary_path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn writes_sorted_unique_symbols() {
        let service = service(
            "run",
            &["代码", "名称", "最新价"],
            vec![
                vec![json!("000001"), json!("平安银行"), json!(11.2)],
                vec![json!("600519"), json!("贵州茅台"), json!(1520.0)],
                vec![json!("60051"), json!("坏行"), json!(1.0)],
                vec![json!("000001"), json!("平安银行"), json!(11.3)],
            ],
        );

        let summary = service.run().await.unwrap();
        assert_eq!(summary.count, 2);

        let content = fs::read_to_string(&summary.output_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value,
            json!([
                {"code": "600519", "name": "贵州茅台", "market": "sh"},
                {"code": "000001", "name": "平安银行", "market": "sz"}
            ])
        );
        assert!(content.contains("贵州茅台"));

        cleanup(&summary.output_path);
    }

    #[tokio::test]
    async fn repeated_runs_are_byte_identical() {
        let rows = vec![
            vec![json!("300750"), json!("宁德时代")],
            vec![json!("601398"), json!("工商银行")],
            vec![json!("000002"), json!("万科A")],
        ];
        let service = service("idempotent", &["code", "name"], rows);

        let first = service.run().await.unwrap();
        let first_bytes = fs::read(&first.output_path).unwrap();
        let second = service.run().await.unwrap();
        let second_bytes = fs::read(&second.output_path).unwrap();
        assert_eq!(first_bytes, second_bytes);

        cleanup(&first.output_path);
    }

    #[tokio::test]
    async fn schema_mismatch_writes_nothing() {
        let service = service("schema", &["序号", "最新价"], vec![vec![json!(1), json!(2.0)]]);

        let err = service.run().await.unwrap_err();
        assert!(matches!(err, SymbolsError::UnexpectedSchema { .. }));
        assert!(!service.config.output_path.exists());
    }

    #[test]
    fn missing_input_file_is_dependency_missing() {
        let config = Config::new().with_input_file("/nonexistent/listing.xlsx");
        let err = SymbolService::load_source(&config).err().unwrap();
        assert_eq!(err.exit_code(), 2);

        let config = Config::new().with_input_file("/nonexistent/listing.json");
        let err = SymbolService::load_source(&config).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn json_input_selects_json_source() {
        let path = std::env::temp_dir().join(format!("tickerone_select_{}.json", std::process::id()));
        fs::write(&path, r#"{"columns": [], "rows": []}"#).unwrap();

        let source = SymbolService::load_source(&Config::new().with_input_file(&path)).unwrap();
        assert_eq!(source.source_name(), "JSON export");

        fs::remove_file(&path).unwrap();
    }
}
