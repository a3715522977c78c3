use crate::models::listing::ListingTable;
use crate::errors::{Result, SymbolsError};
use crate::scrapers::base::ListingSource;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const LIST_URL: &str = "https://82.push2.eastmoney.com/api/qt/clist/get";
const UT_TOKEN: &str = "bd1d9ddb04089700cf9c27f6f7426281";
// 沪深京A股板块过滤条件：深主板、创业板、沪主板、科创板、北交所
const A_SHARE_FILTER: &str = "m:0 t:6,m:0 t:80,m:1 t:2,m:1 t:23,m:0 t:81 s:2048";

/// 东方财富字段编号与本地化表头的对应关系，顺序即输出列顺序
const FIELD_HEADERS: [(&str, &str); 5] = [
    ("f12", "代码"),
    ("f14", "名称"),
    ("f2", "最新价"),
    ("f3", "涨跌幅"),
    ("f13", "市场"),
];

/// 单页解析结果，`total` 缺失或为 0 时为 None（总数未知）
#[derive(Debug, Default)]
pub struct ListingPage {
    pub total: Option<usize>,
    pub rows: Vec<Vec<Value>>,
}

/// 东方财富沪深A股实时行情列表抓取器
pub struct EastmoneyScraper {
    client: Client,
    page_size: usize,
    request_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl EastmoneyScraper {
    /// 创建抓取器，HTTP客户端无法初始化时视为依赖缺失
    pub fn new(page_size: usize, timeout: Duration, request_interval: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SymbolsError::DependencyMissing(format!(
                    "HTTP client could not be initialized ({}). Check the TLS setup of this machine, \
                     or pass --input <file> to build from a local listing export.",
                    e
                ))
            })?;

        Ok(Self {
            client,
            page_size: page_size.max(1),
            request_interval,
            last_request: Mutex::new(None),
        })
    }

    // 添加请求限速机制
    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(time) = *last {
            let elapsed = time.elapsed();
            if elapsed < self.request_interval {
                let wait_time = self.request_interval - elapsed;
                debug!("等待 {:?} 以遵守频率限制", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }

    async fn fetch_page(&self, page: usize) -> Result<ListingPage> {
        self.wait_for_rate_limit().await;

        let fields = FIELD_HEADERS
            .iter()
            .map(|(field, _)| *field)
            .collect::<Vec<_>>()
            .join(",");
        let page_str = page.to_string();
        let size_str = self.page_size.to_string();

        let response = self.client
            .get(LIST_URL)
            .query(&[
                ("pn", page_str.as_str()),
                ("pz", size_str.as_str()),
                ("po", "1"),
                ("np", "1"),
                ("ut", UT_TOKEN),
                ("fltt", "2"),
                ("invt", "2"),
                ("fid", "f12"),
                ("fs", A_SHARE_FILTER),
                ("fields", fields.as_str()),
            ])
            .header("Referer", "https://quote.eastmoney.com/")
            .send()
            .await?
            .error_for_status()?;

        let json: Value = response.json().await?;
        parse_page(&json)
    }
}

/// 列名，与 `parse_page` 输出的单元格顺序一致
pub fn listing_columns() -> Vec<String> {
    FIELD_HEADERS.iter().map(|(_, header)| header.to_string()).collect()
}

/// 解析 clist/get 的一页响应
///
/// `data` 为 null 表示页码已超出范围，返回空页；
/// `diff` 既可能是数组也可能是以序号为键的对象。
pub fn parse_page(json: &Value) -> Result<ListingPage> {
    if let Some(rc) = json.get("rc").and_then(|v| v.as_i64()) {
        if rc != 0 {
            return Err(SymbolsError::DataError(format!("Eastmoney returned rc={}", rc)));
        }
    }

    let data = match json.get("data") {
        Some(Value::Null) | None => return Ok(ListingPage::default()),
        Some(data) => data,
    };

    let total = data
        .get("total")
        .and_then(|t| t.as_u64())
        .filter(|t| *t > 0)
        .map(|t| t as usize);

    let items: Vec<&Value> = match data.get("diff") {
        Some(Value::Array(list)) => list.iter().collect(),
        Some(Value::Object(map)) => {
            // 键是行序号，按数值排序才能保持原始行顺序
            let mut entries: Vec<(usize, &Value)> = map
                .iter()
                .map(|(key, value)| (key.parse::<usize>().unwrap_or(usize::MAX), value))
                .collect();
            entries.sort_by_key(|(index, _)| *index);
            entries.into_iter().map(|(_, value)| value).collect()
        }
        _ => Vec::new(),
    };

    let rows = items
        .into_iter()
        .map(|item| {
            FIELD_HEADERS
                .iter()
                .map(|(field, _)| item.get(*field).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(ListingPage { total, rows })
}

#[async_trait]
impl ListingSource for EastmoneyScraper {
    fn source_name(&self) -> &'static str {
        "Eastmoney"
    }

    async fn fetch_listing(&self) -> Result<ListingTable> {
        info!("开始获取东方财富沪深A股列表");
        collect_pages(|page| self.fetch_page(page)).await
    }
}

/// 逐页拉取直到读满 `total` 行或遇到空页
///
/// `total` 未知时只以空页作为结束条件。
pub async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<ListingTable>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<ListingPage>>,
{
    let mut table = ListingTable::new(listing_columns());
    let mut page = 1;
    let mut expected = None;

    loop {
        let ListingPage { total, rows } = fetch_page(page).await?;
        if total.is_some() {
            expected = total;
        }

        if rows.is_empty() {
            debug!("第 {} 页为空，结束分页", page);
            break;
        }

        debug!("第 {} 页获取到 {} 行", page, rows.len());
        for row in rows {
            table.push_row(row);
        }

        if expected.map_or(false, |total| table.len() >= total) {
            break;
        }
        page += 1;
    }

    match expected {
        Some(total) if table.len() < total => {
            warn!("只获取到 {} 行，少于接口声明的 {} 行", table.len(), total);
        }
        None => warn!("接口未返回总数，以空页结束分页"),
        _ => {}
    }

    info!("成功获取 {} 行股票数据，共请求 {} 页", table.len(), page);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_array_diff_in_header_order() {
        let body = json!({
            "rc": 0,
            "data": {
                "total": 5321,
                "diff": [
                    {"f2": 1520.0, "f3": -0.35, "f12": "600519", "f13": 1, "f14": "贵州茅台"},
                    {"f2": "-", "f3": "-", "f12": "000001", "f13": 0, "f14": "平安银行"}
                ]
            }
        });

        let page = parse_page(&body).unwrap();
        assert_eq!(page.total, Some(5321));
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0][0], json!("600519"));
        assert_eq!(page.rows[0][1], json!("贵州茅台"));
        assert_eq!(page.rows[1][4], json!(0));
        assert_eq!(listing_columns(), vec!["代码", "名称", "最新价", "涨跌幅", "市场"]);
    }

    #[test]
    fn parses_object_diff_and_missing_fields() {
        let body = json!({
            "rc": 0,
            "data": {"total": 1, "diff": {"0": {"f12": "300750"}}}
        });

        let page = parse_page(&body).unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0][0], json!("300750"));
        assert_eq!(page.rows[0][1], Value::Null);
    }

    #[test]
    fn object_diff_keeps_numeric_row_order() {
        let mut diff = serde_json::Map::new();
        for i in 0..12 {
            diff.insert(i.to_string(), json!({"f12": format!("{:06}", i), "f14": format!("row{}", i)}));
        }
        let body = json!({"rc": 0, "data": {"total": 12, "diff": diff}});

        let page = parse_page(&body).unwrap();
        let codes: Vec<&str> = page.rows.iter().map(|r| r[0].as_str().unwrap()).collect();
        assert_eq!(codes[2], "000002");
        assert_eq!(codes[9], "000009");
        assert_eq!(codes[11], "000011");
    }

    #[test]
    fn missing_or_zero_total_is_unknown() {
        let body = json!({"rc": 0, "data": {"diff": [{"f12": "600000"}]}});
        assert_eq!(parse_page(&body).unwrap().total, None);

        let body = json!({"rc": 0, "data": {"total": 0, "diff": [{"f12": "600000"}]}});
        assert_eq!(parse_page(&body).unwrap().total, None);
    }

    fn page_of(total: Option<usize>, codes: &[&str]) -> ListingPage {
        ListingPage {
            total,
            rows: codes.iter().map(|c| vec![json!(c), json!("name")]).collect(),
        }
    }

    /// 用预置页面模拟接口，返回表格和实际请求过的页码
    async fn run_pages(pages: Vec<ListingPage>) -> (ListingTable, Vec<usize>) {
        let mut pages = pages.into_iter();
        let mut requested = Vec::new();
        let table = collect_pages(|page| {
            requested.push(page);
            let next = pages.next().unwrap_or_default();
            async move { Ok(next) }
        })
        .await
        .unwrap();
        (table, requested)
    }

    #[tokio::test]
    async fn paging_stops_at_total() {
        let (table, requested) = run_pages(vec![
            page_of(Some(3), &["000001", "000002"]),
            page_of(Some(3), &["600000"]),
            page_of(Some(3), &["600001"]),
        ])
        .await;

        assert_eq!(table.len(), 3);
        assert_eq!(requested, vec![1, 2]);
    }

    #[tokio::test]
    async fn paging_stops_on_empty_page() {
        let (table, requested) = run_pages(vec![
            page_of(Some(10), &["000001", "000002"]),
            page_of(Some(10), &[]),
        ])
        .await;

        assert_eq!(table.len(), 2);
        assert_eq!(requested, vec![1, 2]);
    }

    #[tokio::test]
    async fn paging_without_total_reads_until_empty_page() {
        let (table, requested) = run_pages(vec![
            page_of(None, &["000001", "000002"]),
            page_of(None, &["300750", "600000"]),
            page_of(None, &["600519"]),
        ])
        .await;

        assert_eq!(table.len(), 5);
        assert_eq!(requested, vec![1, 2, 3, 4]);
        assert_eq!(table.cell_text(4, 0), "600519");
    }

    #[tokio::test]
    async fn paging_propagates_fetch_errors() {
        let result = collect_pages(|_| async { Err(SymbolsError::DataError("boom".to_string())) }).await;
        assert!(matches!(result, Err(SymbolsError::DataError(_))));
    }

    #[test]
    fn null_data_is_an_empty_page() {
        let page = parse_page(&json!({"rc": 0, "data": null})).unwrap();
        assert_eq!(page.total, None);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn nonzero_rc_is_an_error() {
        let err = parse_page(&json!({"rc": 102, "data": null})).unwrap_err();
        assert!(matches!(err, SymbolsError::DataError(_)));
    }
}
