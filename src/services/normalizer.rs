use crate::models::listing::ListingTable;
use crate::models::symbol::{is_valid_code, SymbolRecord};
use crate::errors::{Result, SymbolsError};
use log::{debug, info};
use std::collections::HashMap;

/// 规范字段与可接受表头别名的对应关系
pub struct FieldAliases {
    pub code: &'static [&'static str],
    pub name: &'static [&'static str],
}

pub const DEFAULT_ALIASES: FieldAliases = FieldAliases {
    code: &["代码", "code", "证券代码"],
    name: &["名称", "name", "证券简称"],
};

impl FieldAliases {
    fn matches(aliases: &[&str], header: &str) -> bool {
        let header = header.trim().to_lowercase();
        aliases.iter().any(|alias| alias.to_lowercase() == header)
    }
}

/// 解析出的代码列、名称列下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub code: usize,
    pub name: usize,
}

/// 规范化结果，dropped/duplicates 只用于日志
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub symbols: Vec<SymbolRecord>,
    pub dropped: usize,
    pub duplicates: usize,
}

/// 在处理行之前一次性解析表头，多列匹配时取最后一列
pub fn resolve_columns(columns: &[String], aliases: &FieldAliases) -> Result<ResolvedColumns> {
    let mut code = None;
    let mut name = None;

    for (i, column) in columns.iter().enumerate() {
        if FieldAliases::matches(aliases.code, column) {
            code = Some(i);
        }
        if FieldAliases::matches(aliases.name, column) {
            name = Some(i);
        }
    }

    match (code, name) {
        (Some(code), Some(name)) => Ok(ResolvedColumns { code, name }),
        _ => Err(SymbolsError::UnexpectedSchema {
            columns: columns.to_vec(),
        }),
    }
}

/// 过滤、推导市场、去重（后者覆盖前者）并按 (market, code) 排序
pub fn normalize(table: &ListingTable) -> Result<NormalizeOutcome> {
    let resolved = resolve_columns(&table.columns, &DEFAULT_ALIASES)?;
    debug!("代码列: {}, 名称列: {}", resolved.code, resolved.name);

    let mut outcome = NormalizeOutcome::default();
    let mut unique: HashMap<String, SymbolRecord> = HashMap::new();

    for row in 0..table.len() {
        let code = table.cell_text(row, resolved.code);
        let name = table.cell_text(row, resolved.name);

        if !is_valid_code(&code) {
            outcome.dropped += 1;
            continue;
        }

        let record = SymbolRecord::new(code, name);
        if unique.insert(record.key(), record).is_some() {
            outcome.duplicates += 1;
        }
    }

    let mut symbols: Vec<SymbolRecord> = unique.into_values().collect();
    symbols.sort_by(|a, b| (a.market, &a.code).cmp(&(b.market, &b.code)));
    outcome.symbols = symbols;

    info!(
        "规范化完成: 输入 {} 行, 保留 {} 支, 丢弃 {} 行, 重复 {} 行",
        table.len(),
        outcome.symbols.len(),
        outcome.dropped,
        outcome.duplicates
    );
    Ok(outcome)
}
