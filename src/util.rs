use crate::models::symbol::{is_valid_code, Market, SymbolRecord};
use crate::errors::Result;
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认输出路径：crate 根目录下的 extension/stocks.json，与当前工作目录无关
pub fn default_output_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("extension")
        .join("stocks.json")
}

/// 两空格缩进、非ASCII字符原样保留、末尾不带换行
pub fn render_symbols_json(symbols: &[SymbolRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(symbols)?)
}

/// 覆盖写入，不做备份
pub fn write_symbols_json(path: &Path, symbols: &[SymbolRecord]) -> Result<()> {
    let content = render_symbols_json(symbols)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;
    info!("Saved {} symbols to {}", symbols.len(), path.display());
    Ok(())
}

pub fn read_symbols_json(path: &Path) -> Result<Vec<SymbolRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// 检查 stocks.json 的不变量，返回所有违规描述
pub fn validate_symbols(symbols: &[SymbolRecord]) -> Vec<String> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for (i, symbol) in symbols.iter().enumerate() {
        if !is_valid_code(&symbol.code) {
            violations.push(format!("#{}: invalid code {:?}", i, symbol.code));
        } else if Market::from_code(&symbol.code) != symbol.market {
            violations.push(format!(
                "#{}: {} should be in market {}",
                i,
                symbol.code,
                Market::from_code(&symbol.code)
            ));
        }

        if symbol.name.trim().is_empty() {
            violations.push(format!("#{}: {} has an empty name", i, symbol.code));
        }

        if !seen.insert(symbol.key()) {
            violations.push(format!("#{}: duplicate {}", i, symbol.key()));
        }

        if i > 0 {
            let prev = &symbols[i - 1];
            if (prev.market, &prev.code) > (symbol.market, &symbol.code) {
                violations.push(format!("#{}: {} is out of order after {}", i, symbol.key(), prev.key()));
            }
        }
    }

    violations
}
