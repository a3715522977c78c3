use serde::{Deserialize, Serialize};
use std::fmt;

/// 交易所标记，声明顺序与字符串顺序一致（"sh" < "sz"）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Sh,
    Sz,
}

impl Market {
    /// 6 开头为沪市，其余归深市
    pub fn from_code(code: &str) -> Self {
        if code.starts_with('6') {
            Market::Sh
        } else {
            Market::Sz
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Sh => "sh",
            Market::Sz => "sz",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 输出到 stocks.json 的单条记录，字段顺序即 JSON 键顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub code: String,
    pub name: String,
    pub market: Market,
}

impl SymbolRecord {
    pub fn new(code: String, name: String) -> Self {
        let market = Market::from_code(&code);
        Self { code, name, market }
    }

    /// 去重键：market + code
    pub fn key(&self) -> String {
        format!("{}{}", self.market, self.code)
    }
}

/// 6 位 ASCII 数字
pub fn is_valid_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}
