pub mod base;
pub mod eastmoney;
pub mod json_table;
pub mod spreadsheet;
