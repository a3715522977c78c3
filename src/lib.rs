// 公开导出的模块，供外部使用
pub mod models;
pub mod errors;
pub mod scrapers;
pub mod services;
pub mod config;
pub mod util;

// 重新导出常用类型，方便使用
pub use models::listing::ListingTable;
pub use models::symbol::{Market, SymbolRecord};
pub use errors::{Result, SymbolsError};
pub use config::Config;
pub use services::symbol_service::{RunSummary, SymbolService};
