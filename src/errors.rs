use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolsError {
    /// 数据源无法加载（HTTP客户端初始化失败、导出文件不存在等），属于环境配置问题
    #[error("Dependency missing: {0}")]
    DependencyMissing(String),

    #[error("Unexpected columns: {columns:?}")]
    UnexpectedSchema { columns: Vec<String> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Excel parsing error: {0}")]
    ExcelError(#[from] calamine::Error),

    #[error("Data error: {0}")]
    DataError(String),
}

impl SymbolsError {
    /// 进程退出码：环境问题为 2，其余失败为 1
    pub fn exit_code(&self) -> u8 {
        match self {
            SymbolsError::DependencyMissing(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, SymbolsError>;
