use std::path::PathBuf;
use std::time::Duration;

use crate::util;

pub struct Config {
    pub output_path: PathBuf,
    pub input_file: Option<PathBuf>, // 设置后从本地导出文件读取，不访问网络
    pub page_size: usize,
    pub request_timeout: Duration,
    pub request_interval: Duration,
}

impl Config {
    pub fn new() -> Self {
        Self {
            output_path: util::default_output_path(),
            input_file: None,
            page_size: 100,
            request_timeout: Duration::from_secs(30),
            request_interval: Duration::from_millis(500),
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = Some(path.into());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        // 每页至少一条，否则分页永远不会推进
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
