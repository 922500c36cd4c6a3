use crate::Error;

pub const PD_ENDPOINTS_VAR: &str = "KV_LINK_PD_ENDPOINTS";
pub const SCAN_PAGE_SIZE_VAR: &str = "KV_LINK_SCAN_PAGE_SIZE";

const DEFAULT_SCAN_PAGE_SIZE: u32 = 128;

/// [`crate::TikvLinkStore`] 的连接配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub pd_endpoints: Vec<String>,
    /// 遍历链接时每次扫描取回的 key 数
    pub scan_page_size: u32,
}

impl Config {
    pub fn new(pd_endpoints: Vec<String>) -> Self {
        Self {
            pd_endpoints,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
        }
    }

    pub fn with_scan_page_size(mut self, scan_page_size: u32) -> Self {
        self.scan_page_size = scan_page_size;
        self
    }

    /// 读取 `KV_LINK_PD_ENDPOINTS` (逗号分隔) 和 `KV_LINK_SCAN_PAGE_SIZE`
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let endpoints = lookup(PD_ENDPOINTS_VAR)
            .ok_or_else(|| Error::Config(format!("{} is not set", PD_ENDPOINTS_VAR)))?;
        let pd_endpoints = endpoints
            .split(',')
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut config = Self::new(pd_endpoints);
        if let Some(page_size) = lookup(SCAN_PAGE_SIZE_VAR) {
            let page_size = page_size.trim().parse::<u32>().map_err(|e| {
                Error::Config(format!("{} '{}': {}", SCAN_PAGE_SIZE_VAR, page_size, e))
            })?;
            config = config.with_scan_page_size(page_size);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.pd_endpoints.is_empty() {
            return Err(Error::Config("no PD endpoints configured".to_string()));
        }
        if self.scan_page_size == 0 {
            return Err(Error::Config("scan page size must be positive".to_string()));
        }
        Ok(())
    }
}
