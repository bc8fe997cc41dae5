//! Upload target configuration.

/// Default Yandex Disk REST endpoint.
pub const DEFAULT_API_URL: &str = "https://cloud-api.yandex.net/v1/disk";
pub const DEFAULT_DIR: &str = "temp_folder";
/// Attempts per upload, the first one included.
pub const DEFAULT_ATTEMPT_COUNT: u32 = 10;

#[derive(Debug, Clone)]
pub struct YaDiskConfig {
    pub token: String,
    pub api_url: String,
    /// Remote directory every upload lands in.
    pub dir: String,
    pub attempt_count: u32,
}

impl YaDiskConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            dir: DEFAULT_DIR.to_string(),
            attempt_count: DEFAULT_ATTEMPT_COUNT,
        }
    }

    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_attempt_count(mut self, attempt_count: u32) -> Self {
        self.attempt_count = attempt_count;
        self
    }
}
