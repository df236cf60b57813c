use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Browser identity sent with every request; the target site rejects
/// default HTTP client user agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Pantry-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Harvest run behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// First listing page; later pages append `page=N` to it
    pub listing_url: String,

    /// Origin that relative recipe links are resolved against.
    /// Defaults to the origin of `listing_url`.
    #[serde(default)]
    pub site_origin: Option<String>,

    /// Number of links to collect and of complete recipes to harvest
    pub target_count: usize,

    /// Hard ceiling on listing pages visited
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Delay between listing pages (milliseconds)
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Delay between detail requests (milliseconds)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Extra attempts for a detail page that failed with a retryable
    /// transport error
    #[serde(default)]
    pub max_retries: u32,

    /// Base backoff between retries, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl CrawlerConfig {
    /// Returns the URL that relative links resolve against
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        match &self.site_origin {
            Some(origin) => Url::parse(origin),
            None => {
                let listing = Url::parse(&self.listing_url)?;
                listing.join("/")
            }
        }
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the CSV dataset written at the end of a run
    pub dataset_path: String,

    /// Optional markdown run summary
    #[serde(default)]
    pub summary_path: Option<String>,

    /// Prefix the dataset with a UTF-8 byte order mark so spreadsheet
    /// tools detect the encoding of Korean text
    #[serde(default = "default_true")]
    pub write_bom: bool,
}

/// Selector cascades, in priority order
///
/// Within each list the first selector that matches at least one element
/// wins and the rest are never tried.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Path segment every recipe detail URL contains
    #[serde(default = "default_link_marker")]
    pub link_marker: String,

    #[serde(default = "default_link_selectors")]
    pub links: Vec<String>,

    #[serde(default = "default_title_selectors")]
    pub title: Vec<String>,

    /// Site name removed from the `<title>` fallback
    #[serde(default = "default_title_strip")]
    pub title_strip: String,

    #[serde(default = "default_ingredient_selectors")]
    pub ingredients: Vec<String>,

    /// Class substrings scanned when no ingredient selector matches
    #[serde(default = "default_ingredient_fallback")]
    pub ingredient_fallback: Vec<String>,

    #[serde(default = "default_ingredient_min_chars")]
    pub ingredient_min_chars: usize,

    #[serde(default = "default_step_selectors")]
    pub steps: Vec<String>,

    /// Class substrings scanned when no step selector matches
    #[serde(default = "default_step_fallback")]
    pub step_fallback: Vec<String>,

    #[serde(default = "default_step_min_chars")]
    pub step_min_chars: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            link_marker: default_link_marker(),
            links: default_link_selectors(),
            title: default_title_selectors(),
            title_strip: default_title_strip(),
            ingredients: default_ingredient_selectors(),
            ingredient_fallback: default_ingredient_fallback(),
            ingredient_min_chars: default_ingredient_min_chars(),
            steps: default_step_selectors(),
            step_fallback: default_step_fallback(),
            step_min_chars: default_step_min_chars(),
        }
    }
}

fn default_max_pages() -> u32 {
    50
}

fn default_page_delay_ms() -> u64 {
    500
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_link_marker() -> String {
    "/recipe/".to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_link_selectors() -> Vec<String> {
    strings(&[
        "a[href*='/recipe/']",
        ".common_sp_link",
        ".thumbnail a",
        ".recipe_link",
        ".list_recipe a",
    ])
}

fn default_title_selectors() -> Vec<String> {
    strings(&[
        ".view2_summary h3",
        "h1.recipe-title",
        ".recipe_title",
        "h1",
        ".title",
    ])
}

fn default_title_strip() -> String {
    "만개의레시피".to_string()
}

fn default_ingredient_selectors() -> Vec<String> {
    strings(&[
        ".ready_ingre3 li",
        ".recipe_ingredient li",
        ".ingredient-list li",
        ".ingre_list li",
        ".ready_ingre li",
        ".view2_ingre li",
        ".ingre_box li",
    ])
}

fn default_ingredient_fallback() -> Vec<String> {
    strings(&["ingre"])
}

fn default_ingredient_min_chars() -> usize {
    2
}

fn default_step_selectors() -> Vec<String> {
    strings(&[
        ".view_step_cont",
        ".recipe_step",
        ".cooking-step",
        ".step_cont",
        ".view_step .step_txt",
        ".manual_txt",
        ".step_list li",
    ])
}

fn default_step_fallback() -> Vec<String> {
    strings(&["step", "manual", "cook"])
}

fn default_step_min_chars() -> usize {
    6
}
