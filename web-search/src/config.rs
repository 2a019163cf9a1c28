//! Provider configuration, resolved once at process start.

use serde::{Deserialize, Serialize};

pub const SERPAPI_BASE_URL: &str = "https://serpapi.com";
pub const GOOGLE_BASE_URL: &str = "https://www.googleapis.com";
pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";
pub const DUCKDUCKGO_LITE_URL: &str = "https://lite.duckduckgo.com/lite/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RESULTS: usize = 3;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; ScriptureAugment/1.0)";

/// Configuration for every search provider.
///
/// API providers are enabled only when their credentials are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// SerpAPI credentials.
    pub serpapi: Option<SerpApiConfig>,

    /// Google Custom Search credentials.
    pub google: Option<GoogleConfig>,

    /// DuckDuckGo scraping endpoints.
    pub duckduckgo: DuckDuckGoConfig,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Results requested from the chain per query.
    pub max_results: usize,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl SearchConfig {
    /// Resolve provider credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve provider credentials through `lookup`.
    ///
    /// Reads `SERPAPI_KEY`, `GOOGLE_SEARCH_API_KEY` and
    /// `GOOGLE_SEARCH_ENGINE_ID`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let serpapi = var("SERPAPI_KEY").map(SerpApiConfig::new);
        let google = match (var("GOOGLE_SEARCH_API_KEY"), var("GOOGLE_SEARCH_ENGINE_ID")) {
            (Some(api_key), Some(engine_id)) => Some(GoogleConfig::new(api_key, engine_id)),
            _ => None,
        };

        Self {
            serpapi,
            google,
            ..Self::default()
        }
    }

    pub fn with_serpapi(mut self, config: SerpApiConfig) -> Self {
        self.serpapi = Some(config);
        self
    }

    pub fn with_google(mut self, config: GoogleConfig) -> Self {
        self.google = Some(config);
        self
    }

    pub fn with_duckduckgo(mut self, config: DuckDuckGoConfig) -> Self {
        self.duckduckgo = config;
        self
    }

    /// Names of the providers this configuration enables, in priority order.
    pub fn enabled_providers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.serpapi.is_some() {
            names.push("SerpAPI");
        }
        if self.google.is_some() {
            names.push("Google");
        }
        if self.duckduckgo.enabled {
            names.push("DuckDuckGo");
        }
        names
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            serpapi: None,
            google: None,
            duckduckgo: DuckDuckGoConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_results: DEFAULT_MAX_RESULTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpApiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl SerpApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: SERPAPI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
    pub engine_id: String,
    pub base_url: String,
}

impl GoogleConfig {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            base_url: GOOGLE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// The scraping provider needs no credentials and is on by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuckDuckGoConfig {
    pub enabled: bool,

    /// Primary endpoint (`a.result__a` layout).
    pub html_url: String,

    /// Secondary endpoint (`a.result-link` layout).
    pub lite_url: String,
}

impl DuckDuckGoConfig {
    /// Point both endpoints at `base_url`, under `/html/` and `/lite/`.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            enabled: true,
            html_url: format!("{base}/html/"),
            lite_url: format!("{base}/lite/"),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            html_url: DUCKDUCKGO_HTML_URL.to_string(),
            lite_url: DUCKDUCKGO_LITE_URL.to_string(),
        }
    }
}
