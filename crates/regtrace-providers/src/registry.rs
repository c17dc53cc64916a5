use std::collections::HashMap;
use std::fmt;

/// Request header selecting the upstream provider for one proxied call
pub const TARGET_HEADER: &str = "x-regtrace-target";

/// A known upstream LLM API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
    /// The configurable custom endpoint
    Custom,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Custom => "custom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "openai" => Some(Provider::OpenAi),
            "anthropic" => Some(Provider::Anthropic),
            "custom" => Some(Provider::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static mapping from logical provider name to real base URL.
///
/// Built once at proxy startup; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    base_urls: HashMap<Provider, String>,
    default_provider: Provider,
}

impl ProviderRegistry {
    /// Registry with the known public endpoints and no custom provider
    pub fn new() -> Self {
        let mut base_urls = HashMap::new();
        base_urls.insert(Provider::OpenAi, "https://api.openai.com".to_string());
        base_urls.insert(Provider::Anthropic, "https://api.anthropic.com".to_string());
        Self {
            base_urls,
            default_provider: Provider::OpenAi,
        }
    }

    /// Register the configurable custom endpoint
    pub fn with_custom_endpoint(mut self, base_url: impl Into<String>) -> Self {
        self.base_urls.insert(Provider::Custom, base_url.into());
        self
    }

    /// Override the base URL of a known provider. Used by tests and by
    /// deployments that front a provider with their own gateway.
    pub fn with_base_url(mut self, provider: Provider, base_url: impl Into<String>) -> Self {
        self.base_urls.insert(provider, base_url.into());
        self
    }

    /// Change the provider used when a request carries no target header
    pub fn with_default_provider(mut self, provider: Provider) -> Self {
        self.default_provider = provider;
        self
    }

    pub fn default_provider(&self) -> Provider {
        self.default_provider
    }

    /// Resolve a target header value to a provider and its base URL.
    /// `None` header falls back to the default provider.
    pub fn resolve(&self, target: Option<&str>) -> Option<(Provider, &str)> {
        let provider = match target {
            Some(name) => Provider::from_name(name)?,
            None => self.default_provider,
        };
        self.base_urls
            .get(&provider)
            .map(|url| (provider, url.as_str()))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
