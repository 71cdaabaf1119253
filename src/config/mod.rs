use serde::Deserialize;
use std::env;
use std::str::FromStr;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub flow: FlowConfig,
    pub upload: UploadConfig,
    pub cache: CacheConfig,
    pub transactions: TransactionConfig,
    pub transition: TransitionConfig,
}

// Настройки приложения (gateway)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Настройки REST backend
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Настройки сети Flow и адреса контрактов
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    pub network: String,
    pub access_node_url: String,
    pub wallet_discovery: String,
    pub nft_moment_address: String,
    pub event_platform_address: String,
    pub moment_utility_address: String,
}

// Настройки внешнего сервиса загрузки картинок (Uploadcare)
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub public_key: Option<String>,
    pub cdn_url: String,
    pub upload_url: String,
}

// Настройки кеша запросов
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub retry_count: u32,
    pub retry_base_delay_ms: u64,
    pub gc_seconds: u64,
}

// Настройки отслеживания транзакций
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionConfig {
    pub poll_interval_ms: u64,
}

// Настройки визуального перехода между страницами
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionConfig {
    pub duration_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", "8080"),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "moment_platform=debug,tower_http=debug".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:6666".to_string()),
                timeout_seconds: parse_var("API_TIMEOUT_SECONDS", "30"),
            },
            flow: FlowConfig {
                network: env::var("FLOW_NETWORK").unwrap_or_else(|_| "testnet".to_string()),
                access_node_url: env::var("FLOW_ACCESS_NODE")
                    .unwrap_or_else(|_| "https://rest-testnet.onflow.org".to_string()),
                wallet_discovery: env::var("FLOW_WALLET_DISCOVERY")
                    .unwrap_or_else(|_| "https://fcl-discovery.onflow.org/testnet/authn".to_string()),
                nft_moment_address: env::var("NFTMOMENT_ADDRESS")
                    .unwrap_or_else(|_| "0xf8d6e0586b0a20c7".to_string()),
                event_platform_address: env::var("EVENTPLATFORM_ADDRESS")
                    .unwrap_or_else(|_| "0xf8d6e0586b0a20c7".to_string()),
                moment_utility_address: env::var("MOMENTUTILITY_ADDRESS")
                    .unwrap_or_else(|_| "0xf8d6e0586b0a20c7".to_string()),
            },
            upload: UploadConfig {
                public_key: env::var("UPLOADCARE_KEY").ok().filter(|k| !k.trim().is_empty()),
                cdn_url: env::var("UPLOADCARE_URL")
                    .unwrap_or_else(|_| "https://ucarecdn.com".to_string()),
                upload_url: env::var("UPLOADCARE_UPLOAD_URL")
                    .unwrap_or_else(|_| "https://upload.uploadcare.com".to_string()),
            },
            cache: CacheConfig {
                retry_count: parse_var("QUERY_RETRY_COUNT", "3"),
                retry_base_delay_ms: parse_var("QUERY_RETRY_BASE_DELAY_MS", "1000"),
                gc_seconds: parse_var("QUERY_GC_SECONDS", "300"),
            },
            transactions: TransactionConfig {
                poll_interval_ms: parse_var("TX_POLL_INTERVAL_MS", "1000"),
            },
            transition: TransitionConfig {
                duration_ms: parse_var("TRANSITION_DURATION_MS", "1000"),
            },
        }
    }

    /// Адрес, на котором слушает gateway.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

// Числовые переменные: дефолт если не задано, паника если задано криво
fn parse_var<T: FromStr>(key: &str, default: &str) -> T {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{} must be a valid number", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default() {
        let value: u64 = parse_var("MOMENT_PLATFORM_TEST_UNSET_VAR", "42");
        assert_eq!(value, 42);
    }

    #[test]
    #[should_panic(expected = "MOMENT_PLATFORM_TEST_BAD_NUMBER must be a valid number")]
    fn parse_var_panics_on_garbage() {
        env::set_var("MOMENT_PLATFORM_TEST_BAD_NUMBER", "not-a-number");
        let _: u16 = parse_var("MOMENT_PLATFORM_TEST_BAD_NUMBER", "1");
    }
}
