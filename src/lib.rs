pub mod api;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod error;
pub mod flows;
pub mod models;
pub mod mutations;
pub mod pages;
pub mod queries;
pub mod transactions;
pub mod transition;

use std::sync::Arc;
use std::time::Duration;

use api::{ApiClient, UploadcareClient};
use cache::QueryCache;
use error::ApiError;
use mutations::Mutations;
use pages::Pages;
use queries::Queries;
use transactions::{ContractAddresses, FlowAccessNode, TransactionBuilder, TransactionRegistry};
use transition::TransitionService;

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub api: ApiClient,
    pub cache: QueryCache,
    pub queries: Queries,
    pub pages: Pages,
    pub mutations: Mutations,
    pub builder: TransactionBuilder,
    pub access_node: Arc<FlowAccessNode>,
    pub transactions: TransactionRegistry,
    pub transition: TransitionService,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Arc<Self>, ApiError> {
        let api = ApiClient::from_config(&config.api)?;
        Self::with_api(config, api)
    }

    /// Собрать состояние вокруг готового клиента backend'а (в тестах - с адресом mock-сервера).
    pub fn with_api(config: config::Config, api: ApiClient) -> Result<Arc<Self>, ApiError> {
        // Access node и Uploadcare ходят через тот же пул соединений
        let http_client = api.http().clone();

        let cache = QueryCache::from_config(&config.cache);
        let builder = TransactionBuilder::new(ContractAddresses::from_config(&config.flow)?);
        let access_node = Arc::new(FlowAccessNode::from_config(&config.flow, http_client.clone()));
        let uploadcare = UploadcareClient::from_config(&config.upload, http_client);

        let queries = Queries::new(api.clone(), cache.clone(), access_node.clone(), builder.clone());
        let pages = Pages::new(queries.clone());
        let mutations = Mutations::new(api.clone(), cache.clone(), uploadcare);
        let transactions = TransactionRegistry::new(access_node.clone(), cache.clone(), &config.transactions);
        let transition = TransitionService::from_config(&config.transition);

        Ok(Arc::new(Self {
            config,
            api,
            cache,
            queries,
            pages,
            mutations,
            builder,
            access_node,
            transactions,
            transition,
        }))
    }

    /// Фоновая уборка: старые записи кеша и завершённые транзакции.
    pub fn housekeeping(&self) {
        let removed = self.cache.gc(Duration::from_secs(self.config.cache.gc_seconds));
        let pruned = self.transactions.prune();
        if removed > 0 || pruned > 0 {
            tracing::debug!("Housekeeping: {} cache entries dropped, {} transactions forgotten", removed, pruned);
        }
    }
}
