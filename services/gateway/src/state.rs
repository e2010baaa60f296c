use crate::rate_limit::RateLimiter;
use item_registry::ItemRegistry;
use loyalty_ledger::LoyaltyLedger;
use std::sync::Arc;
use store::SwapStore;
use trade_engine::TradeEngine;

/// Gateway configuration, read from the environment with defaults
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("GATEWAY_BIND")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret: std::env::var("GATEWAY_JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret".to_string()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub registry: ItemRegistry,
    pub engine: TradeEngine,
    pub ledger: LoyaltyLedger,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: GatewayConfig,
}

impl AppState {
    pub fn new(store: Arc<SwapStore>, config: GatewayConfig) -> Self {
        Self {
            registry: ItemRegistry::new(Arc::clone(&store)),
            engine: TradeEngine::new(Arc::clone(&store)),
            ledger: LoyaltyLedger::new(store),
            rate_limiter: Arc::new(RateLimiter::new()),
            config,
        }
    }
}
