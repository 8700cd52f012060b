use crate::service::{
    AuthService, BackendClient, HttpStatusLookup, PaymentService, ProfileService, UserService,
};
use shared::{
    abstract_trait::{
        DynAuthService, DynPaymentService, DynPaymentStatusLookup, DynProfileService,
        DynUserService,
    },
    config::Config,
    service::{FeeCalculator, SettlementCalendar, StatusReconciler, TransactionHistory},
    utils::Metrics,
};

use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: DynAuthService,
    pub profile_service: DynProfileService,
    pub payment_service: DynPaymentService,
    pub user_service: DynUserService,
    pub status_lookup: DynPaymentStatusLookup,
    pub fee_calculator: Arc<FeeCalculator>,
    pub history: TransactionHistory,
}

impl std::fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"DynAuthService")
            .field("profile_service", &"DynProfileService")
            .field("payment_service", &"DynPaymentService")
            .field("user_service", &"DynUserService")
            .field("status_lookup", &"DynPaymentStatusLookup")
            .field("fee_calculator", &self.fee_calculator)
            .field("history", &self.history)
            .finish()
    }
}

impl DependenciesInject {
    pub async fn new(
        config: &Config,
        metrics: Arc<Mutex<Metrics>>,
        registry: &mut Registry,
    ) -> Result<Self> {
        let client = BackendClient::new(&config.backend_url, config.backend_timeout)
            .context("Failed to build backend HTTP client")?;

        let auth_service: DynAuthService =
            Arc::new(AuthService::new(client.clone(), metrics.clone(), registry).await);
        let profile_service: DynProfileService =
            Arc::new(ProfileService::new(client.clone(), metrics.clone(), registry).await);
        let payment_service: DynPaymentService =
            Arc::new(PaymentService::new(client.clone(), metrics.clone(), registry).await);
        let user_service: DynUserService =
            Arc::new(UserService::new(client.clone(), metrics.clone(), registry).await);
        let status_lookup: DynPaymentStatusLookup =
            Arc::new(HttpStatusLookup::new(client, metrics.clone(), registry).await);

        let fee_calculator = Arc::new(FeeCalculator::new(config.fee.clone()));

        let history = TransactionHistory::new(
            StatusReconciler::new(status_lookup.clone(), config.status_lookup_timeout),
            SettlementCalendar::new(
                config.bank_holidays.iter().copied(),
                config.settlement_offset,
            ),
            config.payment_link_ttl,
        );

        Ok(Self {
            auth_service,
            profile_service,
            payment_service,
            user_service,
            status_lookup,
            fee_calculator,
            history,
        })
    }
}
