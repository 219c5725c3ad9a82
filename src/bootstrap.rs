use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::ledger::client::HttpLedgerClient;
use crate::marketplace::MarketplaceRepository;
use crate::payment::verifier::SettlementVerifier;
use crate::payment::{ReservationManager, ReservationRepository, SettlementService};

#[derive(Clone)]
pub struct AppState {
    pub marketplace: Arc<MarketplaceRepository>,
    pub reservations: Arc<ReservationRepository>,
    pub reservation_manager: Arc<ReservationManager>,
    pub settlement: Arc<SettlementService>,
}

pub fn initialize_app_state(config: &Config) -> AppState {
    info!("Initializing application components ...");

    let marketplace = Arc::new(MarketplaceRepository::new());
    info!("Marketplace repository initialized");

    let reservations = Arc::new(ReservationRepository::new());
    info!("Reservation repository initialized");

    let ledger = Arc::new(HttpLedgerClient::new(config.ledger_url.clone()));
    info!("Ledger client initialized: {}", config.ledger_url);

    let reservation_period = Duration::from_secs(config.reservation_period_secs);
    let reservation_manager = Arc::new(ReservationManager::new(
        marketplace.clone(),
        reservations.clone(),
        reservation_period,
    ));
    info!(
        "Reservation manager initialized (reservation period: {:?})",
        reservation_period
    );

    let settlement = Arc::new(SettlementService::new(
        marketplace.clone(),
        reservations.clone(),
        SettlementVerifier::new(ledger),
    ));
    info!("Settlement service initialized");

    AppState {
        marketplace,
        reservations,
        reservation_manager,
        settlement,
    }
}
