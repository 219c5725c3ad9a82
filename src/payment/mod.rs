pub mod correlation;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod reservation;
pub mod settlement;
pub mod verifier;

pub use repository::ReservationRepository;
pub use reservation::ReservationManager;
pub use settlement::SettlementService;
