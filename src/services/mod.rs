pub mod creation_service;
pub mod entitlement;
pub mod error;

pub use creation_service::{CreationAdapters, CreationService};
pub use entitlement::{Denial, Entitlement, EntitlementLedger, Grant};
pub use error::CreationError;
