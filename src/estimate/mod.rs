//! Estimate engine module.
//!
//! Turns a loosely-typed service request into a price quote with sales
//! scores and a short narrative. The calculators are pure; the route layer
//! handles parsing and activity logging.

pub mod calculators;
pub mod requests;
pub mod responses;
pub mod routes;

// Re-export commonly used items
pub use calculators::{calculate_estimate, round_whole, ServiceKind};
pub use requests::{EstimateInputs, EstimateRequest};
pub use responses::{ErrorResponse, EstimateResponse};
pub use routes::router;
