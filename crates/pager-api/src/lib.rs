//! # Pager API
//!
//! HTTP surface of the pager. Monitoring systems post alerts and healthy
//! reports, responders post acknowledgments, and operators read the
//! current state of every service.
//!
//! ```text
//! POST /services/{id}/alerts       - Report an incident
//! POST /services/{id}/acknowledge  - Acknowledge the current alert
//! POST /services/{id}/healthy      - Report recovery
//! GET  /services                   - Snapshot of every service
//! GET  /services/{id}              - Snapshot of one service
//! GET  /health                     - Liveness
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
