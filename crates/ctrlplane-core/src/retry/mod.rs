//! Retry-until-successful driver and backoff schedules.
//!
//! # Key Types
//!
//! - [`LinearBackoff`] - lazy, unbounded schedule of wait intervals
//! - [`Retry`] - drives an operation until success or deadline exhaustion
//! - [`StillPending`] - recoverable "not done yet" signal with structured
//!   diagnostic fields
//! - [`RetryExhausted`] - composite failure embedding the last attempt error
//!
//! # Examples
//!
//! ```rust
//! use ctrlplane_core::retry::{LinearBackoff, Retry};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Poll every 2s, growing by 2s per round, capped at 120s, for at most
//! // ten minutes.
//! let retry = Retry::with_backoff(LinearBackoff::new(2.0, 2.0, 120.0))
//!     .timeout(Duration::from_secs(600))
//!     .verbose(true);
//!
//! let value = retry
//!     .call("fetch_value", || async {
//!         Ok::<_, std::io::Error>(42)
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod backoff;
mod driver;
mod pending;

pub use backoff::LinearBackoff;
pub use driver::{Retry, RetryExhausted};
pub use pending::StillPending;
