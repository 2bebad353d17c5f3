#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core primitives for the ctrlplane ecosystem.
//!
//! This crate holds the retry machinery shared by the ctrlplane client
//! crates:
//!
//! - **Linear backoff schedules** via [`retry::LinearBackoff`]
//! - **A retry-until-successful driver** via [`retry::Retry`], with a
//!   wall-clock deadline and a composite [`retry::RetryExhausted`] failure
//! - **A structured in-progress signal** via [`retry::StillPending`], so
//!   polled operations can attach diagnostic fields to each retry round
//!
//! # Examples
//!
//! ```rust
//! use ctrlplane_core::retry::Retry;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let retry = Retry::fixed(Duration::from_secs(2)).timeout(Duration::from_secs(30));
//!
//! let value = retry
//!     .call("fetch_value", || async {
//!         Ok::<_, std::io::Error>(42)
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod retry;

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::retry::{LinearBackoff, Retry, RetryExhausted, StillPending};
}
