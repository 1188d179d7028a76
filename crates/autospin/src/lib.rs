//! Periodic on-chain spin scheduler.
//!
//! Submits the `startSpin()` call on a fixed cadence, guarding each cycle
//! with fee estimation, a balance sufficiency check, and pending-inclusive
//! nonce sequencing. Failures run a bounded retry ladder; the timestamp of
//! the last confirmed success is persisted so restarts resume the original
//! cadence instead of resetting it.

pub mod config;
pub mod cost;
pub mod error;
pub mod fees;
pub mod scheduler;
pub mod state;

pub use config::SpinConfig;
pub use cost::CostCheck;
pub use error::{CycleError, FatalError};
pub use fees::{FeeEstimator, FeePlan};
pub use scheduler::{Clock, Phase, SpinScheduler, SystemClock};
pub use state::{ScheduleState, StateStore};
