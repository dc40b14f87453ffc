//! # Infra System
//!
//! Execution-environment control for benchmark runs: CPU affinity, NUMA
//! placement, memory locking, realtime scheduling, memory prefaulting and a
//! topology snapshot.
//!
//! ## Design Principles
//!
//! - **Best-effort**: every feature returns its own result; a failure is
//!   reported and the run continues without that feature
//! - **One capability seam**: OS calls live behind [`PlatformTuner`], with a
//!   `libc` implementation on Linux and [`UnsupportedTuner`] elsewhere
//! - **Process-wide state**: tuning must be applied before worker threads are
//!   spawned; it is never re-applied per worker
//!
//! ## Example
//!
//! ```
//! use infra_system::{parse_cpu_list, EnvironmentTuner, SystemConfig};
//!
//! let config = SystemConfig {
//!     cpu_affinity: parse_cpu_list("0").unwrap(),
//!     prefault: true,
//!     ..Default::default()
//! };
//!
//! let tuner = EnvironmentTuner::native();
//! let report = tuner.apply(&config);
//! for failure in report.failures() {
//!     eprintln!("{}: {:?}", failure.feature, failure.error);
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod config;
mod cpu_list;
mod error;
pub mod platform;
mod prefault;
mod topology;
mod tuner;

pub use config::{
    SystemConfig, DEFAULT_REALTIME_PRIORITY, DEFAULT_STACK_PREFAULT_KB, ISOLATE_PREALLOCATE_MB,
};
pub use cpu_list::{format_cpu_list, parse_cpu_list, MAX_CPUS};
pub use error::{CpuListError, TunerError};
pub use platform::{native_tuner, NativeTuner, PlatformTuner, UnsupportedTuner};
pub use prefault::{prefault_heap, prefault_stack, MAX_STACK_PREFAULT_KB};
pub use topology::SystemInfo;
pub use tuner::{ApplyReport, EnvironmentTuner, Feature, FeatureOutcome};
