//! Platform capability interface.
//!
//! [`PlatformTuner`] is the only place OS-specific tuning lives. The Linux
//! implementation calls into `libc`; every other target gets
//! [`UnsupportedTuner`], which reports each OS-level feature as unsupported.

mod fallback;
#[cfg(target_os = "linux")]
mod linux;

pub use fallback::UnsupportedTuner;
#[cfg(target_os = "linux")]
pub use linux::LinuxTuner;

use crate::error::TunerError;

/// OS-level tuning primitives.
///
/// Each call is independent and best-effort; failure leaves the process in
/// its prior state for that feature.
pub trait PlatformTuner: Send + Sync {
    /// Implementation name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Binds the calling thread to `cpus` (already validated, non-empty).
    fn set_affinity(&self, cpus: &[usize]) -> Result<(), TunerError>;

    /// CPUs belonging to NUMA `node`.
    fn node_cpus(&self, node: usize) -> Result<Vec<usize>, TunerError>;

    /// Prefers allocations from NUMA `node`.
    fn set_preferred_node(&self, node: usize) -> Result<(), TunerError>;

    /// Locks current and future pages in RAM.
    fn lock_memory(&self) -> Result<(), TunerError>;

    /// Switches to SCHED_FIFO at `priority`.
    fn set_realtime(&self, priority: i32) -> Result<(), TunerError>;
}

/// The implementation for the build target.
#[cfg(target_os = "linux")]
pub type NativeTuner = LinuxTuner;

/// The implementation for the build target.
#[cfg(not(target_os = "linux"))]
pub type NativeTuner = UnsupportedTuner;

/// Returns the implementation for the build target.
pub fn native_tuner() -> NativeTuner {
    NativeTuner::default()
}
