//! Requested tuning options.

use crate::cpu_list::format_cpu_list;

/// Default SCHED_FIFO priority for realtime requests.
pub const DEFAULT_REALTIME_PRIORITY: i32 = 50;

/// Stack prefault size used when prefaulting is requested.
pub const DEFAULT_STACK_PREFAULT_KB: usize = 64;

/// Heap preallocation implied by [`SystemConfig::isolate`].
pub const ISOLATE_PREALLOCATE_MB: usize = 256;

/// Tuning options to apply before timed work starts.
///
/// A plain value: building one changes nothing until it is passed to
/// [`EnvironmentTuner::apply`](crate::EnvironmentTuner::apply).
///
/// # Examples
/// ```
/// use infra_system::SystemConfig;
///
/// let config = SystemConfig::default();
/// assert!(!config.has_requests());
///
/// let isolated = SystemConfig::default().isolate();
/// assert!(isolated.lock_memory && isolated.prefault);
/// assert_eq!(isolated.preallocate_mb, 256);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SystemConfig {
    /// CPUs to bind the calling thread to; empty for no binding.
    pub cpu_affinity: Vec<usize>,
    /// Preferred NUMA node.
    pub numa_node: Option<usize>,
    /// Lock current and future pages in RAM.
    pub lock_memory: bool,
    /// Request SCHED_FIFO scheduling.
    pub realtime: bool,
    /// Priority used when `realtime` is set.
    pub realtime_priority: i32,
    /// Prefault the stack before timed work.
    pub prefault: bool,
    /// Stack prefault size in KB.
    pub stack_prefault_kb: usize,
    /// Heap to touch and release before timed work, in MB.
    pub preallocate_mb: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            cpu_affinity: Vec::new(),
            numa_node: None,
            lock_memory: false,
            realtime: false,
            realtime_priority: DEFAULT_REALTIME_PRIORITY,
            prefault: false,
            stack_prefault_kb: DEFAULT_STACK_PREFAULT_KB,
            preallocate_mb: 0,
        }
    }
}

impl SystemConfig {
    /// Enables memory locking, prefaulting and, unless a size is already
    /// set, a 256 MB heap preallocation.
    pub fn isolate(mut self) -> Self {
        self.lock_memory = true;
        self.prefault = true;
        if self.preallocate_mb == 0 {
            self.preallocate_mb = ISOLATE_PREALLOCATE_MB;
        }
        self
    }

    /// Returns `true` if any tuning is requested.
    pub fn has_requests(&self) -> bool {
        !self.cpu_affinity.is_empty()
            || self.numa_node.is_some()
            || self.lock_memory
            || self.realtime
            || self.prefault
            || self.preallocate_mb > 0
    }

    /// Human-readable lines describing the requested options.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.cpu_affinity.is_empty() {
            lines.push(format!("CPU affinity: {}", format_cpu_list(&self.cpu_affinity)));
        }
        if let Some(node) = self.numa_node {
            lines.push(format!("NUMA node: {node}"));
        }
        if self.lock_memory {
            lines.push("Memory locked: yes".to_string());
        }
        if self.realtime {
            lines.push(format!("Realtime priority: {}", self.realtime_priority));
        }
        if self.prefault {
            lines.push(format!("Stack prefault: {} KB", self.stack_prefault_kb));
        }
        if self.preallocate_mb > 0 {
            lines.push(format!("Preallocated heap: {} MB", self.preallocate_mb));
        }
        lines
    }
}
