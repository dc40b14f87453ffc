//! Best-effort application of a [`SystemConfig`].

use std::fmt;

use tracing::{info, warn};

use crate::config::SystemConfig;
use crate::cpu_list::{format_cpu_list, MAX_CPUS};
use crate::error::TunerError;
use crate::platform::{native_tuner, NativeTuner, PlatformTuner};
use crate::prefault::{prefault_heap, prefault_stack};
use crate::topology::SystemInfo;

/// A tuning feature attempted by [`EnvironmentTuner::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Feature {
    /// CPU affinity.
    Affinity,
    /// NUMA node preference.
    NumaNode,
    /// Memory locking.
    MemoryLock,
    /// Realtime scheduling.
    Realtime,
    /// Stack prefault.
    StackPrefault,
    /// Heap prefault.
    HeapPrefault,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Affinity => "CPU affinity",
            Self::NumaNode => "NUMA node",
            Self::MemoryLock => "memory lock",
            Self::Realtime => "realtime priority",
            Self::StackPrefault => "stack prefault",
            Self::HeapPrefault => "heap prefault",
        };
        f.write_str(name)
    }
}

/// Outcome of one attempted feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureOutcome {
    /// Feature attempted.
    pub feature: Feature,
    /// What was requested.
    pub detail: String,
    /// Failure message, `None` when applied.
    pub error: Option<String>,
}

impl FeatureOutcome {
    /// Returns `true` when the feature is in effect.
    #[inline]
    pub fn applied(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-feature outcomes of [`EnvironmentTuner::apply`], in application order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyReport {
    /// Attempted features.
    pub outcomes: Vec<FeatureOutcome>,
}

impl ApplyReport {
    /// Returns `true` when every attempted feature is in effect.
    pub fn all_applied(&self) -> bool {
        self.outcomes.iter().all(FeatureOutcome::applied)
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FeatureOutcome> {
        self.outcomes.iter().filter(|o| !o.applied())
    }

    /// Outcome for `feature`, if it was attempted.
    pub fn outcome(&self, feature: Feature) -> Option<&FeatureOutcome> {
        self.outcomes.iter().find(|o| o.feature == feature)
    }

    fn record(&mut self, feature: Feature, detail: String, result: Result<(), TunerError>) {
        let error = match result {
            Ok(()) => {
                info!(%feature, %detail, "applied");
                None
            }
            Err(err) => {
                warn!(%feature, %detail, error = %err, "could not apply; continuing without it");
                Some(err.to_string())
            }
        };
        self.outcomes.push(FeatureOutcome {
            feature,
            detail,
            error,
        });
    }
}

/// Applies CPU, NUMA, memory and scheduling tuning to the calling thread and
/// process.
///
/// Every operation is best-effort and returns its own result; none of them
/// panics or aborts. Apply before spawning workers so that threads inherit
/// the affinity mask.
///
/// # Examples
/// ```
/// use infra_system::{EnvironmentTuner, SystemConfig};
///
/// let tuner = EnvironmentTuner::native();
/// let report = tuner.apply(&SystemConfig {
///     prefault: true,
///     ..Default::default()
/// });
/// assert!(report.all_applied());
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentTuner<P: PlatformTuner = NativeTuner> {
    platform: P,
}

impl EnvironmentTuner<NativeTuner> {
    /// Tuner for the build target.
    pub fn native() -> Self {
        Self::new(native_tuner())
    }
}

impl<P: PlatformTuner> EnvironmentTuner<P> {
    /// Tuner over an explicit platform implementation.
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    /// The platform implementation.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Binds the calling thread to `cpus`.
    pub fn set_affinity(&self, cpus: &[usize]) -> Result<(), TunerError> {
        if cpus.is_empty() {
            return Err(TunerError::EmptyCpuSet);
        }
        if let Some(&cpu) = cpus.iter().find(|&&cpu| cpu >= MAX_CPUS) {
            return Err(TunerError::InvalidCpu {
                cpu,
                max: MAX_CPUS - 1,
            });
        }
        self.platform.set_affinity(cpus)
    }

    /// Binds the calling thread to `count` consecutive CPUs from `start`.
    pub fn set_affinity_range(&self, start: usize, count: usize) -> Result<(), TunerError> {
        let end = start
            .checked_add(count)
            .filter(|&end| end <= MAX_CPUS)
            .ok_or(TunerError::InvalidCpu {
                cpu: start.saturating_add(count).saturating_sub(1),
                max: MAX_CPUS - 1,
            })?;
        let cpus: Vec<usize> = (start..end).collect();
        self.set_affinity(&cpus)
    }

    /// Prefers memory from `node` and binds the calling thread to its CPUs.
    pub fn bind_numa_node(&self, node: usize) -> Result<(), TunerError> {
        let cpus = self.platform.node_cpus(node)?;
        self.platform.set_preferred_node(node)?;
        if cpus.is_empty() {
            // Memory-only node: keep the current affinity
            return Ok(());
        }
        self.set_affinity(&cpus)
    }

    /// Locks current and future pages in RAM.
    pub fn lock_memory(&self) -> Result<(), TunerError> {
        self.platform.lock_memory()
    }

    /// Requests SCHED_FIFO at `priority`.
    pub fn set_realtime_priority(&self, priority: i32) -> Result<(), TunerError> {
        self.platform.set_realtime(priority)
    }

    /// Touches `size_kb` KB of stack. Returns bytes touched.
    pub fn prefault_stack(&self, size_kb: usize) -> usize {
        prefault_stack(size_kb)
    }

    /// Touches and releases `size_mb` MB of heap. Returns bytes touched.
    pub fn prefault_heap(&self, size_mb: usize) -> Result<usize, TunerError> {
        prefault_heap(size_mb)
    }

    /// Topology snapshot of the current machine.
    pub fn system_info(&self) -> SystemInfo {
        SystemInfo::query()
    }

    /// Applies every requested feature in order: affinity, NUMA, memory
    /// lock, realtime, stack prefault, heap prefault.
    ///
    /// Failures are logged at warn level, recorded in the report, and do not
    /// stop later features.
    pub fn apply(&self, config: &SystemConfig) -> ApplyReport {
        let mut report = ApplyReport::default();

        if !config.cpu_affinity.is_empty() {
            report.record(
                Feature::Affinity,
                format_cpu_list(&config.cpu_affinity),
                self.set_affinity(&config.cpu_affinity),
            );
        }

        if let Some(node) = config.numa_node {
            report.record(
                Feature::NumaNode,
                format!("node {node}"),
                self.bind_numa_node(node),
            );
        }

        if config.lock_memory {
            report.record(
                Feature::MemoryLock,
                "MCL_CURRENT | MCL_FUTURE".to_string(),
                self.lock_memory(),
            );
        }

        if config.realtime {
            report.record(
                Feature::Realtime,
                format!("SCHED_FIFO {}", config.realtime_priority),
                self.set_realtime_priority(config.realtime_priority),
            );
        }

        if config.prefault {
            let bytes = self.prefault_stack(config.stack_prefault_kb);
            report.record(
                Feature::StackPrefault,
                format!("{} KB", bytes / 1024),
                Ok(()),
            );
        }

        if config.preallocate_mb > 0 {
            report.record(
                Feature::HeapPrefault,
                format!("{} MB", config.preallocate_mb),
                self.prefault_heap(config.preallocate_mb).map(|_| ()),
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::UnsupportedTuner;

    #[test]
    fn test_empty_config_attempts_nothing() {
        let report = EnvironmentTuner::new(UnsupportedTuner).apply(&SystemConfig::default());
        assert!(report.outcomes.is_empty());
        assert!(report.all_applied());
    }

    #[test]
    fn test_unsupported_platform_degrades() {
        let config = SystemConfig {
            cpu_affinity: vec![0],
            numa_node: Some(0),
            lock_memory: true,
            realtime: true,
            prefault: true,
            preallocate_mb: 1,
            ..Default::default()
        };
        let report = EnvironmentTuner::new(UnsupportedTuner).apply(&config);

        let order: Vec<Feature> = report.outcomes.iter().map(|o| o.feature).collect();
        assert_eq!(
            order,
            vec![
                Feature::Affinity,
                Feature::NumaNode,
                Feature::MemoryLock,
                Feature::Realtime,
                Feature::StackPrefault,
                Feature::HeapPrefault,
            ]
        );
        assert!(!report.all_applied());
        assert_eq!(report.failures().count(), 4);
        assert!(report.outcome(Feature::StackPrefault).unwrap().applied());
        assert!(report.outcome(Feature::HeapPrefault).unwrap().applied());
    }

    #[test]
    fn test_affinity_validation_precedes_platform() {
        let tuner = EnvironmentTuner::new(UnsupportedTuner);
        assert!(matches!(tuner.set_affinity(&[]), Err(TunerError::EmptyCpuSet)));
        assert!(matches!(
            tuner.set_affinity(&[MAX_CPUS]),
            Err(TunerError::InvalidCpu { .. })
        ));
        assert!(matches!(
            tuner.set_affinity_range(0, 0),
            Err(TunerError::EmptyCpuSet)
        ));
    }

    #[test]
    fn test_affinity_range_bounds_checked_before_allocation() {
        let tuner = EnvironmentTuner::new(UnsupportedTuner);
        assert!(matches!(
            tuner.set_affinity_range(0, usize::MAX),
            Err(TunerError::InvalidCpu { .. })
        ));
        assert!(matches!(
            tuner.set_affinity_range(usize::MAX, 2),
            Err(TunerError::InvalidCpu { .. })
        ));
        assert!(matches!(
            tuner.set_affinity_range(MAX_CPUS - 1, 2),
            Err(TunerError::InvalidCpu { cpu, .. }) if cpu == MAX_CPUS
        ));
        // In range: reaches the platform
        assert!(tuner
            .set_affinity_range(MAX_CPUS - 2, 2)
            .unwrap_err()
            .is_unsupported());
    }

    #[test]
    fn test_heap_prefault_failure_is_reported() {
        let config = SystemConfig {
            preallocate_mb: usize::MAX,
            ..Default::default()
        };
        let report = EnvironmentTuner::new(UnsupportedTuner).apply(&config);
        let outcome = report.outcome(Feature::HeapPrefault).unwrap();
        assert!(!outcome.applied());
        assert!(outcome.error.as_deref().unwrap().contains("cannot prefault"));
        assert!(!report.all_applied());
    }

    #[test]
    fn test_feature_display() {
        assert_eq!(Feature::MemoryLock.to_string(), "memory lock");
        assert_eq!(Feature::Affinity.to_string(), "CPU affinity");
    }
}
