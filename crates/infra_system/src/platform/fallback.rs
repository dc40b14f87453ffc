use super::PlatformTuner;
use crate::error::TunerError;

/// Tuner for targets without OS-level tuning support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedTuner;

impl PlatformTuner for UnsupportedTuner {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn set_affinity(&self, _cpus: &[usize]) -> Result<(), TunerError> {
        Err(TunerError::Unsupported {
            feature: "CPU affinity",
        })
    }

    fn node_cpus(&self, _node: usize) -> Result<Vec<usize>, TunerError> {
        Err(TunerError::Unsupported {
            feature: "NUMA topology",
        })
    }

    fn set_preferred_node(&self, _node: usize) -> Result<(), TunerError> {
        Err(TunerError::Unsupported {
            feature: "NUMA binding",
        })
    }

    fn lock_memory(&self) -> Result<(), TunerError> {
        Err(TunerError::Unsupported {
            feature: "Memory locking",
        })
    }

    fn set_realtime(&self, _priority: i32) -> Result<(), TunerError> {
        Err(TunerError::Unsupported {
            feature: "Realtime scheduling",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_unsupported() {
        let tuner = UnsupportedTuner;
        assert!(tuner.set_affinity(&[0]).unwrap_err().is_unsupported());
        assert!(tuner.node_cpus(0).unwrap_err().is_unsupported());
        assert!(tuner.set_preferred_node(0).unwrap_err().is_unsupported());
        assert!(tuner.lock_memory().unwrap_err().is_unsupported());
        assert!(tuner.set_realtime(50).unwrap_err().is_unsupported());
    }
}
