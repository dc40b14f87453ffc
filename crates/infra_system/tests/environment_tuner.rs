//! EnvironmentTuner behaviour against a recording platform.

use std::sync::Mutex;

use infra_system::{
    EnvironmentTuner, Feature, PlatformTuner, SystemConfig, TunerError, UnsupportedTuner,
};

/// Records every platform call and fails the ones named in `failing`.
#[derive(Default)]
struct RecordingTuner {
    calls: Mutex<Vec<String>>,
    failing: Vec<&'static str>,
    nodes: Vec<Vec<usize>>,
}

impl RecordingTuner {
    fn with_nodes(nodes: Vec<Vec<usize>>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    fn failing(mut self, call: &'static str) -> Self {
        self.failing.push(call);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn call(&self, name: &'static str, detail: String) -> Result<(), TunerError> {
        self.calls.lock().unwrap().push(format!("{name}({detail})"));
        if self.failing.contains(&name) {
            return Err(TunerError::Os {
                call: name,
                source: std::io::Error::from_raw_os_error(1),
            });
        }
        Ok(())
    }
}

impl PlatformTuner for RecordingTuner {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn set_affinity(&self, cpus: &[usize]) -> Result<(), TunerError> {
        self.call("affinity", format!("{cpus:?}"))
    }

    fn node_cpus(&self, node: usize) -> Result<Vec<usize>, TunerError> {
        self.nodes
            .get(node)
            .cloned()
            .ok_or(TunerError::InvalidNumaNode(node))
    }

    fn set_preferred_node(&self, node: usize) -> Result<(), TunerError> {
        self.call("mempolicy", node.to_string())
    }

    fn lock_memory(&self) -> Result<(), TunerError> {
        self.call("mlockall", String::new())
    }

    fn set_realtime(&self, priority: i32) -> Result<(), TunerError> {
        self.call("realtime", priority.to_string())
    }
}

fn full_config() -> SystemConfig {
    SystemConfig {
        cpu_affinity: vec![2, 3],
        numa_node: Some(1),
        lock_memory: true,
        realtime: true,
        prefault: true,
        preallocate_mb: 1,
        ..Default::default()
    }
}

#[test]
fn test_apply_order_and_success() {
    let tuner = EnvironmentTuner::new(RecordingTuner::with_nodes(vec![vec![0, 1], vec![2, 3]]));
    let report = tuner.apply(&full_config());

    assert!(report.all_applied());
    assert_eq!(report.outcomes.len(), 6);
    assert_eq!(
        tuner.platform().calls(),
        vec![
            "affinity([2, 3])",
            "mempolicy(1)",
            "affinity([2, 3])",
            "mlockall()",
            "realtime(50)",
        ]
    );
}

#[test]
fn test_failure_does_not_stop_later_features() {
    let platform = RecordingTuner::with_nodes(vec![vec![0], vec![1]]).failing("mlockall");
    let tuner = EnvironmentTuner::new(platform);
    let report = tuner.apply(&full_config());

    assert!(!report.all_applied());
    let failed: Vec<Feature> = report.failures().map(|o| o.feature).collect();
    assert_eq!(failed, vec![Feature::MemoryLock]);
    assert!(report.outcome(Feature::Realtime).unwrap().applied());
    assert!(tuner.platform().calls().contains(&"realtime(50)".to_string()));
}

#[test]
fn test_missing_numa_node_reported() {
    let tuner = EnvironmentTuner::new(RecordingTuner::with_nodes(vec![vec![0, 1]]));
    let config = SystemConfig {
        numa_node: Some(3),
        ..Default::default()
    };
    let report = tuner.apply(&config);

    let outcome = report.outcome(Feature::NumaNode).unwrap();
    assert_eq!(outcome.error.as_deref(), Some("NUMA node 3 does not exist"));
    assert!(tuner.platform().calls().is_empty());
}

#[test]
fn test_memory_only_node_keeps_affinity() {
    let tuner = EnvironmentTuner::new(RecordingTuner::with_nodes(vec![vec![0], vec![]]));
    assert!(tuner.bind_numa_node(1).is_ok());
    assert_eq!(tuner.platform().calls(), vec!["mempolicy(1)"]);
}

#[test]
fn test_affinity_range() {
    let tuner = EnvironmentTuner::new(RecordingTuner::default());
    tuner.set_affinity_range(4, 3).unwrap();
    assert_eq!(tuner.platform().calls(), vec!["affinity([4, 5, 6])"]);
}

#[test]
fn test_isolate_on_unsupported_platform() {
    let config = SystemConfig {
        preallocate_mb: 1,
        ..Default::default()
    }
    .isolate();
    let report = EnvironmentTuner::new(UnsupportedTuner).apply(&config);
    let features: Vec<Feature> = report.outcomes.iter().map(|o| o.feature).collect();
    assert_eq!(
        features,
        vec![
            Feature::MemoryLock,
            Feature::StackPrefault,
            Feature::HeapPrefault
        ]
    );
    assert_eq!(report.failures().count(), 1);
}

#[test]
fn test_custom_realtime_priority() {
    let tuner = EnvironmentTuner::new(RecordingTuner::default());
    let config = SystemConfig {
        realtime: true,
        realtime_priority: 80,
        ..Default::default()
    };
    tuner.apply(&config);
    assert_eq!(tuner.platform().calls(), vec!["realtime(80)"]);
}
