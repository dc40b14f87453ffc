//! System topology snapshot.

use std::fmt;

use crate::cpu_list::format_cpu_list;

/// Observed hardware topology, for diagnostics only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemInfo {
    /// Logical CPU count.
    pub num_cpus: usize,
    /// NUMA node count (at least one).
    pub num_numa_nodes: usize,
    /// CPUs of each node, indexed by node.
    pub numa_cpu_map: Vec<Vec<usize>>,
    /// Total physical memory in MB (zero if unknown).
    pub total_memory_mb: u64,
    /// CPU model string.
    pub cpu_model: String,
}

impl SystemInfo {
    /// Reads the current machine's topology.
    ///
    /// Missing sources degrade to defaults: an unknown model, zero memory,
    /// and a single NUMA node holding every CPU.
    pub fn query() -> Self {
        let num_cpus = num_cpus::get();
        let numa_cpu_map = sources::numa_nodes().unwrap_or_default();
        Self::assemble(
            num_cpus,
            numa_cpu_map,
            sources::mem_total_mb().unwrap_or(0),
            sources::cpu_model().unwrap_or_else(|| "unknown".to_string()),
        )
    }

    fn assemble(
        num_cpus: usize,
        mut numa_cpu_map: Vec<Vec<usize>>,
        total_memory_mb: u64,
        cpu_model: String,
    ) -> Self {
        if numa_cpu_map.is_empty() {
            numa_cpu_map = vec![(0..num_cpus).collect()];
        }
        Self {
            num_cpus,
            num_numa_nodes: numa_cpu_map.len(),
            numa_cpu_map,
            total_memory_mb,
            cpu_model,
        }
    }

    /// CPUs of `node`, if the node exists.
    pub fn node_cpus(&self, node: usize) -> Option<&[usize]> {
        self.numa_cpu_map.get(node).map(Vec::as_slice)
    }
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "System Information:")?;
        writeln!(f, "  CPU: {}", self.cpu_model)?;
        writeln!(f, "  Cores: {}", self.num_cpus)?;
        writeln!(f, "  NUMA nodes: {}", self.num_numa_nodes)?;
        write!(f, "  Memory: {} MB", self.total_memory_mb)?;
        if self.num_numa_nodes > 1 {
            for (node, cpus) in self.numa_cpu_map.iter().enumerate() {
                write!(f, "\n  NUMA {node} CPUs: {}", format_cpu_list(cpus))?;
            }
        }
        Ok(())
    }
}

/// First `model name` value in `/proc/cpuinfo` content.
pub(crate) fn parse_cpu_model(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .find(|line| line.starts_with("model name"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, model)| model.trim().to_string())
        .filter(|model| !model.is_empty())
}

/// `MemTotal` from `/proc/meminfo` content, in MB.
pub(crate) fn parse_mem_total_mb(meminfo: &str) -> Option<u64> {
    meminfo
        .lines()
        .find_map(|line| line.strip_prefix("MemTotal:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb / 1024)
}

#[cfg(target_os = "linux")]
pub(crate) mod sources {
    use std::fs;
    use std::path::Path;

    use crate::cpu_list::parse_cpu_list;
    use crate::error::TunerError;

    const NODE_ROOT: &str = "/sys/devices/system/node";

    pub(crate) fn cpu_model() -> Option<String> {
        fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|s| super::parse_cpu_model(&s))
    }

    pub(crate) fn mem_total_mb() -> Option<u64> {
        fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|s| super::parse_mem_total_mb(&s))
    }

    /// CPUs of one node from sysfs.
    pub(crate) fn node_cpus(node: usize) -> Result<Vec<usize>, TunerError> {
        let path = Path::new(NODE_ROOT).join(format!("node{node}/cpulist"));
        let text = fs::read_to_string(path).map_err(|_| TunerError::InvalidNumaNode(node))?;
        let text = text.trim();
        if text.is_empty() {
            // Memory-only node
            return Ok(Vec::new());
        }
        Ok(parse_cpu_list(text)?)
    }

    /// Every node's CPU list, in node order; `None` when sysfs has no nodes.
    pub(crate) fn numa_nodes() -> Option<Vec<Vec<usize>>> {
        let mut ids: Vec<usize> = fs::read_dir(NODE_ROOT)
            .ok()?
            .filter_map(Result::ok)
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|name| name.strip_prefix("node"))
                    .and_then(|id| id.parse().ok())
            })
            .collect();
        if ids.is_empty() {
            return None;
        }
        ids.sort_unstable();

        let max = ids.last().copied().unwrap_or(0);
        let mut map = vec![Vec::new(); max + 1];
        for id in ids {
            map[id] = node_cpus(id).unwrap_or_default();
        }
        Some(map)
    }
}

#[cfg(not(target_os = "linux"))]
pub(crate) mod sources {
    pub(crate) fn cpu_model() -> Option<String> {
        None
    }

    pub(crate) fn mem_total_mb() -> Option<u64> {
        None
    }

    pub(crate) fn numa_nodes() -> Option<Vec<Vec<usize>>> {
        None
    }
}
