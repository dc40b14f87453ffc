//! Error types for environment tuning.

use std::io;

/// Errors from parsing a CPU list such as `0,2-4`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CpuListError {
    /// The list contained no tokens.
    #[error("CPU list is empty")]
    Empty,

    /// A token between commas was blank.
    #[error("Empty token at position {0} in CPU list")]
    EmptyToken(usize),

    /// A token was not a non-negative integer.
    #[error("Invalid CPU index '{0}'")]
    InvalidIndex(String),

    /// A range ended before it started.
    #[error("CPU range {start}-{end} is descending")]
    DescendingRange {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
    },

    /// A CPU index exceeded the supported maximum.
    #[error("CPU index {cpu} exceeds the maximum of {max}")]
    OutOfRange {
        /// Offending index.
        cpu: usize,
        /// Largest accepted index.
        max: usize,
    },
}

/// Errors from applying a tuning feature.
#[derive(Debug, thiserror::Error)]
pub enum TunerError {
    /// The platform has no implementation of the feature.
    #[error("{feature} is not supported on this platform")]
    Unsupported {
        /// Feature name.
        feature: &'static str,
    },

    /// An OS call failed; `source` carries errno.
    #[error("{call} failed: {source}")]
    Os {
        /// Failing call.
        call: &'static str,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A CPU index is outside the supported range.
    #[error("CPU {cpu} is out of range (maximum {max})")]
    InvalidCpu {
        /// Offending index.
        cpu: usize,
        /// Largest accepted index.
        max: usize,
    },

    /// The NUMA node does not exist.
    #[error("NUMA node {0} does not exist")]
    InvalidNumaNode(usize),

    /// An affinity request named no CPUs.
    #[error("CPU set is empty")]
    EmptyCpuSet,

    /// Heap prefaulting could not reserve the requested size.
    #[error("cannot prefault {size_mb} MB of heap: {reason}")]
    Prefault {
        /// Requested size.
        size_mb: usize,
        /// Why the reservation failed.
        reason: String,
    },

    /// A CPU list could not be parsed.
    #[error(transparent)]
    CpuList(#[from] CpuListError),
}

impl TunerError {
    /// Captures `errno` for a failed call.
    pub fn last_os_error(call: &'static str) -> Self {
        Self::Os {
            call,
            source: io::Error::last_os_error(),
        }
    }

    /// Returns `true` when the failure is a missing platform capability
    /// rather than a rejected request.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}
