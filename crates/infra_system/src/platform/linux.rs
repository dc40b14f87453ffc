use std::mem;

use super::PlatformTuner;
use crate::cpu_list::MAX_CPUS;
use crate::error::TunerError;
use crate::topology::sources;

/// `MPOL_PREFERRED` from `<linux/mempolicy.h>`.
const MPOL_PREFERRED: libc::c_int = 1;

const WORD_BITS: usize = libc::c_ulong::BITS as usize;
const MASK_WORDS: usize = MAX_CPUS / WORD_BITS;

/// Linux implementation over `sched_setaffinity`, `set_mempolicy`,
/// `mlockall` and `sched_setscheduler`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxTuner;

impl PlatformTuner for LinuxTuner {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn set_affinity(&self, cpus: &[usize]) -> Result<(), TunerError> {
        // SAFETY: cpu_set_t is a plain bit array; all-zero is the empty set.
        let mut set: libc::cpu_set_t = unsafe { mem::zeroed() };
        for &cpu in cpus {
            if cpu >= MAX_CPUS {
                return Err(TunerError::InvalidCpu {
                    cpu,
                    max: MAX_CPUS - 1,
                });
            }
            // SAFETY: cpu is within CPU_SETSIZE.
            unsafe { libc::CPU_SET(cpu, &mut set) };
        }

        // SAFETY: set is a valid, initialised cpu_set_t of the size passed.
        let rc = unsafe { libc::sched_setaffinity(0, mem::size_of::<libc::cpu_set_t>(), &set) };
        if rc != 0 {
            return Err(TunerError::last_os_error("sched_setaffinity"));
        }
        Ok(())
    }

    fn node_cpus(&self, node: usize) -> Result<Vec<usize>, TunerError> {
        sources::node_cpus(node)
    }

    fn set_preferred_node(&self, node: usize) -> Result<(), TunerError> {
        if node >= MAX_CPUS {
            return Err(TunerError::InvalidNumaNode(node));
        }
        let mut mask = [0 as libc::c_ulong; MASK_WORDS];
        mask[node / WORD_BITS] |= 1 << (node % WORD_BITS);

        // SAFETY: mask outlives the call and holds MAX_CPUS bits; the
        // kernel reads maxnode - 1 bits.
        let rc = unsafe {
            libc::syscall(
                libc::SYS_set_mempolicy,
                MPOL_PREFERRED,
                mask.as_ptr(),
                (MAX_CPUS + 1) as libc::c_ulong,
            )
        };
        if rc != 0 {
            return Err(TunerError::last_os_error("set_mempolicy"));
        }
        Ok(())
    }

    fn lock_memory(&self) -> Result<(), TunerError> {
        // SAFETY: no pointers involved.
        let rc = unsafe { libc::mlockall(libc::MCL_CURRENT | libc::MCL_FUTURE) };
        if rc != 0 {
            return Err(TunerError::last_os_error("mlockall"));
        }
        Ok(())
    }

    fn set_realtime(&self, priority: i32) -> Result<(), TunerError> {
        // SAFETY: sched_param is plain data; zero fills any padding fields.
        let mut param: libc::sched_param = unsafe { mem::zeroed() };
        param.sched_priority = priority;

        // SAFETY: param is valid for the duration of the call.
        let rc = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
        if rc != 0 {
            return Err(TunerError::last_os_error("sched_setscheduler"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_cpu_rejected_before_syscall() {
        let err = LinuxTuner.set_affinity(&[MAX_CPUS]).unwrap_err();
        assert!(matches!(err, TunerError::InvalidCpu { .. }));
    }

    #[test]
    fn test_missing_node_reported() {
        let err = LinuxTuner.node_cpus(MAX_CPUS - 1).unwrap_err();
        assert!(matches!(err, TunerError::InvalidNumaNode(_)));
    }

    #[test]
    fn test_rebind_to_current_mask_succeeds() {
        // Binding to every CPU the thread may already use is always permitted
        let cpus: Vec<usize> = (0..num_cpus::get().min(MAX_CPUS)).collect();
        let result = LinuxTuner.set_affinity(&cpus);
        if let Err(err) = &result {
            // Restricted containers may hide CPUs from the calling thread
            assert!(matches!(err, TunerError::Os { .. }), "{err}");
        }
    }
}
