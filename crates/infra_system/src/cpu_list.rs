//! CPU list parsing and formatting (`0,2-4` notation).

use std::collections::BTreeSet;

use crate::error::CpuListError;

/// Number of CPUs addressable by an affinity mask.
pub const MAX_CPUS: usize = 1024;

/// Parses a comma-separated list of CPU indices and inclusive ranges.
///
/// Returns the sorted, duplicate-free union. Whitespace around tokens is
/// ignored; blank tokens, descending ranges and indices `>= MAX_CPUS` are
/// rejected.
///
/// # Examples
/// ```
/// use infra_system::parse_cpu_list;
///
/// assert_eq!(parse_cpu_list("0,2-4").unwrap(), vec![0, 2, 3, 4]);
/// assert_eq!(parse_cpu_list("1,1,2").unwrap(), vec![1, 2]);
/// assert!(parse_cpu_list("3-1").is_err());
/// ```
pub fn parse_cpu_list(input: &str) -> Result<Vec<usize>, CpuListError> {
    if input.trim().is_empty() {
        return Err(CpuListError::Empty);
    }

    let mut cpus = BTreeSet::new();
    for (position, token) in input.split(',').enumerate() {
        let token = token.trim();
        if token.is_empty() {
            return Err(CpuListError::EmptyToken(position));
        }

        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_index(start)?;
                let end = parse_index(end)?;
                if end < start {
                    return Err(CpuListError::DescendingRange { start, end });
                }
                cpus.extend(start..=end);
            }
            None => {
                cpus.insert(parse_index(token)?);
            }
        }
    }

    Ok(cpus.into_iter().collect())
}

fn parse_index(token: &str) -> Result<usize, CpuListError> {
    let token = token.trim();
    let cpu: usize = token
        .parse()
        .map_err(|_| CpuListError::InvalidIndex(token.to_string()))?;
    if cpu >= MAX_CPUS {
        return Err(CpuListError::OutOfRange {
            cpu,
            max: MAX_CPUS - 1,
        });
    }
    Ok(cpu)
}

/// Formats CPU indices compactly, collapsing consecutive runs into ranges.
///
/// Input need not be sorted; duplicates are dropped.
///
/// # Examples
/// ```
/// use infra_system::format_cpu_list;
///
/// assert_eq!(format_cpu_list(&[4, 0, 2, 3]), "0,2-4");
/// assert_eq!(format_cpu_list(&[]), "");
/// ```
pub fn format_cpu_list(cpus: &[usize]) -> String {
    let sorted: BTreeSet<usize> = cpus.iter().copied().collect();
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for cpu in sorted {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == cpu => *end = cpu,
            _ => runs.push((cpu, cpu)),
        }
    }

    runs.iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
