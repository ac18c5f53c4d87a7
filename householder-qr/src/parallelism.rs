//! Execution policy for the parallel code paths

/// How independent work items are scheduled
///
/// `Rayon` spreads trailing-column updates and per-right-hand-side solves
/// over the global rayon pool. Work smaller than [`MIN_PARALLEL_WORK`]
/// scalar operations is always run sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    #[default]
    None,
    Rayon,
}

/// Smallest amount of work (in scalar updates) handed to the pool
pub const MIN_PARALLEL_WORK: usize = 1 << 12;

impl Parallelism {
    /// True when `work` scalar operations should be split across threads
    #[inline]
    pub fn should_split(self, work: usize) -> bool {
        matches!(self, Parallelism::Rayon) && work >= MIN_PARALLEL_WORK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_split() {
        assert!(!Parallelism::None.should_split(usize::MAX));
        assert!(!Parallelism::Rayon.should_split(10));
        assert!(Parallelism::Rayon.should_split(MIN_PARALLEL_WORK));
    }
}
