// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Solver configuration.
//!
//! `SolverConfig` is immutable once built; use `SolverBuilder` to change the
//! defaults.

use shuttle_model::objective::TieBreak;
use std::{
    sync::{Arc, atomic::AtomicBool},
    time::Duration,
};

/// How many leading guests the parallel mode pre-assigns by default.
pub const DEFAULT_SPLIT_DEPTH: usize = 3;

/// Settings for one or more calls to [`crate::solver::Solver::solve`].
#[derive(Debug, Clone)]
pub struct SolverConfig {
    time_limit: Option<Duration>,
    num_workers: usize,
    split_depth: usize,
    tie_break: TieBreak,
    diagnose: bool,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Default for SolverConfig {
    #[inline]
    fn default() -> Self {
        Self {
            time_limit: None,
            num_workers: 1,
            split_depth: DEFAULT_SPLIT_DEPTH,
            tie_break: TieBreak::FewerTrips,
            diagnose: true,
            interrupt: None,
        }
    }
}

impl SolverConfig {
    #[inline]
    pub fn builder() -> SolverBuilder {
        SolverBuilder::new()
    }

    /// The wall-clock budget of a solve, if any.
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn has_time_limit(&self) -> bool {
        self.time_limit.is_some()
    }

    /// The number of worker threads; always at least one.
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    #[inline]
    pub fn split_depth(&self) -> usize {
        self.split_depth
    }

    #[inline]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Whether infeasible instances are classified by solving relaxations.
    #[inline]
    pub fn diagnose(&self) -> bool {
        self.diagnose
    }

    #[inline]
    pub fn interrupt(&self) -> Option<&Arc<AtomicBool>> {
        self.interrupt.as_ref()
    }
}

impl std::fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverConfig(time_limit: {:?}, workers: {}, split_depth: {}, tie_break: {}, diagnose: {})",
            self.time_limit, self.num_workers, self.split_depth, self.tie_break, self.diagnose
        )
    }
}

/// Fluent builder for [`SolverConfig`].
///
/// # Examples
///
/// ```rust
/// # use shuttle_solver::config::SolverBuilder;
/// # use std::time::Duration;
///
/// let config = SolverBuilder::new()
///     .with_time_limit(Duration::from_secs(15))
///     .with_num_workers(4)
///     .build();
/// assert_eq!(config.num_workers(), 4);
/// assert!(config.diagnose());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverBuilder {
    config: SolverConfig,
}

impl SolverBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.config.time_limit = Some(limit);
        self
    }

    /// Sets the number of worker threads. Zero is treated as one.
    #[inline]
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.config.num_workers = num_workers.max(1);
        self
    }

    #[inline]
    pub fn with_split_depth(mut self, split_depth: usize) -> Self {
        self.config.split_depth = split_depth;
        self
    }

    #[inline]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.tie_break = tie_break;
        self
    }

    #[inline]
    pub fn with_diagnosis(mut self, diagnose: bool) -> Self {
        self.config.diagnose = diagnose;
        self
    }

    /// Stops every running search once `flag` is set.
    #[inline]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.config.interrupt = Some(flag);
        self
    }

    #[inline]
    pub fn build(self) -> SolverConfig {
        self.config
    }
}

impl From<SolverConfig> for SolverBuilder {
    #[inline]
    fn from(config: SolverConfig) -> Self {
        Self { config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit(), None);
        assert!(!config.has_time_limit());
        assert_eq!(config.num_workers(), 1);
        assert_eq!(config.split_depth(), DEFAULT_SPLIT_DEPTH);
        assert_eq!(config.tie_break(), TieBreak::FewerTrips);
        assert!(config.diagnose());
        assert!(config.interrupt().is_none());
    }

    #[test]
    fn test_zero_workers_means_one() {
        let config = SolverBuilder::new().with_num_workers(0).build();
        assert_eq!(config.num_workers(), 1);
    }

    #[test]
    fn test_rebuild_from_config_keeps_settings() {
        let flag = Arc::new(AtomicBool::new(false));
        let config = SolverConfig::builder()
            .with_split_depth(5)
            .with_diagnosis(false)
            .with_interrupt(flag.clone())
            .build();
        let changed = SolverBuilder::from(config)
            .with_tie_break(TieBreak::WaitOnly)
            .build();
        assert_eq!(changed.split_depth(), 5);
        assert!(!changed.diagnose());
        assert_eq!(changed.tie_break(), TieBreak::WaitOnly);
        assert!(Arc::ptr_eq(changed.interrupt().unwrap(), &flag));
    }
}
