//! Timing scopes, compiled in with the `perf` feature and free otherwise.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "perf")]
use rustc_hash::FxHashMap;
#[cfg(feature = "perf")]
use std::cell::RefCell;
#[cfg(feature = "perf")]
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSample {
    pub label: &'static str,
    pub count: u64,
    pub total: Duration,
    pub max: Duration,
}

impl PerfSample {
    pub fn average(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total / count,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.count as f64),
        }
    }
}

#[cfg(feature = "perf")]
thread_local! {
    static METRICS: RefCell<FxHashMap<&'static str, PerfSample>> =
        RefCell::new(FxHashMap::default());
}

/// Records the time until drop under `label`.
#[must_use]
pub struct Scope {
    #[cfg(feature = "perf")]
    label: &'static str,
    #[cfg(feature = "perf")]
    start: Instant,
}

#[inline]
pub fn scope(label: &'static str) -> Scope {
    #[cfg(feature = "perf")]
    {
        Scope {
            label,
            start: Instant::now(),
        }
    }
    #[cfg(not(feature = "perf"))]
    {
        let _ = label;
        Scope {}
    }
}

#[cfg(feature = "perf")]
impl Drop for Scope {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let label = self.label;
        METRICS.with(|metrics| {
            let mut metrics = metrics.borrow_mut();
            let entry = metrics.entry(label).or_insert(PerfSample {
                label,
                count: 0,
                total: Duration::ZERO,
                max: Duration::ZERO,
            });
            entry.count += 1;
            entry.total += elapsed;
            entry.max = entry.max.max(elapsed);
        });
    }
}

/// Samples of the current thread, most expensive first.
pub fn snapshot() -> Vec<PerfSample> {
    #[cfg(feature = "perf")]
    let mut samples: Vec<PerfSample> =
        METRICS.with(|metrics| metrics.borrow().values().copied().collect());
    #[cfg(not(feature = "perf"))]
    let mut samples: Vec<PerfSample> = Vec::new();

    samples.sort_by(|a, b| b.total.cmp(&a.total).then(a.label.cmp(b.label)));
    samples
}

pub fn reset() {
    #[cfg(feature = "perf")]
    METRICS.with(|metrics| metrics.borrow_mut().clear());
}

/// Table of samples, one line each.
pub struct Report(pub Vec<PerfSample>);

impl Report {
    pub fn take() -> Self {
        let samples = snapshot();
        reset();
        Self(samples)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sample in &self.0 {
            writeln!(
                f,
                "{:<28} count={:<8} total_ms={:>10.3} avg_us={:>10.3} max_us={:>10.3}",
                sample.label,
                sample.count,
                sample.total.as_secs_f64() * 1000.0,
                sample.average().as_secs_f64() * 1_000_000.0,
                sample.max.as_secs_f64() * 1_000_000.0,
            )?;
        }
        Ok(())
    }
}
