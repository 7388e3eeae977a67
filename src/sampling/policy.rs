//! Tick-based sampling policy and the sampler core that enforces it.

use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::LogError;
use crate::observability::metrics;
use crate::pipeline::Core;
use crate::record::{Entry, Field, Level};

const COUNTERS_PER_LEVEL: usize = 4096;

/// Admission parameters for one sampled route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    /// Length of one counting window.
    pub tick: Duration,
    /// Records admitted per key at the start of each window.
    pub first: u64,
    /// After `first`, admit every `thereafter`-th record. Zero drops them all.
    pub thereafter: u64,
}

impl SamplingPolicy {
    /// 250ms window, first record only.
    pub const DEFAULT: SamplingPolicy = SamplingPolicy {
        tick: Duration::from_millis(250),
        first: 1,
        thereafter: 0,
    };

    /// 100ms window, first two records.
    pub const RELAXED: SamplingPolicy = SamplingPolicy {
        tick: Duration::from_millis(100),
        first: 2,
        thereafter: 0,
    };

    /// Whether the `n`-th record of a window is admitted.
    pub fn admits(&self, n: u64) -> bool {
        if n <= self.first {
            return true;
        }
        self.thereafter != 0 && (n - self.first) % self.thereafter == 0
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of a sampler admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingDecision {
    Sampled,
    Dropped,
}

impl SamplingDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingDecision::Sampled => "sampled",
            SamplingDecision::Dropped => "dropped",
        }
    }
}

/// Callback invoked with every sampling decision.
pub type SamplerHook = Arc<dyn Fn(&Entry, SamplingDecision) + Send + Sync>;

#[derive(Default)]
struct Counter {
    reset_at: AtomicI64,
    count: AtomicU64,
}

impl Counter {
    /// Increments the counter for the window containing `now`, starting a new
    /// window when the current one has expired.
    fn inc_check_reset(&self, now: i64, tick: i64) -> u64 {
        let reset_after = self.reset_at.load(Ordering::Acquire);
        if reset_after > now {
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }

        self.count.store(1, Ordering::Release);
        let new_reset_after = now.saturating_add(tick);
        if self
            .reset_at
            .compare_exchange(reset_after, new_reset_after, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // Another thread reset the window first and also stored 1.
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }
        1
    }
}

struct Counters {
    slots: Box<[Counter]>,
}

impl Counters {
    fn new() -> Self {
        let slots = (0..Level::ALL.len() * COUNTERS_PER_LEVEL)
            .map(|_| Counter::default())
            .collect();
        Self { slots }
    }

    fn get(&self, level: Level, key: &str) -> &Counter {
        let slot = fnv32a(key) as usize % COUNTERS_PER_LEVEL;
        &self.slots[level.index() * COUNTERS_PER_LEVEL + slot]
    }
}

fn fnv32a(s: &str) -> u32 {
    const OFFSET: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;
    s.bytes()
        .fold(OFFSET, |hash, b| (hash ^ u32::from(b)).wrapping_mul(PRIME))
}

/// Rate-limiting core: admits the first records of each window per
/// (level, message) key and drops the rest.
///
/// Derived samplers share their parent's counters.
#[derive(Clone)]
pub struct Sampler {
    inner: Arc<dyn Core>,
    policy: SamplingPolicy,
    counters: Arc<Counters>,
    label: &'static str,
    hook: Option<SamplerHook>,
}

impl Sampler {
    /// `label` names the policy in metrics.
    pub fn new(inner: Arc<dyn Core>, policy: SamplingPolicy, label: &'static str) -> Self {
        Self {
            inner,
            policy,
            counters: Arc::new(Counters::new()),
            label,
            hook: None,
        }
    }

    pub fn with_hook(mut self, hook: SamplerHook) -> Self {
        self.hook = Some(hook);
        self
    }

    fn report(&self, entry: &Entry, decision: SamplingDecision) {
        metrics::record_sampling(self.label, decision.as_str());
        if let Some(hook) = &self.hook {
            hook(entry, decision);
        }
    }
}

impl Core for Sampler {
    fn enabled(&self, level: Level) -> bool {
        self.inner.enabled(level)
    }

    fn admit(&self, entry: &Entry) -> bool {
        if !self.enabled(entry.level) {
            return false;
        }

        let now = entry.time.timestamp_nanos_opt().unwrap_or(i64::MAX);
        let tick = i64::try_from(self.policy.tick.as_nanos()).unwrap_or(i64::MAX);
        let n = self
            .counters
            .get(entry.level, &entry.message)
            .inc_check_reset(now, tick);

        if !self.policy.admits(n) {
            self.report(entry, SamplingDecision::Dropped);
            return false;
        }
        self.report(entry, SamplingDecision::Sampled);
        self.inner.admit(entry)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), LogError> {
        self.inner.write(entry, fields)
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Core> {
        Arc::new(Self {
            inner: self.inner.with(fields),
            ..self.clone()
        })
    }

    fn sync(&self) -> Result<(), LogError> {
        self.inner.sync()
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler")
            .field("label", &self.label)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::JsonEncoder;
    use crate::pipeline::IoCore;
    use crate::sink::BufferSink;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::AtomicUsize;

    fn sampler(policy: SamplingPolicy) -> Sampler {
        let core = IoCore::new(Arc::new(JsonEncoder::new()), Arc::new(BufferSink::new()), Level::Debug);
        Sampler::new(Arc::new(core), policy, "test")
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn entry(msg: &str, ms: i64) -> Entry {
        Entry::new("worker", Level::Info, msg, at(ms))
    }

    #[test]
    fn policy_admission_rule() {
        assert!(SamplingPolicy::DEFAULT.admits(1));
        assert!(!SamplingPolicy::DEFAULT.admits(2));
        assert!(SamplingPolicy::RELAXED.admits(2));
        assert!(!SamplingPolicy::RELAXED.admits(3));

        let every_third = SamplingPolicy { tick: Duration::from_secs(1), first: 1, thereafter: 3 };
        let admitted: Vec<u64> = (1..=10).filter(|n| every_third.admits(*n)).collect();
        assert_eq!(admitted, vec![1, 4, 7, 10]);
    }

    #[test]
    fn default_policy_admits_one_per_window() {
        let s = sampler(SamplingPolicy::DEFAULT);
        assert!(s.admit(&entry("tick", 0)));
        assert!(!s.admit(&entry("tick", 10)));
        assert!(!s.admit(&entry("tick", 249)));
        assert!(s.admit(&entry("tick", 250)));
        assert!(!s.admit(&entry("tick", 260)));
    }

    #[test]
    fn relaxed_policy_admits_two_per_window() {
        let s = sampler(SamplingPolicy::RELAXED);
        assert!(s.admit(&entry("finished graph", 0)));
        assert!(s.admit(&entry("finished graph", 1)));
        assert!(!s.admit(&entry("finished graph", 2)));
        assert!(s.admit(&entry("finished graph", 100)));
    }

    #[test]
    fn keys_are_independent() {
        let s = sampler(SamplingPolicy::DEFAULT);
        assert!(s.admit(&entry("a", 0)));
        assert!(s.admit(&entry("b", 0)));

        let warn = Entry::new("worker", Level::Warn, "a", at(0));
        assert!(s.admit(&warn));
    }

    #[test]
    fn derived_sampler_shares_counters() {
        let s = sampler(SamplingPolicy::DEFAULT);
        let derived = s.with(&[Field::new("job_id", 1)]);
        assert!(s.admit(&entry("shared", 0)));
        assert!(!derived.admit(&entry("shared", 5)));
    }

    #[test]
    fn disabled_level_is_not_counted() {
        let core = IoCore::new(Arc::new(JsonEncoder::new()), Arc::new(BufferSink::new()), Level::Info);
        let s = Sampler::new(Arc::new(core), SamplingPolicy::DEFAULT, "test");
        let debug = Entry::new("worker", Level::Debug, "x", at(0));
        assert!(!s.admit(&debug));
        assert!(s.admit(&entry("x", 0)));
    }

    #[test]
    fn hook_sees_every_decision() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let counter = dropped.clone();
        let s = sampler(SamplingPolicy::DEFAULT).with_hook(Arc::new(move |_: &Entry, decision: SamplingDecision| {
            if decision == SamplingDecision::Dropped {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));
        for i in 0..5 {
            s.admit(&entry("flood", i));
        }
        assert_eq!(dropped.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(fnv32a(""), 0x811c9dc5);
        assert_eq!(fnv32a("a"), 0xe40c292c);
    }
}
