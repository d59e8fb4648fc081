#![forbid(unsafe_code)]

use woonactie_contracts::MonotonicTimeMs;

/// Reassurance lines the checking screen cycles through while the simulated
/// eligibility check runs. Fixed campaign copy.
pub const REASSURANCE_LINES: [&str; 3] = [
    "85% van de plekken zijn vergeven",
    "Bespaar tot €1700 per jaar",
    "100% vrijblijvend en veilig – je zit nergens direct aan vast",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckConfig {
    pub tick_interval_ms: u64,
    pub increment_pct: u8,
    pub settle_delay_ms: u64,
    pub carousel_interval_ms: u64,
}

impl CheckConfig {
    pub fn mvp_v1() -> Self {
        Self {
            tick_interval_ms: 100,
            increment_pct: 2,
            settle_delay_ms: 500,
            carousel_interval_ms: 2_000,
        }
    }
}

/// What one tick observed. `transition_due` stays false until progress has
/// held at 100 for the settle delay; the carousel never influences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckTick {
    pub progress_pct: u8,
    pub carousel_index: u8,
    pub transition_due: bool,
}

/// Simulated eligibility check: a progress ticker and an independent
/// carousel ticker, both driven by the shell passing `now` into `on_tick`.
/// No real work happens and the check cannot fail. The whole struct is step
/// state; dropping it when the step exits is the timer teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityCheck {
    config: CheckConfig,
    started_at: MonotonicTimeMs,
    progress_pct: u8,
    carousel_index: u8,
}

impl EligibilityCheck {
    pub fn begin(config: CheckConfig, now: MonotonicTimeMs) -> Self {
        Self {
            config,
            started_at: now,
            progress_pct: 0,
            carousel_index: 0,
        }
    }

    pub fn progress_pct(&self) -> u8 {
        self.progress_pct
    }

    pub fn carousel_index(&self) -> u8 {
        self.carousel_index
    }

    pub fn carousel_line(&self) -> &'static str {
        REASSURANCE_LINES[self.carousel_index as usize % REASSURANCE_LINES.len()]
    }

    /// Display helper: a reassurance line renders as settled once progress
    /// has passed its third of the bar.
    pub fn line_completed(&self, index: u8) -> bool {
        u32::from(self.progress_pct) > (u32::from(index) + 1) * 33
    }

    /// Advance both tickers to `now`. Progress is derived from whole elapsed
    /// tick intervals, clamps at exactly 100, and never moves backwards even
    /// if the shell hands in a stale instant.
    pub fn on_tick(&mut self, now: MonotonicTimeMs) -> CheckTick {
        let tick_interval = self.config.tick_interval_ms.max(1);
        let carousel_interval = self.config.carousel_interval_ms.max(1);
        let increment = u64::from(self.config.increment_pct.max(1));
        let elapsed = now.saturating_since(self.started_at);

        let ticks_due = elapsed / tick_interval;
        let computed = ticks_due.saturating_mul(increment).min(100) as u8;
        if computed > self.progress_pct {
            self.progress_pct = computed;
        }

        self.carousel_index =
            ((elapsed / carousel_interval) % REASSURANCE_LINES.len() as u64) as u8;

        let transition_due = self.progress_pct >= 100
            && now >= self.full_at().saturating_add(self.config.settle_delay_ms);
        CheckTick {
            progress_pct: self.progress_pct,
            carousel_index: self.carousel_index,
            transition_due,
        }
    }

    /// When the shell should call `on_tick` next: the nearest of the next
    /// progress tick, the next carousel advance, or the settle deadline.
    pub fn next_wake_at(&self, now: MonotonicTimeMs) -> MonotonicTimeMs {
        let tick_interval = self.config.tick_interval_ms.max(1);
        let carousel_interval = self.config.carousel_interval_ms.max(1);
        let elapsed = now.saturating_since(self.started_at);
        let next_carousel = self
            .started_at
            .saturating_add(((elapsed / carousel_interval) + 1).saturating_mul(carousel_interval));

        if self.progress_pct >= 100 {
            let settle_deadline = self.full_at().saturating_add(self.config.settle_delay_ms);
            if now >= settle_deadline {
                return now;
            }
            return settle_deadline.min(next_carousel);
        }
        let next_tick = self
            .started_at
            .saturating_add(((elapsed / tick_interval) + 1).saturating_mul(tick_interval));
        next_tick.min(next_carousel)
    }

    /// Instant the bar reaches 100, independent of how often the shell
    /// actually ticked.
    fn full_at(&self) -> MonotonicTimeMs {
        let tick_interval = self.config.tick_interval_ms.max(1);
        let increment = u64::from(self.config.increment_pct.max(1));
        let ticks_to_full = 100u64.div_ceil(increment);
        self.started_at
            .saturating_add(ticks_to_full.saturating_mul(tick_interval))
    }
}
