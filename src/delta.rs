// Counter deltas between two samples of one interface.
//
// Preference: 64-bit (HC) counter in both samples, then 32-bit. A negative
// difference is one wraparound of that width. A changed discontinuity marker
// voids the interval regardless of the arithmetic.

use crate::models::{CounterSlot, RawValue, Sample};

const WRAP_32: u64 = 1 << 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterWidth {
    Narrow,
    Wide,
}

/// Non-fatal per-counter outcome; the metric is omitted for this interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterCondition {
    Missing(CounterSlot),
    Unreadable { slot: CounterSlot, reply: String },
    /// Discontinuity marker changed or appeared since the previous sample.
    Reset,
    NoElapsedTime,
    /// Neither ifSpeed nor ifHighSpeed gives a usable link speed.
    SpeedAmbiguous,
}

impl std::fmt::Display for CounterCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterCondition::Missing(slot) => write!(f, "counter {} missing", slot),
            CounterCondition::Unreadable { slot, reply } => {
                write!(f, "counter {} unreadable ('{}')", slot, reply)
            }
            CounterCondition::Reset => f.write_str("counters reset"),
            CounterCondition::NoElapsedTime => f.write_str("no elapsed time"),
            CounterCondition::SpeedAmbiguous => f.write_str("link speed ambiguous"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub delta: u64,
    pub width: CounterWidth,
    /// `delta / elapsed`, per second.
    pub rate: f64,
}

/// Difference of a 64-bit counter, one wrap at 2^64.
pub fn wide_delta(now: u64, prev: u64) -> u64 {
    now.wrapping_sub(prev)
}

/// Difference of a 32-bit counter, one wrap at 2^32.
pub fn narrow_delta(now: u64, prev: u64) -> u64 {
    if now >= prev {
        now - prev
    } else {
        (WRAP_32 + now).saturating_sub(prev)
    }
}

/// `Some(condition)` when the device signals a counter discontinuity.
pub fn discontinuity(current: &Sample, previous: &Sample) -> Option<CounterCondition> {
    let now = current.get(CounterSlot::CounterDiscontinuityTime);
    if !now.is_present() {
        return None;
    }
    (now != previous.get(CounterSlot::CounterDiscontinuityTime)).then_some(CounterCondition::Reset)
}

/// Rate of one logical counter across `elapsed` seconds.
pub fn compute(
    current: &Sample,
    previous: &Sample,
    elapsed: u64,
    narrow: CounterSlot,
    wide: Option<CounterSlot>,
) -> Result<Delta, CounterCondition> {
    if elapsed == 0 {
        return Err(CounterCondition::NoElapsedTime);
    }
    if let Some(reset) = discontinuity(current, previous) {
        return Err(reset);
    }

    let both = |slot: CounterSlot| -> Option<(u64, u64)> {
        Some((current.counter(slot)?, previous.counter(slot)?))
    };
    let finish = |delta: u64, width: CounterWidth| Delta {
        delta,
        width,
        rate: delta as f64 / elapsed as f64,
    };

    if let Some(slot) = wide
        && let Some((now, prev)) = both(slot)
    {
        return Ok(finish(wide_delta(now, prev), CounterWidth::Wide));
    }
    if let Some((now, prev)) = both(narrow) {
        return Ok(finish(narrow_delta(now, prev), CounterWidth::Narrow));
    }

    for slot in wide.into_iter().chain(std::iter::once(narrow)) {
        for sample in [current, previous] {
            if let RawValue::Unreadable(reply) = sample.get(slot) {
                return Err(CounterCondition::Unreadable {
                    slot,
                    reply: reply.clone(),
                });
            }
        }
    }
    Err(CounterCondition::Missing(narrow))
}
