// --- File: crates/slotbook_slots/src/engine.rs ---
use crate::template::AvailabilityTemplate;
use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A bookable interval `[start, end)` in absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Slots straight out of the template, before reserved time is removed.
pub type CandidateSlot = Slot;

/// Ascending, conflict-free, strictly future slots.
pub type AvailableSlotList = Vec<Slot>;

/// Time already taken on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReservedInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

impl Slot {
    pub fn new(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap test. Intervals that merely touch do not conflict.
    pub fn conflicts_with(&self, reserved: &ReservedInterval) -> bool {
        self.start < reserved.end && self.end > reserved.start
    }
}

// Earlier instant on DST fall-back, nothing inside a spring-forward gap.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Expands the template into concrete slots for `horizon_days` calendar days, starting with the
/// local date of `reference` in the template's time zone.
///
/// Each day's window is tiled from its start in steps of `slot_duration`; a trailing piece that
/// does not fit a whole slot is dropped. Output is ascending by start.
pub fn generate_candidates(
    template: &AvailabilityTemplate,
    horizon_days: u32,
    slot_duration: Duration,
    reference: DateTime<Utc>,
) -> Vec<CandidateSlot> {
    if slot_duration <= Duration::zero() {
        return Vec::new();
    }
    let tz = template.time_zone();
    let first_day = reference.with_timezone(&tz).date_naive();
    let mut slots = Vec::new();

    for offset in 0..horizon_days {
        let Some(date) = first_day.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        let Some(rule) = template.rule_for(date.weekday()) else {
            continue;
        };
        let midnight = date.and_time(NaiveTime::MIN);
        let window_end = midnight + rule.end.offset();
        let mut local = midnight + rule.start.offset();

        while local + slot_duration <= window_end {
            match resolve_local(tz, local) {
                Some(start) => slots.push(Slot::new(start, slot_duration)),
                None => debug!("Skipping non-existent local time {} in {}", local, tz),
            }
            local += slot_duration;
        }
    }

    slots
}

/// Keeps candidates that overlap no reserved interval and start strictly after `reference`.
/// Input order is preserved.
pub fn filter_available(
    candidates: &[CandidateSlot],
    reserved: &[ReservedInterval],
    reference: DateTime<Utc>,
) -> AvailableSlotList {
    candidates
        .iter()
        .filter(|slot| slot.start > reference)
        .filter(|slot| !reserved.iter().any(|r| slot.conflicts_with(r)))
        .copied()
        .collect()
}

pub fn available_slots(
    template: &AvailabilityTemplate,
    horizon_days: u32,
    slot_duration: Duration,
    reserved: &[ReservedInterval],
    reference: DateTime<Utc>,
) -> AvailableSlotList {
    let candidates = generate_candidates(template, horizon_days, slot_duration, reference);
    let available = filter_available(&candidates, reserved, reference);
    debug!(
        "{} of {} candidate slots available ({} reserved intervals)",
        available.len(),
        candidates.len(),
        reserved.len()
    );
    available
}

/// The slot the template offers beginning exactly at `start`, if any.
pub fn offered_slot(
    template: &AvailabilityTemplate,
    slot_duration: Duration,
    start: DateTime<Utc>,
) -> Option<Slot> {
    generate_candidates(template, 1, slot_duration, start)
        .into_iter()
        .find(|slot| slot.start == start)
}

/// Span from the first slot's start to the last slot's end.
pub fn candidate_window(slots: &[Slot]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = slots.first()?;
    let last = slots.last()?;
    Some((first.start, last.end))
}
