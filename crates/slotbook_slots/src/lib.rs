// --- File: crates/slotbook_slots/src/lib.rs ---
//! Slot availability engine.
//!
//! Intersects a weekly [`AvailabilityTemplate`] with reserved intervals and yields the
//! free, future, non-overlapping slots a customer can book. Nothing in this crate does I/O.
pub mod engine;
#[cfg(test)]
mod engine_proptest;
#[cfg(test)]
mod engine_test;
pub mod template;

pub use engine::{
    available_slots, candidate_window, filter_available, generate_candidates, offered_slot,
    AvailableSlotList, CandidateSlot, ReservedInterval, Slot,
};
pub use template::{
    parse_time_zone, weekday_from_index, AvailabilityRule, AvailabilityTemplate, TemplateError,
    TimeOfDay,
};
