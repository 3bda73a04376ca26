#[cfg(test)]
mod tests {
    use crate::engine::{available_slots, filter_available, generate_candidates, ReservedInterval};
    use crate::template::{AvailabilityTemplate, TimeOfDay};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    fn base_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
    }

    fn daily_utc(start_minute: u32, end_minute: u32) -> AvailabilityTemplate {
        let start = TimeOfDay::from_hm(start_minute / 60, start_minute % 60).unwrap();
        let end = TimeOfDay::from_hm(end_minute / 60, end_minute % 60).unwrap();
        AvailabilityTemplate::daily(Tz::UTC, start, end).unwrap()
    }

    fn reserved_strategy() -> impl Strategy<Value = Vec<ReservedInterval>> {
        prop::collection::vec((0..7 * 1440i64, 1..240i64), 0..8).prop_map(|raw| {
            raw.into_iter()
                .map(|(offset, len)| {
                    let start = base_day() + Duration::minutes(offset);
                    ReservedInterval::new(start, start + Duration::minutes(len))
                })
                .collect()
        })
    }

    proptest! {
        // Number of slots per window is floor(window / duration)
        #[test]
        fn test_slot_count_matches_window(
            start_minute in 0..1440u32,
            end_minute in 1..=1440u32,
            duration_minutes in 1..180i64,
            horizon in 0..10u32,
        ) {
            prop_assume!(start_minute < end_minute);
            let template = daily_utc(start_minute, end_minute);
            let slots = generate_candidates(
                &template,
                horizon,
                Duration::minutes(duration_minutes),
                base_day(),
            );

            let per_day = i64::from(end_minute - start_minute) / duration_minutes;
            prop_assert_eq!(slots.len() as i64, per_day * i64::from(horizon));
        }

        // Available slots are ascending, disjoint, in the future and clear of reservations
        #[test]
        fn test_available_slots_are_consistent(
            start_minute in 0..1440u32,
            end_minute in 1..=1440u32,
            duration_minutes in 5..120i64,
            reference_offset in 0..(3 * 1440i64),
            reserved in reserved_strategy(),
        ) {
            prop_assume!(start_minute < end_minute);
            let template = daily_utc(start_minute, end_minute);
            let reference = base_day() + Duration::minutes(reference_offset);
            let slots = available_slots(
                &template,
                7,
                Duration::minutes(duration_minutes),
                &reserved,
                reference,
            );

            for pair in slots.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start,
                    "Slots overlap or are out of order: {:?} then {:?}", pair[0], pair[1]);
            }
            for slot in &slots {
                prop_assert!(slot.start > reference);
                for r in &reserved {
                    prop_assert!(!(slot.start < r.end && slot.end > r.start),
                        "Slot {:?} conflicts with {:?}", slot, r);
                }
            }
        }

        // With nothing reserved only the future filter applies
        #[test]
        fn test_empty_reserved_only_filters_past(
            start_minute in 0..1440u32,
            end_minute in 1..=1440u32,
            duration_minutes in 5..120i64,
            reference_offset in 0..(3 * 1440i64),
        ) {
            prop_assume!(start_minute < end_minute);
            let template = daily_utc(start_minute, end_minute);
            let reference = base_day() + Duration::minutes(reference_offset);
            let candidates = generate_candidates(
                &template,
                7,
                Duration::minutes(duration_minutes),
                reference,
            );

            let expected: Vec<_> = candidates
                .iter()
                .filter(|c| c.start > reference)
                .copied()
                .collect();
            prop_assert_eq!(filter_available(&candidates, &[], reference), expected);
        }

        #[test]
        fn test_generation_is_deterministic(
            start_minute in 0..1440u32,
            end_minute in 1..=1440u32,
            duration_minutes in 1..120i64,
            reference_offset in 0..1440i64,
        ) {
            prop_assume!(start_minute < end_minute);
            let template = daily_utc(start_minute, end_minute);
            let reference = base_day() + Duration::minutes(reference_offset);
            let duration = Duration::minutes(duration_minutes);

            prop_assert_eq!(
                generate_candidates(&template, 7, duration, reference),
                generate_candidates(&template, 7, duration, reference)
            );
        }
    }
}
