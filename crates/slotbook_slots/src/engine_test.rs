#[cfg(test)]
mod tests {
    use crate::engine::{
        available_slots, candidate_window, filter_available, generate_candidates, offered_slot,
        ReservedInterval, Slot,
    };
    use crate::template::{AvailabilityRule, AvailabilityTemplate};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use chrono_tz::America::Chicago;

    // Wall-clock time in Chicago as a UTC instant.
    fn chicago(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Chicago
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("unambiguous local time")
            .with_timezone(&Utc)
    }

    fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
    }

    fn template(rules: &[(u8, &str, &str)]) -> AvailabilityTemplate {
        let rules = rules
            .iter()
            .map(|(day, start, end)| AvailabilityRule::parse(*day, start, end).unwrap());
        AvailabilityTemplate::new(Chicago, rules).unwrap()
    }

    fn monday_evening() -> AvailabilityTemplate {
        template(&[(1, "18:00", "20:00")])
    }

    fn starts(slots: &[Slot]) -> Vec<DateTime<Utc>> {
        slots.iter().map(|s| s.start).collect()
    }

    #[test]
    fn test_monday_evening_without_reservations() {
        // Sunday 2025-06-08, local midnight
        let reference = chicago(2025, 6, 8, 0, 0);
        let slots = available_slots(&monday_evening(), 7, Duration::minutes(30), &[], reference);

        // CDT is UTC-5
        assert_eq!(
            starts(&slots),
            vec![
                utc(2025, 6, 9, 23, 0),
                utc(2025, 6, 9, 23, 30),
                utc(2025, 6, 10, 0, 0),
                utc(2025, 6, 10, 0, 30),
            ]
        );
        for slot in &slots {
            assert_eq!(slot.duration(), Duration::minutes(30));
        }
    }

    #[test]
    fn test_monday_evening_with_reservation() {
        let reference = chicago(2025, 6, 8, 0, 0);
        let reserved = [ReservedInterval::new(
            chicago(2025, 6, 9, 18, 30),
            chicago(2025, 6, 9, 19, 0),
        )];
        let slots = available_slots(
            &monday_evening(),
            7,
            Duration::minutes(30),
            &reserved,
            reference,
        );

        assert_eq!(
            starts(&slots),
            vec![
                chicago(2025, 6, 9, 18, 0),
                chicago(2025, 6, 9, 19, 0),
                chicago(2025, 6, 9, 19, 30),
            ]
        );
    }

    #[test]
    fn test_reference_inside_window_keeps_only_future_slots() {
        let reference = chicago(2025, 6, 9, 19, 15);
        let slots = available_slots(&monday_evening(), 7, Duration::minutes(30), &[], reference);

        assert_eq!(starts(&slots), vec![chicago(2025, 6, 9, 19, 30)]);
    }

    #[test]
    fn test_slot_starting_at_reference_is_excluded() {
        let reference = chicago(2025, 6, 9, 19, 0);
        let slots = available_slots(&monday_evening(), 1, Duration::minutes(30), &[], reference);

        assert_eq!(starts(&slots), vec![chicago(2025, 6, 9, 19, 30)]);
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        let reference = chicago(2025, 6, 8, 0, 0);
        assert!(generate_candidates(&monday_evening(), 0, Duration::minutes(30), reference).is_empty());
    }

    #[test]
    fn test_non_positive_duration_is_empty() {
        let reference = chicago(2025, 6, 8, 0, 0);
        assert!(generate_candidates(&monday_evening(), 7, Duration::zero(), reference).is_empty());
        assert!(generate_candidates(&monday_evening(), 7, Duration::minutes(-30), reference).is_empty());
    }

    #[test]
    fn test_touching_reservations_do_not_conflict() {
        let reference = chicago(2025, 6, 8, 0, 0);
        let reserved = [
            ReservedInterval::new(chicago(2025, 6, 9, 17, 0), chicago(2025, 6, 9, 18, 0)),
            ReservedInterval::new(chicago(2025, 6, 9, 20, 0), chicago(2025, 6, 9, 21, 0)),
        ];
        let slots = available_slots(
            &monday_evening(),
            7,
            Duration::minutes(30),
            &reserved,
            reference,
        );
        assert_eq!(slots.len(), 4);
    }

    #[test]
    fn test_partial_overlap_removes_slot() {
        let reference = chicago(2025, 6, 8, 0, 0);
        let reserved = [ReservedInterval::new(
            chicago(2025, 6, 9, 19, 45),
            chicago(2025, 6, 9, 19, 50),
        )];
        let slots = available_slots(
            &monday_evening(),
            7,
            Duration::minutes(30),
            &reserved,
            reference,
        );
        assert_eq!(
            starts(&slots),
            vec![
                chicago(2025, 6, 9, 18, 0),
                chicago(2025, 6, 9, 18, 30),
                chicago(2025, 6, 9, 19, 0),
            ]
        );
    }

    #[test]
    fn test_trailing_partial_window_is_dropped() {
        let reference = chicago(2025, 6, 8, 0, 0);
        let template = template(&[(1, "18:00", "19:45")]);
        let slots = generate_candidates(&template, 7, Duration::minutes(30), reference);

        assert_eq!(slots.len(), 3);
        assert_eq!(slots[2].end, chicago(2025, 6, 9, 19, 30));
    }

    #[test]
    fn test_window_ending_at_midnight() {
        // Wednesday 2025-06-11, 23:00-24:00 local
        let reference = chicago(2025, 6, 8, 0, 0);
        let template = template(&[(3, "23:00", "24:00")]);
        let slots = generate_candidates(&template, 7, Duration::minutes(30), reference);

        assert_eq!(
            starts(&slots),
            vec![utc(2025, 6, 12, 4, 0), utc(2025, 6, 12, 4, 30)]
        );
        assert_eq!(slots[1].end, chicago(2025, 6, 12, 0, 0));
    }

    #[test]
    fn test_punch_in_schedule_over_two_weeks() {
        let reference = chicago(2025, 6, 8, 0, 0);
        let template = template(&[
            (1, "23:00", "24:00"),
            (3, "23:00", "24:00"),
            (4, "23:00", "24:00"),
            (0, "16:00", "19:00"),
        ]);
        let slots = generate_candidates(&template, 14, Duration::minutes(30), reference);

        // Two Sundays of six slots, six weeknights of two.
        assert_eq!(slots.len(), 2 * 6 + 6 * 2);
        assert!(slots.windows(2).all(|w| w[0].end <= w[1].start));
        assert_eq!(slots[0].start, chicago(2025, 6, 8, 16, 0));
    }

    #[test]
    fn test_daily_window_alternate_mode() {
        let reference = chicago(2025, 6, 8, 0, 0);
        let template = AvailabilityTemplate::daily(
            Chicago,
            "10:00".parse().unwrap(),
            "17:00".parse().unwrap(),
        )
        .unwrap();
        let slots = generate_candidates(&template, 7, Duration::minutes(60), reference);

        assert_eq!(slots.len(), 49);
        assert_eq!(slots[0].start, chicago(2025, 6, 8, 10, 0));
        assert_eq!(slots[48].end, chicago(2025, 6, 14, 17, 0));
    }

    #[test]
    fn test_spring_forward_gap_produces_no_slots() {
        // 2025-03-09 02:00-03:00 does not exist in Chicago
        let reference = chicago(2025, 3, 9, 0, 0);
        let template = template(&[(0, "01:00", "04:00")]);
        let slots = generate_candidates(&template, 1, Duration::minutes(30), reference);

        assert_eq!(
            starts(&slots),
            vec![
                utc(2025, 3, 9, 7, 0),
                utc(2025, 3, 9, 7, 30),
                utc(2025, 3, 9, 8, 0),
                utc(2025, 3, 9, 8, 30),
            ]
        );
    }

    #[test]
    fn test_fall_back_resolves_to_earlier_instant() {
        // 2025-11-02 01:00 happens twice in Chicago
        let reference = chicago(2025, 11, 2, 0, 0);
        let template = template(&[(0, "00:00", "03:00")]);
        let slots = generate_candidates(&template, 1, Duration::minutes(60), reference);

        assert_eq!(
            starts(&slots),
            vec![
                utc(2025, 11, 2, 5, 0),
                utc(2025, 11, 2, 6, 0),
                utc(2025, 11, 2, 8, 0),
            ]
        );
        assert!(slots.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn test_filter_preserves_order_and_is_pure() {
        let reference = utc(2025, 1, 1, 0, 0);
        let candidates = vec![
            Slot::new(utc(2025, 1, 3, 10, 0), Duration::minutes(30)),
            Slot::new(utc(2025, 1, 2, 10, 0), Duration::minutes(30)),
        ];
        let kept = filter_available(&candidates, &[], reference);
        assert_eq!(kept, candidates);
    }

    #[test]
    fn test_generate_candidates_is_idempotent() {
        let reference = chicago(2025, 6, 8, 9, 41);
        let first = generate_candidates(&monday_evening(), 14, Duration::minutes(30), reference);
        let second = generate_candidates(&monday_evening(), 14, Duration::minutes(30), reference);
        assert_eq!(first, second);
    }

    #[test]
    fn test_offered_slot_requires_alignment() {
        let duration = Duration::minutes(30);
        let offered = offered_slot(&monday_evening(), duration, chicago(2025, 6, 9, 18, 30));
        assert_eq!(
            offered,
            Some(Slot::new(chicago(2025, 6, 9, 18, 30), duration))
        );

        assert_eq!(offered_slot(&monday_evening(), duration, chicago(2025, 6, 9, 18, 15)), None);
        assert_eq!(offered_slot(&monday_evening(), duration, chicago(2025, 6, 10, 18, 0)), None);
        assert_eq!(offered_slot(&monday_evening(), duration, chicago(2025, 6, 9, 20, 0)), None);
    }

    #[test]
    fn test_candidate_window() {
        assert_eq!(candidate_window(&[]), None);
        let reference = chicago(2025, 6, 8, 0, 0);
        let slots = generate_candidates(&monday_evening(), 7, Duration::minutes(30), reference);
        assert_eq!(
            candidate_window(&slots),
            Some((chicago(2025, 6, 9, 18, 0), chicago(2025, 6, 9, 20, 0)))
        );
    }

    #[test]
    fn test_slot_serializes_as_rfc3339() {
        let slot = Slot::new(utc(2025, 6, 9, 23, 0), Duration::minutes(30));
        let json = serde_json::to_value(slot).unwrap();
        assert_eq!(json["start"], "2025-06-09T23:00:00Z");
        assert_eq!(json["end"], "2025-06-09T23:30:00Z");
    }
}
