use chrono::{DateTime, Duration, Utc};
use eazypg_shared::{
    BookingStatus, CANCELLATION_CUTOFF_HOURS, FULL_REFUND_CUTOFF_HOURS, PARTIAL_REFUND_PERCENT,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// A booking can be cancelled while it still holds dates and check-in is more
/// than the cutoff away.
pub fn can_cancel(check_in: DateTime<Utc>, now: DateTime<Utc>, status: BookingStatus) -> bool {
    status.is_active() && check_in - now > Duration::hours(CANCELLATION_CUTOFF_HOURS)
}

/// Tiered refund by time left before check-in:
/// more than 168h refunds everything, more than 48h refunds half, otherwise
/// nothing. Both bounds are exclusive. Does not check `can_cancel`.
pub fn compute_refund(check_in: DateTime<Utc>, now: DateTime<Utc>, total: Decimal) -> Decimal {
    let until_check_in = check_in - now;

    if until_check_in > Duration::hours(FULL_REFUND_CUTOFF_HOURS) {
        total
    } else if until_check_in > Duration::hours(CANCELLATION_CUTOFF_HOURS) {
        (total * Decimal::from(PARTIAL_REFUND_PERCENT) / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_can_cancel_outside_cutoff() {
        let check_in = now() + Duration::hours(72);
        assert!(can_cancel(check_in, now(), BookingStatus::Confirmed));
        assert!(can_cancel(check_in, now(), BookingStatus::Pending));
    }

    #[test]
    fn test_cannot_cancel_inside_cutoff() {
        let check_in = now() + Duration::hours(24);
        assert!(!can_cancel(check_in, now(), BookingStatus::Confirmed));
    }

    #[test]
    fn test_cannot_cancel_exactly_at_cutoff() {
        let check_in = now() + Duration::hours(48);
        assert!(!can_cancel(check_in, now(), BookingStatus::Pending));
        assert!(can_cancel(check_in + Duration::seconds(1), now(), BookingStatus::Pending));
    }

    #[test]
    fn test_cannot_cancel_terminal_bookings() {
        let check_in = now() + Duration::days(30);
        for status in [
            BookingStatus::Cancelled,
            BookingStatus::Completed,
            BookingStatus::Rejected,
        ] {
            assert!(!can_cancel(check_in, now(), status), "{status} must not cancel");
        }
    }

    #[test]
    fn test_full_refund_tier() {
        let refund = compute_refund(now() + Duration::hours(200), now(), Decimal::from(1000));
        assert_eq!(refund, Decimal::from(1000));
    }

    #[test]
    fn test_half_refund_tier() {
        let refund = compute_refund(now() + Duration::hours(100), now(), Decimal::from(1000));
        assert_eq!(refund, Decimal::from(500));
    }

    #[test]
    fn test_no_refund_tier() {
        let refund = compute_refund(now() + Duration::hours(10), now(), Decimal::from(1000));
        assert_eq!(refund, Decimal::ZERO);
    }

    #[test]
    fn test_exactly_seven_days_is_half_refund() {
        let refund = compute_refund(now() + Duration::hours(168), now(), Decimal::from(1000));
        assert_eq!(refund, Decimal::from(500));
    }

    #[test]
    fn test_exactly_two_days_is_no_refund() {
        let refund = compute_refund(now() + Duration::hours(48), now(), Decimal::from(1000));
        assert_eq!(refund, Decimal::ZERO);
    }

    #[test]
    fn test_past_check_in_is_no_refund() {
        let refund = compute_refund(now() - Duration::hours(5), now(), Decimal::from(1000));
        assert_eq!(refund, Decimal::ZERO);
    }

    #[test]
    fn test_half_refund_rounds_to_cents() {
        let refund = compute_refund(now() + Duration::hours(100), now(), Decimal::new(70501, 2));
        assert_eq!(refund, Decimal::new(35251, 2));
    }
}
