use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingSummary {
    pub average: Decimal,
    pub count: i32,
}

/// Unweighted mean of overall ratings, rounded to two places.
/// `None` when there is nothing to average.
pub fn average_rating(overall: &[i16]) -> Option<RatingSummary> {
    if overall.is_empty() {
        return None;
    }

    let sum: i64 = overall.iter().map(|r| i64::from(*r)).sum();
    let count = overall.len() as i64;
    let average = (Decimal::from(sum) / Decimal::from(count)).round_dp(2);

    Some(RatingSummary {
        average,
        count: count as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ratings() {
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn test_single_rating() {
        let summary = average_rating(&[4]).unwrap();
        assert_eq!(summary.average, Decimal::from(4));
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn test_mean_is_unweighted() {
        let summary = average_rating(&[5, 4, 3, 5]).unwrap();
        assert_eq!(summary.average, Decimal::new(425, 2));
        assert_eq!(summary.count, 4);
    }

    #[test]
    fn test_mean_rounds_to_two_places() {
        let summary = average_rating(&[5, 4, 4]).unwrap();
        assert_eq!(summary.average, Decimal::new(433, 2));
    }
}
