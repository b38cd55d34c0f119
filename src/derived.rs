use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Price the strike page measures the market against.
pub const STRIKE_TARGET_PRICE: f64 = 16.00;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_millis: i64,
}

impl Countdown {
    pub fn is_finished(&self) -> bool {
        self.total_millis == 0
    }
}

/// Time remaining until `target`. A target at or before `now` yields an
/// all-zero countdown.
pub fn countdown_to(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let diff = (target - now).num_milliseconds();
    if diff <= 0 {
        return Countdown::default();
    }

    Countdown {
        days: diff / MS_PER_DAY,
        hours: (diff % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (diff % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (diff % MS_PER_MINUTE) / MS_PER_SECOND,
        total_millis: diff,
    }
}

/// Whole days until `target`, rounded up. Negative once the target has passed.
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff = (target - now).num_milliseconds();
    let whole = diff.div_euclid(MS_PER_DAY);
    if diff.rem_euclid(MS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Percentage by which `actual` deviates from `target`. Callers must not pass
/// a zero target.
pub fn calculate_deviation(actual: f64, target: f64) -> f64 {
    ((actual - target) / target) * 100.0
}

/// Deviation of the current price from a strike target, usually
/// [`STRIKE_TARGET_PRICE`].
pub fn calculate_reality_gap(current_price: f64, target_price: f64) -> f64 {
    calculate_deviation(current_price, target_price)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OtcProjection {
    pub coins: f64,
    pub proceeds: f64,
    pub profit: f64,
    /// Return on investment, in percent.
    pub roi: f64,
}

/// Projected outcome of buying OTC at `cost_basis` and selling at
/// `exit_price`. `investment` and `cost_basis` must be non-zero.
pub fn calculate_otc_profit(investment: f64, cost_basis: f64, exit_price: f64) -> OtcProjection {
    let coins = investment / cost_basis;
    let proceeds = coins * exit_price;
    let profit = proceeds - investment;
    let roi = (profit / investment) * 100.0;

    OtcProjection {
        coins,
        proceeds,
        profit,
        roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 4, 12, 0, 0).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_countdown_past_target_is_zero() {
        let countdown = countdown_to(now() - Duration::seconds(1), now());
        assert_eq!(countdown, Countdown::default());
        assert!(countdown.is_finished());
        assert_eq!(countdown_to(now(), now()), Countdown::default());
    }

    #[test]
    fn test_countdown_ninety_seconds() {
        let countdown = countdown_to(now() + Duration::milliseconds(90_000), now());
        assert_eq!(
            countdown,
            Countdown {
                days: 0,
                hours: 0,
                minutes: 1,
                seconds: 30,
                total_millis: 90_000,
            }
        );
    }

    #[test]
    fn test_countdown_decomposition() {
        let remaining = Duration::days(3) + Duration::hours(4) + Duration::minutes(5)
            + Duration::seconds(6) + Duration::milliseconds(700);
        let countdown = countdown_to(now() + remaining, now());
        assert_eq!(countdown.days, 3);
        assert_eq!(countdown.hours, 4);
        assert_eq!(countdown.minutes, 5);
        assert_eq!(countdown.seconds, 6);
        assert_eq!(countdown.total_millis, remaining.num_milliseconds());
        assert!(!countdown.is_finished());
    }

    #[test]
    fn test_days_until_rounds_up() {
        assert_eq!(days_until(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until(now() + Duration::days(2), now()), 2);
        assert_eq!(days_until(now() + Duration::hours(49), now()), 3);
        assert_eq!(days_until(now(), now()), 0);
        assert_eq!(days_until(now() - Duration::hours(36), now()), -1);
    }

    #[test]
    fn test_calculate_deviation() {
        let deviation = calculate_deviation(46_200_000.0, 4_200_000_000.0);
        assert!((deviation - -98.9).abs() < 0.01);
        assert!(close(calculate_deviation(110.0, 100.0), 10.0));
    }

    #[test]
    fn test_reality_gap() {
        assert!(close(calculate_reality_gap(16.0, STRIKE_TARGET_PRICE), 0.0));
        assert!(close(calculate_reality_gap(0.8, STRIKE_TARGET_PRICE), -95.0));
        assert!(close(calculate_reality_gap(1.5, 2.0), -25.0));
    }

    #[test]
    fn test_otc_profit() {
        let projection = calculate_otc_profit(1_000.0, 0.10, 16.00);
        assert!(close(projection.coins, 10_000.0));
        assert!(close(projection.proceeds, 160_000.0));
        assert!(close(projection.profit, 159_000.0));
        assert!(close(projection.roi, 15_900.0));
    }

    #[test]
    fn test_otc_loss() {
        let projection = calculate_otc_profit(500.0, 1.0, 0.5);
        assert!(close(projection.profit, -250.0));
        assert!(close(projection.roi, -50.0));
    }
}
