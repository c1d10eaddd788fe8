use crate::grades::get_nota_border_color;
use crate::models::{ThermometerPoint, ThermometerReading, Trend};

/// Smallest change between the last two cycles that counts as a trend.
const TREND_THRESHOLD: f64 = 0.5;

/// Summarizes per-cycle averages, ordered oldest first.
pub fn read_thermometer(points: &[ThermometerPoint]) -> Option<ThermometerReading> {
    let latest = points.last()?;

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (cycles_ago, point) in points.iter().rev().enumerate() {
        let weight = recency_weight(cycles_ago);
        weighted_sum += point.average_nota * weight;
        weight_total += weight;
    }
    let weighted_nota = weighted_sum / weight_total;

    let trend = match points.len().checked_sub(2).map(|idx| &points[idx]) {
        Some(previous) => trend_between(previous.average_nota, latest.average_nota),
        None => Trend::Steady,
    };

    Some(ThermometerReading {
        weighted_nota,
        latest_nota: latest.average_nota,
        trend,
        border_color: get_nota_border_color(weighted_nota.round() as i32),
        cycle_count: points.len(),
    })
}

pub fn recency_weight(cycles_ago: usize) -> f64 {
    match cycles_ago {
        0 => 1.0,
        1 => 0.7,
        2 => 0.4,
        _ => 0.2,
    }
}

pub fn trend_between(previous: f64, latest: f64) -> Trend {
    let delta = latest - previous;
    if delta >= TREND_THRESHOLD {
        Trend::Rising
    } else if delta <= -TREND_THRESHOLD {
        Trend::Falling
    } else {
        Trend::Steady
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(cycle_id: i32, average_nota: f64) -> ThermometerPoint {
        ThermometerPoint {
            cycle_id,
            cycle_name: format!("2026.{cycle_id}"),
            starts_on: NaiveDate::from_ymd_opt(2026, cycle_id as u32, 1).unwrap(),
            average_nota,
            evaluation_count: 3,
        }
    }

    #[test]
    fn weights_follow_expected_tiers() {
        assert_eq!(recency_weight(0), 1.0);
        assert_eq!(recency_weight(1), 0.7);
        assert_eq!(recency_weight(2), 0.4);
        assert_eq!(recency_weight(3), 0.2);
        assert_eq!(recency_weight(12), 0.2);
    }

    #[test]
    fn empty_history_has_no_reading() {
        assert!(read_thermometer(&[]).is_none());
    }

    #[test]
    fn single_cycle_is_steady() {
        let reading = read_thermometer(&[point(1, 8.0)]).unwrap();
        assert_eq!(reading.trend, Trend::Steady);
        assert!((reading.weighted_nota - 8.0).abs() < 0.001);
        assert_eq!(reading.border_color, "border-green-500");
        assert_eq!(reading.cycle_count, 1);
    }

    #[test]
    fn recent_cycles_weigh_more() {
        let reading = read_thermometer(&[point(1, 4.0), point(2, 6.0), point(3, 10.0)]).unwrap();
        let expected = (10.0 * 1.0 + 6.0 * 0.7 + 4.0 * 0.4) / (1.0 + 0.7 + 0.4);
        assert!((reading.weighted_nota - expected).abs() < 0.001);
        assert_eq!(reading.latest_nota, 10.0);
        assert_eq!(reading.trend, Trend::Rising);
    }

    #[test]
    fn trend_uses_threshold() {
        assert_eq!(trend_between(6.0, 6.4), Trend::Steady);
        assert_eq!(trend_between(6.0, 6.5), Trend::Rising);
        assert_eq!(trend_between(8.0, 7.5), Trend::Falling);
        assert_eq!(trend_between(8.0, 7.6), Trend::Steady);
    }

    #[test]
    fn falling_member_gets_warning_color() {
        let reading = read_thermometer(&[point(1, 8.0), point(2, 2.0)]).unwrap();
        assert_eq!(reading.trend, Trend::Falling);
        assert_eq!(reading.border_color, "border-red-400");
    }
}
