//! Chart Data Shaping
//!
//! Pure functions turning server aggregates into rows a dashboard can plot
//! directly. Nothing here talks to the network.

use crate::model::{
    Award, AwardType, AwardTypeCount, BehaviorTimeSeries, DimensionAnalysis, ReportFilter,
    ScoreSummary,
};
use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// Dashboard time range presets, resolved against "today"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    Last7Days,
    #[default]
    Last30Days,
    Last90Days,
    LastYear,
    All,
}

impl TimeRange {
    /// First day of the range; `None` means unbounded
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeRange::Last7Days => today.checked_sub_days(Days::new(7)),
            TimeRange::Last30Days => today.checked_sub_days(Days::new(30)),
            TimeRange::Last90Days => today.checked_sub_days(Days::new(90)),
            TimeRange::LastYear => today.checked_sub_months(Months::new(12)),
            TimeRange::All => None,
        }
    }

    /// Set the filter's date bounds for this range, ending today
    pub fn apply(&self, filter: &mut ReportFilter, today: NaiveDate) {
        filter.start_date = self.start(today);
        filter.end_date = Some(today);
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7days" => Ok(TimeRange::Last7Days),
            "30days" => Ok(TimeRange::Last30Days),
            "90days" => Ok(TimeRange::Last90Days),
            "year" => Ok(TimeRange::LastYear),
            "all" => Ok(TimeRange::All),
            other => Err(format!(
                "unknown time range '{other}' (expected 7days, 30days, 90days, year or all)"
            )),
        }
    }
}

/// One date on the behavior trend chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    pub date: String,
    pub positive_count: u64,
    pub negative_count: u64,
    pub positive_points: i64,
    pub negative_points: i64,
    pub net_points: i64,
}

fn empty_row(date: &str) -> TrendRow {
    TrendRow {
        date: date.to_string(),
        positive_count: 0,
        negative_count: 0,
        positive_points: 0,
        negative_points: 0,
        net_points: 0,
    }
}

/// Join the positive and negative series on date. A date present on only
/// one side gets zeros for the other. Rows are ordered by date.
pub fn merge_time_series(series: &BehaviorTimeSeries) -> Vec<TrendRow> {
    let mut rows: BTreeMap<&str, TrendRow> = BTreeMap::new();

    for point in &series.positive_series {
        let row = rows
            .entry(point.date.as_str())
            .or_insert_with(|| empty_row(&point.date));
        row.positive_count += point.count;
        row.positive_points += point.points;
    }
    for point in &series.negative_series {
        let row = rows
            .entry(point.date.as_str())
            .or_insert_with(|| empty_row(&point.date));
        row.negative_count += point.count;
        row.negative_points += point.points;
    }

    rows.into_values()
        .map(|mut row| {
            row.net_points = row.positive_points - row.negative_points;
            row
        })
        .collect()
}

/// Dimensions ordered by net points, best first; ties broken by name
pub fn rank_dimensions(mut dimensions: Vec<DimensionAnalysis>) -> Vec<DimensionAnalysis> {
    dimensions.sort_by(|a, b| {
        b.net_points
            .cmp(&a.net_points)
            .then_with(|| a.dimension_name.cmp(&b.dimension_name))
    });
    dimensions
}

/// A labelled slice of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: u64,
    /// 0.0 to 100.0
    pub percent: f64,
}

fn shares<'a>(counts: impl Iterator<Item = (&'a str, u64)>) -> Vec<Share> {
    let counts: Vec<(&str, u64)> = counts.collect();
    let total: u64 = counts.iter().map(|(_, c)| c).sum();

    counts
        .into_iter()
        .map(|(label, count)| Share {
            label: label.to_string(),
            count,
            percent: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}

/// Percentages for the award-type pie chart
pub fn award_type_shares(by_type: &[AwardTypeCount]) -> Vec<Share> {
    shares(by_type.iter().map(|t| (t.award_type.as_str(), t.count)))
}

/// Dimension score bars from a score summary, highest first
pub fn dimension_bars(summary: &ScoreSummary) -> Vec<(String, i64)> {
    let mut bars: Vec<(String, i64)> = summary
        .dimension_scores
        .iter()
        .map(|(name, points)| (name.clone(), *points))
        .collect();
    bars.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    bars
}

/// Headline numbers for a list of awards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardMetrics {
    pub total: usize,
    pub distinct_students: usize,
    pub last_30_days: usize,
    /// Mean level of star awards, 0 when there are none
    pub average_star_level: f64,
    pub by_type: Vec<Share>,
}

impl AwardMetrics {
    pub fn from_awards(awards: &[Award], today: NaiveDate) -> Self {
        let cutoff = today.checked_sub_days(Days::new(30)).unwrap_or(NaiveDate::MIN);

        let distinct_students = awards.iter().map(|a| a.student).collect::<HashSet<_>>().len();
        let last_30_days = awards.iter().filter(|a| a.award_date >= cutoff).count();

        let stars: Vec<i32> = awards
            .iter()
            .filter(|a| a.award_type == AwardType::Star)
            .map(|a| a.level)
            .collect();
        let average_star_level = if stars.is_empty() {
            0.0
        } else {
            stars.iter().map(|&l| f64::from(l)).sum::<f64>() / stars.len() as f64
        };

        let types = [
            AwardType::Star,
            AwardType::Badge,
            AwardType::Certificate,
            AwardType::Other,
        ];
        let by_type = shares(types.iter().map(|t| {
            let count = awards.iter().filter(|a| a.award_type == *t).count() as u64;
            (t.label(), count)
        }));

        Self {
            total: awards.len(),
            distinct_students,
            last_30_days,
            average_star_level,
            by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeSeriesPoint;

    fn point(date: &str, count: u64, points: i64) -> TimeSeriesPoint {
        TimeSeriesPoint {
            date: date.to_string(),
            count,
            points,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_merge_aligns_by_date() {
        let series = BehaviorTimeSeries {
            positive_series: vec![point("2024-09-02", 3, 7), point("2024-09-01", 1, 2)],
            negative_series: vec![point("2024-09-02", 1, 4), point("2024-09-03", 2, 5)],
        };

        let rows = merge_time_series(&series);
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2024-09-01", "2024-09-02", "2024-09-03"]);

        assert_eq!(rows[0].negative_count, 0);
        assert_eq!(rows[1].net_points, 3);
        assert_eq!(rows[2].positive_points, 0);
        assert_eq!(rows[2].net_points, -5);
    }

    #[test]
    fn test_rank_dimensions() {
        let dim = |id, name: &str, net| DimensionAnalysis {
            dimension_id: id,
            dimension_name: name.to_string(),
            positive_count: 0,
            negative_count: 0,
            positive_points: 0,
            negative_points: 0,
            net_points: net,
            total_records: 0,
        };
        let ranked = rank_dimensions(vec![
            dim(1, "Honesty", 4),
            dim(2, "Diligence", 12),
            dim(3, "Courtesy", 4),
        ]);
        let names: Vec<&str> = ranked.iter().map(|d| d.dimension_name.as_str()).collect();
        assert_eq!(names, ["Diligence", "Courtesy", "Honesty"]);
    }

    #[test]
    fn test_award_type_shares() {
        let shares = award_type_shares(&[
            AwardTypeCount { award_type: "star".into(), count: 3 },
            AwardTypeCount { award_type: "badge".into(), count: 1 },
        ]);
        assert_eq!(shares[0].percent, 75.0);
        assert_eq!(shares[1].percent, 25.0);

        assert!(award_type_shares(&[AwardTypeCount { award_type: "star".into(), count: 0 }])
            .iter()
            .all(|s| s.percent == 0.0));
    }

    #[test]
    fn test_dimension_bars_sorted() {
        let mut summary = ScoreSummary::default();
        summary.dimension_scores.insert("Honesty".into(), 3);
        summary.dimension_scores.insert("Diligence".into(), 9);
        summary.dimension_scores.insert("Courtesy".into(), -2);

        let bars = dimension_bars(&summary);
        assert_eq!(bars[0], ("Diligence".to_string(), 9));
        assert_eq!(bars[2], ("Courtesy".to_string(), -2));
    }

    #[test]
    fn test_award_metrics() {
        let award = |student, award_type, level, date| Award {
            id: 0,
            student,
            name: "x".into(),
            description: String::new(),
            award_type,
            level,
            award_date: date,
            student_name: None,
            awarded_by: None,
        };
        let today = day(2024, 10, 31);
        let awards = vec![
            award(1, AwardType::Star, 5, day(2024, 10, 20)),
            award(1, AwardType::Star, 3, day(2024, 6, 1)),
            award(2, AwardType::Badge, 1, day(2024, 10, 1)),
        ];

        let metrics = AwardMetrics::from_awards(&awards, today);
        assert_eq!(metrics.total, 3);
        assert_eq!(metrics.distinct_students, 2);
        assert_eq!(metrics.last_30_days, 2);
        assert_eq!(metrics.average_star_level, 4.0);
        assert_eq!(metrics.by_type[0].label, "Star Rating");
        assert_eq!(metrics.by_type[0].count, 2);

        let empty = AwardMetrics::from_awards(&[], today);
        assert_eq!(empty.average_star_level, 0.0);
    }

    #[test]
    fn test_time_range() {
        let today = day(2024, 3, 31);
        assert_eq!(TimeRange::Last7Days.start(today), Some(day(2024, 3, 24)));
        assert_eq!(TimeRange::LastYear.start(today), Some(day(2023, 3, 31)));
        assert_eq!(TimeRange::All.start(today), None);

        let mut filter = ReportFilter::default();
        "90days".parse::<TimeRange>().unwrap().apply(&mut filter, today);
        assert_eq!(filter.start_date, Some(day(2024, 1, 1)));
        assert_eq!(filter.end_date, Some(today));

        assert!("fortnight".parse::<TimeRange>().is_err());
    }
}
