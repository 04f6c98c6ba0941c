// Integration tests for end-to-end dashboard workflows

#[cfg(test)]
mod integration_tests {
    use crate::alerts::Severity;
    use crate::comparison::{AnalysisPeriod, ComparisonMode};
    use crate::dashboard::{build_dashboard, DashboardQuery};
    use crate::generator::SyntheticDataSource;
    use crate::metrics::{aggregate, AggregateOp};
    use crate::record::{DailyRecord, MetricField};
    use crate::render::{CsvRenderer, JsonRenderer, Renderer};
    use crate::time_series::{select_window, DataSource, DateWindow, InMemoryDataSource};
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Generate a series -> read it through the DataSource -> build every view
    #[test]
    fn test_generated_series_end_to_end() {
        let today = date(2025, 6, 30);
        let source = SyntheticDataSource::new(11, date(2023, 1, 1), today);
        let records = source.all_records().unwrap();

        for period in [
            AnalysisPeriod::Last30Days,
            AnalysisPeriod::LastQuarter,
            AnalysisPeriod::LastYear,
            AnalysisPeriod::AllTime,
        ] {
            for mode in ComparisonMode::ALL {
                let query = DashboardQuery::new(today)
                    .with_period(period)
                    .with_comparison(mode);
                let report = build_dashboard(&records, &query).unwrap();

                assert_eq!(report.tiles.len(), 4);
                assert!(report.tiles.iter().all(|t| t.kpi.current_value.is_some()));
                assert!(report.revenue_trend.is_some());
                assert!(report.alerts.len() <= 3);
                if let Some(days) = period.days() {
                    assert_eq!(report.records.len() as i64, days);
                }
            }
        }
    }

    /// Selecting a window then aggregating matches a single filtering pass
    #[test]
    fn test_select_then_aggregate_matches_single_pass() {
        let records = SyntheticDataSource::new(3, date(2024, 1, 1), date(2024, 12, 31))
            .all_records()
            .unwrap();
        let window = DateWindow::new(date(2024, 3, 15), date(2024, 8, 2)).unwrap();

        for field in MetricField::ALL {
            let selected = select_window(&records, &window);
            let two_step = aggregate(&selected, field, AggregateOp::Sum);

            let one_pass: f64 = records
                .iter()
                .filter(|r| r.date >= window.start && r.date < window.end)
                .map(|r| r.value(field))
                .sum();

            assert_eq!(two_step, Some(one_pass));
        }
    }

    /// Sparse series: gaps in the dates do not break windows or alerts
    #[test]
    fn test_sparse_series_with_revenue_drop() {
        let start = date(2024, 1, 1);
        let mut source = InMemoryDataSource::new();
        for i in 0..14 {
            let revenue = if i < 7 { 100.0 } else { 50.0 };
            source.add_record(
                DailyRecord::new(start + Duration::days(i * 2))
                    .with_value(MetricField::DailyRevenue, revenue)
                    .with_value(MetricField::ConversionRate, 3.0)
                    .with_value(MetricField::ActiveUsers, 20.0),
            );
        }

        let today = start + Duration::days(26);
        let query = DashboardQuery::new(today).with_period(AnalysisPeriod::Last30Days);
        let report = build_dashboard(source.records(), &query).unwrap();

        assert_eq!(report.records.len(), 14);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].severity, Severity::Warning);
    }

    /// Both renderers accept the same report
    #[test]
    fn test_renderers_on_generated_report() {
        let today = date(2024, 12, 31);
        let records = SyntheticDataSource::new(8, date(2024, 1, 1), today)
            .all_records()
            .unwrap();
        let report = build_dashboard(&records, &DashboardQuery::new(today)).unwrap();

        let json = JsonRenderer { pretty: true }.render(&report).unwrap();
        assert!(json.contains("\"tiles\""));

        let csv = CsvRenderer.render(&report).unwrap();
        assert_eq!(csv.lines().count(), 31);
    }
}
