//! The fixed report sections and the interactive view.

use crate::chart::{ChartKind, ChartSpec};
use crate::config::ReportConfig;
use crate::registry::{QueryId, definition_for};

/// One named query, one chart, one insight line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub query: QueryId,
    pub chart: ChartSpec,
    pub insight: &'static str,
}

impl Section {
    /// The chart binds the columns the query's definition declares for
    /// `kind`, falling back to positional roles when it declares none.
    fn new(query: QueryId, kind: ChartKind, title: &str, insight: &'static str) -> Self {
        let filename = format!("{}.svg", query.name());
        let mut chart = ChartSpec::new(kind, title, filename);
        if let Some(binding) = definition_for(query).binding_for(kind) {
            chart = chart.with_binding(binding);
        }
        Self {
            query,
            chart,
            insight,
        }
    }

    fn with_chart(mut self, f: impl FnOnce(ChartSpec) -> ChartSpec) -> Self {
        self.chart = f(self.chart);
        self
    }
}

/// The report sections in run order.
pub fn report_sections(config: &ReportConfig) -> Vec<Section> {
    vec![
        Section::new(
            QueryId::PieGmvByCategory,
            ChartKind::Pie,
            "GMV Share by Category",
            "Revenue distribution across categories",
        )
        .with_chart(|c| c.with_top_n(config.pie_top_n)),
        Section::new(
            QueryId::BarTopStatesGmv,
            ChartKind::Bar,
            "Top 10 States by GMV",
            "Which states drive revenue",
        ),
        Section::new(
            QueryId::BarhTopSellersGmv,
            ChartKind::HorizontalBar,
            "Top 15 Sellers by GMV",
            "Which sellers generate most revenue",
        ),
        Section::new(
            QueryId::LineMonthlyGmv,
            ChartKind::Line,
            "Monthly GMV Trend",
            "GMV over time",
        ),
        Section::new(
            QueryId::HistDeliveryDelayDays,
            ChartKind::Histogram,
            "Delivery Delay (days)",
            "Logistics performance dispersion",
        )
        .with_chart(|c| c.with_bins(config.histogram_bins)),
        Section::new(
            QueryId::ScatterItemsVsPayment,
            ChartKind::Scatter,
            "Items per Order vs Payment",
            "Basket size vs monetization",
        ),
    ]
}

/// The monthly GMV by category view: the interactive page and its static
/// faceted counterpart share this spec.
pub fn interactive_section(config: &ReportConfig) -> Section {
    Section::new(
        QueryId::MonthlyCategoryGmv,
        ChartKind::AnimatedBar,
        "Monthly GMV by Category",
        "Category mix month by month",
    )
    .with_chart(|c| c.with_top_n(config.animated_top_n))
}

/// Queries written as CSV by the snapshot stage, in run order.
pub const SNAPSHOT_QUERIES: [QueryId; 3] = [
    QueryId::MonthlyRevenue,
    QueryId::PaymentMix,
    QueryId::TopCategories,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RoleBinding;

    #[test]
    fn sections_run_in_report_order() {
        let config = ReportConfig::default();
        let order: Vec<QueryId> = report_sections(&config).iter().map(|s| s.query).collect();
        assert_eq!(
            order,
            vec![
                QueryId::PieGmvByCategory,
                QueryId::BarTopStatesGmv,
                QueryId::BarhTopSellersGmv,
                QueryId::LineMonthlyGmv,
                QueryId::HistDeliveryDelayDays,
                QueryId::ScatterItemsVsPayment,
            ]
        );
    }

    #[test]
    fn configuration_reaches_the_chart_specs() {
        let config = ReportConfig {
            pie_top_n: 4,
            histogram_bins: 7,
            animated_top_n: 3,
            ..ReportConfig::default()
        };
        let sections = report_sections(&config);
        assert_eq!(sections[0].chart.top_n, Some(4));
        assert_eq!(sections[0].chart.filename, "pie_gmv_by_category.svg");
        assert_eq!(sections[4].chart.bins, Some(7));
        assert_eq!(interactive_section(&config).chart.top_n, Some(3));
    }

    #[test]
    fn every_chart_is_bound_from_its_query() {
        let config = ReportConfig::default();
        let sections = report_sections(&config);
        for section in &sections {
            assert!(section.chart.binding.is_some(), "{}", section.query);
        }
        assert_eq!(
            sections[5].chart.binding,
            Some(RoleBinding::xy("n_items", "pay_total"))
        );
        assert_eq!(
            sections[4].chart.binding,
            Some(RoleBinding::single("delay_days"))
        );
        assert_eq!(
            interactive_section(&config).chart.binding,
            Some(RoleBinding::time_category_value("month", "category", "gmv"))
        );
    }
}
