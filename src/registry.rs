//! The fixed set of named analytical queries.
//!
//! Query text is a contract: it is never built from user input and never
//! rewritten at runtime. Each definition also declares the columns it is
//! expected to return. Chart sections derive their column bindings from
//! those roles.

use crate::chart::{ChartKind, RoleBinding};
use crate::error::PipelineError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tally_types::ResultSet;

/// What a column means to the charts that consume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Label,
    Measure,
    Time,
    Category,
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub role: ColumnRole,
}

const fn col(name: &'static str, role: ColumnRole) -> ColumnSpec {
    ColumnSpec { name, role }
}

/// Every query the report knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryId {
    PieGmvByCategory,
    BarTopStatesGmv,
    BarhTopSellersGmv,
    LineMonthlyGmv,
    HistDeliveryDelayDays,
    ScatterItemsVsPayment,
    MonthlyCategoryGmv,
    MonthlyRevenue,
    PaymentMix,
    TopCategories,
}

impl QueryId {
    pub const ALL: [QueryId; 10] = [
        QueryId::PieGmvByCategory,
        QueryId::BarTopStatesGmv,
        QueryId::BarhTopSellersGmv,
        QueryId::LineMonthlyGmv,
        QueryId::HistDeliveryDelayDays,
        QueryId::ScatterItemsVsPayment,
        QueryId::MonthlyCategoryGmv,
        QueryId::MonthlyRevenue,
        QueryId::PaymentMix,
        QueryId::TopCategories,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QueryId::PieGmvByCategory => "pie_gmv_by_category",
            QueryId::BarTopStatesGmv => "bar_top_states_gmv",
            QueryId::BarhTopSellersGmv => "barh_top_sellers_gmv",
            QueryId::LineMonthlyGmv => "line_monthly_gmv",
            QueryId::HistDeliveryDelayDays => "hist_delivery_delay_days",
            QueryId::ScatterItemsVsPayment => "scatter_items_vs_payment",
            QueryId::MonthlyCategoryGmv => "monthly_category_gmv",
            QueryId::MonthlyRevenue => "monthly_revenue",
            QueryId::PaymentMix => "payment_mix",
            QueryId::TopCategories => "top_categories",
        }
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryId {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| PipelineError::UnknownQuery(s.to_string()))
    }
}

/// One named query: its SQL and the columns it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefinition {
    pub id: QueryId,
    pub name: &'static str,
    pub sql: &'static str,
    pub expected_shape: &'static [ColumnSpec],
}

impl QueryDefinition {
    /// Names of the expected columns that the result does not carry, in
    /// declaration order. Extra result columns are not reported.
    pub fn missing_columns(&self, result: &ResultSet) -> Vec<&'static str> {
        self.expected_shape
            .iter()
            .filter(|spec| result.column_index(spec.name).is_none())
            .map(|spec| spec.name)
            .collect()
    }

    pub fn column_with_role(&self, role: ColumnRole) -> Option<&'static str> {
        self.columns_with_role(role).next()
    }

    fn columns_with_role(&self, role: ColumnRole) -> impl Iterator<Item = &'static str> {
        self.expected_shape
            .iter()
            .filter(move |spec| spec.role == role)
            .map(|spec| spec.name)
    }

    /// The column binding a `kind` chart uses for this query, derived from
    /// the roles in `expected_shape`. `None` when the shape lacks a role the
    /// chart needs.
    pub fn binding_for(&self, kind: ChartKind) -> Option<RoleBinding> {
        let measure = self.column_with_role(ColumnRole::Measure)?;
        let binding = match kind {
            ChartKind::Pie | ChartKind::Bar | ChartKind::HorizontalBar => {
                RoleBinding::label_value(self.column_with_role(ColumnRole::Label)?, measure)
            }
            ChartKind::Line => RoleBinding::xy(self.column_with_role(ColumnRole::Time)?, measure),
            ChartKind::Histogram => RoleBinding::single(measure),
            ChartKind::Scatter => {
                let y = self.columns_with_role(ColumnRole::Measure).last()?;
                if y == measure {
                    return None;
                }
                RoleBinding::xy(measure, y)
            }
            ChartKind::AnimatedBar => RoleBinding::time_category_value(
                self.column_with_role(ColumnRole::Time)?,
                self.column_with_role(ColumnRole::Category)?,
                measure,
            ),
        };
        Some(binding)
    }
}

/// Immutable lookup from query name to definition.
#[derive(Debug, Clone)]
pub struct QueryRegistry {
    definitions: HashMap<&'static str, QueryDefinition>,
}

impl Default for QueryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl QueryRegistry {
    /// The registry holding every built-in query.
    pub fn builtin() -> Self {
        let definitions = QueryId::ALL
            .into_iter()
            .map(|id| (id.name(), definition_for(id)))
            .collect();
        Self { definitions }
    }

    pub fn get(&self, name: &str) -> Result<&QueryDefinition, PipelineError> {
        self.definitions
            .get(name)
            .ok_or_else(|| PipelineError::UnknownQuery(name.to_string()))
    }

    /// Looks a query up by id. Every id is registered, so this cannot miss.
    pub fn definition(&self, id: QueryId) -> QueryDefinition {
        definition_for(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

pub(crate) fn definition_for(id: QueryId) -> QueryDefinition {
    let (sql, expected_shape) = match id {
        QueryId::PieGmvByCategory => (PIE_GMV_BY_CATEGORY, CATEGORY_GMV_SHAPE),
        QueryId::BarTopStatesGmv => (BAR_TOP_STATES_GMV, STATE_GMV_SHAPE),
        QueryId::BarhTopSellersGmv => (BARH_TOP_SELLERS_GMV, SELLER_GMV_SHAPE),
        QueryId::LineMonthlyGmv => (LINE_MONTHLY_GMV, MONTH_GMV_SHAPE),
        QueryId::HistDeliveryDelayDays => (HIST_DELIVERY_DELAY_DAYS, DELAY_SHAPE),
        QueryId::ScatterItemsVsPayment => (SCATTER_ITEMS_VS_PAYMENT, ORDER_BASKET_SHAPE),
        QueryId::MonthlyCategoryGmv => (MONTHLY_CATEGORY_GMV, MONTH_CATEGORY_GMV_SHAPE),
        QueryId::MonthlyRevenue => (MONTHLY_REVENUE, MONTH_REVENUE_SHAPE),
        QueryId::PaymentMix => (PAYMENT_MIX, PAYMENT_MIX_SHAPE),
        QueryId::TopCategories => (TOP_CATEGORIES, CATEGORY_REVENUE_SHAPE),
    };

    QueryDefinition {
        id,
        name: id.name(),
        sql,
        expected_shape,
    }
}

const CATEGORY_GMV_SHAPE: &[ColumnSpec] =
    &[col("category", ColumnRole::Label), col("gmv", ColumnRole::Measure)];
const STATE_GMV_SHAPE: &[ColumnSpec] =
    &[col("state", ColumnRole::Label), col("gmv", ColumnRole::Measure)];
const SELLER_GMV_SHAPE: &[ColumnSpec] =
    &[col("seller_id", ColumnRole::Label), col("gmv", ColumnRole::Measure)];
const MONTH_GMV_SHAPE: &[ColumnSpec] =
    &[col("month", ColumnRole::Time), col("gmv", ColumnRole::Measure)];
const DELAY_SHAPE: &[ColumnSpec] = &[col("delay_days", ColumnRole::Measure)];
// x is the first measure, y the last
const ORDER_BASKET_SHAPE: &[ColumnSpec] = &[
    col("order_id", ColumnRole::Key),
    col("n_items", ColumnRole::Measure),
    col("items_value", ColumnRole::Measure),
    col("pay_total", ColumnRole::Measure),
];
const MONTH_CATEGORY_GMV_SHAPE: &[ColumnSpec] = &[
    col("month", ColumnRole::Time),
    col("category", ColumnRole::Category),
    col("gmv", ColumnRole::Measure),
];
const MONTH_REVENUE_SHAPE: &[ColumnSpec] =
    &[col("month", ColumnRole::Time), col("revenue", ColumnRole::Measure)];
const PAYMENT_MIX_SHAPE: &[ColumnSpec] = &[
    col("payment_type", ColumnRole::Label),
    col("cnt", ColumnRole::Measure),
    col("pct", ColumnRole::Measure),
];
const CATEGORY_REVENUE_SHAPE: &[ColumnSpec] =
    &[col("category", ColumnRole::Label), col("revenue", ColumnRole::Measure)];

const PIE_GMV_BY_CATEGORY: &str = r#"
WITH cat AS (
    SELECT COALESCE(pct.product_category_name_english, p.product_category_name) AS category,
           SUM(oi.price)::numeric(18,2) AS gmv
    FROM olist.orders o
    JOIN olist.order_items oi ON oi.order_id = o.order_id
    JOIN olist.products p     ON p.product_id = oi.product_id
    LEFT JOIN olist.product_category_name_translation pct
           ON pct.product_category_name = p.product_category_name
    WHERE o.order_status = 'delivered'
    GROUP BY COALESCE(pct.product_category_name_english, p.product_category_name)
),
ranked AS (
    SELECT category, gmv,
           DENSE_RANK() OVER (ORDER BY gmv DESC) AS rnk
    FROM cat
),
top10 AS (
    SELECT category, gmv FROM ranked WHERE rnk <= 10
),
others AS (
    SELECT 'Other'::text AS category, COALESCE(SUM(gmv),0)::numeric(18,2) AS gmv
    FROM ranked WHERE rnk > 10
)
SELECT category, gmv FROM top10
UNION ALL
SELECT category, gmv FROM others
ORDER BY gmv DESC;
"#;

const BAR_TOP_STATES_GMV: &str = r#"
SELECT c.customer_state AS state,
       SUM(oi.price)::numeric(18,2) AS gmv
FROM olist.orders o
JOIN olist.customers c    ON c.customer_id = o.customer_id
JOIN olist.order_items oi ON oi.order_id  = o.order_id
WHERE o.order_status = 'delivered'
GROUP BY c.customer_state
ORDER BY gmv DESC
LIMIT 10;
"#;

const BARH_TOP_SELLERS_GMV: &str = r#"
SELECT s.seller_id,
       SUM(oi.price)::numeric(18,2) AS gmv
FROM olist.order_items oi
JOIN olist.sellers s ON s.seller_id = oi.seller_id
JOIN olist.orders  o ON o.order_id  = oi.order_id
WHERE o.order_status = 'delivered'
GROUP BY s.seller_id
ORDER BY gmv DESC
LIMIT 15;
"#;

const LINE_MONTHLY_GMV: &str = r#"
SELECT DATE_TRUNC('month', o.order_purchase_timestamp)::date AS month,
       SUM(oi.price)::numeric(18,2) AS gmv
FROM olist.orders o
JOIN olist.order_items oi ON oi.order_id = o.order_id
WHERE o.order_status = 'delivered'
GROUP BY DATE_TRUNC('month', o.order_purchase_timestamp)
ORDER BY month;
"#;

const HIST_DELIVERY_DELAY_DAYS: &str = r#"
SELECT EXTRACT(EPOCH FROM (o.order_delivered_customer_date - o.order_purchase_timestamp)) / 86400.0
         AS delay_days
FROM olist.orders o
JOIN olist.customers c    ON c.customer_id = o.customer_id
JOIN olist.order_items oi ON oi.order_id  = o.order_id
WHERE o.order_status = 'delivered'
  AND o.order_delivered_customer_date IS NOT NULL
  AND o.order_purchase_timestamp IS NOT NULL;
"#;

const SCATTER_ITEMS_VS_PAYMENT: &str = r#"
WITH items AS (
  SELECT oi.order_id,
         COUNT(*) AS n_items,
         SUM(oi.price)::numeric(18,2) AS items_value
  FROM olist.order_items oi
  GROUP BY oi.order_id
),
pays AS (
  SELECT op.order_id,
         SUM(op.payment_value)::numeric(18,2) AS pay_total
  FROM olist.order_payments op
  GROUP BY op.order_id
)
SELECT o.order_id, i.n_items, i.items_value, p.pay_total
FROM olist.orders o
JOIN items i ON i.order_id = o.order_id
JOIN pays  p ON p.order_id = o.order_id
WHERE o.order_status IN ('invoiced','shipped','delivered','processing','approved');
"#;

const MONTHLY_CATEGORY_GMV: &str = r#"
SELECT DATE_TRUNC('month', o.order_purchase_timestamp)::date AS month,
       COALESCE(pct.product_category_name_english, p.product_category_name) AS category,
       SUM(oi.price)::numeric(18,2) AS gmv
FROM olist.orders o
JOIN olist.order_items oi ON oi.order_id = o.order_id
JOIN olist.products p     ON p.product_id = oi.product_id
LEFT JOIN olist.product_category_name_translation pct
       ON pct.product_category_name = p.product_category_name
WHERE o.order_status = 'delivered'
GROUP BY DATE_TRUNC('month', o.order_purchase_timestamp),
         COALESCE(pct.product_category_name_english, p.product_category_name)
ORDER BY month, gmv DESC;
"#;

const MONTHLY_REVENUE: &str = r#"
WITH items AS (
  SELECT oi.order_id,
         DATE_TRUNC('month', o.order_purchase_timestamp) AS month,
         SUM(oi.price + oi.freight_value) AS gross
  FROM olist.order_items oi
  JOIN olist.orders o USING (order_id)
  WHERE o.order_status IN ('delivered','shipped','invoiced','approved')
  GROUP BY oi.order_id, month
)
SELECT month::date AS month, SUM(gross) AS revenue
FROM items
GROUP BY month
ORDER BY month;
"#;

const PAYMENT_MIX: &str = r#"
WITH counts AS (
  SELECT payment_type, COUNT(*) AS cnt
  FROM olist.order_payments
  GROUP BY payment_type
)
SELECT payment_type,
       cnt,
       ROUND(cnt * 100.0 / SUM(cnt) OVER (), 2) AS pct
FROM counts
ORDER BY pct DESC;
"#;

const TOP_CATEGORIES: &str = r#"
SELECT COALESCE(t.product_category_name_english, p.product_category_name) AS category,
       ROUND(SUM(oi.price + oi.freight_value),2) AS revenue
FROM olist.order_items oi
JOIN olist.products p USING (product_id)
LEFT JOIN olist.product_category_name_translation t
       ON t.product_category_name = p.product_category_name
GROUP BY category
ORDER BY revenue DESC
LIMIT 10;
"#;
