//! Read-only dashboard feeds.
//!
//! Typed access to the order and revenue feeds shown on the dashboard, plus
//! the small data shaping the dashboard needs (status badges, price labels,
//! day-indexed sales series). Rendering is left to the presentation layer.

use crate::client::HttpJobService;
use crate::error::{ApiError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept a JSON string, number or null and keep its display form.
fn display_value<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Cancelled by the shop or customer
    Cancelled,
    /// Awaiting payment
    Pending,
    /// Delivered
    Completed,
    /// Payment failed
    Failed,
    /// Paid, being prepared
    Processing,
    /// Any other WooCommerce status
    #[serde(other)]
    Other,
}

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    /// Red
    Danger,
    /// Amber
    Warning,
    /// Green
    Success,
    /// Blue
    Primary,
    /// Grey
    Neutral,
}

impl OrderStatus {
    /// Badge used for this status in order tables.
    #[must_use]
    pub fn badge(self) -> Badge {
        match self {
            Self::Cancelled | Self::Failed => Badge::Danger,
            Self::Pending => Badge::Warning,
            Self::Completed => Badge::Success,
            Self::Processing => Badge::Primary,
            Self::Other => Badge::Neutral,
        }
    }
}

/// Row of `GET /latest-orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestOrder {
    /// Order number
    #[serde(deserialize_with = "display_value")]
    pub id: String,
    /// Customer name
    pub user: String,
    /// Formatted price as sent by the server (`$12.50`)
    pub price: String,
    /// Order date
    pub date: String,
    /// Fulfilment status
    pub status: OrderStatus,
}

impl LatestOrder {
    /// Price in the shop currency label (`KD 12.50`).
    #[must_use]
    pub fn display_price(&self) -> String {
        self.price.replacen('$', "KD ", 1)
    }
}

/// Row of `GET /top-customers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCustomer {
    /// Customer name
    pub user: String,
    /// Number of orders
    #[serde(deserialize_with = "display_value")]
    pub total_orders: String,
    /// Lifetime spending
    #[serde(deserialize_with = "display_value")]
    pub total_spending: String,
}

#[derive(Debug, Deserialize)]
struct TotalOrdersRow {
    #[serde(deserialize_with = "display_value")]
    count: String,
}

#[derive(Debug, Deserialize)]
struct TotalSalesRow {
    #[serde(deserialize_with = "display_value")]
    totalamount: String,
}

#[derive(Debug, Deserialize)]
struct AovRow {
    #[serde(deserialize_with = "display_value")]
    amount: String,
}

#[derive(Debug, Deserialize)]
struct TotalCustomersRow {
    #[serde(deserialize_with = "display_value")]
    countcustomers: String,
}

/// Headline figures shown as status cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCards {
    /// Revenue to date
    pub total_sales: String,
    /// Average order value
    pub average_order_value: String,
    /// Distinct customers
    pub total_customers: String,
    /// Orders to date
    pub total_orders: String,
}

/// Revenue of one day of a month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// Day of month, starting at 1
    #[serde(default)]
    pub day: Option<u32>,
    /// Revenue of that day
    #[serde(default)]
    pub total: Option<f64>,
}

/// Body of `GET /sales-comparison`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesComparison {
    /// Days of the previous month that had sales
    #[serde(rename = "previousMonth", default)]
    pub previous_month: Vec<DailyTotal>,
    /// Days of the current month that had sales
    #[serde(rename = "currentMonth", default)]
    pub current_month: Vec<DailyTotal>,
}

/// Dense, day-indexed revenue series for the month-over-month chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSeries {
    /// Day labels `"1"..="n"`
    pub labels: Vec<String>,
    /// Previous month revenue per day
    pub previous: Vec<f64>,
    /// Current month revenue per day
    pub current: Vec<f64>,
}

/// Last day a month can have.
const MAX_DAY: u32 = 31;

impl SalesSeries {
    /// Spread sparse daily totals over `max(last day, 1)` zero-filled slots.
    ///
    /// Rows without a day, with a day outside `1..=31`, or without a total
    /// are skipped.
    #[must_use]
    pub fn from_comparison(data: &SalesComparison) -> Self {
        let max_day = data
            .previous_month
            .iter()
            .chain(&data.current_month)
            .filter_map(|row| row.day)
            .filter(|day| *day <= MAX_DAY)
            .max()
            .unwrap_or(0);
        let len = usize::try_from(max_day.max(1)).unwrap_or(1);

        let fill = |rows: &[DailyTotal]| {
            let mut series = vec![0.0; len];
            for row in rows {
                if let (Some(day @ 1..=MAX_DAY), Some(total)) = (row.day, row.total) {
                    if let Some(slot) = usize::try_from(day - 1)
                        .ok()
                        .and_then(|index| series.get_mut(index))
                    {
                        *slot = total;
                    }
                }
            }
            series
        };

        Self {
            labels: (1..=len).map(|day| day.to_string()).collect(),
            previous: fill(&data.previous_month),
            current: fill(&data.current_month),
        }
    }
}

fn first_row<T>(rows: Vec<T>, endpoint: &str) -> Result<T> {
    rows.into_iter().next().ok_or_else(|| ApiError::Parse {
        endpoint: endpoint.to_string(),
        message: "feed returned no rows".to_string(),
    })
}

impl HttpJobService {
    /// Most recent orders.
    pub async fn latest_orders(&self) -> Result<Vec<LatestOrder>> {
        self.get_json(&["latest-orders"]).await
    }

    /// Customers ranked by spending.
    pub async fn top_customers(&self) -> Result<Vec<TopCustomer>> {
        self.get_json(&["top-customers"]).await
    }

    /// Headline figures, fetched concurrently from the four single-row feeds.
    pub async fn status_cards(&self) -> Result<StatusCards> {
        let (orders, sales, aov, customers) = tokio::try_join!(
            self.get_json::<Vec<TotalOrdersRow>>(&["total-orders-count"]),
            self.get_json::<Vec<TotalSalesRow>>(&["total-sales"]),
            self.get_json::<Vec<AovRow>>(&["aov"]),
            self.get_json::<Vec<TotalCustomersRow>>(&["total-customers"]),
        )?;

        Ok(StatusCards {
            total_sales: first_row(sales, "total-sales")?.totalamount,
            average_order_value: first_row(aov, "aov")?.amount,
            total_customers: first_row(customers, "total-customers")?.countcustomers,
            total_orders: first_row(orders, "total-orders-count")?.count,
        })
    }

    /// Daily revenue of the previous and current month.
    pub async fn sales_comparison(&self) -> Result<SalesComparison> {
        self.get_json(&["sales-comparison"]).await
    }
}
