use anyhow::{Context, Result};

use std::{
    fmt::{Display, Formatter},
    fs,
    path::Path,
};

use crate::{
    month::Month,
    sales::{ItemStats, MonthlySales},
    usd::Usd,
};

/// Placeholder shown for a statistic that could not be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// The item sold in the greatest quantity in a month.
#[derive(Clone, Debug, PartialEq)]
pub struct PopularItem {
    pub item: String,
    pub quantity: u64,
    pub min_order: u32,
    pub max_order: u32,
    pub average_order: Option<f64>,
}

/// The item that brought in the most revenue in a month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevenueItem {
    pub item: String,
    pub revenue: Usd,
}

/// Statistics for a single month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyReport {
    pub month: Month,
    pub total: Usd,
    pub most_popular: Option<PopularItem>,
    pub most_revenue: Option<RevenueItem>,
}

/// Statistics for every month, plus the total over all months.
///
/// The [`Display`] implementation gives the printable report.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub grand_total: Usd,
    pub months: Vec<MonthlyReport>,
}

/// Derives the per-month statistics from the accumulated `sales`.
///
/// Months are reported in calendar order. Within a month, when two items tie
/// on quantity (or revenue), the one seen first in the input wins.
#[must_use]
pub fn reduce(sales: &MonthlySales) -> Summary {
    let mut grand_total = Usd::ZERO;
    let mut months = Vec::new();
    for (month, items) in sales.months() {
        let mut total = Usd::ZERO;
        let mut popular: Option<(&str, &ItemStats)> = None;
        let mut earner: Option<(&str, &ItemStats)> = None;
        for (name, stats) in items {
            total += stats.revenue;
            if popular.map_or(true, |(_, best)| stats.quantity > best.quantity) {
                popular = Some((name.as_str(), stats));
            }
            if earner.map_or(true, |(_, best)| stats.revenue > best.revenue) {
                earner = Some((name.as_str(), stats));
            }
        }
        grand_total += total;
        months.push(MonthlyReport {
            month,
            total,
            most_popular: popular.map(|(name, stats)| PopularItem {
                item: name.to_string(),
                quantity: stats.quantity,
                min_order: stats.min_order,
                max_order: stats.max_order,
                average_order: stats.average_order(),
            }),
            most_revenue: earner.map(|(name, stats)| RevenueItem {
                item: name.to_string(),
                revenue: stats.revenue,
            }),
        });
    }
    Summary {
        grand_total,
        months,
    }
}

impl Summary {
    #[must_use]
    pub fn month(&self, month: Month) -> Option<&MonthlyReport> {
        self.months.iter().find(|r| r.month == month)
    }

    /// Writes the printable report to the file at `path`, replacing it.
    ///
    /// # Errors
    ///
    /// Returns any error from writing the file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string()).with_context(|| format!("writing {}", path.display()))
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Monthly statistics:")?;
        writeln!(f, "  Total sales: {}", self.grand_total)?;
        for report in &self.months {
            write!(f, "{report}")?;
        }
        Ok(())
    }
}

impl Display for MonthlyReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let popular = self.most_popular.as_ref();
        let earner = self.most_revenue.as_ref();
        writeln!(f, "{}:", self.month)?;
        writeln!(f, "  Total sales in month: {}", self.total)?;
        writeln!(
            f,
            "  Most popular item: {} (Quantity: {})",
            or_na(popular.map(|p| &p.item)),
            or_na(popular.map(|p| p.quantity)),
        )?;
        writeln!(
            f,
            "  Most revenue item: {} (Total Revenue: {})",
            or_na(earner.map(|e| &e.item)),
            or_na(earner.map(|e| e.revenue)),
        )?;
        writeln!(f, "  Min orders: {}", or_na(popular.map(|p| p.min_order)))?;
        writeln!(f, "  Max orders: {}", or_na(popular.map(|p| p.max_order)))?;
        writeln!(
            f,
            "  Average orders: {}",
            or_na(popular.and_then(|p| p.average_order).map(|avg| format!("{avg:.2}"))),
        )?;
        Ok(())
    }
}
