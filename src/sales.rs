use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::{debug, warn};

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    groups::Groups,
    month::Month,
    record::{parse_line, LineError, Transaction},
    report::{reduce, Summary},
    usd::Usd,
};

/// Running totals for one item within one month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ItemStats {
    pub quantity: u64,
    pub revenue: Usd,
    pub orders: u64,
    pub min_order: u32,
    pub max_order: u32,
}

impl Default for ItemStats {
    fn default() -> Self {
        // quantities are always positive, so 0 works as the lower sentinel
        Self {
            quantity: 0,
            revenue: Usd::ZERO,
            orders: 0,
            min_order: u32::MAX,
            max_order: 0,
        }
    }
}

impl ItemStats {
    /// Adds a single order to the totals.
    pub fn add(&mut self, quantity: u32, revenue: Usd) {
        self.quantity += u64::from(quantity);
        self.revenue += revenue;
        self.orders += 1;
        self.min_order = self.min_order.min(quantity);
        self.max_order = self.max_order.max(quantity);
    }

    /// Returns the mean quantity per order, rounded to 2 decimal places.
    ///
    /// Returns `None` if no orders have been added.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_order(&self) -> Option<f64> {
        if self.orders == 0 {
            return None;
        }
        let mean = self.quantity as f64 / self.orders as f64;
        Some((mean * 100.0).round() / 100.0)
    }
}

/// The items sold in one month, in the order they were first seen.
pub type MonthItems = IndexMap<String, ItemStats>;

/// Holds sales data grouped by month, then by item.
///
/// To create a new, empty `MonthlySales`, use [`MonthlySales::new`], or
/// [`MonthlySales::with_groups`] to report matching items under a group name.
///
/// To add sales data, use [`MonthlySales::read_csv`], [`MonthlySales::read_from`],
/// or [`MonthlySales::ingest_line`]. Invalid lines are logged and skipped.
///
/// To compute the per-month statistics, use [`MonthlySales::summarize`].
#[derive(Debug, Default)]
pub struct MonthlySales {
    groups: Groups,
    months: BTreeMap<Month, MonthItems>,
    accepted: usize,
    rejected: usize,
}

impl MonthlySales {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_groups(groups: Groups) -> Self {
        Self {
            groups,
            ..Self::default()
        }
    }

    /// Reads the sales log at `path`, and updates the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read. Invalid lines
    /// are not errors.
    pub fn read_csv(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        self.read_from(BufReader::new(file))
            .with_context(|| format!("reading {}", path.display()))
    }

    /// Reads a sales log from `reader`, and updates the totals.
    ///
    /// The first line is a header and is always skipped. Every other line,
    /// blank or not, is either added or logged and counted as rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails with an I/O error.
    pub fn read_from(&mut self, reader: impl BufRead) -> Result<()> {
        for (number, bytes) in (1..).zip(reader.split(b'\n')).skip(1) {
            let bytes = bytes?;
            let bytes = bytes.strip_suffix(b"\r").unwrap_or(&bytes);
            match std::str::from_utf8(bytes) {
                Ok(line) => match parse_line(line) {
                    Ok(tx) => self.ingest(tx),
                    Err(err) => self.reject(line, Some(number), &err),
                },
                Err(err) => {
                    warn!(line = number, "skipping unreadable line: {err}");
                    self.rejected += 1;
                }
            }
        }
        debug!(accepted = self.accepted, rejected = self.rejected, "finished reading");
        Ok(())
    }

    /// Parses and adds a single line of the log (not the header).
    ///
    /// Returns `true` if the line was valid.
    pub fn ingest_line(&mut self, line: &str) -> bool {
        match parse_line(line) {
            Ok(tx) => {
                self.ingest(tx);
                true
            }
            Err(err) => {
                self.reject(line, None, &err);
                false
            }
        }
    }

    fn ingest(&mut self, mut tx: Transaction) {
        if let Some(group) = self.groups.group_of(&tx.item) {
            tx.item = group.to_string();
        }
        self.fold(tx);
        self.accepted += 1;
    }

    fn reject(&mut self, text: &str, line: Option<u64>, err: &LineError) {
        warn!(line, text, "skipping invalid line: {err}");
        self.rejected += 1;
    }

    /// Adds one transaction to the totals for its month and item.
    ///
    /// No validation is done here: `tx` should come from the parser.
    pub fn fold(&mut self, tx: Transaction) {
        self.months
            .entry(tx.month)
            .or_default()
            .entry(tx.item)
            .or_default()
            .add(tx.quantity, tx.revenue);
    }

    #[must_use]
    pub fn month(&self, month: Month) -> Option<&MonthItems> {
        self.months.get(&month)
    }

    /// Iterates over months in calendar order.
    pub fn months(&self) -> impl Iterator<Item = (Month, &MonthItems)> {
        self.months.iter().map(|(&month, items)| (month, items))
    }

    /// Number of lines added to the totals.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Number of lines skipped as invalid.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Computes the per-month statistics for the data read so far.
    #[must_use]
    pub fn summarize(&self) -> Summary {
        reduce(self)
    }
}
