//! Yearly rollups and status distribution
//!
//! Everything here is a pure function of the record slice. The dashboard
//! recomputes these on every render; nothing is cached.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants;
use crate::record::{Record, Status};

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("year pattern is valid"));

/// Year bucket derived from a record's period
///
/// Ordering puts years ascending and `Other` last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum YearBucket {
    Year(String),
    Other,
}

impl YearBucket {
    pub fn label(&self) -> &str {
        match self {
            YearBucket::Year(year) => year,
            YearBucket::Other => constants::OTHER_YEAR_LABEL,
        }
    }
}

impl fmt::Display for YearBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First run of four digits in `period` ("Q1 2023" -> 2023), else `Other`
pub fn year_of(period: &str) -> YearBucket {
    YEAR_PATTERN
        .find(period)
        .map(|m| YearBucket::Year(m.as_str().to_string()))
        .unwrap_or(YearBucket::Other)
}

// =============================================================================
// Financial rollup
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinancialTotals {
    pub total_loss: f64,
    pub total_recovery: f64,
}

impl FinancialTotals {
    /// Loss not yet recovered
    pub fn remainder(&self) -> f64 {
        self.total_loss - self.total_recovery
    }
}

/// Loss and recovery per year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialRollup {
    buckets: BTreeMap<YearBucket, FinancialTotals>,
}

impl FinancialRollup {
    pub fn iter(&self) -> impl Iterator<Item = (&YearBucket, &FinancialTotals)> {
        self.buckets.iter()
    }

    pub fn get(&self, bucket: &YearBucket) -> Option<&FinancialTotals> {
        self.buckets.get(bucket)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Loss and recovery summed independently across all years
    pub fn grand_total(&self) -> FinancialTotals {
        self.buckets
            .values()
            .fold(FinancialTotals::default(), |mut acc, totals| {
                acc.total_loss += totals.total_loss;
                acc.total_recovery += totals.total_recovery;
                acc
            })
    }
}

pub fn financial_rollup(records: &[Record]) -> FinancialRollup {
    let mut buckets: BTreeMap<YearBucket, FinancialTotals> = BTreeMap::new();

    for record in records {
        let entry = buckets.entry(year_of(&record.period)).or_default();
        entry.total_loss += record.loss_amount;
        entry.total_recovery += record.recovery_amount;
    }

    FinancialRollup { buckets }
}

// =============================================================================
// Status rollup
// =============================================================================

/// Counts for one row of the status table
///
/// `total` counts every record in the row, so it exceeds the sum of the
/// canonical columns when non-canonical statuses occur.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    by_status: [usize; 4],
    pub total: usize,
}

impl StatusCounts {
    pub fn count(&self, status: Status) -> usize {
        self.by_status[status.index()]
    }

    /// Sum of the four canonical columns
    pub fn canonical_sum(&self) -> usize {
        self.by_status.iter().sum()
    }

    fn add(&mut self, status: &str) {
        if let Some(status) = Status::parse(status) {
            self.by_status[status.index()] += 1;
        }
        self.total += 1;
    }

    fn merge(&mut self, other: &StatusCounts) {
        for (mine, theirs) in self.by_status.iter_mut().zip(other.by_status.iter()) {
            *mine += theirs;
        }
        self.total += other.total;
    }
}

/// Status counts per year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusRollup {
    buckets: BTreeMap<YearBucket, StatusCounts>,
}

impl StatusRollup {
    pub fn iter(&self) -> impl Iterator<Item = (&YearBucket, &StatusCounts)> {
        self.buckets.iter()
    }

    pub fn get(&self, bucket: &YearBucket) -> Option<&StatusCounts> {
        self.buckets.get(bucket)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn grand_total(&self) -> StatusCounts {
        self.buckets
            .values()
            .fold(StatusCounts::default(), |mut acc, counts| {
                acc.merge(counts);
                acc
            })
    }
}

pub fn status_rollup(records: &[Record]) -> StatusRollup {
    let mut buckets: BTreeMap<YearBucket, StatusCounts> = BTreeMap::new();

    for record in records {
        buckets
            .entry(year_of(&record.period))
            .or_default()
            .add(&record.status);
    }

    StatusRollup { buckets }
}

// =============================================================================
// Status distribution
// =============================================================================

/// Count per observed status value, in first-observed order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusDistribution {
    entries: Vec<(String, usize)>,
}

impl StatusDistribution {
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn count(&self, status: &str) -> usize {
        self.entries
            .iter()
            .find(|(s, _)| s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Share of `count` in the whole distribution, as a whole percent
    pub fn percent(&self, count: usize) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (count as f64 / total as f64 * 100.0).round() as u32
    }
}

pub fn status_distribution(records: &[Record]) -> StatusDistribution {
    let mut entries: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index.get(record.status.as_str()) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(&record.status, entries.len());
                entries.push((record.status.clone(), 1));
            }
        }
    }

    StatusDistribution { entries }
}
