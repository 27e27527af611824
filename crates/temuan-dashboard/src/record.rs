//! Finding (temuan) record model
//!
//! A record is one row of the findings sheet. Records are immutable once
//! loaded; a reload replaces the whole list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::constants;

/// One finding entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub identifier: String,
    /// Person responsible (PIC)
    pub owner: String,
    /// Organizational unit
    pub unit: String,
    pub segment: String,
    /// Free-text period, expected to contain a 4-digit year ("Q1 2023")
    pub period: String,
    pub problem_text: String,
    pub root_cause_text: String,
    pub action_text: String,
    pub loss_amount: f64,
    pub recovery_amount: f64,
    /// Usually one of [`Status::ALL`], never validated
    pub status: String,
}

/// Value of a single record field, borrowed from the record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Amount(f64),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Amount(n) => write!(f, "{}", n),
        }
    }
}

impl Record {
    /// Read a field by name
    pub fn get(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Identifier => FieldValue::Text(&self.identifier),
            Field::Owner => FieldValue::Text(&self.owner),
            Field::Unit => FieldValue::Text(&self.unit),
            Field::Segment => FieldValue::Text(&self.segment),
            Field::Period => FieldValue::Text(&self.period),
            Field::ProblemText => FieldValue::Text(&self.problem_text),
            Field::RootCauseText => FieldValue::Text(&self.root_cause_text),
            Field::ActionText => FieldValue::Text(&self.action_text),
            Field::LossAmount => FieldValue::Amount(self.loss_amount),
            Field::RecoveryAmount => FieldValue::Amount(self.recovery_amount),
            Field::Status => FieldValue::Text(&self.status),
        }
    }

    /// Order two records by one field: lexicographic for text, numeric for amounts
    pub fn compare_by(&self, other: &Record, field: Field) -> Ordering {
        match (self.get(field), other.get(field)) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Amount(a), FieldValue::Amount(b)) => {
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            // A field is always either text or amount on both sides
            _ => Ordering::Equal,
        }
    }
}

/// Record field, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Identifier,
    Owner,
    Unit,
    Segment,
    Period,
    ProblemText,
    RootCauseText,
    ActionText,
    LossAmount,
    RecoveryAmount,
    Status,
}

impl Field {
    /// All fields in declaration order (also the sheet's column order)
    pub const ALL: [Field; constants::COLUMN_COUNT] = [
        Field::Identifier,
        Field::Owner,
        Field::Unit,
        Field::Segment,
        Field::Period,
        Field::ProblemText,
        Field::RootCauseText,
        Field::ActionText,
        Field::LossAmount,
        Field::RecoveryAmount,
        Field::Status,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Identifier => "identifier",
            Field::Owner => "owner",
            Field::Unit => "unit",
            Field::Segment => "segment",
            Field::Period => "period",
            Field::ProblemText => "problem_text",
            Field::RootCauseText => "root_cause_text",
            Field::ActionText => "action_text",
            Field::LossAmount => "loss_amount",
            Field::RecoveryAmount => "recovery_amount",
            Field::Status => "status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Fields the detail table can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    Owner,
    Unit,
    Segment,
    Status,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Owner,
        FilterField::Unit,
        FilterField::Segment,
        FilterField::Status,
    ];

    pub fn field(self) -> Field {
        match self {
            FilterField::Owner => Field::Owner,
            FilterField::Unit => Field::Unit,
            FilterField::Segment => Field::Segment,
            FilterField::Status => Field::Status,
        }
    }

    /// The record's text value for this field
    pub fn value_of(self, record: &Record) -> &str {
        match self {
            FilterField::Owner => &record.owner,
            FilterField::Unit => &record.unit,
            FilterField::Segment => &record.segment,
            FilterField::Status => &record.status,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field().name())
    }
}

/// Canonical remediation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    NotYetAddressed,
    InProgress,
    Addressed,
    Completed,
}

impl Status {
    /// Canonical statuses in display order
    pub const ALL: [Status; 4] = [
        Status::NotYetAddressed,
        Status::InProgress,
        Status::Addressed,
        Status::Completed,
    ];

    /// Label as written in the sheet
    pub fn label(self) -> &'static str {
        match self {
            Status::NotYetAddressed => constants::STATUS_NOT_ADDRESSED,
            Status::InProgress => constants::STATUS_IN_PROGRESS,
            Status::Addressed => constants::STATUS_ADDRESSED,
            Status::Completed => constants::STATUS_COMPLETED,
        }
    }

    /// Exact match against the canonical labels; anything else is `None`
    pub fn parse(value: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.label() == value)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
