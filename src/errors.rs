use thiserror::Error;

use crate::decimal::Money;
use crate::rules::Rejection;
use crate::types::{ClientId, PaymentId};

/// malformed input, caught before any plan rule runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("invalid payment amount: {value}")]
    InvalidAmount {
        value: String,
    },

    #[error("invalid total due: {value}")]
    InvalidTotalDue {
        value: String,
    },

    #[error("invalid date: {value} (expected YYYY-MM-DD)")]
    InvalidDate {
        value: String,
    },

    #[error("unknown payment plan: {value}")]
    UnknownPlanType {
        value: String,
    },

    #[error("missing required field: {field}")]
    MissingField {
        field: &'static str,
    },

    #[error("invalid client id: {value}")]
    InvalidClientId {
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("client not found: {id}")]
    ClientNotFound {
        id: ClientId,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: PaymentId,
    },

    #[error("a client with email {email} already exists")]
    DuplicateEmail {
        email: String,
    },

    #[error("total due {total_due} is below the {total_paid} already paid")]
    TotalBelowPaid {
        total_due: Money,
        total_paid: Money,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("export failed: {message}")]
    Export {
        message: String,
    },
}

impl From<csv::Error> for LedgerError {
    fn from(e: csv::Error) -> Self {
        LedgerError::Export {
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::Export {
            message: e.to_string(),
        }
    }
}

impl LedgerError {
    /// rejection details when the error is a plan rule violation
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            LedgerError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
