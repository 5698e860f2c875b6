use super::serde::null_to_default;
use crate::gce::{last_segment, OperationName, Region, Zone};
use itertools::Itertools;
use serde::Deserialize;
use std::fmt;

/// Provider-side handle to an asynchronous action, as returned by an insert
/// or delete request and by each subsequent status poll.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: OperationName,
    pub status: OperationStatus,
    pub operation_type: Option<String>,
    pub zone: Option<String>,
    pub region: Option<String>,
    pub target_link: Option<String>,
    pub error: Option<OperationErrors>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub warnings: Vec<OperationWarning>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }

    /// Where the operation lives; required to poll it.
    pub fn scope(&self) -> OperationScope {
        if let Some(zone) = &self.zone {
            OperationScope::Zonal(Zone::new(last_segment(zone)))
        } else if let Some(region) = &self.region {
            OperationScope::Regional(Region::new(last_segment(region)))
        } else {
            OperationScope::Global
        }
    }

    /// First error code plus all error messages, if the operation failed.
    pub fn failure(&self) -> Option<(&str, String)> {
        let errors = &self.error.as_ref()?.errors;
        let first = errors.first()?;
        let message = errors.iter().map(|err| err.message.as_str()).join("; ");

        Some((first.code.as_str(), message))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Running,
    Done,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperationScope {
    Zonal(Zone),
    Regional(Region),
    Global,
}

impl fmt::Display for OperationScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Zonal(zone) => write!(f, "zones/{}", zone),
            Self::Regional(region) => write!(f, "regions/{}", region),
            Self::Global => write!(f, "global"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct OperationErrors {
    #[serde(default, deserialize_with = "null_to_default")]
    pub errors: Vec<OperationError>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OperationError {
    pub code: String,

    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OperationWarning {
    pub code: String,

    #[serde(default)]
    pub message: String,
}

impl fmt::Display for OperationWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
