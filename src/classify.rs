//! Runtime-shape classification of console arguments.
//!
//! The three predicates are independent: an argument is checked against
//! each of them and may, in principle, satisfy more than one. Callers
//! accumulate into separate buckets instead of branching on a single
//! variant. Arguments satisfying none of them (numbers, booleans, null)
//! contribute nothing.

use crate::argument::LogArgument;
use serde_json::Value;

/// Textual arguments become message fragments.
pub fn is_message(arg: &LogArgument) -> bool {
    matches!(arg, LogArgument::Value(Value::String(_)))
}

/// Non-null composite values that are not errors.
///
/// Arrays count as structured data alongside objects.
pub fn is_plain_object(arg: &LogArgument) -> bool {
    !is_error(arg) && matches!(arg, LogArgument::Value(Value::Object(_) | Value::Array(_)))
}

pub fn is_error(arg: &LogArgument) -> bool {
    matches!(arg, LogArgument::Error(_))
}

/// Result of applying every predicate to one argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub message: bool,
    pub data: bool,
    pub error: bool,
}

pub fn classify(arg: &LogArgument) -> Classification {
    Classification {
        message: is_message(arg),
        data: is_plain_object(arg),
        error: is_error(arg),
    }
}
