use serde::Serialize;
use serde_json::Value;
use std::backtrace::Backtrace;
use std::error::Error;

/// A single argument handed to a console-style logging call.
///
/// Console calls are variadic and untyped, so an argument is either an
/// arbitrary JSON value (text, numbers, objects, arrays, ...) or a captured
/// error. What the argument contributes to the final record is decided by
/// its runtime shape, see [`crate::classify`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogArgument {
    Value(Value),
    Error(ErrorValue),
}

impl LogArgument {
    /// Serialize any value into a structured-data argument.
    ///
    /// Serialization failures produce `null`, which the classifier drops.
    pub fn data<T: Serialize + ?Sized>(value: &T) -> Self {
        LogArgument::Value(serde_json::to_value(value).unwrap_or(Value::Null))
    }

    /// Capture an error (and its `source()` chain) as an error argument.
    pub fn error<E: Error + ?Sized>(err: &E) -> Self {
        LogArgument::Error(ErrorValue::from_error(err))
    }
}

impl From<&str> for LogArgument {
    fn from(s: &str) -> Self {
        LogArgument::Value(Value::String(s.to_string()))
    }
}

impl From<String> for LogArgument {
    fn from(s: String) -> Self {
        LogArgument::Value(Value::String(s))
    }
}

impl From<&String> for LogArgument {
    fn from(s: &String) -> Self {
        LogArgument::Value(Value::String(s.clone()))
    }
}

impl From<Value> for LogArgument {
    fn from(v: Value) -> Self {
        LogArgument::Value(v)
    }
}

impl From<ErrorValue> for LogArgument {
    fn from(e: ErrorValue) -> Self {
        LogArgument::Error(e)
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for LogArgument {
                fn from(v: $t) -> Self {
                    LogArgument::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_from_primitive!(i32, i64, u32, u64, usize, f64, bool);

/// Serializable snapshot of an error value.
///
/// Mirrors the conventional shape produced by JSON error serializers:
/// `{"type": .., "message": .., "stack": .., "cause": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorValue {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorValue>>,
}

impl ErrorValue {
    /// Plain error with the given message and no stack.
    pub fn new(message: impl Into<String>) -> Self {
        ErrorValue {
            kind: "Error".to_string(),
            message: message.into(),
            stack: None,
            cause: None,
        }
    }

    /// Snapshot an error and walk its `source()` chain.
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        ErrorValue {
            kind: short_type_name::<E>().to_string(),
            message: err.to_string(),
            stack: None,
            cause: err.source().map(|source| Box::new(Self::from_source(source))),
        }
    }

    fn from_source(err: &(dyn Error + 'static)) -> Self {
        ErrorValue {
            kind: "Error".to_string(),
            message: err.to_string(),
            stack: None,
            cause: err.source().map(|source| Box::new(Self::from_source(source))),
        }
    }

    /// Synthetic error whose only purpose is to carry the current call stack.
    ///
    /// The backtrace is captured regardless of `RUST_BACKTRACE`.
    pub fn capture() -> Self {
        ErrorValue {
            kind: "Error".to_string(),
            message: String::new(),
            stack: Some(Backtrace::force_capture().to_string()),
            cause: None,
        }
    }
}

impl std::fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Drop generic parameters before taking the last path segment.
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
