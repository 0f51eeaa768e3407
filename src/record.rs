// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log record and payload.

use std::any::type_name;
use std::fmt;

use jiff::Timestamp;

use crate::level::Severity;

/// The payload of a log message.
pub enum Payload {
    /// A plain message, rendered as is.
    Text(String),
    /// An arbitrary value, rendered as `<type> {value:?}`.
    Value {
        /// The type name of the value.
        type_name: &'static str,
        /// The value itself.
        value: Box<dyn fmt::Debug + Send + Sync>,
    },
    /// An error, rendered as `<type> message` followed by its source chain.
    Error {
        /// The type name of the error.
        type_name: &'static str,
        /// The error itself.
        error: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Payload {
    /// Wrap an arbitrary value.
    pub fn value<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Payload::Value {
            type_name: short_type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// Wrap an error.
    pub fn error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Payload::Error {
            type_name: short_type_name::<E>(),
            error: Box::new(error),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Payload::Value { type_name, value } => f
                .debug_struct("Value")
                .field("type_name", type_name)
                .field("value", value)
                .finish(),
            Payload::Error { type_name, error } => f
                .debug_struct("Error")
                .field("type_name", type_name)
                .field("error", error)
                .finish(),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Value { type_name, value } => write!(f, "<{type_name}> {value:?}"),
            Payload::Error { type_name, error } => {
                write!(f, "<{type_name}> {error}")?;
                let mut source = error.source();
                while let Some(err) = source {
                    write!(f, "\n\tcaused by: {err}")?;
                    source = err.source();
                }
                Ok(())
            }
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}

// generic names keep their full path; stripping it would leave a dangling `>`
fn short_type_name<T: ?Sized>() -> &'static str {
    let name = type_name::<T>();
    if name.contains('<') {
        return name;
    }
    name.rsplit("::").next().unwrap_or(name)
}

/// Where a traced record was emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// The source file.
    pub file: String,
    /// The line within the file.
    pub line: u32,
    /// The enclosing function or module, if known.
    pub function: Option<String>,
}

/// A log record to be appended.
///
/// # Examples
///
/// ```
/// use mailforth::level::LevelRegistry;
/// use mailforth::record::LogRecord;
///
/// let levels = LevelRegistry::default();
/// let record = LogRecord::builder()
///     .logger("app::db")
///     .severity(levels.rank("warn").unwrap())
///     .payload("connection pool exhausted")
///     .build();
/// assert_eq!(record.logger(), "app::db");
/// ```
#[derive(Debug)]
pub struct LogRecord {
    time: Timestamp,
    logger: String,
    severity: Severity,
    payload: Payload,
    traced: bool,
    location: Option<Location>,
}

impl LogRecord {
    /// Create a new [`LogRecordBuilder`].
    pub fn builder() -> LogRecordBuilder {
        LogRecordBuilder::default()
    }

    /// Create a record carrying a plain message.
    pub fn new(logger: impl Into<String>, severity: Severity, payload: impl Into<Payload>) -> Self {
        Self::builder()
            .logger(logger)
            .severity(severity)
            .payload(payload)
            .build()
    }

    /// The observed time.
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// The name of the logger that emitted the record.
    pub fn logger(&self) -> &str {
        &self.logger
    }

    /// The severity of the record.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The message body.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Whether the record was emitted with tracing enabled.
    pub fn traced(&self) -> bool {
        self.traced
    }

    /// The source location, available for traced records.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

/// Builder for [`LogRecord`].
#[derive(Debug)]
pub struct LogRecordBuilder {
    record: LogRecord,
}

impl Default for LogRecordBuilder {
    fn default() -> Self {
        LogRecordBuilder {
            record: LogRecord {
                time: Timestamp::now(),
                logger: String::new(),
                severity: Severity::new(0),
                payload: Payload::Text(String::new()),
                traced: false,
                location: None,
            },
        }
    }
}

impl LogRecordBuilder {
    /// Set [`time`](LogRecord::time).
    pub fn time(mut self, time: Timestamp) -> Self {
        self.record.time = time;
        self
    }

    /// Set [`logger`](LogRecord::logger).
    pub fn logger(mut self, logger: impl Into<String>) -> Self {
        self.record.logger = logger.into();
        self
    }

    /// Set [`severity`](LogRecord::severity).
    pub fn severity(mut self, severity: Severity) -> Self {
        self.record.severity = severity;
        self
    }

    /// Set [`payload`](LogRecord::payload).
    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.record.payload = payload.into();
        self
    }

    /// Set [`traced`](LogRecord::traced).
    pub fn traced(mut self, traced: bool) -> Self {
        self.record.traced = traced;
        self
    }

    /// Set [`location`](LogRecord::location); this also marks the record as traced.
    pub fn location(mut self, location: Location) -> Self {
        self.record.traced = true;
        self.record.location = Some(location);
        self
    }

    /// Invoke the builder and return a `LogRecord`
    pub fn build(self) -> LogRecord {
        self.record
    }
}
