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

use std::sync::Arc;

use crate::Append;
use crate::Error;
use crate::Logger;
use crate::Trap;
use crate::level::LevelRegistry;
use crate::logger::set_global_logger;
use crate::trap::DefaultTrap;

/// Create a new [`LoggerBuilder`] over the default level registry.
///
/// # Examples
///
/// ```
/// use mailforth::append::Mail;
/// use mailforth::append::mail::CaptureTransport;
/// use mailforth::append::mail::MailOptions;
///
/// let mail = Mail::builder("ops", MailOptions::new().from("app@example.com").to("ops@example.com"))
///     .transport(CaptureTransport::default())
///     .build()
///     .unwrap();
/// let logger = mailforth::builder().level("warn").append(mail).build().unwrap();
/// ```
pub fn builder() -> LoggerBuilder {
    LoggerBuilder::new(LevelRegistry::default())
}

/// A builder for configuring a [`Logger`] and setting it up as the `log` crate global logger.
#[must_use = "call `apply` to set the global logger or `build` to construct a logger instance"]
#[derive(Debug)]
pub struct LoggerBuilder {
    levels: Arc<LevelRegistry>,
    level: Option<String>,
    trace: bool,
    appends: Vec<Box<dyn Append>>,
    trap: Box<dyn Trap>,
}

impl LoggerBuilder {
    /// Create a logger builder resolving levels against `levels`.
    pub fn new(levels: impl Into<Arc<LevelRegistry>>) -> Self {
        Self {
            levels: levels.into(),
            level: None,
            trace: false,
            appends: vec![],
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the name of the lowest level forwarded to appenders.
    ///
    /// Default to the lowest level of the registry.
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Attach the source location of each record and mark it as traced.
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Add an appender.
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.appends.push(append.into());
        self
    }

    /// Set the trap for appender errors.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the [`Logger`].
    ///
    /// # Errors
    ///
    /// Return an error if the level name is not in the registry.
    pub fn build(self) -> Result<Logger, Error> {
        let LoggerBuilder {
            levels,
            level,
            trace,
            appends,
            trap,
        } = self;

        let threshold = match level {
            Some(name) => levels.rank(&name)?,
            None => levels.lowest(),
        };
        Ok(Logger {
            levels,
            threshold,
            trace,
            appends,
            trap,
        })
    }

    /// Set up the `log` crate global logger with the configured appenders.
    ///
    /// This should be called early in the execution of a Rust program. Any log events that occur
    /// before initialization will be ignored.
    ///
    /// # Errors
    ///
    /// Return an error if the level name is unknown, or if a global logger has already been set.
    pub fn try_apply(self) -> Result<(), Error> {
        set_global_logger(self.build()?)
    }

    /// Set up the `log` crate global logger with the configured appenders.
    ///
    /// # Panics
    ///
    /// Panic if the level name is unknown, or if the global logger has already been set.
    pub fn apply(self) {
        self.try_apply()
            .expect("LoggerBuilder::apply must be called before the global logger initialized");
    }
}
