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
use crate::Trap;
use crate::level::LevelRegistry;
use crate::level::Severity;
use crate::record::Location;
use crate::record::LogRecord;

mod builder;

pub use self::builder::LoggerBuilder;
pub use self::builder::builder;

/// A logger that forwards records of the `log` crate to appenders.
///
/// A `log` level is mapped to the registry level of the same name, compared case-insensitively.
/// Levels the registry does not define, or that rank below the logger threshold, are disabled.
/// With the default registry this disables `trace`.
///
/// Errors raised by appenders are sent to the trap.
#[derive(Debug)]
pub struct Logger {
    levels: Arc<LevelRegistry>,
    threshold: Severity,
    trace: bool,
    appends: Vec<Box<dyn Append>>,
    trap: Box<dyn Trap>,
}

impl Logger {
    /// The registry severity of a `log` level, if the registry defines it.
    pub fn severity_of(&self, level: log::Level) -> Option<Severity> {
        self.levels.rank(level.as_str()).ok()
    }

    /// The lowest severity this logger forwards.
    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Forward a record to every appender, regardless of the threshold.
    pub fn dispatch(&self, record: &LogRecord) {
        for append in &self.appends {
            if let Err(err) = append.append(record) {
                self.trap.trap(&err);
            }
        }
    }

    /// Close every appender.
    pub fn close(&self) {
        for append in &self.appends {
            if let Err(err) = append.close() {
                self.trap.trap(&err);
            }
        }
    }

    fn enabled_severity(&self, level: log::Level) -> Option<Severity> {
        self.severity_of(level)
            .filter(|severity| *severity >= self.threshold)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.enabled_severity(metadata.level()).is_some()
    }

    fn log(&self, record: &log::Record) {
        let Some(severity) = self.enabled_severity(record.level()) else {
            return;
        };

        let mut builder = LogRecord::builder()
            .logger(record.target())
            .severity(severity)
            .payload(record.args().to_string());
        if self.trace {
            builder = builder.traced(true);
            if let (Some(file), Some(line)) = (record.file(), record.line()) {
                builder = builder.location(Location {
                    file: file.to_owned(),
                    line,
                    function: record.module_path().map(String::from),
                });
            }
        }

        self.dispatch(&builder.build());
    }

    fn flush(&self) {
        for append in &self.appends {
            if let Err(err) = append.flush() {
                self.trap.trap(&err);
            }
        }
    }
}

pub(crate) fn set_global_logger(logger: Logger) -> Result<(), Error> {
    log::set_boxed_logger(Box::new(logger))
        .map_err(|err| Error::unexpected("failed to set up logger").with_source(err))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use log::Log;

    use super::*;

    #[derive(Debug, Default)]
    struct Collect(Mutex<Vec<(String, Severity, bool)>>);

    impl Append for Collect {
        fn append(&self, record: &LogRecord) -> Result<(), Error> {
            let mut records = self.0.lock().unwrap();
            records.push((record.payload().to_string(), record.severity(), record.traced()));
            Ok(())
        }
    }

    #[test]
    fn test_level_mapping() {
        let collect = Arc::new(Collect::default());
        let logger = builder()
            .level("info")
            .append(collect.clone())
            .build()
            .unwrap();

        let levels = LevelRegistry::default();
        assert_eq!(logger.severity_of(log::Level::Error), Some(levels.rank("error").unwrap()));
        assert_eq!(logger.severity_of(log::Level::Trace), None);
        assert!(logger.enabled(&log::Metadata::builder().level(log::Level::Warn).build()));
        assert!(!logger.enabled(&log::Metadata::builder().level(log::Level::Debug).build()));

        logger.log(
            &log::Record::builder()
                .args(format_args!("disk {}% full", 91))
                .level(log::Level::Warn)
                .target("app::disk")
                .build(),
        );
        logger.log(
            &log::Record::builder()
                .args(format_args!("noise"))
                .level(log::Level::Debug)
                .build(),
        );

        let records = collect.0.lock().unwrap();
        assert_eq!(
            *records,
            vec![("disk 91% full".to_string(), levels.rank("warn").unwrap(), false)]
        );
    }

    #[test]
    fn test_trace_location() {
        let collect = Arc::new(Collect::default());
        let logger = builder().trace(true).append(collect.clone()).build().unwrap();

        logger.log(
            &log::Record::builder()
                .args(format_args!("traced"))
                .level(log::Level::Info)
                .file(Some("src/main.rs"))
                .line(Some(3))
                .build(),
        );

        let records = collect.0.lock().unwrap();
        assert!(records[0].2);
    }
}
