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

use std::fmt::Write;

use jiff::tz::TimeZone;

use crate::Error;
use crate::Layout;
use crate::layout::level_name;
use crate::level::LevelRegistry;
use crate::record::LogRecord;

/// A layout that formats log record as text.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00  INFO app::db: pool ready
/// 2024-08-11T22:44:57.172219+08:00 ERROR app::db: query failed (src/db.rs:88)
/// ```
///
/// The source location is only printed for traced records.
///
/// You can customize the timezone of the timestamp by setting the `tz` field with a [`TimeZone`]
/// instance. Otherwise, the system timezone is used.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use mailforth::layout::TextLayout;
///
/// let text_layout = TextLayout::default().timezone(TimeZone::UTC);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    tz: Option<TimeZone>,
}

impl TextLayout {
    /// Sets the timezone for timestamps.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &LogRecord, levels: &LevelRegistry) -> Result<String, Error> {
        let mut text = String::new();

        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let time = record
            .time()
            .to_zoned(tz)
            .strftime("%Y-%m-%dT%H:%M:%S.%6f%:z");
        let level = level_name(levels, record.severity());
        let width = levels.max_name_len();
        let logger = record.logger();
        let payload = record.payload();
        write!(&mut text, "{time} {level:>width$} {logger}: {payload}")
            .map_err(Error::from_fmt_error)?;

        if let Some(location) = record.location().filter(|_| record.traced()) {
            write!(&mut text, " ({}:{})", location.file, location.line)
                .map_err(Error::from_fmt_error)?;
        }

        Ok(text)
    }
}
