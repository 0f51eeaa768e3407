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

use crate::Error;
use crate::Layout;
use crate::layout::level_name;
use crate::level::LevelRegistry;
use crate::record::LogRecord;

/// A layout that prints the level, the logger name and the payload.
///
/// Level names are right-aligned to the longest name in the registry.
///
/// Output format:
///
/// ```text
///  WARN  TestLogger : <alloc::vec::Vec<i32>> [1, 2, 3, 4]
/// ERROR  ErrLogger : error message
/// FATAL  FatalLogger : fatal message
/// ```
///
/// # Examples
///
/// ```
/// use mailforth::layout::BasicLayout;
///
/// let basic_layout = BasicLayout::default();
/// ```
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct BasicLayout {}

impl Layout for BasicLayout {
    fn format(&self, record: &LogRecord, levels: &LevelRegistry) -> Result<String, Error> {
        let mut text = String::new();
        let level = level_name(levels, record.severity());
        let width = levels.max_name_len();
        let logger = record.logger();
        let payload = record.payload();
        write!(&mut text, "{level:>width$}  {logger} : {payload}").map_err(Error::from_fmt_error)?;
        Ok(text)
    }
}
