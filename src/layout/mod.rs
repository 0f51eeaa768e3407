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

//! Layouts for formatting log records.

use std::fmt;

use crate::Error;
use crate::level::LevelRegistry;
use crate::level::Severity;
use crate::record::LogRecord;

mod basic;
mod text;

pub use self::basic::BasicLayout;
pub use self::text::TextLayout;

/// A layout for rendering log records into a line of text.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Formats a log record, naming its severity with the given registry.
    fn format(&self, record: &LogRecord, levels: &LevelRegistry) -> Result<String, Error>;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

// Upper-cased level name; unnamed ranks print as their number.
fn level_name(levels: &LevelRegistry, severity: Severity) -> String {
    match levels.name(severity) {
        Some(name) => name.to_ascii_uppercase(),
        None => severity.to_string(),
    }
}
