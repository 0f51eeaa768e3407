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

//! Log severities and the registry that names them.

use std::collections::BTreeSet;
use std::fmt;

use crate::Error;

/// The rank of a log level within a [`LevelRegistry`].
///
/// Higher ranks are more severe. The rank equal to the registry length is reserved as the
/// "disabled" sentinel, see [`LevelRegistry::disabled`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Severity(usize);

impl Severity {
    /// Create a severity from a raw rank.
    pub const fn new(rank: usize) -> Self {
        Self(rank)
    }

    /// Return the raw rank.
    pub const fn rank(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An ordered set of level names; a level's rank is its position.
///
/// The registry is built once and then shared (usually behind an `Arc`) by appenders,
/// layouts and loggers.
///
/// # Examples
///
/// ```
/// use mailforth::level::LevelRegistry;
///
/// let levels = LevelRegistry::new(["debug", "info", "warn", "error", "fatal"]).unwrap();
/// assert_eq!(levels.rank("warn").unwrap().rank(), 2);
/// assert_eq!(levels.disabled().rank(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRegistry {
    names: Vec<String>,
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self {
            names: ["debug", "info", "warn", "error", "fatal"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl LevelRegistry {
    /// Create a registry from level names ordered from least to most severe.
    ///
    /// # Errors
    ///
    /// Return an error if the list is empty, or if a name is blank or repeated.
    pub fn new<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registered: Vec<String> = vec![];
        for name in names {
            let name = normalize(name.as_ref());
            if name.is_empty() {
                return Err(Error::config_invalid("level name must not be blank"));
            }
            if registered.contains(&name) {
                return Err(Error::config_invalid("level name is defined twice")
                    .with_context("level", name));
            }
            registered.push(name);
        }

        if registered.is_empty() {
            return Err(Error::config_invalid("at least one level must be defined"));
        }

        Ok(Self { names: registered })
    }

    /// Look up the severity of a level name, ignoring case and surrounding whitespace.
    pub fn rank(&self, name: &str) -> Result<Severity, Error> {
        let wanted = normalize(name);
        self.names
            .iter()
            .position(|n| *n == wanted)
            .map(Severity)
            .ok_or_else(|| Error::config_invalid("unknown level name").with_context("level", name))
    }

    /// Return the name of a severity, or `None` for the sentinel and out-of-range ranks.
    pub fn name(&self, severity: Severity) -> Option<&str> {
        self.names.get(severity.0).map(String::as_str)
    }

    /// Parse a comma-delimited list of level names into a set of severities.
    ///
    /// Blank entries are skipped, so `"error, fatal,"` names two levels.
    pub fn parse_list(&self, list: &str) -> Result<BTreeSet<Severity>, Error> {
        self.collect(list.split(','))
    }

    /// Look up every name of the iterator, skipping blank entries.
    pub fn collect<I, S>(&self, names: I) -> Result<BTreeSet<Severity>, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| !name.as_ref().trim().is_empty())
            .map(|name| self.rank(name.as_ref()))
            .collect()
    }

    /// The number of registered levels.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; a registry holds at least one level.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The least severe level.
    pub fn lowest(&self) -> Severity {
        Severity(0)
    }

    /// The sentinel rank, greater than every registered level, meaning "disabled".
    pub fn disabled(&self) -> Severity {
        Severity(self.names.len())
    }

    /// The length of the longest level name.
    pub fn max_name_len(&self) -> usize {
        self.names.iter().map(String::len).max().unwrap_or_default()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_default_registry() {
        let levels = LevelRegistry::default();
        assert_eq!(levels.len(), 5);
        assert_eq!(levels.rank("debug").unwrap(), levels.lowest());
        assert_eq!(levels.rank(" FATAL ").unwrap(), Severity::new(4));
        assert_eq!(levels.name(Severity::new(2)), Some("warn"));
        assert_eq!(levels.name(levels.disabled()), None);
        assert_eq!(levels.max_name_len(), 5);
    }

    #[test]
    fn test_unknown_level() {
        let err = LevelRegistry::default().rank("loud").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context("level"), Some("loud"));
    }

    #[test]
    fn test_parse_list() {
        let levels = LevelRegistry::default();
        let set = levels.parse_list("error, fatal,").unwrap();
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec![Severity::new(3), Severity::new(4)]
        );
        assert!(levels.parse_list("").unwrap().is_empty());
        assert!(levels.parse_list("error, trace").is_err());
    }

    #[test]
    fn test_invalid_registries() {
        assert!(LevelRegistry::new(Vec::<String>::new()).is_err());
        assert!(LevelRegistry::new(["info", " "]).is_err());
        assert!(LevelRegistry::new(["info", "INFO"]).is_err());

        let levels = LevelRegistry::new(["low", "high"]).unwrap();
        assert_eq!(levels.disabled(), Severity::new(2));
    }
}
