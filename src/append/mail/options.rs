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

use serde::Deserialize;

/// A value that may be given either as an integer or as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// An integer.
    Int(u64),
    /// A string expected to hold an integer.
    Text(String),
}

impl From<u16> for Numeric {
    fn from(value: u16) -> Self {
        Numeric::Int(value.into())
    }
}

impl From<u32> for Numeric {
    fn from(value: u32) -> Self {
        Numeric::Int(value.into())
    }
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        Numeric::Int(value)
    }
}

impl From<usize> for Numeric {
    fn from(value: usize) -> Self {
        Numeric::Int(u64::try_from(value).unwrap_or(u64::MAX))
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Numeric::Text(value.to_owned())
    }
}

impl From<String> for Numeric {
    fn from(value: String) -> Self {
        Numeric::Text(value)
    }
}

/// A list given either as one comma-delimited string or as a sequence of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    /// A comma-delimited string, such as `"error, fatal"`.
    Delimited(String),
    /// A sequence of entries.
    Items(Vec<String>),
}

impl StringList {
    /// The trimmed, non-blank entries in order.
    pub fn entries(&self) -> Vec<&str> {
        let entries: Box<dyn Iterator<Item = &str> + '_> = match self {
            StringList::Delimited(list) => Box::new(list.split(',')),
            StringList::Items(items) => Box::new(items.iter().map(String::as_str)),
        };
        entries
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

impl From<&str> for StringList {
    fn from(value: &str) -> Self {
        StringList::Delimited(value.to_owned())
    }
}

impl From<String> for StringList {
    fn from(value: String) -> Self {
        StringList::Delimited(value)
    }
}

impl From<Vec<String>> for StringList {
    fn from(value: Vec<String>) -> Self {
        StringList::Items(value)
    }
}

impl From<Vec<&str>> for StringList {
    fn from(value: Vec<&str>) -> Self {
        StringList::Items(value.into_iter().map(String::from).collect())
    }
}

/// Raw options of a [`Mail`](super::Mail) appender, before validation.
///
/// Options can be set with the builder methods, or deserialized from any self-describing format.
/// The recognized keys, with interchangeable aliases, are:
///
/// | Key | Aliases | Value |
/// |-----|---------|-------|
/// | `from` | | sender address, required |
/// | `to` | | recipient or comma-delimited recipients, required |
/// | `server` | | SMTP host, default `localhost` |
/// | `port` | | integer or numeric string, default `25` |
/// | `domain` | | HELO domain, default `$HOSTNAME` |
/// | `account` | `acct` | login account |
/// | `password` | `passwd` | login password |
/// | `authType` | `authtype`, `auth_type` | `none`, `plain`, `login`, `cram_md5` or `tls` |
/// | `subject` | | default `Message of <program>` |
/// | `bufferCapacity` | `buffsize`, `buffer_capacity` | integer or numeric string, default `100` |
/// | `immediateLevels` | `immediate_at`, `immediate_levels` | level names sent without buffering |
/// | `level` | | lowest level the appender accepts |
///
/// Unknown keys are rejected.
///
/// # Examples
///
/// ```
/// use mailforth::append::mail::MailOptions;
///
/// let options = MailOptions::new()
///     .from("me@example.com")
///     .to("you@example.com, them@example.com")
///     .buffer_capacity("3")
///     .immediate_levels("error, fatal");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailOptions {
    pub(crate) from: Option<String>,
    pub(crate) to: Option<StringList>,
    pub(crate) server: Option<String>,
    pub(crate) port: Option<Numeric>,
    pub(crate) domain: Option<String>,
    #[serde(alias = "acct")]
    pub(crate) account: Option<String>,
    #[serde(alias = "passwd")]
    pub(crate) password: Option<String>,
    #[serde(rename = "authType", alias = "authtype", alias = "auth_type")]
    pub(crate) auth_type: Option<String>,
    pub(crate) subject: Option<String>,
    #[serde(
        rename = "bufferCapacity",
        alias = "buffsize",
        alias = "buffer_capacity"
    )]
    pub(crate) buffer_capacity: Option<Numeric>,
    #[serde(
        rename = "immediateLevels",
        alias = "immediate_at",
        alias = "immediate_levels"
    )]
    pub(crate) immediate_levels: Option<StringList>,
    pub(crate) level: Option<String>,
}

impl MailOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender address.
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the recipients.
    pub fn to(mut self, to: impl Into<StringList>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Set the SMTP server host.
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Set the SMTP server port.
    pub fn port(mut self, port: impl Into<Numeric>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Set the domain announced to the SMTP server.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the login account.
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the login password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the authentication type by name.
    pub fn auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type.into());
        self
    }

    /// Set the mail subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set how many messages are queued before a mail is sent.
    pub fn buffer_capacity(mut self, capacity: impl Into<Numeric>) -> Self {
        self.buffer_capacity = Some(capacity.into());
        self
    }

    /// Set the level names that are sent without buffering.
    pub fn immediate_levels(mut self, levels: impl Into<StringList>) -> Self {
        self.immediate_levels = Some(levels.into());
        self
    }

    /// Set the lowest level name the appender accepts.
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_aliases() {
        let options: MailOptions = serde_json::from_str(
            r#"{
                "from": "me",
                "to": "you",
                "buffsize": "3",
                "immediate_at": "error, fatal",
                "domain": "test.logging",
                "acct": "test",
                "passwd": "test",
                "authtype": "tls",
                "port": 443
            }"#,
        )
        .unwrap();

        let expected = MailOptions::new()
            .from("me")
            .to("you")
            .buffer_capacity("3")
            .immediate_levels("error, fatal")
            .domain("test.logging")
            .account("test")
            .password("test")
            .auth_type("tls")
            .port(443u16);
        assert_eq!(options, expected);
    }

    #[test]
    fn test_deserialize_canonical_keys() {
        let options: MailOptions = serde_json::from_str(
            r#"{
                "from": "me",
                "to": ["you", "them"],
                "bufferCapacity": 10,
                "immediateLevels": ["fatal"],
                "authType": "plain",
                "account": "me",
                "password": "secret"
            }"#,
        )
        .unwrap();
        assert_eq!(options.to, Some(StringList::from(vec!["you", "them"])));
        assert_eq!(options.buffer_capacity, Some(Numeric::Int(10)));
        assert_eq!(options.auth_type.as_deref(), Some("plain"));
    }

    #[test]
    fn test_reject_unknown_key() {
        let err = serde_json::from_str::<MailOptions>(r#"{"from": "me", "cc": "you"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field `cc`"), "{err}");
    }

    #[test]
    fn test_numeric_from_usize() {
        assert_eq!(Numeric::from(50usize), Numeric::Int(50));
        assert_eq!(Numeric::from(0usize), Numeric::Int(0));
    }

    #[test]
    fn test_list_entries() {
        let list = StringList::from(" you, ,them ,");
        assert_eq!(list.entries(), vec!["you", "them"]);
        let list = StringList::from(vec![" you ", ""]);
        assert_eq!(list.entries(), vec!["you"]);
    }
}
