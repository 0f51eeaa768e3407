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

use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::Error;
use crate::append::mail::MailOptions;
use crate::append::mail::Numeric;
use crate::level::LevelRegistry;
use crate::level::Severity;

const DEFAULT_SERVER: &str = "localhost";
const DEFAULT_PORT: u16 = 25;
const DEFAULT_BUFFER_CAPACITY: usize = 100;

/// How the transport authenticates against the SMTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthType {
    /// Never authenticate.
    None,
    /// SASL `PLAIN`.
    Plain,
    /// SASL `LOGIN`.
    Login,
    /// SASL `CRAM-MD5`.
    #[default]
    CramMd5,
    /// Upgrade the connection with STARTTLS before authenticating.
    Tls,
}

impl AuthType {
    /// Return the canonical name of the auth type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::None => "none",
            AuthType::Plain => "plain",
            AuthType::Login => "login",
            AuthType::CramMd5 => "cram_md5",
            AuthType::Tls => "tls",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AuthType::None),
            "plain" => Ok(AuthType::Plain),
            "login" => Ok(AuthType::Login),
            "cram_md5" | "cram-md5" => Ok(AuthType::CramMd5),
            "tls" => Ok(AuthType::Tls),
            _ => Err(Error::config_invalid("unknown auth type").with_context("authType", s)),
        }
    }
}

/// Validated configuration of a [`Mail`](super::Mail) appender.
///
/// Built once from [`MailOptions`] with [`MailConfig::from_options`] and immutable afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    from: String,
    to: Vec<String>,
    server: String,
    port: u16,
    domain: String,
    account: Option<String>,
    password: Option<String>,
    auth_type: AuthType,
    subject: String,
    buffer_capacity: usize,
    immediate_levels: BTreeSet<Severity>,
    level: Severity,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("server", &self.server)
            .field("port", &self.port)
            .field("domain", &self.domain)
            .field("account", &self.account)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("auth_type", &self.auth_type)
            .field("subject", &self.subject)
            .field("buffer_capacity", &self.buffer_capacity)
            .field("immediate_levels", &self.immediate_levels)
            .field("level", &self.level)
            .finish()
    }
}

impl MailConfig {
    /// Normalize raw options, resolving level names against `levels`.
    ///
    /// # Errors
    ///
    /// Return a [`ConfigInvalid`](crate::ErrorKind::ConfigInvalid) error if either:
    ///
    /// * `from` is missing, or `to` is missing or names no recipient.
    /// * `port` or `bufferCapacity` is not a number in range.
    /// * `immediateLevels` or `level` names an unknown level.
    /// * `authType` is not a known auth type.
    pub fn from_options(options: &MailOptions, levels: &LevelRegistry) -> Result<Self, Error> {
        let from = options
            .from
            .as_deref()
            .map(str::trim)
            .filter(|from| !from.is_empty())
            .ok_or_else(|| Error::config_invalid("must specify from address"))?
            .to_owned();

        let mut to: Vec<String> = vec![];
        if let Some(list) = &options.to {
            for recipient in list.entries() {
                if !to.iter().any(|r| r == recipient) {
                    to.push(recipient.to_owned());
                }
            }
        }
        if to.is_empty() {
            return Err(Error::config_invalid("must specify to address"));
        }

        let port = match &options.port {
            Some(port) => parse_numeric("port", port)?,
            None => DEFAULT_PORT,
        };
        let buffer_capacity = match &options.buffer_capacity {
            Some(capacity) => parse_numeric("bufferCapacity", capacity)?,
            None => DEFAULT_BUFFER_CAPACITY,
        };

        let immediate_levels = match &options.immediate_levels {
            Some(list) => levels
                .collect(list.entries())
                .map_err(|err| err.with_context("option", "immediateLevels"))?,
            None => BTreeSet::new(),
        };
        let level = match &options.level {
            Some(name) => levels
                .rank(name)
                .map_err(|err| err.with_context("option", "level"))?,
            None => levels.lowest(),
        };

        let auth_type = match &options.auth_type {
            Some(name) => name.parse()?,
            None => AuthType::default(),
        };

        Ok(Self {
            from,
            to,
            server: options
                .server
                .clone()
                .unwrap_or_else(|| DEFAULT_SERVER.to_owned()),
            port,
            domain: options.domain.clone().unwrap_or_else(default_domain),
            account: options.account.clone(),
            password: options.password.clone(),
            auth_type,
            subject: options.subject.clone().unwrap_or_else(default_subject),
            buffer_capacity,
            immediate_levels,
            level,
        })
    }

    /// The sender address.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// The recipients, in configuration order without duplicates.
    pub fn to(&self) -> &[String] {
        &self.to
    }

    /// The SMTP server host.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// The SMTP server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The domain announced to the SMTP server.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The login account.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// The login password.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// The authentication type.
    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    /// The mail subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// How many messages are queued before a mail is sent. Zero sends every message on its own.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Severities sent without waiting for the buffer to fill.
    pub fn immediate_levels(&self) -> &BTreeSet<Severity> {
        &self.immediate_levels
    }

    /// The initial threshold of the appender.
    pub fn level(&self) -> Severity {
        self.level
    }
}

fn parse_numeric<T>(option: &'static str, value: &Numeric) -> Result<T, Error>
where
    T: TryFrom<u64> + FromStr,
    <T as TryFrom<u64>>::Error: std::error::Error + Send + Sync + 'static,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let invalid = || Error::config_invalid("invalid numeric option").with_context("option", option);
    match value {
        Numeric::Int(n) => T::try_from(*n).map_err(|err| {
            invalid()
                .with_context("value", n)
                .with_source(err)
        }),
        Numeric::Text(text) => text.trim().parse().map_err(|err| {
            invalid()
                .with_context("value", text)
                .with_source(err)
        }),
    }
}

fn default_domain() -> String {
    domain_or_localhost(env::var("HOSTNAME").ok())
}

fn domain_or_localhost(hostname: Option<String>) -> String {
    hostname
        .filter(|host| !host.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_owned())
}

fn default_subject() -> String {
    let program = env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .or_else(|| {
            let exe = env::current_exe().ok()?;
            let name = Path::new(&exe).file_name()?;
            Some(name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "unknown".to_owned());
    format!("Message of {program}")
}
