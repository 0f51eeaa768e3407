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

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use jiff::Timestamp;

use crate::Error;
use crate::append::mail::AuthType;
use crate::append::mail::MailConfig;

/// A transport that delivers one bundled mail to a mail server.
pub trait MailTransport: fmt::Debug + Send + Sync + 'static {
    /// Deliver the mail.
    ///
    /// Timeouts and retries, if any, are the transport's own policy.
    fn send(&self, mail: &OutgoingMail) -> Result<(), Error>;
}

impl<T: MailTransport> From<T> for Box<dyn MailTransport> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// A mail ready to be handed to a [`MailTransport`].
#[derive(Clone)]
#[non_exhaustive]
pub struct OutgoingMail<'a> {
    /// The sender address.
    pub from: &'a str,
    /// The recipients.
    pub to: &'a [String],
    /// The subject line.
    pub subject: &'a str,
    /// The bundled messages, one per line.
    pub body: &'a str,
    /// The SMTP server host.
    pub server: &'a str,
    /// The SMTP server port.
    pub port: u16,
    /// The domain announced to the server and used in the message id.
    pub domain: &'a str,
    /// The login account.
    pub account: Option<&'a str>,
    /// The login password.
    pub password: Option<&'a str>,
    /// The authentication type.
    pub auth_type: AuthType,
    /// The value of the `Date` header.
    pub date: Timestamp,
    /// The value of the `Message-Id` header.
    pub message_id: String,
}

impl<'a> OutgoingMail<'a> {
    /// Create a mail from the appender configuration, stamped with `date`.
    pub fn new(config: &'a MailConfig, body: &'a str, date: Timestamp) -> Self {
        Self {
            from: config.from(),
            to: config.to(),
            subject: config.subject(),
            body,
            server: config.server(),
            port: config.port(),
            domain: config.domain(),
            account: config.account(),
            password: config.password(),
            auth_type: config.auth_type(),
            date,
            message_id: message_id(date, config.domain()),
        }
    }
}

impl fmt::Debug for OutgoingMail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutgoingMail")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .field("body", &self.body)
            .field("server", &self.server)
            .field("port", &self.port)
            .field("domain", &self.domain)
            .field("account", &self.account)
            .field("password", &self.password.map(|_| "<redacted>"))
            .field("auth_type", &self.auth_type)
            .field("date", &self.date)
            .field("message_id", &self.message_id)
            .finish()
    }
}

// <seconds.fraction@domain>, fraction with eight digits
fn message_id(date: Timestamp, domain: &str) -> String {
    let seconds = date.as_second();
    let fraction = date.subsec_nanosecond().unsigned_abs() / 10;
    format!("<{seconds}.{fraction:08}@{domain}>")
}

/// An owned copy of a mail received by a [`CaptureTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedMail {
    /// The sender address.
    pub from: String,
    /// The recipients.
    pub to: Vec<String>,
    /// The subject line.
    pub subject: String,
    /// The bundled messages.
    pub body: String,
    /// The `Message-Id` header.
    pub message_id: String,
}

impl CapturedMail {
    /// The lines of the body.
    pub fn lines(&self) -> Vec<&str> {
        self.body.lines().collect()
    }
}

/// A transport that keeps mails in memory instead of sending them, for use in tests.
///
/// Clones share the same mailbox, so a clone can be handed to an appender and the original
/// inspected afterwards.
///
/// # Examples
///
/// ```
/// use mailforth::append::mail::CaptureTransport;
///
/// let transport = CaptureTransport::default();
/// assert!(transport.sent().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaptureTransport {
    state: Arc<Mutex<CaptureState>>,
}

#[derive(Debug, Default)]
struct CaptureState {
    sent: Vec<CapturedMail>,
    attempts: usize,
    failing: bool,
}

impl CaptureTransport {
    fn state(&self) -> MutexGuard<'_, CaptureState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mails delivered so far, oldest first.
    pub fn sent(&self) -> Vec<CapturedMail> {
        self.state().sent.clone()
    }

    /// Number of send attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.state().attempts
    }

    /// Make later sends fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.state().failing = failing;
    }
}

impl MailTransport for CaptureTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<(), Error> {
        let mut state = self.state();
        state.attempts += 1;
        if state.failing {
            return Err(Error::transport("mail server rejected the message")
                .with_context("server", mail.server));
        }

        state.sent.push(CapturedMail {
            from: mail.from.to_owned(),
            to: mail.to.to_vec(),
            subject: mail.subject.to_owned(),
            body: mail.body.to_owned(),
            message_id: mail.message_id.clone(),
        });
        Ok(())
    }
}
