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
use std::sync::Mutex;
use std::sync::MutexGuard;

use jiff::Timestamp;

use crate::Append;
use crate::Error;
use crate::Layout;
use crate::Trap;
use crate::append::mail::MailConfig;
use crate::append::mail::MailOptions;
use crate::append::mail::MailTransport;
use crate::append::mail::OutgoingMail;
use crate::layout::BasicLayout;
use crate::level::LevelRegistry;
use crate::level::Severity;
use crate::record::LogRecord;
use crate::trap::DefaultTrap;

/// A builder to configure and create a [`Mail`] appender.
#[derive(Debug)]
pub struct MailBuilder {
    name: String,
    options: MailOptions,
    levels: Arc<LevelRegistry>,
    layout: Box<dyn Layout>,
    transport: Option<Box<dyn MailTransport>>,
    trap: Box<dyn Trap>,
}

impl MailBuilder {
    /// Create a new mail appender builder.
    pub fn new(name: impl Into<String>, options: MailOptions) -> Self {
        Self {
            name: name.into(),
            options,
            levels: Arc::new(LevelRegistry::default()),
            layout: Box::new(BasicLayout::default()),
            transport: None,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the level registry that level names are resolved against.
    ///
    /// Default to [`LevelRegistry::default`].
    pub fn levels(mut self, levels: impl Into<Arc<LevelRegistry>>) -> Self {
        self.levels = levels.into();
        self
    }

    /// Set the layout that renders each record into one line of the mail body.
    ///
    /// Default to [`BasicLayout`].
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the transport that delivers mails.
    ///
    /// Default to [`SmtpTransport`](super::SmtpTransport) when the `smtp` feature is enabled.
    pub fn transport(mut self, transport: impl Into<Box<dyn MailTransport>>) -> Self {
        self.transport = Some(transport.into());
        self
    }

    /// Set the trap for errors raised when the appender is dropped.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the [`Mail`] appender.
    ///
    /// # Errors
    ///
    /// Return a [`ConfigInvalid`](crate::ErrorKind::ConfigInvalid) error if the options do not
    /// validate, see [`MailConfig::from_options`], or if no transport is available.
    pub fn build(self) -> Result<Mail, Error> {
        let MailBuilder {
            name,
            options,
            levels,
            layout,
            transport,
            trap,
        } = self;

        let config = MailConfig::from_options(&options, &levels)
            .map_err(|err| err.with_context("appender", &name))?;
        let transport = match transport {
            Some(transport) => transport,
            None => default_transport().map_err(|err| err.with_context("appender", &name))?,
        };

        let state = Mutex::new(MailState {
            buffer: Vec::new(),
            level: config.level(),
            closed: false,
        });
        Ok(Mail {
            name,
            config,
            levels,
            layout,
            transport,
            trap,
            state,
        })
    }
}

#[cfg(feature = "smtp")]
fn default_transport() -> Result<Box<dyn MailTransport>, Error> {
    Ok(Box::new(super::SmtpTransport::default()))
}

#[cfg(not(feature = "smtp"))]
fn default_transport() -> Result<Box<dyn MailTransport>, Error> {
    Err(Error::config_invalid(
        "no mail transport configured and the smtp feature is disabled",
    ))
}

/// An appender that bundles log records and sends them as one e-mail.
///
/// Every record is rendered with the layout and queued. The queue is sent as a single mail
/// once it holds [`buffer_capacity`](MailConfig::buffer_capacity) messages, or as soon as a
/// record of one of the [`immediate_levels`](MailConfig::immediate_levels) arrives. A buffer
/// capacity of zero sends every message on its own.
///
/// A failed send returns the transport error and keeps the queue, so that the next flush
/// resends the same messages. There is no retry of its own.
///
/// Once closed, the appender drops every record. Dropping an open appender closes it; a failure
/// of that final flush is reported to the trap.
#[derive(Debug)]
pub struct Mail {
    name: String,
    config: MailConfig,
    levels: Arc<LevelRegistry>,
    layout: Box<dyn Layout>,
    transport: Box<dyn MailTransport>,
    trap: Box<dyn Trap>,
    state: Mutex<MailState>,
}

#[derive(Debug)]
struct MailState {
    buffer: Vec<String>,
    level: Severity,
    closed: bool,
}

impl Mail {
    /// Create a new [`MailBuilder`].
    pub fn builder(name: impl Into<String>, options: MailOptions) -> MailBuilder {
        MailBuilder::new(name, options)
    }

    /// Create a mail appender with the default registry, layout and transport.
    pub fn new(name: impl Into<String>, options: MailOptions) -> Result<Self, Error> {
        MailBuilder::new(name, options).build()
    }

    /// The name of the appender.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The validated configuration.
    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Queue a pre-rendered line that carries no severity.
    ///
    /// Only a full queue triggers a send; immediate levels never apply.
    pub fn concat(&self, text: impl Into<String>) -> Result<(), Error> {
        let mut state = self.state();
        if state.closed {
            return Ok(());
        }
        self.enqueue(&mut state, text.into(), false)
    }

    /// Number of messages waiting to be sent.
    pub fn queued_messages(&self) -> usize {
        self.state().buffer.len()
    }

    /// Whether [`close`](Append::close) has completed.
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// The active threshold; the registry's disabled sentinel once closed.
    pub fn level(&self) -> Severity {
        self.state().level
    }

    fn state(&self) -> MutexGuard<'_, MailState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enqueue(&self, state: &mut MailState, line: String, immediate: bool) -> Result<(), Error> {
        state.buffer.push(line);
        if immediate || state.buffer.len() >= self.config.buffer_capacity() {
            self.send_queued(state)?;
        }
        Ok(())
    }

    // The lock is held across the send, so no two sends share a message and nothing queued
    // while sending can be cleared unsent.
    fn send_queued(&self, state: &mut MailState) -> Result<(), Error> {
        if state.closed || state.buffer.is_empty() {
            return Ok(());
        }

        let mut body = state.buffer.join("\n");
        body.push('\n');
        let mail = OutgoingMail::new(&self.config, &body, Timestamp::now());
        self.transport.send(&mail).map_err(|err| {
            err.with_context("appender", &self.name)
                .with_context("queued", state.buffer.len())
        })?;

        state.buffer.clear();
        Ok(())
    }
}

impl Append for Mail {
    fn append(&self, record: &LogRecord) -> Result<(), Error> {
        let mut state = self.state();
        if state.closed || record.severity() < state.level {
            return Ok(());
        }

        let line = self.layout.format(record, &self.levels)?;
        let immediate = self
            .config
            .immediate_levels()
            .contains(&record.severity());
        self.enqueue(&mut state, line, immediate)
    }

    fn flush(&self) -> Result<(), Error> {
        let mut state = self.state();
        self.send_queued(&mut state)
    }

    fn close(&self) -> Result<(), Error> {
        let mut state = self.state();
        if state.closed {
            return Ok(());
        }

        self.send_queued(&mut state)?;
        state.level = self.levels.disabled();
        state.closed = true;
        Ok(())
    }
}

impl Drop for Mail {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            self.trap.trap(&err);
        }
    }
}
