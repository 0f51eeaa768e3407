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

//! Mailforth is an e-mail appender that bundles log records into periodic mails instead of
//! sending one mail per log line.
//!
//! # Overview
//!
//! A [`Mail`](append::Mail) appender renders each record with a [`Layout`] and queues the
//! text. The queue is sent as a single mail when it reaches the configured buffer capacity, or
//! immediately when a record of an "immediate" level arrives. Closing the appender sends what
//! is left and disables it for good.
//!
//! Levels are not global: a [`LevelRegistry`](level::LevelRegistry) names them and is handed
//! to appenders and loggers explicitly. The [`Logger`] bridges the `log` crate facade.
//!
//! # Examples
//!
//! Bundle everything up to 50 messages, but send errors right away:
//!
//! ```no_run
//! use mailforth::append::Mail;
//! use mailforth::append::mail::MailOptions;
//!
//! let mail = Mail::new(
//!     "ops",
//!     MailOptions::new()
//!         .from("app@example.com")
//!         .to("ops@example.com")
//!         .server("smtp.example.com")
//!         .port(587u16)
//!         .auth_type("tls")
//!         .account("app")
//!         .password("secret")
//!         .buffer_capacity(50usize)
//!         .immediate_levels("error, fatal"),
//! )
//! .unwrap();
//!
//! mailforth::builder().level("info").append(mail).apply();
//!
//! log::info!("Info message.");
//! log::error!("Error message.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod layout;
pub mod level;
pub mod record;
pub mod trap;

pub use append::Append;
pub use layout::Layout;
pub use trap::Trap;

mod error;
pub use error::Error;
pub use error::ErrorKind;

mod logger;
pub use logger::*;
