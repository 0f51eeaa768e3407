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

//! An appender that bundles log records into e-mails.
//!
//! Records are rendered and queued until either the queue reaches the configured buffer
//! capacity, or a record arrives whose severity is one of the immediate levels. Then the whole
//! queue is sent as the body of one mail.
//!
//! # Examples
//!
//! ```
//! use mailforth::Append;
//! use mailforth::append::Mail;
//! use mailforth::append::mail::CaptureTransport;
//! use mailforth::append::mail::MailOptions;
//! use mailforth::level::LevelRegistry;
//! use mailforth::record::LogRecord;
//!
//! let levels = LevelRegistry::default();
//! let transport = CaptureTransport::default();
//! let mail = Mail::builder(
//!     "ops",
//!     MailOptions::new()
//!         .from("app@example.com")
//!         .to("ops@example.com")
//!         .buffer_capacity(10usize)
//!         .immediate_levels("fatal"),
//! )
//! .levels(levels.clone())
//! .transport(transport.clone())
//! .build()
//! .unwrap();
//!
//! let warn = levels.rank("warn").unwrap();
//! let fatal = levels.rank("fatal").unwrap();
//! mail.append(&LogRecord::new("app", warn, "disk 91% full")).unwrap();
//! assert_eq!(mail.queued_messages(), 1);
//!
//! mail.append(&LogRecord::new("app", fatal, "disk full")).unwrap();
//! assert_eq!(mail.queued_messages(), 0);
//! assert_eq!(transport.sent().len(), 1);
//! ```

mod append;
mod config;
mod options;
#[cfg(feature = "smtp")]
mod smtp;
mod transport;

pub use self::append::Mail;
pub use self::append::MailBuilder;
pub use self::config::AuthType;
pub use self::config::MailConfig;
pub use self::options::MailOptions;
pub use self::options::Numeric;
pub use self::options::StringList;
#[cfg(feature = "smtp")]
pub use self::smtp::SmtpTransport;
pub use self::transport::CaptureTransport;
pub use self::transport::CapturedMail;
pub use self::transport::MailTransport;
pub use self::transport::OutgoingMail;
