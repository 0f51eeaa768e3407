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

use std::time::Duration;
use std::time::SystemTime;

use lettre::Message;
use lettre::Transport;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::authentication::Mechanism;
use lettre::transport::smtp::extension::ClientId;

use crate::Error;
use crate::append::mail::AuthType;
use crate::append::mail::MailTransport;
use crate::append::mail::OutgoingMail;

/// A transport that delivers mails over SMTP with [`lettre`].
///
/// A connection is opened per mail. Credentials are only presented when an account is
/// configured; [`AuthType::Tls`] upgrades the connection with STARTTLS first.
/// [`AuthType::CramMd5`] is not supported by the underlying client, so sending with an account
/// and that auth type fails.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use mailforth::append::mail::SmtpTransport;
///
/// let transport = SmtpTransport::default().timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SmtpTransport {
    timeout: Option<Duration>,
}

impl SmtpTransport {
    /// Sets the timeout of every SMTP command.
    ///
    /// Default to the client's own timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl MailTransport for SmtpTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<(), Error> {
        let message = build_message(mail)?;

        let mut builder = match mail.auth_type {
            AuthType::Tls => lettre::SmtpTransport::starttls_relay(mail.server).map_err(|err| {
                Error::transport("failed to set up STARTTLS")
                    .with_context("server", mail.server)
                    .with_source(err)
            })?,
            _ => lettre::SmtpTransport::builder_dangerous(mail.server),
        };
        builder = builder
            .port(mail.port)
            .hello_name(ClientId::Domain(mail.domain.to_owned()));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(Some(timeout));
        }
        if let Some(account) = mail.account {
            if let Some(mechanisms) = mechanisms(mail.auth_type)? {
                let password = mail.password.unwrap_or_default();
                let credentials = Credentials::new(account.to_owned(), password.to_owned());
                builder = builder.credentials(credentials).authentication(mechanisms);
            }
        }

        builder.build().send(&message).map_err(|err| {
            Error::transport("failed to send mail")
                .with_context("server", mail.server)
                .with_context("port", mail.port)
                .with_source(err)
        })?;
        Ok(())
    }
}

fn mechanisms(auth_type: AuthType) -> Result<Option<Vec<Mechanism>>, Error> {
    match auth_type {
        AuthType::None => Ok(None),
        AuthType::Plain => Ok(Some(vec![Mechanism::Plain])),
        AuthType::Login => Ok(Some(vec![Mechanism::Login])),
        AuthType::Tls => Ok(Some(vec![Mechanism::Plain, Mechanism::Login])),
        AuthType::CramMd5 => Err(Error::transport(
            "CRAM-MD5 authentication is not supported by the SMTP client",
        )
        .with_context("authType", auth_type)),
    }
}

fn parse_mailbox(option: &'static str, address: &str) -> Result<Mailbox, Error> {
    address.parse().map_err(|err| {
        Error::transport("invalid mail address")
            .with_context(option, address)
            .with_source(err)
    })
}

fn build_message(mail: &OutgoingMail) -> Result<Message, Error> {
    let mut builder = Message::builder()
        .from(parse_mailbox("from", mail.from)?)
        .subject(mail.subject)
        .date(SystemTime::from(mail.date))
        .message_id(Some(mail.message_id.clone()))
        .header(ContentType::TEXT_PLAIN);
    for recipient in mail.to {
        builder = builder.to(parse_mailbox("to", recipient)?);
    }

    builder
        .body(mail.body.to_owned())
        .map_err(|err| Error::transport("failed to build mail").with_source(err))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::ErrorKind;
    use crate::append::mail::MailConfig;
    use crate::append::mail::MailOptions;
    use crate::level::LevelRegistry;

    #[test]
    fn test_build_message() {
        let options = MailOptions::new()
            .from("app@example.com")
            .to("ops@example.com, dev@example.com")
            .subject("alerts")
            .domain("example.com");
        let config = MailConfig::from_options(&options, &LevelRegistry::default()).unwrap();
        let mail = OutgoingMail::new(&config, "first\nsecond\n", Timestamp::now());

        let message = build_message(&mail).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: alerts"));
        assert!(formatted.contains("first"));
        assert!(formatted.contains("second"));
        assert_eq!(message.envelope().to().len(), 2);
    }

    #[test]
    fn test_invalid_address_is_a_transport_error() {
        let options = MailOptions::new().from("me").to("you");
        let config = MailConfig::from_options(&options, &LevelRegistry::default()).unwrap();
        let mail = OutgoingMail::new(&config, "line\n", Timestamp::now());

        let err = SmtpTransport::default().send(&mail).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.context("from"), Some("me"));
    }

    #[test]
    fn test_cram_md5_with_account_is_rejected() {
        assert!(mechanisms(AuthType::CramMd5).is_err());
        assert_eq!(mechanisms(AuthType::None).unwrap(), None);
        assert_eq!(
            mechanisms(AuthType::Tls).unwrap(),
            Some(vec![Mechanism::Plain, Mechanism::Login])
        );
    }
}
