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
use std::thread;

use mailforth::Append;
use mailforth::ErrorKind;
use mailforth::append::Mail;
use mailforth::append::mail::AuthType;
use mailforth::append::mail::CaptureTransport;
use mailforth::append::mail::MailOptions;
use mailforth::layout::TextLayout;
use mailforth::level::LevelRegistry;
use mailforth::record::LogRecord;

fn build(options: MailOptions, transport: &CaptureTransport) -> Mail {
    Mail::builder("email", options)
        .transport(transport.clone())
        .build()
        .unwrap()
}

fn options(capacity: usize) -> MailOptions {
    MailOptions::new()
        .from("me")
        .to("you")
        .buffer_capacity(capacity)
        .immediate_levels("error, fatal")
}

fn record(level: &str, message: impl Into<String>) -> LogRecord {
    let levels = LevelRegistry::default();
    let message: String = message.into();
    LogRecord::new("TestLogger", levels.rank(level).unwrap(), message)
}

#[test]
fn test_full_buffer_sends_one_bundle() {
    for capacity in [1, 2, 3, 10, 100] {
        let transport = CaptureTransport::default();
        let mail = build(options(capacity), &transport);

        for i in 0..capacity {
            assert_eq!(mail.queued_messages(), i);
            assert!(transport.sent().is_empty());
            mail.append(&record("info", format!("message {i}"))).unwrap();
        }

        assert_eq!(mail.queued_messages(), 0);
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].lines().len(), capacity);
        assert!(sent[0].lines()[capacity - 1].ends_with(&format!("message {}", capacity - 1)));
    }
}

#[test]
fn test_zero_capacity_sends_every_message() {
    let transport = CaptureTransport::default();
    let mail = build(options(0), &transport);

    for i in 0..5 {
        if i % 2 == 0 {
            mail.append(&record("debug", "event")).unwrap();
        } else {
            mail.concat("raw").unwrap();
        }
        assert_eq!(mail.queued_messages(), 0);
        assert_eq!(transport.sent().len(), i + 1);
        assert_eq!(transport.sent()[i].lines().len(), 1);
    }
}

#[test]
fn test_immediate_level_bundles_backlog() {
    let transport = CaptureTransport::default();
    let mail = build(options(3), &transport);

    mail.append(&record("warn", "queued")).unwrap();
    assert_eq!(mail.queued_messages(), 1);

    mail.append(&record("fatal", "boom")).unwrap();
    assert_eq!(mail.queued_messages(), 0);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].lines(),
        vec![" WARN  TestLogger : queued", "FATAL  TestLogger : boom"]
    );

    // on an empty queue an immediate record is sent on its own
    mail.append(&record("error", "alone")).unwrap();
    assert_eq!(transport.sent()[1].lines(), vec!["ERROR  TestLogger : alone"]);
}

#[test]
fn test_close_is_final_and_idempotent() {
    let levels = LevelRegistry::default();
    let transport = CaptureTransport::default();
    let mail = build(options(3), &transport);

    mail.append(&record("info", "pending")).unwrap();
    mail.close().unwrap();
    mail.close().unwrap();

    assert!(mail.is_closed());
    assert_eq!(mail.queued_messages(), 0);
    assert_eq!(mail.level(), levels.disabled());
    assert_eq!(transport.attempts(), 1);

    mail.append(&record("fatal", "ignored")).unwrap();
    assert_eq!(mail.queued_messages(), 0);
    assert_eq!(transport.attempts(), 1);
}

#[test]
fn test_close_on_empty_queue_sends_nothing() {
    let transport = CaptureTransport::default();
    let mail = build(options(3), &transport);
    mail.close().unwrap();
    assert!(mail.is_closed());
    assert_eq!(transport.attempts(), 0);
}

#[test]
fn test_retry_resends_same_backlog() {
    let transport = CaptureTransport::default();
    let mail = build(options(3), &transport);
    transport.set_failing(true);

    mail.append(&record("info", "a")).unwrap();
    let err = mail.append(&record("error", "b")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(mail.queued_messages(), 2);

    // a full queue keeps trying on every append, and keeps every message
    mail.append(&record("info", "c")).unwrap_err();
    assert_eq!(mail.queued_messages(), 3);
    assert_eq!(transport.attempts(), 2);

    transport.set_failing(false);
    mail.flush().unwrap();
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].lines().len(), 3);
    assert_eq!(mail.queued_messages(), 0);
}

#[test]
fn test_defaults_with_from_and_to_only() {
    let mail = Mail::builder("email", MailOptions::new().from("me").to("you"))
        .transport(CaptureTransport::default())
        .build()
        .unwrap();

    let config = mail.config();
    assert_eq!(mail.name(), "email");
    assert_eq!(config.buffer_capacity(), 100);
    assert!(config.immediate_levels().is_empty());
    assert_eq!(config.server(), "localhost");
    assert_eq!(config.port(), 25);
    assert_eq!(config.auth_type(), AuthType::CramMd5);
    assert!(config.subject().starts_with("Message of "));
    assert!(!mail.is_closed());
}

#[test]
fn test_missing_addresses_are_rejected() {
    let err = Mail::builder("email", MailOptions::new())
        .transport(CaptureTransport::default())
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(err.context("appender"), Some("email"));

    let err = Mail::builder("email", MailOptions::new().from("me"))
        .transport(CaptureTransport::default())
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn test_options_from_json() {
    let options: MailOptions = serde_json::from_str(
        r#"{"from": "me", "to": "you, them", "buffsize": "2", "immediate_at": "fatal"}"#,
    )
    .unwrap();
    let transport = CaptureTransport::default();
    let mail = build(options, &transport);

    mail.concat("one").unwrap();
    mail.concat("two").unwrap();
    let sent = transport.sent();
    assert_eq!(sent[0].to, vec!["you".to_string(), "them".to_string()]);
    assert_eq!(sent[0].from, "me");
}

#[test]
fn test_custom_registry_and_layout() {
    let levels = Arc::new(LevelRegistry::new(["low", "high", "page"]).unwrap());
    let transport = CaptureTransport::default();
    let mail = Mail::builder(
        "pager",
        MailOptions::new()
            .from("me")
            .to("you")
            .immediate_levels("page"),
    )
    .levels(levels.clone())
    .layout(TextLayout::default())
    .transport(transport.clone())
    .build()
    .unwrap();

    mail.append(&LogRecord::new("svc", levels.rank("page").unwrap(), "wake up"))
        .unwrap();
    let lines = transport.sent()[0].body.clone();
    assert!(lines.contains(" PAGE svc: wake up"));

    mail.close().unwrap();
    assert_eq!(mail.level(), levels.disabled());
}

#[test]
fn test_concurrent_appends_are_not_lost() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let transport = CaptureTransport::default();
    let mail = Arc::new(build(options(7), &transport));

    let handles = (0..THREADS)
        .map(|t| {
            let mail = mail.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let level = if i % 50 == 49 { "error" } else { "info" };
                    mail.append(&record(level, format!("{t}-{i}"))).unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
    mail.close().unwrap();

    let mut seen = transport
        .sent()
        .iter()
        .flat_map(|mail| {
            mail.lines()
                .into_iter()
                .map(|line| line.rsplit(' ').next().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    for mail in transport.sent() {
        assert!(mail.lines().len() <= 7);
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), THREADS * PER_THREAD);
}
