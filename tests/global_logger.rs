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

use log::Log;
use mailforth::append::Mail;
use mailforth::append::mail::CaptureTransport;
use mailforth::append::mail::MailOptions;

// the global logger can only be set once per test binary
#[test]
fn test_log_macros_reach_the_mail_appender() {
    let transport = CaptureTransport::default();
    let mail = Arc::new(
        Mail::builder(
            "email",
            MailOptions::new()
                .from("me")
                .to("you")
                .buffer_capacity(10usize)
                .immediate_levels("error"),
        )
        .transport(transport.clone())
        .build()
        .unwrap(),
    );

    mailforth::builder()
        .level("info")
        .append(mail.clone())
        .apply();

    log::debug!("too quiet");
    log::info!("starting {}", "worker");
    log::warn!("slow response");
    assert_eq!(mail.queued_messages(), 2);
    assert!(transport.sent().is_empty());

    log::error!("worker crashed");
    assert_eq!(mail.queued_messages(), 0);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let lines = sent[0].lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(": starting worker"));
    assert!(lines[2].starts_with("ERROR"));

    log::warn!("after the storm");
    log::logger().flush();
    assert_eq!(transport.sent().len(), 2);
    assert_eq!(mail.queued_messages(), 0);
}
