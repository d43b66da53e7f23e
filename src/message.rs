/*
 * Copyright Stalwart Labs Ltd. See the COPYING
 * file at the top-level directory of this distribution.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use mail_send::mail_builder::{headers::address, MessageBuilder};

/// An e-mail address with an optional display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub name: String,
    pub email: String,
}

/// The outgoing message owned by a [`crate::Client`].
#[derive(Debug, Clone, Default)]
pub struct Email {
    from: Option<Address>,
    to: Vec<Address>,
    cc: Vec<Address>,
    subject: String,
    text: Option<String>,
    html: Option<String>,
    attachments: Vec<PathBuf>,
}

/// Formats an address as `Name <email>`, or the bare e-mail
/// when no name is provided.
pub fn format_address(name: &str, email: &str) -> String {
    Address::new(name, email).to_string()
}

impl Address {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Address {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    fn as_header(&self) -> address::Address<'_> {
        address::Address::new_address(
            self.has_name().then_some(self.name.as_str()),
            self.email.as_str(),
        )
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_name() {
            write!(f, "{} <{}>", self.name, self.email)
        } else {
            f.write_str(&self.email)
        }
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Address::new("", email)
    }
}

impl From<(&str, &str)> for Address {
    fn from((name, email): (&str, &str)) -> Self {
        Address::new(name, email)
    }
}

impl Email {
    /// Create an empty message from the given sender.
    pub fn new(from: Option<Address>) -> Self {
        Email {
            from,
            ..Default::default()
        }
    }

    pub fn from(&self) -> Option<&Address> {
        self.from.as_ref()
    }

    pub fn to(&self) -> &[Address] {
        &self.to
    }

    pub fn cc(&self) -> &[Address] {
        &self.cc
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    pub(crate) fn set_from(&mut self, from: Address) {
        self.from = Some(from);
    }

    pub(crate) fn add_to(&mut self, to: Address) {
        self.to.push(to);
    }

    pub(crate) fn add_cc(&mut self, cc: Address) {
        self.cc.push(cc);
    }

    pub(crate) fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub(crate) fn set_html(&mut self, html: impl Into<String>) {
        self.html = Some(html.into());
    }

    pub(crate) fn attach(&mut self, path: impl Into<PathBuf>) {
        self.attachments.push(path.into());
    }

    /// Build the MIME message, reading every attached file from disk.
    pub async fn to_builder(&self) -> crate::Result<MessageBuilder<'_>> {
        let mut builder = MessageBuilder::new().subject(self.subject.as_str());

        if let Some(from) = &self.from {
            builder = builder.from(from.as_header());
        }
        if !self.to.is_empty() {
            builder = builder.to(address::Address::new_list(
                self.to.iter().map(Address::as_header).collect(),
            ));
        }
        if !self.cc.is_empty() {
            builder = builder.cc(address::Address::new_list(
                self.cc.iter().map(Address::as_header).collect(),
            ));
        }
        if let Some(text) = &self.text {
            builder = builder.text_body(text.as_str());
        }
        if let Some(html) = &self.html {
            builder = builder.html_body(html.as_str());
        }

        for path in &self.attachments {
            let contents = tokio::fs::read(path).await?;
            builder = builder.attachment(content_type(path), file_name(path), contents);
        }

        Ok(builder)
    }
}

fn content_type(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}
