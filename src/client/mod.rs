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

use std::path::PathBuf;

use crate::{
    message::{Address, Email},
    transport::{Endpoint, PlainAuth, SmtpRelay, Transport},
};

pub mod builder;

pub use builder::ClientBuilder;

/// A single configuration step, applied to a [`Client`] on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientConfig {
    Relayhost {
        host: String,
        port: u16,
    },
    Sender(Address),
    Auth {
        username: String,
        password: String,
        use_auth: bool,
    },
    DontSend,
}

/// Configures the relay host name and port to send the e-mail to.
pub fn with_relayhost(host: impl Into<String>, port: u16) -> ClientConfig {
    ClientConfig::Relayhost {
        host: host.into(),
        port,
    }
}

/// Configures the sender name and e-mail address.
pub fn with_sender(name: impl Into<String>, email: impl Into<String>) -> ClientConfig {
    ClientConfig::Sender(Address::new(name, email))
}

/// Configures the SMTP credentials and whether they are used at all.
pub fn with_auth(
    username: impl Into<String>,
    password: impl Into<String>,
    use_auth: bool,
) -> ClientConfig {
    ClientConfig::Auth {
        username: username.into(),
        password: password.into(),
        use_auth,
    }
}

/// Configures the client to never deliver anything.
pub fn with_dont_send() -> ClientConfig {
    ClientConfig::DontSend
}

impl ClientConfig {
    fn apply(self, client: &mut Client) {
        match self {
            ClientConfig::Relayhost { host, port } => {
                client.host = host;
                client.port = port;
            }
            ClientConfig::Sender(from) => client.from = Some(from),
            ClientConfig::Auth {
                username,
                password,
                use_auth,
            } => {
                client.username = username;
                client.password = password;
                client.use_auth = use_auth;
            }
            ClientConfig::DontSend => client.dont_send = true,
        }
    }
}

/// Composes one message at a time and hands it to a relay host.
pub struct Client {
    host: String,
    port: u16,
    username: String,
    password: String,
    use_auth: bool,
    from: Option<Address>,
    dont_send: bool,
    email: Email,
    transport: Box<dyn Transport>,
}

impl Client {
    /// Creates a client delivering over SMTP, applying `configs` in order.
    pub fn new(configs: impl IntoIterator<Item = ClientConfig>) -> Self {
        Self::with_transport(configs, Box::new(SmtpRelay::default()))
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn with_transport(
        configs: impl IntoIterator<Item = ClientConfig>,
        transport: Box<dyn Transport>,
    ) -> Self {
        let mut client = Client {
            host: String::new(),
            port: 0,
            username: String::new(),
            password: String::new(),
            use_auth: false,
            from: None,
            dont_send: false,
            email: Email::default(),
            transport,
        };
        for config in configs {
            config.apply(&mut client);
        }
        client.email = Email::new(client.from.clone());

        if client.host.is_empty() && !client.dont_send {
            log::warn!("No relay host configured, sending will fail");
        }
        if client.use_auth && client.username.is_empty() {
            log::warn!("Authentication enabled without a username");
        }

        client
    }

    /// Discards the current message and starts a new one from the
    /// configured sender.
    pub fn new_message(&mut self) {
        self.email = Email::new(self.from.clone());
    }

    /// Returns a human readable dump of the settings and the current message.
    /// The password is never included.
    pub fn debug(&self) -> String {
        let mut debug = format!(
            "From     : {}\nHost/Port: {}\nAuth?    : {}\nUsername : {}",
            self.from.as_ref().map(ToString::to_string).unwrap_or_default(),
            self.endpoint(),
            self.use_auth,
            self.username
        );
        debug.push_str("\n-----------------------------------\n");
        debug.push_str(&format!("Subject  : {}", self.email.subject()));
        debug.push_str("\n-----------------------------------\n");
        debug.push_str("TO:\n");
        for (i, to) in self.email.to().iter().enumerate() {
            debug.push_str(&format!("- ({}) {}\n", i, to));
        }
        debug.push_str("CC:\n");
        for (i, cc) in self.email.cc().iter().enumerate() {
            debug.push_str(&format!("- ({}) {}\n", i, cc));
        }
        debug.push_str("==================================\n");
        debug
    }

    /// Replaces the sender of the current message.
    pub fn from(&mut self, name: impl Into<String>, email: impl Into<String>) {
        self.email.set_from(Address::new(name, email));
    }

    /// Adds a recipient (TO).
    pub fn to(&mut self, name: impl Into<String>, email: impl Into<String>) {
        self.email.add_to(Address::new(name, email));
    }

    /// Adds a carbon copy recipient (CC).
    pub fn cc(&mut self, name: impl Into<String>, email: impl Into<String>) {
        self.email.add_cc(Address::new(name, email));
    }

    pub fn subject(&mut self, subject: impl Into<String>) {
        self.email.set_subject(subject);
    }

    /// Sets the plain text part of the body.
    pub fn body_text(&mut self, text: impl Into<String>) {
        self.email.set_text(text);
    }

    /// Sets the HTML part of the body.
    pub fn body_html(&mut self, html: impl Into<String>) {
        self.email.set_html(html);
    }

    /// Attaches a file. The file is read when the message is sent.
    pub fn attach_file(&mut self, path: impl Into<PathBuf>) {
        self.email.attach(path);
    }

    /// Sends the current message.
    pub async fn send(&self) -> crate::Result<()> {
        if self.dont_send {
            log::info!(
                "Delivery disabled, not sending message {:?} to {} recipient(s)",
                self.email.subject(),
                self.email.to().len() + self.email.cc().len()
            );
            return Ok(());
        }

        let endpoint = self.endpoint();
        let auth = self.plain_auth();
        log::debug!(
            "Sending message {:?} to {} recipient(s) via {}",
            self.email.subject(),
            self.email.to().len() + self.email.cc().len(),
            endpoint
        );

        self.transport
            .send(&endpoint, auth.as_ref(), &self.email)
            .await
    }

    /// Adds a recipient, sets the subject and plain text body,
    /// then sends the message.
    pub async fn sendmail(
        &mut self,
        to_name: impl Into<String>,
        to_email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> crate::Result<()> {
        self.to(to_name, to_email);
        self.subject(subject);
        self.body_text(message);
        self.send().await
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.as_str(), self.port)
    }

    /// The message being composed.
    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn is_dont_send(&self) -> bool {
        self.dont_send
    }

    fn plain_auth(&self) -> Option<PlainAuth> {
        self.use_auth.then(|| {
            PlainAuth::new(
                "",
                self.username.as_str(),
                self.password.as_str(),
                self.host.as_str(),
            )
        })
    }
}
