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

use crate::{
    transport::{SmtpRelay, Transport},
    Client,
};

use super::{with_auth, with_dont_send, with_relayhost, with_sender, ClientConfig};

/// Collects [`ClientConfig`] steps and applies them in order.
#[derive(Default)]
pub struct ClientBuilder {
    configs: Vec<ClientConfig>,
    transport: Option<Box<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relay host and port to hand the message to
    pub fn relayhost(self, host: impl Into<String>, port: u16) -> Self {
        self.config(with_relayhost(host, port))
    }

    /// Default sender of every message
    pub fn sender(self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.config(with_sender(name, email))
    }

    /// SMTP credentials, only used when `use_auth` is set
    pub fn auth(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
        use_auth: bool,
    ) -> Self {
        self.config(with_auth(username, password, use_auth))
    }

    /// Skip delivery altogether
    pub fn dont_send(self) -> Self {
        self.config(with_dont_send())
    }

    /// Append a configuration step
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Deliver through `transport` instead of [`SmtpRelay`]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn build(self) -> Client {
        Client::with_transport(
            self.configs,
            self.transport.unwrap_or_else(|| Box::new(SmtpRelay::new())),
        )
    }
}

impl Extend<ClientConfig> for ClientBuilder {
    fn extend<I: IntoIterator<Item = ClientConfig>>(&mut self, iter: I) {
        self.configs.extend(iter);
    }
}

#[cfg(test)]
mod test {
    use crate::{
        client::{with_auth, with_dont_send, with_relayhost, with_sender},
        Client,
    };

    #[test]
    fn later_steps_win() {
        let client = Client::builder()
            .relayhost("smtp.example.com", 25)
            .sender("First", "first@example.com")
            .relayhost("smtp.fastmail.com", 465)
            .sender("", "second@example.com")
            .build();

        assert_eq!(client.endpoint().to_string(), "smtp.fastmail.com:465");
        assert_eq!(
            client.email().from().map(ToString::to_string).as_deref(),
            Some("second@example.com")
        );
    }

    #[test]
    fn builder_matches_config_list() {
        let configs = vec![
            with_relayhost("smtp.fastmail.com", 465),
            with_auth("your.name@example.com", "123456789abcde", true),
            with_sender("Example Inc. Customer Service", "info@example.com"),
            with_dont_send(),
        ];
        let mut builder = Client::builder();
        builder.extend(configs.clone());

        assert_eq!(builder.build().debug(), Client::new(configs).debug());
    }
}
