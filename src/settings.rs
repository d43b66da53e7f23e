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

use std::path::Path;

use serde::Deserialize;

use crate::client::{
    with_auth, with_dont_send, with_relayhost, with_sender, ClientBuilder, ClientConfig,
};

/// Client settings as read from a TOML document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub relay: RelaySettings,
    #[serde(default)]
    pub auth: Option<AuthSettings>,
    #[serde(default)]
    pub sender: Option<SenderSettings>,
    #[serde(default)]
    pub dont_send: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelaySettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSettings {
    pub username: String,
    pub password: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SenderSettings {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

fn enabled() -> bool {
    true
}

impl Settings {
    pub fn parse(toml: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// The configuration steps equivalent to these settings.
    pub fn configs(&self) -> Vec<ClientConfig> {
        let mut configs = vec![with_relayhost(self.relay.host.as_str(), self.relay.port)];
        if let Some(auth) = &self.auth {
            configs.push(with_auth(
                auth.username.as_str(),
                auth.password.as_str(),
                auth.enabled,
            ));
        }
        if let Some(sender) = &self.sender {
            configs.push(with_sender(sender.name.as_str(), sender.email.as_str()));
        }
        if self.dont_send {
            configs.push(with_dont_send());
        }
        configs
    }
}

impl From<Settings> for ClientBuilder {
    fn from(settings: Settings) -> Self {
        let mut builder = ClientBuilder::new();
        builder.extend(settings.configs());
        builder
    }
}
