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

use std::fmt::Debug;

use mail_send::Credentials;

/// SMTP PLAIN credentials, bound to the host they were issued for.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainAuth {
    identity: String,
    username: String,
    password: String,
    host: String,
}

impl PlainAuth {
    /// Creates a new `PlainAuth` instance. The `identity` is usually
    /// empty, meaning the username is also the authorization identity.
    pub fn new(
        identity: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        PlainAuth {
            identity: identity.into(),
            username: username.into(),
            password: password.into(),
            host: host.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the credentials for `hostname`, refusing to hand them
    /// to any host other than the one they were created for.
    pub(crate) fn credentials_for(&self, hostname: &str) -> crate::Result<Credentials<String>> {
        if self.host != hostname {
            return Err(crate::Error::WrongHostName {
                expected: self.host.clone(),
                found: hostname.to_string(),
            });
        }
        Ok(Credentials::new(self.username.clone(), self.password.clone()))
    }
}

impl Debug for PlainAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlainAuth")
            .field("identity", &self.identity)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .finish()
    }
}
