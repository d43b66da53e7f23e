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

//! # mail-relay-client
//!
//! _mail-relay-client_ is a small convenience layer for composing a single e-mail message and
//! handing it to an SMTP relay. Message generation and delivery are performed by
//! [`mail-builder`](https://crates.io/crates/mail-builder) and
//! [`mail-send`](https://crates.io/crates/mail-send):
//!
//! - Builder style configuration of the relay host, credentials and default sender.
//! - Recipients (TO and CC), subject, plain text and HTML bodies, file attachments.
//! - Implicit TLS on port 465, STARTTLS on every other port when the relay offers it.
//! - SMTP authentication with automatic mechanism negotiation.
//! - A "don't send" mode for dry runs.
//! - Optional settings file in TOML format.
//!
//! ## Usage Example
//!
//! ```rust
//!     let mut client = Client::builder()
//!         .relayhost("smtp.fastmail.com", 465)
//!         .auth("your.name@example.com", "123456789abcde", true)
//!         .sender("Example Inc. Customer Service", "info@example.com")
//!         .build();
//!
//!     client.cc("", "sales@example.com");
//!     client.attach_file("./invoice.pdf");
//!     client
//!         .sendmail("John Doe", "jd@example.com", "Your invoice", "Please find it attached.")
//!         .await
//!         .unwrap();
//! ```
//!
//! The same client may be configured from an ordered list of steps:
//!
//! ```rust
//!     let client = Client::new([
//!         with_relayhost("smtp.fastmail.com", 465),
//!         with_sender("", "info@example.com"),
//!         with_dont_send(),
//!     ]);
//! ```
//!
//! Configuration is permissive: missing or contradicting settings are only
//! reported when the relay rejects the message.
//!

pub mod client;
pub mod message;
pub mod settings;
pub mod transport;

use std::fmt::Display;

pub use client::{
    with_auth, with_dont_send, with_relayhost, with_sender, Client, ClientBuilder, ClientConfig,
};
pub use mail_send;
pub use message::{format_address, Address, Email};
pub use settings::Settings;
pub use transport::{Endpoint, PlainAuth, SmtpRelay, Transport};

#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// SMTP delivery error
    Smtp(mail_send::Error),

    /// Credentials were issued for a different host.
    WrongHostName { expected: String, found: String },

    /// Credentials would be sent in clear text to a remote host.
    UnencryptedConnection(String),

    /// Invalid settings file.
    Config(toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Smtp(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::WrongHostName { .. } | Error::UnencryptedConnection(_) => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Smtp(e) => e.fmt(f),
            Error::WrongHostName { expected, found } => write!(
                f,
                "Credentials for {} can not be used with {}",
                expected, found
            ),
            Error::UnencryptedConnection(host) => write!(
                f,
                "Refusing to send credentials to {} over an unencrypted connection",
                host
            ),
            Error::Config(e) => write!(f, "Invalid settings: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<mail_send::Error> for Error {
    fn from(err: mail_send::Error) -> Self {
        Error::Smtp(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err)
    }
}

#[cfg(test)]
mod test {
    use std::error::Error as _;

    use super::Error;

    #[test]
    fn error_display() {
        assert_eq!(
            Error::WrongHostName {
                expected: "smtp.example.com".to_string(),
                found: "127.0.0.1".to_string(),
            }
            .to_string(),
            "Credentials for smtp.example.com can not be used with 127.0.0.1"
        );
        assert_eq!(
            Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).to_string(),
            "I/O error: gone"
        );
        assert_eq!(
            Error::from(mail_send::Error::MissingRcptTo).to_string(),
            mail_send::Error::MissingRcptTo.to_string()
        );
        assert_eq!(
            Error::UnencryptedConnection("smtp.example.com".to_string()).to_string(),
            "Refusing to send credentials to smtp.example.com over an unencrypted connection"
        );
    }

    #[test]
    fn error_source() {
        let err = Error::from(mail_send::Error::MissingStartTls);
        assert_eq!(
            err.source().map(ToString::to_string),
            Some(mail_send::Error::MissingStartTls.to_string())
        );
        assert!(Error::UnencryptedConnection("localhost".to_string())
            .source()
            .is_none());
    }
}
