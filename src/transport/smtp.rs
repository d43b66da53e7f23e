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

use async_trait::async_trait;
use mail_send::{mail_builder::MessageBuilder, SmtpClient, SmtpClientBuilder};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::message::Email;

use super::{Endpoint, PlainAuth, Transport};

/// Port on which relays expect TLS from the first byte (SMTPS).
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Delivers messages to an SMTP relay using `mail-send`.
///
/// Connections to port 465 start in TLS. On every other port the
/// connection is upgraded with STARTTLS when the relay advertises it,
/// otherwise the message is delivered in clear text. Credentials are
/// only sent in clear text to the local host.
#[derive(Debug, Clone, Default)]
pub struct SmtpRelay {
    helo_host: Option<String>,
}

impl SmtpRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the EHLO hostname, defaults to the local hostname.
    pub fn helo_host(mut self, host: impl Into<String>) -> Self {
        self.helo_host = Some(host.into());
        self
    }
}

#[async_trait]
impl Transport for SmtpRelay {
    async fn send(
        &self,
        endpoint: &Endpoint,
        auth: Option<&PlainAuth>,
        email: &Email,
    ) -> crate::Result<()> {
        let message = email.to_builder().await?;

        let mut builder = SmtpClientBuilder::new(endpoint.host().to_string(), endpoint.port())
            .implicit_tls(endpoint.port() == IMPLICIT_TLS_PORT);
        if let Some(host) = &self.helo_host {
            builder = builder.helo_host(host.as_str());
        }
        if let Some(auth) = auth {
            builder = builder.credentials(auth.credentials_for(endpoint.host())?);
        }

        log::debug!(
            "Connecting to {} (implicit TLS: {}, authenticated: {})",
            endpoint,
            endpoint.port() == IMPLICIT_TLS_PORT,
            auth.is_some()
        );

        match builder.connect().await {
            Ok(client) => deliver(client, message).await,
            Err(mail_send::Error::MissingStartTls) => {
                if auth.is_some() && !is_localhost(endpoint.host()) {
                    return Err(crate::Error::UnencryptedConnection(
                        endpoint.host().to_string(),
                    ));
                }
                log::warn!(
                    "{} does not offer STARTTLS, delivering in clear text",
                    endpoint
                );
                deliver(builder.connect_plain().await?, message).await
            }
            Err(err) => Err(err.into()),
        }
    }
}

async fn deliver<T: AsyncRead + AsyncWrite + Unpin>(
    mut client: SmtpClient<T>,
    message: MessageBuilder<'_>,
) -> crate::Result<()> {
    client.send(message).await?;
    client.quit().await?;
    Ok(())
}

fn is_localhost(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

#[cfg(test)]
mod test {
    use tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
        net::{TcpListener, TcpStream},
    };

    use crate::{
        message::{Address, Email},
        transport::{Endpoint, PlainAuth, Transport},
    };

    use super::{is_localhost, SmtpRelay};

    fn email() -> Email {
        let mut email = Email::new(Some(Address::new("Sender", "sender@example.com")));
        email.add_to(Address::new("John Doe", "jd@example.com"));
        email.set_subject("Message");
        email.set_text("Body of message");
        email
    }

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    // Minimal relay without STARTTLS, returns the received DATA
    async fn serve_plain(stream: TcpStream) -> String {
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();
        let mut data = String::new();
        let mut in_data = false;

        write.write_all(b"220 mailpit ESMTP\r\n").await.unwrap();
        while let Ok(Some(line)) = lines.next_line().await {
            if in_data {
                if line == "." {
                    in_data = false;
                    write.write_all(b"250 2.0.0 Ok: queued\r\n").await.unwrap();
                } else {
                    data.push_str(&line);
                    data.push('\n');
                }
                continue;
            }

            let command = line.to_ascii_uppercase();
            if command.starts_with("EHLO") {
                write
                    .write_all(b"250-mailpit\r\n250 8BITMIME\r\n")
                    .await
                    .unwrap();
            } else if command.starts_with("DATA") {
                in_data = true;
                write.write_all(b"354 Go ahead\r\n").await.unwrap();
            } else if command.starts_with("QUIT") {
                write.write_all(b"221 Bye\r\n").await.unwrap();
                break;
            } else {
                write.write_all(b"250 Ok\r\n").await.unwrap();
            }
        }

        data
    }

    #[test]
    fn localhost_names() {
        assert!(is_localhost("localhost"));
        assert!(is_localhost("127.0.0.1"));
        assert!(is_localhost("::1"));
        assert!(!is_localhost("127.0.0.2"));
        assert!(!is_localhost("smtp.example.com"));
    }

    #[tokio::test]
    async fn connection_refused() {
        let endpoint = Endpoint::new("127.0.0.1", closed_port().await);

        assert!(matches!(
            SmtpRelay::new().send(&endpoint, None, &email()).await,
            Err(crate::Error::Smtp(_))
        ));
    }

    #[tokio::test]
    async fn credentials_for_other_host() {
        let endpoint = Endpoint::new("127.0.0.1", closed_port().await);
        let auth = PlainAuth::new("", "john", "p4ssw0rd", "smtp.example.com");

        assert!(matches!(
            SmtpRelay::new().send(&endpoint, Some(&auth), &email()).await,
            Err(crate::Error::WrongHostName { .. })
        ));
    }

    #[tokio::test]
    async fn attachment_read_before_connecting() {
        let endpoint = Endpoint::new("127.0.0.1", closed_port().await);
        let mut email = email();
        email.attach("/nonexistent/mail-relay-client/missing.bin");

        assert!(matches!(
            SmtpRelay::new().send(&endpoint, None, &email).await,
            Err(crate::Error::Io(_))
        ));
    }

    #[tokio::test]
    async fn relay_without_starttls() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = Endpoint::new("127.0.0.1", listener.local_addr().unwrap().port());

        let server = tokio::spawn(async move {
            // The first session ends after EHLO, the second one delivers
            let (stream, _) = listener.accept().await.unwrap();
            serve_plain(stream).await;
            let (stream, _) = listener.accept().await.unwrap();
            serve_plain(stream).await
        });

        SmtpRelay::new()
            .helo_host("test.local")
            .send(&endpoint, None, &email())
            .await
            .unwrap();

        let data = server.await.unwrap();
        assert!(data.contains("Subject: Message"), "{data}");
        assert!(data.contains("Body of message"), "{data}");
    }

    #[tokio::test]
    async fn clear_text_credentials_refused() {
        let listener = TcpListener::bind("127.0.0.2:0").await.unwrap();
        let endpoint = Endpoint::new("127.0.0.2", listener.local_addr().unwrap().port());
        let auth = PlainAuth::new("", "john", "p4ssw0rd", "127.0.0.2");

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            serve_plain(stream).await
        });

        assert!(matches!(
            SmtpRelay::new().send(&endpoint, Some(&auth), &email()).await,
            Err(crate::Error::UnencryptedConnection(host)) if host == "127.0.0.2"
        ));
        assert!(server.await.unwrap().is_empty());
    }
}
