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

use mail_relay_client::{with_auth, with_dont_send, with_relayhost, with_sender, Client};

#[tokio::main]
async fn main() {
    env_logger::init();

    // Nothing leaves this machine while "don't send" is set,
    // remove it and fill in real credentials to deliver the message.
    let mut client = Client::new([
        with_relayhost("smtp.fastmail.com", 465),
        with_auth("your.name@example.com", "123456789abcde", true),
        with_sender("Example Inc. Customer Service", "info@example.com"),
        with_dont_send(),
    ]);

    client.to("John Doe", "jd@example.com");
    client.cc("", "sales@example.com");
    client.subject("Some message");

    println!("{}", client.debug());

    match client
        .sendmail("John Doe", "jd@example.com", "Message", "Body of message")
        .await
    {
        Ok(()) => println!("OK!"),
        Err(err) => println!("{}", err),
    }
}
