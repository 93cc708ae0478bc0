use nostr_sdk::prelude::*;

use crate::nostr::ENV_PRIVATE_KEY;

pub fn run() -> Result<(), anyhow::Error> {
    println!("Generating new Nostr key pair...\n");

    let keys = Keys::generate();
    let secret = keys.secret_key().to_secret_hex();

    println!("Private key (keep this SECRET!)");
    println!("================================");
    println!("{secret}");
    println!();

    println!("Public key (your Nostr identity)");
    println!("=================================");
    println!("{}", keys.public_key());
    println!();

    println!("Add the private key to your environment:");
    println!("{ENV_PRIVATE_KEY}={secret}");
    println!();
    println!("Keep your private key secure: never commit it, and store an");
    println!("offline backup. Anyone holding this key can publish as you.");

    Ok(())
}
