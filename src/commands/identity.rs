use nostr_sdk::prelude::*;

use crate::nostr::ENV_PRIVATE_KEY;

pub fn run() -> Result<(), anyhow::Error> {
    let Ok(private_key) = std::env::var(ENV_PRIVATE_KEY) else {
        return Err(anyhow::anyhow!(
            "{ENV_PRIVATE_KEY} is not set; run `inkpress keygen` first"
        ));
    };

    let keys = Keys::parse(&private_key)?;
    let public_key = keys.public_key();

    println!("Your Nostr identity");
    println!("===================\n");

    println!("Public key (hex):");
    println!("{}", public_key.to_hex());
    println!();

    println!("Public key (npub - share this!):");
    println!("{}", public_key.to_bech32()?);

    Ok(())
}
