//! # bazar-cart Entry Point
//!
//! Line-oriented console over one storefront session. Reads commands from
//! stdin and writes one JSON reply per line to stdout; logs go to stderr.
//!
//! ## Startup Sequence
//! 1. Load configuration (`BAZAR_*` environment variables)
//! 2. Initialize tracing (logging)
//! 3. Create the session state (cart store, session, config)
//! 4. Process stdin until EOF or `quit`
//!
//! ```text
//! $ echo '{"type":"ADD_ITEM","payload":{"id":1,"name":"Mate"}}' | bazar-cart
//! {"lines":[{"productId":1,"attributes":{"name":"Mate"},"quantity":1}],...}
//! ```

use std::io::{self, BufRead, Write};

use bazar_storefront::console::{self, ConsoleCommand};
use bazar_storefront::state::StorefrontConfig;
use bazar_storefront::{init_tracing, Storefront};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = StorefrontConfig::from_env();
    init_tracing(&config)?;

    info!("Starting bazar-cart console");
    let storefront = Storefront::new(config);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;

        let reply = match ConsoleCommand::parse(&line) {
            Ok(None) => continue,
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => console::execute(&storefront, &command),
            Err(err) => Err(err),
        };

        let json = match reply {
            Ok(value) => serde_json::to_string(&value)?,
            Err(err) => serde_json::to_string(&err)?,
        };
        writeln!(stdout, "{}", json)?;
        stdout.flush()?;
    }

    info!("bazar-cart console stopped");
    Ok(())
}
