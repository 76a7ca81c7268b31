//! # Cart Console
//!
//! Line protocol behind the `bazar-cart` binary. Each input line is either a
//! JSON action (exactly what the browser dispatches) or a word command:
//!
//! ```text
//! {"type":"ADD_ITEM","payload":{"id":1,"name":"Mate"}}   dispatch an action
//! show                                                   print the cart
//! login <token> [role]                                   start a session
//! logout                                                 end it, clear cart
//! checkout                                               print order request
//! config                                                 print configuration
//! quit | exit                                            stop
//! ```
//!
//! Every reply is one JSON line: the command's value, or an `ApiError`.

use serde_json::Value;

use crate::commands;
use crate::error::ApiError;
use crate::Storefront;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Action(String),
    Show,
    Login { token: String, role: String },
    Logout,
    Checkout,
    Config,
    Quit,
}

impl ConsoleCommand {
    /// Parses a line; `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, ApiError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if line.starts_with('{') {
            return Ok(Some(ConsoleCommand::Action(line.to_string())));
        }

        let mut words = line.split_whitespace();
        let command = match words.next().unwrap_or_default() {
            "show" => ConsoleCommand::Show,
            "login" => {
                let token = words
                    .next()
                    .ok_or_else(|| ApiError::validation("login needs a token"))?;
                let role = words.next().unwrap_or("USER");
                ConsoleCommand::Login {
                    token: token.to_string(),
                    role: role.to_string(),
                }
            }
            "logout" => ConsoleCommand::Logout,
            "checkout" => ConsoleCommand::Checkout,
            "config" => ConsoleCommand::Config,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => {
                return Err(ApiError::validation(format!("Unknown command: {}", other)));
            }
        };
        Ok(Some(command))
    }
}

/// Runs a command against a storefront session.
pub fn execute(storefront: &Storefront, command: &ConsoleCommand) -> Result<Value, ApiError> {
    let value = match command {
        ConsoleCommand::Action(json) => {
            serde_json::to_value(commands::cart::dispatch_json(&storefront.cart_dispatcher(), json)?)?
        }
        ConsoleCommand::Show => {
            serde_json::to_value(commands::cart::get_cart(&storefront.cart_reader()))?
        }
        ConsoleCommand::Login { token, role } => {
            storefront.session().login(token.clone(), role.clone());
            serde_json::json!({ "authenticated": true, "admin": storefront.session().is_admin() })
        }
        ConsoleCommand::Logout => {
            storefront.logout();
            serde_json::to_value(commands::cart::get_cart(&storefront.cart_reader()))?
        }
        ConsoleCommand::Checkout => serde_json::to_value(commands::checkout::checkout_request(
            storefront.session(),
            &storefront.cart_reader(),
        )?)?,
        ConsoleCommand::Config => serde_json::to_value(storefront.config())?,
        ConsoleCommand::Quit => Value::Null,
    };
    Ok(value)
}
