//! Chat command parsing
//!
//! Commands are a prefix followed by a case-insensitive command word.
//! Anything else, prefixed or not, is ignored.

/// A recognized chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Price lookup; `fruit` is the lowercased remainder of the message
    /// and may be empty
    Price { fruit: String },
    /// Immediate out-of-band stock update
    Stock,
}

/// Parse message content into a command. Returns `None` for non-prefixed
/// content and for unknown command words.
pub fn parse_command(content: &str, prefix: &str) -> Option<Command> {
    let rest = content.strip_prefix(prefix)?;
    let mut parts = rest.trim().split_whitespace();
    let word = parts.next()?.to_lowercase();

    match word.as_str() {
        "price" => Some(Command::Price {
            fruit: parts.collect::<Vec<_>>().join(" ").to_lowercase(),
        }),
        "stock" => Some(Command::Stock),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_with_argument() {
        assert_eq!(
            parse_command("!price dragon", "!"),
            Some(Command::Price {
                fruit: "dragon".to_string()
            })
        );
    }

    #[test]
    fn price_argument_is_lowercased_and_joined() {
        assert_eq!(
            parse_command("!PRICE  T-Rex ", "!"),
            Some(Command::Price {
                fruit: "t-rex".to_string()
            })
        );
        assert_eq!(
            parse_command("!price gum gum", "!"),
            Some(Command::Price {
                fruit: "gum gum".to_string()
            })
        );
    }

    #[test]
    fn bare_price_has_empty_fruit() {
        assert_eq!(
            parse_command("!price", "!"),
            Some(Command::Price {
                fruit: String::new()
            })
        );
    }

    #[test]
    fn stock_is_case_insensitive() {
        assert_eq!(parse_command("!stock", "!"), Some(Command::Stock));
        assert_eq!(parse_command("!Stock", "!"), Some(Command::Stock));
    }

    #[test]
    fn unknown_and_unprefixed_are_ignored() {
        assert_eq!(parse_command("!help", "!"), None);
        assert_eq!(parse_command("price dragon", "!"), None);
        assert_eq!(parse_command("", "!"), None);
        assert_eq!(parse_command("!", "!"), None);
    }
}
