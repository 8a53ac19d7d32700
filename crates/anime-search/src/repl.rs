//! Line commands for the interactive search session.
//!
//! Each input line becomes one page event; the binary dispatches it to the
//! controller and re-renders.

use shared::{ClickTarget, ModalEvent};

/// One user action on the search page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the search box (text may be empty when a category is set)
    Search(String),
    /// Change the "pick a vibe" selector; `None` clears it
    Category(Option<String>),
    /// Click the card with this id
    Open(usize),
    /// Press the modal's save control
    Save,
    /// Interaction with an open modal
    Modal(ModalEvent),
    /// Print the current cards
    Cards,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  search [text]       search (text may be empty when a category is set)
  category <name>     pick a vibe; `category none` clears it
  open <card>         show details for a card
  save                add the displayed anime to the watchlist
  close               press the modal's close button
  overlay             click the modal background
  content             click inside the modal
  key <name>          press a key, e.g. `key Escape`
  cards               list current cards
  help                show this help
  quit                leave";

/// Parse one input line, `Err` carries a message for the user
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "search" | "s" => Ok(Command::Search(rest.to_string())),
        "category" | "vibe" => match rest {
            "" | "none" => Ok(Command::Category(None)),
            name => Ok(Command::Category(Some(name.to_string()))),
        },
        "open" | "o" => rest
            .parse()
            .map(Command::Open)
            .map_err(|_| format!("Not a card number: '{}'", rest)),
        "save" => Ok(Command::Save),
        "close" => Ok(Command::Modal(ModalEvent::CloseButton)),
        "overlay" => Ok(Command::Modal(ModalEvent::Click(ClickTarget::Overlay))),
        "content" => Ok(Command::Modal(ModalEvent::Click(ClickTarget::Content))),
        "esc" | "escape" => Ok(Command::Modal(ModalEvent::KeyPress("Escape".to_string()))),
        "key" if !rest.is_empty() => Ok(Command::Modal(ModalEvent::KeyPress(rest.to_string()))),
        "cards" | "ls" => Ok(Command::Cards),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err("Type `help` for the list of commands.".to_string()),
        other => Err(format!("Unknown command '{}'. Type `help`.", other)),
    }
}
