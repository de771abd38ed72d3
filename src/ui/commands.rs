/// One line of user input, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message(String),
    ListChats,
    NewChat,
    Open(usize),
    Rename(usize, String),
    Delete(usize),
    History,
    Why,
    Summary,
    Logout,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if trimmed.eq_ignore_ascii_case("exit") {
            return Command::Quit;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Message(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name {
            "chats" | "list" => Command::ListChats,
            "new" => Command::NewChat,
            "open" => parse_index(args).map_or_else(Command::Invalid, Command::Open),
            "delete" => parse_index(args).map_or_else(Command::Invalid, Command::Delete),
            "rename" => {
                let (index, title) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
                match parse_index(index) {
                    // Empty titles are passed on so the rename check can reject them
                    Ok(index) => Command::Rename(index, title.trim().to_string()),
                    Err(message) => Command::Invalid(message),
                }
            }
            "history" => Command::History,
            "why" => Command::Why,
            "summary" => Command::Summary,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Invalid(format!("Unknown command: /{}", other)),
        }
    }
}

fn parse_index(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Expected a chat number, got '{}'", raw.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            Command::parse("Hello world\n"),
            Command::Message("Hello world".to_string())
        );
    }

    #[test]
    fn exit_quits() {
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("/quit"), Command::Quit);
    }

    #[test]
    fn rename_keeps_spaces_in_title() {
        assert_eq!(
            Command::parse("/rename 2 Trip to  Lisbon "),
            Command::Rename(2, "Trip to  Lisbon".to_string())
        );
        assert_eq!(Command::parse("/rename 1"), Command::Rename(1, String::new()));
    }

    #[test]
    fn bad_indexes_are_invalid() {
        assert!(matches!(Command::parse("/open zero"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/delete 0"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/frobnicate"), Command::Invalid(_)));
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(Command::parse("   "), Command::Empty);
    }
}
