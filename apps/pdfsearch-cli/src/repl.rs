use pdfsearch_core::types::SearchMode;

/// One line of input to the interactive loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Query(String),
    Mode(Vec<SearchMode>),
    TopK(usize),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// `all` expands to every method; anything else must name one mode.
pub fn parse_modes(s: &str) -> Result<Vec<SearchMode>, String> {
    if s.trim().eq_ignore_ascii_case("all") {
        return Ok(SearchMode::ALL.to_vec());
    }
    s.parse::<SearchMode>().map(|m| vec![m])
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return ReplCommand::Query(line.to_string());
    };
    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };
    match cmd {
        "q" | "quit" | "exit" => ReplCommand::Quit,
        "h" | "help" => ReplCommand::Help,
        "mode" | "m" => match parse_modes(arg) {
            Ok(modes) => ReplCommand::Mode(modes),
            Err(e) => ReplCommand::Invalid(e),
        },
        "k" => match arg.parse::<usize>() {
            Ok(k) if k > 0 => ReplCommand::TopK(k),
            _ => ReplCommand::Invalid(format!("':k' expects a positive number, got '{arg}'")),
        },
        other => ReplCommand::Invalid(format!("unknown command ':{other}' (try :help)")),
    }
}

pub const HELP: &str = "Type a query to search. Commands:
  :mode <lexical|semantic|hybrid|all>   switch retrieval method
  :k <n>                                results per method
  :help                                 show this message
  :quit                                 leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_queries() {
        assert_eq!(parse_command("  solar panels "), ReplCommand::Query("solar panels".into()));
        assert_eq!(parse_command("   "), ReplCommand::Empty);
    }

    #[test]
    fn commands_parse() {
        assert_eq!(parse_command(":quit"), ReplCommand::Quit);
        assert_eq!(parse_command(":k 5"), ReplCommand::TopK(5));
        assert_eq!(parse_command(":mode bm25"), ReplCommand::Mode(vec![SearchMode::Lexical]));
        assert_eq!(parse_command(":mode all"), ReplCommand::Mode(SearchMode::ALL.to_vec()));
        assert!(matches!(parse_command(":k zero"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command(":k 0"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command(":mode fuzzy"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_command(":frobnicate"), ReplCommand::Invalid(_)));
    }
}
