//! Line commands typed by the user.

use anyhow::{bail, Context};
use todo_sync::TodoId;

pub const HELP: &str = "\
commands:
  add <text>     create a todo
  input <text>   set the pending input
  submit         create a todo from the pending input
  toggle <id>    flip a todo's completed flag
  rm <id>        delete a todo
  list           show the list again
  help           show this help
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Input(String),
    Submit,
    Toggle(TodoId),
    Remove(TodoId),
    List,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match word {
            "" | "list" | "ls" => Command::List,
            "add" => Command::Add(rest.to_string()),
            "input" => Command::Input(rest.to_string()),
            "submit" => Command::Submit,
            "toggle" => Command::Toggle(parse_id(rest)?),
            "rm" | "remove" | "delete" => Command::Remove(parse_id(rest)?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("unknown command `{other}`, try `help`"),
        };
        Ok(command)
    }
}

fn parse_id(raw: &str) -> anyhow::Result<TodoId> {
    raw.parse()
        .with_context(|| format!("expected a todo id, got `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(Command::parse("add  buy milk ").unwrap(), Command::Add("buy milk".to_string()));
        assert_eq!(Command::parse("toggle 5").unwrap(), Command::Toggle(5));
        assert_eq!(Command::parse("rm 7").unwrap(), Command::Remove(7));
        assert_eq!(Command::parse("input").unwrap(), Command::Input(String::new()));
    }

    #[test]
    fn blank_line_lists() {
        assert_eq!(Command::parse("   ").unwrap(), Command::List);
    }

    #[test]
    fn rejects_bad_ids_and_unknown_words() {
        assert!(Command::parse("toggle five").is_err());
        assert!(Command::parse("rm").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }
}
