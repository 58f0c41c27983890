// Line-oriented commands understood by the terminal front-end

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a slash command becomes the draft and is sent.
    Say(String),
    Models,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP_TEXT: &str = "\
Type a message and press enter to send it.
  /models  refresh and list the available models
  /reset   start over with a fresh session
  /help    show this help
  /quit    leave";

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Command::Say(line.to_string());
        }
        match trimmed {
            "/models" => Command::Models,
            "/reset" => Command::Reset,
            "/help" | "/?" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}
