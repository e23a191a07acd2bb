//! Prompt commands.

/// One line typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `move <x> <y>`
    Move { x: f64, y: f64 },
    /// `help`
    Help,
    /// `quit` or `exit`
    Quit,
    /// Blank line
    Empty,
}

pub const HELP: &str = "commands: move <x> <y> | help | quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Empty);
        };

        let command = match head {
            "move" | "m" => {
                let x = parse_coordinate(words.next(), "x")?;
                let y = parse_coordinate(words.next(), "y")?;
                Self::Move { x, y }
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}' ({HELP})")),
        };

        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument '{extra}'"));
        }
        Ok(command)
    }
}

fn parse_coordinate(word: Option<&str>, name: &str) -> Result<f64, String> {
    let word = word.ok_or_else(|| format!("missing {name} (usage: move <x> <y>)"))?;
    let value: f64 = word.parse().map_err(|_| format!("{name} is not a number: '{word}'"))?;
    if !value.is_finite() {
        return Err(format!("{name} must be finite"));
    }
    Ok(value)
}
