//! Operator commands accepted in the `Start` state.

use std::str::FromStr;

/// A recognised operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Search the network for smart sockets.
    Discover,
    /// Read the sensor once and act on the socket.
    Check,
    /// Leave the program.
    Exit,
}

/// The input did not match any command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command {0:?}")]
pub struct UnknownCommand(pub String);

/// Matching ignores case and surrounding whitespace.
impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discover" => Ok(Self::Discover),
            "check" | "monitor" => Ok(Self::Check),
            "exit" | "no" => Ok(Self::Exit),
            _ => Err(UnknownCommand(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_commands_case_insensitively() {
        assert_eq!("discover".parse(), Ok(Command::Discover));
        assert_eq!("  DISCOVER\n".parse(), Ok(Command::Discover));
        assert_eq!("Check".parse(), Ok(Command::Check));
        assert_eq!("monitor".parse(), Ok(Command::Check));
        assert_eq!("exit".parse(), Ok(Command::Exit));
        assert_eq!("No".parse(), Ok(Command::Exit));
    }

    #[test]
    fn should_reject_unknown_command() {
        assert_eq!(
            " reboot ".parse::<Command>(),
            Err(UnknownCommand("reboot".to_string()))
        );
        assert!("".parse::<Command>().is_err());
    }
}
