//! Command-line parsing for the shell.
//!
//! One command per line. Marker ordinals are 1-based, as in the list panel.

use thiserror::Error;
use waymark_markers::{LatLng, MarkerAction};

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  mode                   toggle add mode
  click <lat> <lng>      click the map (adds a marker in add mode)
  drag <n> <lat> <lng>   drop marker n at a new position
  tap <n>                click marker n (deletes it outside add mode)
  clear                  delete all markers
  list                   show or hide the marker list
  focus <n>              center the map on marker n
  show                   redraw the page
  metrics                print Prometheus metrics
  help                   print this text
  quit                   exit";

/// A parsed shell command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// `mode`
    ToggleMode,
    /// `click <lat> <lng>`
    Click {
        /// Latitude.
        lat: f64,
        /// Longitude.
        lng: f64,
    },
    /// `drag <n> <lat> <lng>`
    Drag {
        /// 1-based marker ordinal.
        ordinal: usize,
        /// Latitude.
        lat: f64,
        /// Longitude.
        lng: f64,
    },
    /// `tap <n>`
    Tap {
        /// 1-based marker ordinal.
        ordinal: usize,
    },
    /// `clear`
    Clear,
    /// `list`
    ToggleList,
    /// `focus <n>`
    Focus {
        /// 1-based marker ordinal.
        ordinal: usize,
    },
    /// `show`
    Show,
    /// `metrics`
    Metrics,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// First word is not a command.
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    /// Too few arguments.
    #[error("'{command}' needs <{argument}>")]
    MissingArgument {
        /// Command word.
        command: &'static str,
        /// Name of the first missing argument.
        argument: &'static str,
    },

    /// Too many arguments.
    #[error("'{0}' takes fewer arguments")]
    TooManyArguments(&'static str),

    /// Argument is not a number.
    #[error("<{argument}> must be a number, got '{value}'")]
    InvalidNumber {
        /// Argument name.
        argument: &'static str,
        /// Text found.
        value: String,
    },

    /// Ordinals start at 1.
    #[error("marker numbers start at 1")]
    ZeroOrdinal,
}

struct Args<'a> {
    command: &'static str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn next(&mut self, argument: &'static str) -> Result<&'a str, ParseError> {
        self.words.next().ok_or(ParseError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn coordinate(&mut self, argument: &'static str) -> Result<f64, ParseError> {
        let raw = self.next(argument)?;
        raw.parse().map_err(|_| ParseError::InvalidNumber {
            argument,
            value: raw.to_string(),
        })
    }

    fn ordinal(&mut self) -> Result<usize, ParseError> {
        let raw = self.next("n")?;
        match raw.parse::<usize>() {
            Ok(0) => Err(ParseError::ZeroOrdinal),
            Ok(n) => Ok(n),
            Err(_) => Err(ParseError::InvalidNumber {
                argument: "n",
                value: raw.to_string(),
            }),
        }
    }

    fn finish<T>(mut self, value: T) -> Result<T, ParseError> {
        if self.words.next().is_some() {
            return Err(ParseError::TooManyArguments(self.command));
        }
        Ok(value)
    }
}

/// Parse one input line.
///
/// Blank lines parse to `None`.
///
/// # Errors
///
/// Returns `ParseError` for unknown commands or bad arguments.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "mode" => "mode",
        "click" => "click",
        "drag" => "drag",
        "tap" => "tap",
        "clear" => "clear",
        "list" => "list",
        "focus" => "focus",
        "show" => "show",
        "metrics" => "metrics",
        "help" | "?" => "help",
        "quit" | "exit" => "quit",
        _ => return Err(ParseError::UnknownCommand(word.to_string())),
    };
    let mut args = Args { command, words };

    let parsed = match command {
        "mode" => Command::ToggleMode,
        "click" => Command::Click {
            lat: args.coordinate("lat")?,
            lng: args.coordinate("lng")?,
        },
        "drag" => Command::Drag {
            ordinal: args.ordinal()?,
            lat: args.coordinate("lat")?,
            lng: args.coordinate("lng")?,
        },
        "tap" => Command::Tap {
            ordinal: args.ordinal()?,
        },
        "clear" => Command::Clear,
        "list" => Command::ToggleList,
        "focus" => Command::Focus {
            ordinal: args.ordinal()?,
        },
        "show" => Command::Show,
        "metrics" => Command::Metrics,
        "help" => Command::Help,
        _ => Command::Quit,
    };
    args.finish(Some(parsed))
}

impl Command {
    /// The marker action this command stands for, if any.
    ///
    /// Coordinates are passed through unchecked; the reducer ignores
    /// unusable ones.
    #[must_use]
    pub const fn to_action(self) -> Option<MarkerAction> {
        Some(match self {
            Self::ToggleMode => MarkerAction::ToggleAddMode,
            Self::Click { lat, lng } => MarkerAction::MapClicked {
                position: Some(LatLng::from_raw(lat, lng)),
            },
            Self::Drag { ordinal, lat, lng } => MarkerAction::MarkerDragEnded {
                index: ordinal - 1,
                position: Some(LatLng::from_raw(lat, lng)),
            },
            Self::Tap { ordinal } => MarkerAction::MarkerClicked { index: ordinal - 1 },
            Self::Clear => MarkerAction::ClearAll,
            Self::ToggleList => MarkerAction::ToggleListVisible,
            Self::Focus { ordinal } => MarkerAction::FocusMarker { index: ordinal - 1 },
            Self::Show | Self::Metrics | Self::Help | Self::Quit => return None,
        })
    }
}
