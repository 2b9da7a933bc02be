//! Text command front-end for `/freecam` and `/tripod`.
//!
//! A line is split on whitespace. The first token names the command; the rest
//! are scanned left to right:
//!
//! - `N`, `--speed N`, `--speed=N`: speed, an integer in 1..=10
//! - `tripod`, `lock`, `unlock`: mode keyword (last one wins)
//!
//! Handlers return the reply lines for the player; formatting and delivery
//! stay with the host.

use crate::error::CommandError;
use crate::host::PlayerHost;
use crate::service::FreecamService;
use crate::store::{MAX_SPEED, MIN_SPEED, PlayerId};

const FREECAM_NAMES: &[&str] = &["freecam", "fc"];
const TRIPOD_NAMES: &[&str] = &["tripod", "trip", "t"];

/// Mode keyword accepted by `/freecam`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeKeyword {
    Tripod,
    Lock,
    Unlock,
}

/// Parsed arguments of `/freecam`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreecamArgs {
    pub speed: Option<i32>,
    pub mode: Option<ModeKeyword>,
}

/// A recognised command and its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Freecam(FreecamArgs),
    Tripod,
}

/// Parses a full command line such as `"/fc --speed=3 lock"`.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().ok_or(CommandError::Empty)?;
    let name = name.trim_start_matches('/');
    let is_named = |names: &[&str]| names.iter().any(|n| n.eq_ignore_ascii_case(name));

    if is_named(FREECAM_NAMES) {
        parse_freecam_args(tokens).map(Command::Freecam)
    } else if is_named(TRIPOD_NAMES) {
        Ok(Command::Tripod)
    } else {
        Err(CommandError::UnknownCommand(name.to_string()))
    }
}

/// Scans the argument tokens of `/freecam`.
pub fn parse_freecam_args<'a>(
    tokens: impl IntoIterator<Item = &'a str>,
) -> Result<FreecamArgs, CommandError> {
    let mut args = FreecamArgs::default();
    let mut tokens = tokens.into_iter();
    while let Some(token) = tokens.next() {
        let lower = token.to_ascii_lowercase();
        if lower == "--speed" {
            let value = tokens
                .next()
                .ok_or_else(|| CommandError::InvalidSpeed(String::new()))?;
            args.speed = Some(parse_speed(value)?);
        } else if let Some(value) = lower.strip_prefix("--speed=") {
            args.speed = Some(parse_speed(value)?);
        } else if let Some(mode) = parse_mode(&lower) {
            args.mode = Some(mode);
        } else if looks_numeric(token) {
            args.speed = Some(parse_speed(token)?);
        } else {
            return Err(CommandError::UnknownArgument(token.to_string()));
        }
    }
    Ok(args)
}

/// Parses and runs one command line for `id`, returning the reply lines.
pub fn execute_command(
    service: &FreecamService,
    host: &mut impl PlayerHost,
    id: PlayerId,
    line: &str,
) -> Result<Vec<String>, CommandError> {
    Ok(match parse_command(line)? {
        Command::Freecam(args) => run_freecam(service, host, id, args),
        Command::Tripod => vec![run_tripod(service, host, id)],
    })
}

fn run_freecam(
    service: &FreecamService,
    host: &mut impl PlayerHost,
    id: PlayerId,
    args: FreecamArgs,
) -> Vec<String> {
    let mut replies = Vec::new();

    if let Some(speed) = args.speed {
        let was_active = service.is_active(id);
        let stored = service.set_speed(host, id, speed);
        replies.push(format!("Freecam speed set to {stored}."));
        if !was_active {
            replies.push(toggle_reply(service.toggle_freecam(host, id)).to_string());
        }
    }

    match args.mode {
        Some(ModeKeyword::Lock) => {
            service.set_look_locked(host, id, true);
            replies.push("Freecam look locked.".to_string());
        }
        Some(ModeKeyword::Unlock) => {
            service.set_look_locked(host, id, false);
            replies.push("Freecam look unlocked.".to_string());
        }
        Some(ModeKeyword::Tripod) => replies.push(run_tripod(service, host, id)),
        None if args.speed.is_none() => {
            replies.push(toggle_reply(service.toggle_freecam(host, id)).to_string());
        }
        None => {}
    }

    replies
}

fn run_tripod(service: &FreecamService, host: &mut impl PlayerHost, id: PlayerId) -> String {
    match service.toggle_tripod(host, id) {
        Ok(true) => "Tripod enabled.".to_string(),
        Ok(false) => "Tripod disabled.".to_string(),
        Err(_) => "Tripod can only be enabled from freecam.".to_string(),
    }
}

fn toggle_reply(enabled: bool) -> &'static str {
    if enabled {
        "Freecam enabled."
    } else {
        "Freecam disabled."
    }
}

fn parse_mode(token: &str) -> Option<ModeKeyword> {
    match token {
        "tripod" => Some(ModeKeyword::Tripod),
        "lock" => Some(ModeKeyword::Lock),
        "unlock" => Some(ModeKeyword::Unlock),
        _ => None,
    }
}

fn looks_numeric(token: &str) -> bool {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn parse_speed(value: &str) -> Result<i32, CommandError> {
    value
        .parse::<i32>()
        .ok()
        .filter(|speed| (MIN_SPEED..=MAX_SPEED).contains(speed))
        .ok_or_else(|| CommandError::InvalidSpeed(value.to_string()))
}
