//! Command handlers

use core::fmt::Write;

use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::config::{find_param, find_params_matching, ParamDescriptor, ParamType, ParamValue, PARAMS};
use crate::globals::{BG_LOG, KEYER_LOG, RX_QUEUE, STATS};

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub usage: &'static str,
    pub brief: &'static str,
    pub handler: fn(&ParsedCommand<'_>, &mut dyn Write) -> Result<(), ConsoleError>,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", usage: "help [cmd]", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "set", usage: "set <param> <value>", brief: "Set parameter value", handler: cmd_set },
    CommandDescriptor { name: "show", usage: "show [param|prefix*]", brief: "Show parameters", handler: cmd_show },
    CommandDescriptor { name: "stats", usage: "stats [reset]", brief: "Keyer statistics", handler: cmd_stats },
    CommandDescriptor { name: "reboot", usage: "reboot confirm", brief: "Restart system", handler: cmd_reboot },
];

/// Execute a parsed command. A blank line does nothing.
pub fn execute(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if cmd.is_empty() {
        return Ok(());
    }

    let handler = COMMANDS
        .iter()
        .find(|c| c.name == cmd.command)
        .ok_or(ConsoleError::UnknownCommand)?;

    (handler.handler)(cmd, out)
}

fn cmd_help(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let c = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or(ConsoleError::UnknownCommand)?;
        let _ = writeln!(out, "{}: {}", c.usage, c.brief);
        if c.name == "set" || c.name == "show" {
            for p in PARAMS {
                let _ = writeln!(out, "  {:<10} {}", p.name, p.description);
            }
        }
    } else {
        for c in COMMANDS {
            let _ = writeln!(out, "  {:<22} {}", c.usage, c.brief);
        }
    }
    Ok(())
}

/// Parse `text` for `param`, range-checked against its descriptor.
fn parse_value(param: &ParamDescriptor, text: &str) -> Result<ParamValue, ConsoleError> {
    match param.param_type {
        ParamType::U32 { min, max } => {
            let v: u32 = text.parse().map_err(|_| ConsoleError::InvalidValue)?;
            if v < min || v > max {
                return Err(ConsoleError::OutOfRange);
            }
            Ok(ParamValue::U32(v))
        }
        ParamType::Enum { max } => {
            let v: u8 = text.parse().map_err(|_| ConsoleError::InvalidValue)?;
            if v > max {
                return Err(ConsoleError::OutOfRange);
            }
            Ok(ParamValue::U8(v))
        }
    }
}

fn cmd_set(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let name = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let text = cmd.arg(1).ok_or(ConsoleError::MissingArg)?;

    let param = find_param(name).ok_or(ConsoleError::UnknownParam)?;
    let value = parse_value(param, text)?;
    (param.set_fn)(value)?;

    let _ = writeln!(out, "{}={}", param.name, (param.get_fn)());
    Ok(())
}

fn cmd_show(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    match cmd.arg(0) {
        None => {
            for p in PARAMS {
                let _ = writeln!(out, "{}={}", p.name, (p.get_fn)());
            }
        }
        Some(pattern) if pattern.ends_with('*') => {
            let mut found = false;
            for p in find_params_matching(pattern) {
                let _ = writeln!(out, "{}={}", p.name, (p.get_fn)());
                found = true;
            }
            if !found {
                return Err(ConsoleError::UnknownParam);
            }
        }
        Some(name) => {
            let p = find_param(name).ok_or(ConsoleError::UnknownParam)?;
            let _ = writeln!(out, "{}={}", p.name, (p.get_fn)());
        }
    }
    Ok(())
}

fn cmd_stats(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    match cmd.arg(0) {
        None => {}
        Some("reset") => {
            STATS.reset();
            let _ = writeln!(out, "stats reset");
            return Ok(());
        }
        Some(_) => return Err(ConsoleError::InvalidValue),
    }

    let s = STATS.snapshot();
    let _ = writeln!(out, "decoded:        {}", s.decoded);
    let _ = writeln!(out, "unmapped:       {} (last 0x{:02X})", s.unknown, s.last_unknown);
    let _ = writeln!(out, "relayed:        {}", s.relayed);
    let _ = writeln!(out, "relayed silent: {}", s.relayed_silent);
    let _ = writeln!(out, "hw errors:      {}", s.hw_errors);
    let _ = writeln!(
        out,
        "rx queue:       {}/{} (refused {})",
        RX_QUEUE.len(),
        RX_QUEUE.capacity(),
        RX_QUEUE.rejected()
    );
    let _ = writeln!(out, "rx uart full:   {}", s.rx_uart_full);
    let _ = writeln!(out, "log dropped:    keyer {}, bg {}", KEYER_LOG.dropped(), BG_LOG.dropped());
    Ok(())
}

fn cmd_reboot(cmd: &ParsedCommand<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if cmd.arg(0) != Some("confirm") {
        return Err(ConsoleError::RequiresConfirm);
    }

    let _ = writeln!(out, "restarting...");

    #[cfg(target_os = "espidf")]
    unsafe {
        esp_idf_svc::sys::esp_restart();
    }

    Ok(())
}
