//! Script parsing and the command loop
//!
//! The first line of a script configures the machine; every following line
//! is a command. Commands run strictly in order, one at a time, and a
//! failed command prints its message and never stops the run.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::memory::SimMemory;

/// A single script command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Load(i64),
    Store(i64, u8),
    PrintTable,
    PrintRam,
    PrintSwap,
}

/// Parse the ten-field configuration line at the top of a script.
pub fn parse_header(line: &str) -> SimResult<SimConfig> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 10 {
        return Err(SimError::BadConfig(format!(
            "Invalid script format. Got {} fields",
            fields.len()
        )));
    }
    let num = |idx: usize| -> SimResult<usize> {
        fields[idx].parse().map_err(|_| {
            SimError::BadConfig(format!("Invalid script format. Field {} is not a number", idx + 1))
        })
    };
    Ok(SimConfig {
        exe_path: fields[0].to_string(),
        swap_path: fields[1].to_string(),
        text_size: num(2)?,
        data_size: num(3)?,
        bss_size: num(4)?,
        heap_stack_size: num(5)?,
        page_size: num(6)?,
        num_pages: num(7)?,
        memory_size: num(8)?,
        swap_size: num(9)?,
    })
}

/// Parse one command line. `None` means the line is not a valid command.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut tokens = line.split_whitespace();
    let parsed = match tokens.next()? {
        "load" => Command::Load(tokens.next()?.parse().ok()?),
        "store" => {
            let addr = tokens.next()?.parse().ok()?;
            let value = tokens.next()?;
            if value.len() != 1 {
                return None;
            }
            Command::Store(addr, value.as_bytes()[0])
        }
        "print" => match tokens.next()? {
            "table" => Command::PrintTable,
            "ram" => Command::PrintRam,
            "swap" => Command::PrintSwap,
            _ => return None,
        },
        _ => return None,
    };
    // trailing tokens make the line malformed
    if tokens.next().is_some() {
        return None;
    }
    Some(parsed)
}

/// Execute one command. Recoverable failures print their one message to
/// stderr and are swallowed; the caller moves on to the next command.
pub fn execute<W: Write>(mem: &mut SimMemory, command: Command, out: &mut W) {
    let result = match command {
        Command::Load(addr) => mem.load(addr).map(|_| ()),
        Command::Store(addr, value) => mem.store(addr, value),
        Command::PrintTable => mem.dump_page_table(out).map_err(SimError::from),
        Command::PrintRam => mem.dump_ram(out).map_err(SimError::from),
        Command::PrintSwap => mem.dump_swap(out).map_err(SimError::from),
    };
    if let Err(e) = result {
        eprintln!("{}", e);
    }
}

/// Run a whole script file: header first, then commands in order.
pub fn run_file(path: &str) -> SimResult<()> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(SimError::BadConfig(
                "Script file is empty or missing configuration line".into(),
            ))
        }
    };
    let config = parse_header(&header)?;
    let mut mem = SimMemory::new(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(command) => execute(&mut mem, command, &mut out),
            None => eprintln!("Error: Invalid script format"),
        }
    }
    let (hits, lookups) = mem.tlb_stats();
    log::debug!("tlb: {} hits over {} lookups", hits, lookups);
    Ok(())
}
