//! Runs ProbeScript bus syntax against a simulated bus.
//!
//! Usage: `probescript [--mode i2c] [--target 0x50] '[0xa0 0x00 [0xa1 r:4]'`
//!
//! Without script arguments, lines are read from stdin until EOF.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use probescript_syntax::{
    drivers::{Dummy, HiZ, SimI2c, SimSpi},
    init_logger, DisplayFormat, ProtocolDriver, Session, SessionConfig, SessionOutput,
    SimulatedBoard, SyntaxError, MAX_SLOTS,
};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Hiz,
    Dummy,
    I2c,
    Spi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Display {
    Auto,
    Hex,
    Dec,
    Bin,
    Ascii,
}

impl From<Display> for DisplayFormat {
    fn from(display: Display) -> Self {
        match display {
            Display::Auto => DisplayFormat::Auto,
            Display::Hex => DisplayFormat::Hex,
            Display::Dec => DisplayFormat::Dec,
            Display::Bin => DisplayFormat::Bin,
            Display::Ascii => DisplayFormat::Ascii,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "probescript")]
#[command(about = "Run bus syntax such as `[0x40 r:4]` against a simulated bus")]
struct Args {
    /// Script lines to run, in order. Read from stdin when empty
    scripts: Vec<String>,

    /// Bus mode to run against
    #[arg(long, value_enum, default_value = "hiz")]
    mode: Mode,

    /// Default bit width of reads and writes
    #[arg(long, default_value = "8")]
    bits: u8,

    /// Radix used to show values
    #[arg(long, value_enum, default_value = "auto")]
    display: Display,

    /// Number of IO pins on the simulated board
    #[arg(long, default_value = "8")]
    pins: u8,

    /// Trace capacity in slots
    #[arg(long, default_value_t = MAX_SLOTS)]
    capacity: usize,

    /// 7-bit address of a simulated I2C target, may be repeated
    #[arg(long = "target", value_parser = parse_address)]
    targets: Vec<u8>,

    /// Simulate missing I2C pull-up resistors
    #[arg(long)]
    no_pull_ups: bool,

    /// Actually wait on delays instead of only accounting for them
    #[arg(long)]
    realtime: bool,

    /// Colour the output
    #[arg(long)]
    color: bool,

    /// Log per-opcode dispatch statistics before exiting
    #[arg(long)]
    stats: bool,
}

fn parse_address(arg: &str) -> Result<u8, String> {
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    match parsed {
        Ok(address) if address <= 0x7f => Ok(address),
        _ => Err(format!("`{arg}` is not a 7-bit I2C address")),
    }
}

fn build_driver(args: &Args) -> Box<dyn ProtocolDriver> {
    match args.mode {
        Mode::Hiz => Box::new(HiZ),
        Mode::Dummy => Box::new(Dummy::new()),
        Mode::I2c => {
            let bus = args
                .targets
                .iter()
                .fold(SimI2c::new(), |bus, &address| bus.with_target(address, &[]));
            Box::new(bus.with_pull_ups(!args.no_pull_ups))
        }
        Mode::Spi => Box::new(SimSpi::new()),
    }
}

/// Prints the rendered output of a line, or its error on `err` so it shows
/// regardless of the log filter.
fn report(
    result: Result<SessionOutput, SyntaxError>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    match result {
        Ok(output) => writeln!(out, "{}", output.text),
        Err(SyntaxError::EmptyProgram) => Ok(()),
        Err(error) => {
            warn!("{error}");
            writeln!(err, "{error}")
        }
    }
}

fn main() -> Result<()> {
    let _guard = init_logger();
    let args = Args::parse();

    let config = SessionConfig::default()
        .with_bit_width(args.bits)
        .with_display_format(args.display.into())
        .with_pin_count(args.pins)
        .with_capacity(args.capacity)
        .with_color(args.color);
    let mut session = Session::new(config).context("invalid session settings")?;

    let mut driver = build_driver(&args);
    let mut board = SimulatedBoard::new(args.pins);
    if args.realtime {
        board = board.realtime();
    }
    info!(mode = driver.name(), "bus ready");

    let mut run = |line: &str| {
        let result = session.run_line(line, driver.as_mut(), &mut board);
        report(result, &mut io::stdout().lock(), &mut io::stderr().lock())
            .context("failed to write results")
    };

    if args.scripts.is_empty() {
        for line in io::stdin().lock().lines() {
            run(&line.context("failed to read script from stdin")?)?;
        }
    } else {
        for line in &args.scripts {
            run(line)?;
        }
    }

    if args.stats {
        session.stats().log_summary();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use probescript_syntax::{drivers::HiZ, CompileError};

    use super::*;

    fn report_to_buffers(result: Result<SessionOutput, SyntaxError>) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        report(result, &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_compile_errors_go_to_stderr() {
        let error = SyntaxError::Compile(CompileError::UnknownSyntax {
            symbol: 'q',
            position: 3,
        });
        let (out, err) = report_to_buffers(Err(error));
        assert_eq!(out, "");
        assert_eq!(err, "syntax compile error: unknown syntax 'q' at position 3\n");
    }

    #[test]
    fn test_empty_lines_print_nothing() {
        let (out, err) = report_to_buffers(Err(SyntaxError::EmptyProgram));
        assert_eq!((out.as_str(), err.as_str()), ("", ""));
    }

    #[test]
    fn test_output_goes_to_stdout() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        let mut board = SimulatedBoard::new(8);
        let result = session.run_line("A.1", &mut HiZ, &mut board);
        let (out, err) = report_to_buffers(result);
        assert_eq!(out, "IO1 set to OUTPUT: 1\n");
        assert_eq!(err, "");
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x50"), Ok(0x50));
        assert_eq!(parse_address("80"), Ok(80));
        assert!(parse_address("0x80").is_err());
    }
}
