//! Command-line options for the headless runner.
//!
//! ```text
//! skyline [--config <path>] [--cycles <n>] [--ascii] [--frame-ms <ms>]
//! ```
//!
//! `SKYLINE_CONFIG` is read when `--config` is absent.

use std::path::PathBuf;

pub const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    /// Rebuild back to back and exit after this many cities.
    pub cycles: Option<u64>,
    /// Print an overview map of every new city to stdout.
    pub ascii: bool,
    pub frame_ms: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            cycles: None,
            ascii: false,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

fn parse_number(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|_| format!("{flag} expects a number, got '{value}'"))
}

impl RunOptions {
    /// Parse arguments, excluding the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut options = RunOptions::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().ok_or("--config needs a path")?;
                    options.config_path = Some(PathBuf::from(path));
                }
                "--cycles" => {
                    let cycles = parse_number("--cycles", args.next())?;
                    if cycles == 0 {
                        return Err("--cycles must be at least 1".to_string());
                    }
                    options.cycles = Some(cycles);
                }
                "--frame-ms" => options.frame_ms = parse_number("--frame-ms", args.next())?.max(1),
                "--ascii" => options.ascii = true,
                other => return Err(format!("unknown argument '{other}'")),
            }
        }
        Ok(options)
    }

    pub fn from_env() -> Result<Self, String> {
        let mut options = Self::parse(std::env::args().skip(1))?;
        if options.config_path.is_none() {
            options.config_path = std::env::var_os("SKYLINE_CONFIG").map(PathBuf::from);
        }
        Ok(options)
    }
}
