use clap::{Args, Parser, Subcommand};
use kbc_common::{
    keycodes::key_range,
    registers::row_mask,
    timing::{Timing, DEFAULT_INIT_DLY},
    KbcConfig,
};
use kbc_config::{
    keycodes, load,
    summary::{register_values, wake_masks, Summary},
};
use std::{
    path::{Path, PathBuf},
    process,
};

use anyhow::{anyhow, Result};

/// Check and inspect keyboard controller descriptions
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a keyboard controller description file
    Validate(ValidateArgs),
    /// Show the timing and register values a description programs
    Timing(TimingArgs),
    /// List keycode names
    KeycodesList(ListKeycodesArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Display a summary of the description
    #[clap(long, short)]
    verbose: bool,

    /// keyboard controller description file
    file: PathBuf,
}

#[derive(Args)]
struct TimingArgs {
    /// Also show the wake row masks
    #[clap(long, short)]
    wake: bool,

    /// keyboard controller description file
    file: PathBuf,
}

#[derive(Args)]
struct ListKeycodesArgs {
    /// Include the keycode hex value
    #[clap(long, short)]
    verbose: bool,

    /// Sort results by keycode; Defaults to sorting by name
    #[clap(long, short)]
    sort_by_keycode: bool,

    /// Only list key names that contain pattern (case insensitive). If pattern starts with 0x
    /// then key names matching the key code are shown.
    #[clap()]
    pattern: Option<String>,
}

fn load_file(file: &Path) -> Result<(KbcConfig, Timing)> {
    let config = load(file).map_err(|err| {
        if err.span.is_none() {
            anyhow!("Failed to load \"{}\"!\n    {}", file.display(), err)
        } else {
            // already reported with its source
            anyhow!("Invalid description \"{}\"", file.display())
        }
    })?;
    let timing = Timing::from_config(&config).map_err(|err| anyhow!("{err}"))?;
    Ok((config, timing))
}

fn validate(args: &ValidateArgs) -> Result<()> {
    let (config, timing) = load_file(&args.file)?;
    if args.verbose {
        println!("{}", Summary::new(&config, timing));
    }
    Ok(())
}

fn timing(args: &TimingArgs) -> Result<()> {
    let (config, timing) = load_file(&args.file)?;

    println!("debounce:       {}", timing.debounce_cnt);
    println!("repoll:         {} ms", timing.repoll_ms);
    println!("scan time:      {} cycles", timing.one_scan_time);
    println!("scan timeout:   {} cycles", timing.scan_timeout);
    println!(
        "poll delay:     {} us",
        Timing::interrupt_to_poll_us(DEFAULT_INIT_DLY)
    );
    println!();
    for reg in register_values(&config, &timing) {
        println!("{:<9} {:#04x}: {:#010x}", reg.name, reg.offset, reg.value);
    }
    if args.wake {
        println!();
        for (row, mask) in wake_masks(&config).iter().enumerate() {
            let name = format!("ROW{row}_MASK");
            println!("{:<9} {:#04x}: {:#010x}", name, row_mask(row), mask);
        }
    }
    Ok(())
}

fn list_keycodes(args: &ListKeycodesArgs) -> Result<()> {
    let iter = keycodes::keycodes_iter();
    let mut codes = if let Some(pattern) = &args.pattern {
        let pattern = pattern.to_lowercase();
        if let Some(hex) = pattern.strip_prefix("0x") {
            let pattern = u16::from_str_radix(hex, 16)?;
            if !key_range::is_valid(pattern) {
                return Err(anyhow!("{pattern:#x} is not a key code"));
            }
            iter.filter(|p| p.code == pattern).collect::<Vec<_>>()
        } else {
            let pattern = pattern.as_str();
            iter.filter(|p| p.name.contains(pattern)).collect::<Vec<_>>()
        }
    } else {
        iter.collect::<Vec<_>>()
    };
    if args.sort_by_keycode {
        codes.sort_by(|a, b| a.code.cmp(&b.code).then(a.name.cmp(b.name)));
    } else {
        codes.sort_by_key(|k| k.name);
    }
    for d in codes {
        if args.verbose {
            println!("{:03X}: {}", d.code, d.name);
        } else {
            println!("{}", d.name);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = run(&cli);

    if let Err(message) = result {
        eprintln!("{message}");
        process::exit(1);
    };
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Validate(args) => validate(args),
        Commands::Timing(args) => timing(args),
        Commands::KeycodesList(args) => list_keycodes(args),
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod test;
