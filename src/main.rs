use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use thermwatch::commands;

fn main() -> Result<()> {
    thermwatch::init_logging();

    let matches = Command::new("thermwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch thermal pressure, CPU temperature and fan speed")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("status")
                .about("Sample the thermal state once and print it")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the snapshot as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Continuously monitor until Ctrl-C")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Sampling interval in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("2000"),
                )
                .arg(
                    Arg::new("retention")
                        .long("retention")
                        .value_name("SECS")
                        .help("History retention window in seconds")
                        .value_parser(clap::value_parser!(i64))
                        .default_value("3600"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print one JSON snapshot per tick")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-notify")
                        .long("no-notify")
                        .help("Disable throttle and recovery notifications")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("notify-recovery")
                        .long("notify-recovery")
                        .help("Also notify when pressure recovers")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("status", sub)) => commands::status::execute(sub),
        Some(("watch", sub)) => commands::watch::execute(sub),
        _ => unreachable!("subcommand required"),
    }
}
