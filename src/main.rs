extern crate shelly;

use std::{process, time::Duration};

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::error;

use shelly::{
    capabilities::{DeviceActions, Relay},
    datatypes::RelayState,
    oscillation::{Oscillation, Oscillator},
    Config, Error, Result, Shelly1,
};

fn relay_arg() -> Arg<'static, 'static> {
    Arg::with_name("relay")
        .required(true)
        .help("Relay channel, starting at 0")
}

fn parse<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>> {
    match matches.value_of(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidArgument(format!("Invalid {}: {}", name, value))),
        None => Ok(None),
    }
}

fn relay(matches: &ArgMatches) -> Result<u32> {
    parse(matches, "relay")?
        .ok_or_else(|| Error::InvalidArgument(String::from("Missing relay")))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn command_relays(device: &Shelly1) -> Result<()> {
    for (id, state) in device.relays()? {
        println!("{}\t{}", id, state);
    }
    Ok(())
}

fn oscillation_plan(matches: &ArgMatches) -> Result<Oscillation> {
    let period: u64 = parse(matches, "period")?
        .ok_or_else(|| Error::InvalidArgument(String::from("Missing period")))?;
    let mut plan = Oscillation::new(relay(matches)?, Duration::from_millis(period))
        .start_state(RelayState::On);

    if let Some(cycles) = parse(matches, "cycles")? {
        plan = plan.cycles(cycles);
    } else if let Some(secs) = parse(matches, "duration")? {
        plan = plan.for_duration(Duration::from_secs(secs));
    }
    plan = match matches.value_of("final") {
        Some("on") => plan.final_state(RelayState::On),
        _ => plan.final_state(RelayState::Off),
    };

    Ok(plan)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = Config::default();
    if let Some(host) = matches.value_of("host") {
        config.host = host.to_string();
    }
    if let Some(millis) = parse(matches, "timeout")? {
        config.timeout = Duration::from_millis(millis);
    }
    let device = Shelly1::with_config(config)?;

    match matches.subcommand() {
        ("status", _) => print_json(&device.status()?),
        ("relays", _) => command_relays(&device),
        ("on", Some(sub)) => {
            println!("{}", device.switch_on(relay(sub)?)?);
            Ok(())
        }
        ("off", Some(sub)) => {
            println!("{}", device.switch_off(relay(sub)?)?);
            Ok(())
        }
        ("toggle", Some(sub)) => print_json(&device.toggle(relay(sub)?)?),
        ("oscillate", Some(sub)) => Oscillator::new().run(&device, &oscillation_plan(sub)?),
        _ => Ok(()),
    }
}

fn app() -> App<'static, 'static> {
    App::new("Shelly 1 CLI")
        .version("0.1")
        .about("Query and switch a Shelly 1 relay over its local HTTP API.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(Arg::with_name("host")
            .long("host")
            .takes_value(true)
            .help("Device address, defaults to 192.168.33.1")
        )
        .arg(Arg::with_name("timeout")
            .long("timeout")
            .takes_value(true)
            .help("Request timeout in milliseconds")
        )
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .help("Increase log verbosity")
        )
        .subcommand(SubCommand::with_name("status")
            .about("Print the device status as JSON")
        )
        .subcommand(SubCommand::with_name("relays")
            .about("Print the state of every relay")
        )
        .subcommand(SubCommand::with_name("on")
            .about("Switch a relay on")
            .arg(relay_arg())
        )
        .subcommand(SubCommand::with_name("off")
            .about("Switch a relay off")
            .arg(relay_arg())
        )
        .subcommand(SubCommand::with_name("toggle")
            .about("Toggle a relay")
            .arg(relay_arg())
        )
        .subcommand(SubCommand::with_name("oscillate")
            .about("Toggle a relay repeatedly")
            .arg(relay_arg())
            .arg(Arg::with_name("period")
                .long("period")
                .takes_value(true)
                .default_value("500")
                .help("Milliseconds spent in each state, at least 50")
            )
            .arg(Arg::with_name("cycles")
                .long("cycles")
                .takes_value(true)
                .conflicts_with("duration")
                .help("Number of on/off cycles")
            )
            .arg(Arg::with_name("duration")
                .long("duration")
                .takes_value(true)
                .help("Stop after this many seconds")
            )
            .arg(Arg::with_name("final")
                .long("final")
                .takes_value(true)
                .possible_values(&["on", "off"])
                .help("State to leave the relay in, off by default")
            )
        )
}

fn main() {
    let matches = app().get_matches();

    stderrlog::new()
        .module("shelly")
        .verbosity(matches.occurrences_of("verbose") as usize + 1)
        .init()
        .ok();

    if let Err(err) = run(&matches) {
        error!("{}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelly::oscillation::Limit;

    fn plan(args: &[&str]) -> Result<Oscillation> {
        let mut argv = vec!["shelly", "oscillate"];
        argv.extend_from_slice(args);
        let matches = app().get_matches_from_safe(argv).unwrap();
        oscillation_plan(matches.subcommand_matches("oscillate").unwrap())
    }

    #[test]
    fn oscillate_defaults() {
        let plan = plan(&["0"]).unwrap();

        assert_eq!(0, plan.relay);
        assert_eq!(Duration::from_millis(500), plan.period);
        assert_eq!(Limit::Unbounded, plan.limit);
        assert_eq!(Some(RelayState::On), plan.start_state);
        assert_eq!(Some(RelayState::Off), plan.final_state);
    }

    #[test]
    fn oscillate_cycles_and_final_state() {
        let plan = plan(&["2", "--period", "100", "--cycles", "3", "--final", "on"]).unwrap();

        assert_eq!(2, plan.relay);
        assert_eq!(Duration::from_millis(100), plan.period);
        assert_eq!(Limit::Cycles(3), plan.limit);
        assert_eq!(Some(RelayState::On), plan.final_state);
    }

    #[test]
    fn oscillate_duration() {
        let plan = plan(&["0", "--duration", "10"]).unwrap();

        assert_eq!(Limit::Timeout(Duration::from_secs(10)), plan.limit);
    }

    #[test]
    fn cycles_conflict_with_duration() {
        assert!(app()
            .get_matches_from_safe(vec!["shelly", "oscillate", "0", "--cycles", "1", "--duration", "5"])
            .is_err());
    }

    #[test]
    fn bad_numbers_are_invalid_arguments() {
        assert!(matches!(
            plan(&["zero"]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            plan(&["0", "--period", "fast"]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            plan(&["0", "--cycles", "many"]),
            Err(Error::InvalidArgument(_))
        ));
    }
}
