use clap::App;
use clap::AppSettings;
use clap::Arg;
use clap::ArgMatches;
use clap::SubCommand;
use cli::Action;
use cli::Command;
use cli::Invocation;
use errors::*;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

// names under which the binary implies its subcommand, e.g. via symlinks
const MULTI_CALL_NAMES: &[&str] = &["bring", "stat"];

fn section_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("section")
        .help("A section name from ~/.aws-vpn.cfg")
        .required(true)
}

fn profile_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("profile")
        .help("The AWS profile, overriding the one in the config section")
        .long("profile")
        .value_name("NAME")
        .takes_value(true)
}

fn define_app<'a, 'b>() -> App<'a, 'b> {
    let bring_command = SubCommand::with_name("bring")
        .about("Associates the endpoint with its subnet, or disassociates it")
        .setting(AppSettings::DeriveDisplayOrder)
        .arg(section_arg())
        .arg(
            Arg::with_name("action")
                .help("The action to take on the endpoint")
                .possible_values(&["up", "down"])
                .required(true),
        )
        .arg(profile_arg())
        .arg(
            Arg::with_name("timeout")
                .help("Stop waiting for the association to settle after this many seconds")
                .long("timeout")
                .value_name("SECS")
                .takes_value(true),
        );

    let stat_command = SubCommand::with_name("stat")
        .about("Prints the endpoint's association status and connections")
        .setting(AppSettings::DeriveDisplayOrder)
        .arg(section_arg())
        .arg(profile_arg())
        .arg(
            Arg::with_name("all")
                .help("Print all columns")
                .short("a")
                .long("all"),
        );

    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("AWS Client VPN endpoint manager")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::GlobalVersion)
        .setting(AppSettings::VersionlessSubcommands)
        .setting(AppSettings::DeriveDisplayOrder)
        .arg(
            Arg::with_name("config")
                .help("Config file to read instead of ~/.aws-vpn.cfg")
                .long("config")
                .value_name("FILE")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .help("Log more detail to stderr; repeat for even more")
                .short("v")
                .long("verbose")
                .multiple(true),
        )
        .subcommand(bring_command)
        .subcommand(stat_command)
}

pub fn parse_from_safe<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = with_implied_subcommand(args.into_iter().map(Into::into).collect());
    let app = define_app();
    let matches = app.get_matches_from_safe(args)?;

    let command = if let Some(matches) = matches.subcommand_matches("bring") {
        let action = match matches.value_of("action").expect("required") {
            "up" => Action::Up,
            "down" => Action::Down,
            _ => unreachable!(),
        };
        let timeout = match matches.value_of("timeout") {
            Some(x) => {
                let secs = x
                    .parse::<u64>()
                    .chain_err(|| format!("not a number of seconds: {}", x))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };
        Command::Bring {
            section: section(matches),
            action,
            profile: matches.value_of("profile").map(str::to_owned),
            timeout,
        }
    } else if let Some(matches) = matches.subcommand_matches("stat") {
        Command::Stat {
            section: section(matches),
            profile: matches.value_of("profile").map(str::to_owned),
            all: matches.is_present("all"),
        }
    } else {
        unreachable!()
    };

    Ok(Invocation {
        config_path: matches.value_of_os("config").map(PathBuf::from),
        verbosity: matches.occurrences_of("verbose"),
        command,
    })
}

fn section(matches: &ArgMatches) -> String {
    matches.value_of("section").expect("required").to_owned()
}

fn with_implied_subcommand(mut args: Vec<OsString>) -> Vec<OsString> {
    let implied = args
        .first()
        .and_then(|argv0| Path::new(argv0).file_stem())
        .and_then(|stem| stem.to_str())
        .and_then(|stem| MULTI_CALL_NAMES.iter().find(|&&name| name == stem))
        .map(|&name| OsString::from(name));
    if let Some(subcommand) = implied {
        args.insert(1, subcommand);
    }
    args
}
