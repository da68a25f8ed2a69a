use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use config::{Config, ConfigError};
use logging::{InitError, Level, Logger};
use thiserror::Error;

/// Name the binary reports in usage and error messages.
pub const PROGRAM_NAME: &str = "opslog";

/// Logger every lookup is reported on.
pub const LOGGER_NAME: &str = "opslog.cli";

const EXIT_FAILURE: u8 = 1;

/// Failure of a lookup after the arguments parsed.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Init(#[from] InitError),
    #[error("missing argument <{0}>")]
    MissingArgument(&'static str),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Look up configuration values with operation logging.")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file to load; repeat to merge several in order.")
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .value_name("LEVEL")
                .help("Root log level, overriding log.default.")
                .value_parser(Level::from_name),
        )
        .subcommand(Command::new("sections").about("List configuration sections."))
        .subcommand(
            Command::new("options")
                .about("List the options of a section.")
                .arg(Arg::new("section").value_name("SECTION").required(true)),
        )
        .subcommand(
            Command::new("get")
                .about("Print the value of an option.")
                .arg(Arg::new("section").value_name("SECTION").required(true))
                .arg(Arg::new("option").value_name("OPTION").required(true))
                .arg(
                    Arg::new("default")
                        .long("default")
                        .value_name("VALUE")
                        .help("Value printed when the section or option is missing."),
                ),
        )
}

/// Parses `args`, performs the requested lookup and maps the outcome to an exit status.
///
/// Usage errors exit with 2, configuration and lookup failures with 1.
#[must_use]
pub fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let matches = match clap_command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => {
            let rendered = error.render();
            let _ = if error.use_stderr() {
                write!(stderr, "{rendered}")
            } else {
                write!(stdout, "{rendered}")
            };
            return ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(2));
        }
    };

    match execute(&matches, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn execute<Out: Write>(matches: &ArgMatches, stdout: &mut Out) -> Result<(), CliError> {
    let mut config = Config::new();
    if let Some(paths) = matches.get_many::<PathBuf>("config") {
        config.load(paths)?;
    }
    let level = matches.get_one::<Level>("level").copied();
    let registry = logging::init(&config, level)?;
    let logger = registry.logger(LOGGER_NAME);

    match matches.subcommand() {
        Some(("sections", _)) => {
            let sections = list_sections(&logger, &config)?;
            write_lines(stdout, &sections)?;
        }
        Some(("options", sub)) => {
            let section = argument(sub, "section")?;
            let options = list_options(&logger, &config, section)?;
            write_lines(stdout, &options)?;
        }
        Some(("get", sub)) => {
            let section = argument(sub, "section")?;
            let option = argument(sub, "option")?;
            let default = sub.get_one::<String>("default").map(String::as_str);
            let value = fetch(&logger, &config, section, option, default)?;
            writeln!(stdout, "{value}")?;
        }
        _ => return Err(CliError::MissingArgument("COMMAND")),
    }
    Ok(())
}

fn list_sections<'c>(logger: &Logger, config: &'c Config) -> Result<Vec<&'c str>, CliError> {
    logger
        .info_context("List configuration sections")
        .run(|| Ok(config.sections()))
}

fn list_options<'c>(
    logger: &Logger,
    config: &'c Config,
    section: &str,
) -> Result<Vec<&'c str>, CliError> {
    logger
        .info_context(&format!("List options of section {section}"))
        .run(|| Ok(config.options(section)))
}

fn fetch<'c>(
    logger: &Logger,
    config: &'c Config,
    section: &str,
    option: &str,
    default: Option<&'c str>,
) -> Result<&'c str, CliError> {
    logger
        .info_context(&format!("Fetch option {option} of section {section}"))
        .run(|| match default {
            Some(default) => config
                .get_or(section, option, Some(default))
                .map(|value| value.unwrap_or(default))
                .map_err(CliError::from),
            None => config.get(section, option).map_err(CliError::from),
        })
}

fn argument<'m>(matches: &'m ArgMatches, name: &'static str) -> Result<&'m str, CliError> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or(CliError::MissingArgument(name))
}

fn write_lines<Out: Write>(stdout: &mut Out, lines: &[&str]) -> io::Result<()> {
    for line in lines {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}
