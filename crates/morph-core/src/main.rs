//! `morph` command-line interface
//!
//! Describes, checks and runs conversions over the built-in adapters.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use morph_core::{defaults, Morph, MorphConfig, TypeIdentity};
use tracing_subscriber::EnvFilter;

fn route_args(command: Command) -> Command {
    command
        .arg(Arg::new("from").required(true).help("Source type, e.g. i32"))
        .arg(Arg::new("into").required(true).help("Target type, e.g. f64"))
}

fn cli() -> Command {
    Command::new("morph")
        .version(morph_core::VERSION)
        .about("Bidirectional type-adaptation engine over the built-in adapters")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a TOML configuration file"),
        )
        .subcommand(
            route_args(Command::new("describe").about("Show the adapter path between two types")).arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(route_args(
            Command::new("check").about("Check whether two types are convertible"),
        ))
        .subcommand(
            route_args(Command::new("convert").about("Convert a value between two types"))
                .arg(Arg::new("value").required(true).help("Value in its textual form"))
                .arg(
                    Arg::new("lossless")
                        .long("lossless")
                        .action(ArgAction::SetTrue)
                        .help("Refuse paths containing lossy steps"),
                ),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => MorphConfig::from_path(path).with_context(|| format!("loading config '{path}'"))?,
        None => MorphConfig::default(),
    };
    let morph = Morph::with_config(config);

    match matches.subcommand() {
        Some(("describe", args)) => describe(&morph, args),
        Some(("check", args)) => check(&morph, args),
        Some(("convert", args)) => convert(&morph, args),
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    }
}

fn route(args: &ArgMatches) -> Result<(TypeIdentity, TypeIdentity)> {
    let parse = |name: &str| -> Result<TypeIdentity> {
        let raw = args
            .get_one::<String>(name)
            .with_context(|| format!("missing <{name}>"))?;
        Ok(TypeIdentity::parse(raw)?)
    };
    Ok((parse("from")?, parse("into")?))
}

fn describe(morph: &Morph, args: &ArgMatches) -> Result<()> {
    let (from, into) = route(args)?;
    let steps = morph.describe_path(&from, &into)?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    if steps.is_empty() {
        println!("{from} -> {into}: identity");
    }
    for (index, step) in steps.iter().enumerate() {
        let lossy = if step.lossless { "" } else { ", lossy" };
        println!(
            "{index}: {} -> {} ({:?}, cost {}{lossy})",
            step.from, step.into, step.direction, step.cost
        );
    }
    Ok(())
}

fn check(morph: &Morph, args: &ArgMatches) -> Result<()> {
    let (from, into) = route(args)?;
    if morph.can_convert(&from, &into) {
        println!("{from} -> {into}: convertible");
        Ok(())
    } else {
        println!("{from} -> {into}: not convertible");
        std::process::exit(1);
    }
}

fn convert(morph: &Morph, args: &ArgMatches) -> Result<()> {
    let (from, into) = route(args)?;
    let raw = args.get_one::<String>("value").context("missing <value>")?;

    let value = defaults::parse_value(&from, raw)
        .with_context(|| format!("type '{from}' has no textual form"))?
        .with_context(|| format!("'{raw}' is not a valid {from}"))?;

    let output = if args.get_flag("lossless") {
        morph.convert_lossless(&from, &into, value)
    } else {
        morph.convert(&from, &into, value)
    }
    .map_err(|error| anyhow!(error.detailed_message()))?;

    let rendered = defaults::render_value(&into, &output)
        .with_context(|| format!("cannot render a {into} value"))?;
    println!("{rendered}");
    Ok(())
}
