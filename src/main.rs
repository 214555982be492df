#[macro_use]
extern crate anyhow;

use std::fs::File;
use std::io::Write;

use anyhow::{Context as _, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use errfn::{config, Config, Errno, OrExit};

fn main() {
    pretty_env_logger::init();
    config::install(Config::from_env());

    let matches = app().get_matches();
    run(&matches).or_exit("errfn");
}

fn app() -> App<'static, 'static> {
    let message = || {
        Arg::with_name("message")
            .required(true)
            .multiple(true)
            .help("Text of the report")
    };

    App::new("errfn")
        .about("Emits error reports the way a failing program would")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(Arg::with_name("errno")
            .long("errno")
            .takes_value(true)
            .global(true)
            .help("errno value in effect when the report is made"))
        .arg(Arg::with_name("pending")
            .long("pending")
            .takes_value(true)
            .global(true)
            .help("Text left unflushed on stdout before the report"))
        .subcommand(SubCommand::with_name("msg")
            .about("Report and continue")
            .arg(message()))
        .subcommand(SubCommand::with_name("exit")
            .about("Report and exit")
            .arg(message()))
        .subcommand(SubCommand::with_name("exit-now")
            .about("Report without flushing stdout and _exit")
            .arg(message()))
        .subcommand(SubCommand::with_name("exit-en")
            .about("Report an explicit error number and exit")
            .arg(Arg::with_name("code")
                .long("code")
                .takes_value(true)
                .required(true))
            .arg(message()))
        .subcommand(SubCommand::with_name("fatal")
            .about("Report without an error number and exit")
            .arg(message()))
        .subcommand(SubCommand::with_name("usage")
            .about("Report a usage error and exit")
            .arg(message()))
        .subcommand(SubCommand::with_name("cmdline")
            .about("Report a command-line usage error and exit")
            .arg(message()))
        .subcommand(SubCommand::with_name("open")
            .about("Open a file, exiting with its error on failure")
            .arg(Arg::with_name("path").required(true)))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let (name, Some(sub)) = matches.subcommand() else {
        bail!("Missing subcommand");
    };

    let errno = global(matches, sub, "errno").map(parse_code).transpose()?;

    if let Some(pending) = global(matches, sub, "pending") {
        print!("{pending}");
    }

    if name == "open" {
        let path = sub.value_of("path").context("Missing path")?;
        let _file = File::open(path).or_exit(format!("open {path}"));
        println!("opened {path}");
        return Ok(());
    }

    let message = sub
        .values_of("message")
        .context("Missing message")?
        .collect::<Vec<_>>()
        .join(" ");

    let code = match name {
        "exit-en" => Some(parse_code(sub.value_of("code").context("Missing code")?)?),
        _ => None,
    };

    // Nothing may touch errno between here and the report.
    if let Some(errno) = errno {
        errno.set_last();
    }

    match (name, code) {
        ("msg", _) => {
            errfn::err_msg!("{message}");
            let after = Errno::last();
            println!("errno after report: {}", after.0);
            std::io::stdout().flush().context("Flush stdout")?;
            Ok(())
        }
        ("exit", _) => errfn::err_exit!("{message}"),
        ("exit-now", _) => errfn::err_exit_now!("{message}"),
        ("exit-en", Some(code)) => errfn::err_exit_en(code, format_args!("{message}")),
        ("fatal", _) => errfn::fatal!("{message}"),
        ("usage", _) => errfn::usage_err!("{message}\n"),
        ("cmdline", _) => errfn::cmd_line_err!("{message}\n"),
        _ => bail!("Unknown subcommand: {}", name),
    }
}

fn global<'a>(matches: &'a ArgMatches, sub: &'a ArgMatches, name: &str) -> Option<&'a str> {
    sub.value_of(name).or_else(|| matches.value_of(name))
}

fn parse_code(value: &str) -> Result<Errno> {
    let code = value
        .parse()
        .with_context(|| format!("Invalid error number: {value:?}"))?;
    Ok(Errno(code))
}
