use airsurvey::cancel::CancelToken;
use airsurvey::command::SystemRunner;
use airsurvey::config::{Arguments, Config};
use airsurvey::session::Session;

use anyhow::Result;
use clap::Parser;
use libc::{EXIT_FAILURE, EXIT_SUCCESS};
use nix::unistd::Uid;
use std::io::{self, stdout};
use std::process::exit;

fn run(config: Config) -> Result<i32> {
    let cancel = CancelToken::install()?;
    let runner = SystemRunner;
    let mut session = Session::new(config, &runner, cancel);

    session.backup_csvs()?;

    let interfaces = session.interfaces();
    if interfaces.is_empty() {
        session.log.error(
            "No wireless interfaces detected. Make sure adapter is connected and drivers are loaded.",
        );
        return Ok(EXIT_FAILURE);
    }

    let stdin = io::stdin();
    session.run(&interfaces, &mut stdin.lock(), &mut stdout())?;
    Ok(EXIT_SUCCESS)
}

fn main() {
    let config = Config::from(Arguments::parse());

    if !Uid::effective().is_root() {
        eprintln!("This program requires root. Run with sudo or as root.");
        exit(EXIT_FAILURE);
    }

    match run(config) {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{:#}", e);
            exit(EXIT_FAILURE);
        }
    }
}
