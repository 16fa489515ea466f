extern crate clap;
extern crate ctrlc;
extern crate dirs;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
extern crate ini;
extern crate ipnet;
#[macro_use]
extern crate log;
extern crate openssl_probe;
extern crate rusoto_core;
extern crate rusoto_ec2;
#[cfg(test)]
extern crate tempfile;

mod bring;
mod cancel;
mod cli;
mod config;
mod errors;
mod stat;
mod vpn;

use bring::Poll;
use cancel::CancelToken;
use cli::Command;
use config::Environment;
use errors::*;
use std::env;
use std::io;
use vpn::aws::AwsEndpoint;

quick_main!(run);

fn run() -> Result<()> {
    // sets SSL_CERT_FILE/SSL_CERT_DIR; must run before any other thread exists
    unsafe {
        openssl_probe::init_openssl_env_vars();
    }

    let invocation = match cli::parse_from_safe(env::args_os()) {
        Ok(invocation) => invocation,
        // --help, --version and usage errors
        Err(Error(ErrorKind::Clap(e), _)) => e.exit(),
        Err(e) => return Err(e),
    };
    init_logging(invocation.verbosity);

    let env = Environment::new(invocation.config_path)?;
    let cancel = CancelToken::new();
    if let Command::Bring { .. } = invocation.command {
        let handle = cancel.clone();
        ctrlc::set_handler(move || {
            info!("Received Ctrl-C, cancelling");
            handle.cancel();
        }).chain_err(|| "failed to set Ctrl-C handler")?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::dispatch(
        invocation.command,
        &env,
        Poll::new(cancel),
        AwsEndpoint::connect,
        &mut out,
    )
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
