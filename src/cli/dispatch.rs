use bring;
use bring::Poll;
use cli::Action;
use cli::Command;
use config;
use config::Environment;
use config::Target;
use errors::*;
use stat;
use std::io::Write;
use vpn::Endpoint;

/// Runs one command against the endpoint produced by `connect`, which is
/// only called once the config section has been resolved.
pub fn dispatch<C, E, W>(
    cmd: Command,
    env: &Environment,
    poll: Poll,
    connect: C,
    out: &mut W,
) -> Result<()>
where
    C: FnOnce(&Target) -> Result<E>,
    E: Endpoint,
    W: Write,
{
    info!("Running command: {:?}", cmd);

    match cmd {
        Command::Bring {
            section,
            action,
            profile,
            timeout,
        } => {
            let target =
                config::load_target(env, &section, profile.as_ref().map(String::as_str))?;
            let endpoint = connect(&target)?;
            let poll = match timeout {
                Some(timeout) => Poll {
                    cancel: poll.cancel.with_timeout(timeout),
                    ..poll
                },
                None => poll,
            };
            let outcome = match action {
                Action::Up => bring::up(&endpoint, &target, &poll, out)?,
                Action::Down => bring::down(&endpoint, &target, &poll, out)?,
            };
            info!("Outcome: {:?}", outcome);
        }
        Command::Stat {
            section,
            profile,
            all,
        } => {
            let target =
                config::load_target(env, &section, profile.as_ref().map(String::as_str))?;
            let endpoint = connect(&target)?;
            stat::stat(&endpoint, &target, all, out)?;
        }
    }

    Ok(())
}
