use cancel::CancelToken;
use config::Target;
use errors::*;
use ipnet::IpNet;
use ipnet::Ipv4Net;
use std::io::Write;
use std::net::Ipv4Addr;
use std::time::Duration;
use vpn::Association;
use vpn::AssociationStatus;
use vpn::Endpoint;

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How the up/down loops wait between status queries.
#[derive(Debug, Clone)]
pub struct Poll {
    pub interval: Duration,
    pub cancel: CancelToken,
}

impl Poll {
    pub fn new(cancel: CancelToken) -> Poll {
        Poll {
            interval: POLL_INTERVAL,
            cancel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was requested; the association was found in this state, or
    /// was absent.
    Unchanged(Option<AssociationStatus>),
    /// A change was requested and polling observed this terminal state.
    Settled(Option<AssociationStatus>),
}

enum Step<T> {
    Wait,
    Done(T),
}

pub fn internet_route() -> IpNet {
    IpNet::V4(Ipv4Net::new(Ipv4Addr::new(0, 0, 0, 0), 0).expect("0 is OK"))
}

pub fn up<E, W>(endpoint: &E, target: &Target, poll: &Poll, out: &mut W) -> Result<Outcome>
where
    E: Endpoint,
    W: Write,
{
    let subnet_id = &target.subnet_id;
    let existing = endpoint.find_association(subnet_id)?;
    info!("Current association: {:?}", existing);

    if let Some(existing) = existing {
        match existing.status {
            // a leftover record; the subnet is free to associate again
            AssociationStatus::Disassociated => (),
            AssociationStatus::Associated => {
                writeln!(
                    out,
                    "{} is already associated with {}",
                    subnet_id,
                    endpoint.id()
                )?;
                return Ok(Outcome::Unchanged(Some(existing.status)));
            }
            AssociationStatus::Associating => {
                writeln!(
                    out,
                    "Association of {} with {} is already in progress",
                    subnet_id,
                    endpoint.id()
                )?;
                return Ok(Outcome::Unchanged(Some(existing.status)));
            }
            AssociationStatus::AssociationFailed => {
                writeln!(
                    out,
                    "Association of {} with {} failed: {}",
                    subnet_id,
                    endpoint.id(),
                    existing.describe()
                )?;
                return Ok(Outcome::Unchanged(Some(existing.status)));
            }
            AssociationStatus::Disassociating => {
                writeln!(
                    out,
                    "Disassociation of {} from {} is in progress",
                    subnet_id,
                    endpoint.id()
                )?;
                return Ok(Outcome::Unchanged(Some(existing.status)));
            }
            AssociationStatus::Unknown(ref code) => {
                bail!(ErrorKind::UnexpectedStatus(code.clone()))
            }
        }
    }

    let association_id = endpoint.associate(subnet_id)?;
    info!("Requested association: {}", association_id);
    writeln!(
        out,
        "Associating {} with {} ({})",
        subnet_id,
        endpoint.id(),
        association_id
    )?;

    if target.internet_access {
        let destination = internet_route();
        if let Err(e) = endpoint.create_route(subnet_id, &destination) {
            warn!(
                "Association {} was requested but has no route to {}",
                association_id, destination
            );
            return Err(e);
        }
        writeln!(out, "Added route {} via {}", destination, subnet_id)?;
    }

    let settled = wait(endpoint, subnet_id, poll, out, |current| match current {
        Some(a) if a.id == association_id => match a.status {
            AssociationStatus::Associating => Ok(Step::Wait),
            AssociationStatus::Associated
            | AssociationStatus::AssociationFailed
            | AssociationStatus::Disassociating
            | AssociationStatus::Disassociated => Ok(Step::Done(a)),
            AssociationStatus::Unknown(ref code) => {
                bail!(ErrorKind::UnexpectedStatus(code.clone()))
            }
        },
        // not visible yet, or an older record for the same subnet
        _ => Ok(Step::Wait),
    })?;

    if settled.status == AssociationStatus::Associated {
        writeln!(
            out,
            "{} is now associated with {}",
            subnet_id,
            endpoint.id()
        )?;
    } else {
        writeln!(
            out,
            "Association of {} with {} failed: {}",
            subnet_id,
            endpoint.id(),
            settled.describe()
        )?;
    }
    Ok(Outcome::Settled(Some(settled.status)))
}

pub fn down<E, W>(endpoint: &E, target: &Target, poll: &Poll, out: &mut W) -> Result<Outcome>
where
    E: Endpoint,
    W: Write,
{
    let subnet_id = &target.subnet_id;
    let existing = endpoint.find_association(subnet_id)?;
    info!("Current association: {:?}", existing);

    let existing = match existing {
        Some(existing) => existing,
        None => {
            writeln!(
                out,
                "{} is not associated with {}; nothing to do",
                subnet_id,
                endpoint.id()
            )?;
            return Ok(Outcome::Unchanged(None));
        }
    };

    match existing.status {
        AssociationStatus::AssociationFailed | AssociationStatus::Disassociated => {
            writeln!(
                out,
                "Association of {} with {} is {}; nothing to do",
                subnet_id,
                endpoint.id(),
                existing.status
            )?;
            return Ok(Outcome::Unchanged(Some(existing.status)));
        }
        // already on its way; wait for it instead of asking twice
        AssociationStatus::Disassociating => writeln!(
            out,
            "Disassociation of {} from {} is already in progress",
            subnet_id,
            endpoint.id()
        )?,
        AssociationStatus::Associating | AssociationStatus::Associated => {
            endpoint.disassociate(&existing.id)?;
            info!("Requested disassociation: {}", existing.id);
            writeln!(
                out,
                "Disassociating {} from {} ({})",
                subnet_id,
                endpoint.id(),
                existing.id
            )?;
        }
        AssociationStatus::Unknown(ref code) => {
            bail!(ErrorKind::UnexpectedStatus(code.clone()))
        }
    }

    let settled = wait(endpoint, subnet_id, poll, out, |current| match current {
        None => Ok(Step::Done(None)),
        Some(a) => match a.status {
            AssociationStatus::Disassociated | AssociationStatus::AssociationFailed => {
                Ok(Step::Done(Some(a)))
            }
            AssociationStatus::Associating
            | AssociationStatus::Associated
            | AssociationStatus::Disassociating => Ok(Step::Wait),
            AssociationStatus::Unknown(ref code) => {
                bail!(ErrorKind::UnexpectedStatus(code.clone()))
            }
        },
    })?;

    match settled {
        Some(ref a) if a.status != AssociationStatus::Disassociated => writeln!(
            out,
            "Disassociation of {} from {} ended in {}",
            subnet_id,
            endpoint.id(),
            a.describe()
        )?,
        _ => writeln!(
            out,
            "{} is now disassociated from {}",
            subnet_id,
            endpoint.id()
        )?,
    }
    Ok(Outcome::Settled(settled.map(|a| a.status)))
}

/// Re-queries the association every interval until `step` is done with it,
/// printing a dot for every query that is not.
///
/// There is no bound on the number of queries; only the cancel token stops a
/// remote state that never settles.
fn wait<E, W, F, T>(endpoint: &E, subnet_id: &str, poll: &Poll, out: &mut W, step: F) -> Result<T>
where
    E: Endpoint,
    W: Write,
    F: FnMut(Option<Association>) -> Result<Step<T>>,
{
    let mut dots = 0;
    let settled = wait_dots(endpoint, subnet_id, poll, out, step, &mut dots);
    if dots > 0 {
        writeln!(out)?;
    }
    settled
}

fn wait_dots<E, W, F, T>(
    endpoint: &E,
    subnet_id: &str,
    poll: &Poll,
    out: &mut W,
    mut step: F,
    dots: &mut usize,
) -> Result<T>
where
    E: Endpoint,
    W: Write,
    F: FnMut(Option<Association>) -> Result<Step<T>>,
{
    loop {
        poll.cancel.sleep(poll.interval)?;
        let current = endpoint.find_association(subnet_id)?;
        debug!("Polled association: {:?}", current);
        match step(current)? {
            Step::Wait => {
                write!(out, ".")?;
                out.flush()?;
                *dots += 1;
            }
            Step::Done(settled) => return Ok(settled),
        }
    }
}
