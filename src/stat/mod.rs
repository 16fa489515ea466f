mod columns;

use config::Target;
use errors::*;
use std::io::Write;
use vpn::AssociationStatus;
use vpn::Endpoint;

/// Prints the live connections of the target's endpoint, or a one-line
/// summary when the subnet is not associated (connections are only listed
/// for an active association).
pub fn stat<E, W>(endpoint: &E, target: &Target, all: bool, out: &mut W) -> Result<()>
where
    E: Endpoint,
    W: Write,
{
    let association = endpoint.find_association(&target.subnet_id)?;
    info!("Current association: {:?}", association);
    match association {
        Some(ref a) if a.status == AssociationStatus::Associated => (),
        Some(ref a) => {
            writeln!(
                out,
                "{}: {} is {}",
                endpoint.id(),
                a.subnet_id,
                a.describe()
            )?;
            return Ok(());
        }
        None => {
            writeln!(
                out,
                "{}: {} is not associated",
                endpoint.id(),
                target.subnet_id
            )?;
            return Ok(());
        }
    }

    let connections = endpoint.list_connections()?;
    let columns = columns::select(all);
    writeln!(out, "{}", columns::header(&columns))?;
    // in the order the remote returns them
    for connection in &connections {
        writeln!(out, "{}", columns::row(&columns, connection))?;
    }
    Ok(())
}
