use errors::*;
use ipnet::IpNet;
use rusoto_ec2::AssociateClientVpnTargetNetworkRequest;
use rusoto_ec2::CreateClientVpnRouteRequest;
use rusoto_ec2::DescribeClientVpnTargetNetworksRequest;
use rusoto_ec2::DisassociateClientVpnTargetNetworkRequest;
use rusoto_ec2::Ec2;
use rusoto_ec2::Ec2Client;
use rusoto_ec2::Filter;
use rusoto_ec2::TargetNetwork;
use vpn::Association;
use vpn::AssociationStatus;

pub(super) fn find(
    client: &Ec2Client,
    endpoint_id: &str,
    subnet_id: &str,
) -> Result<Option<Association>> {
    let mut associations = Vec::new();
    let mut next_token = None;
    loop {
        let req = DescribeClientVpnTargetNetworksRequest {
            client_vpn_endpoint_id: endpoint_id.to_owned(),
            filters: Some(vec![Filter {
                name: Some("target-network-id".to_owned()),
                values: Some(vec![subnet_id.to_owned()]),
            }]),
            next_token: next_token.take(),
            ..Default::default()
        };
        debug!("Describing target networks: {:?}", req);
        let resp = client
            .describe_client_vpn_target_networks(req)
            .sync()
            .chain_err(|| {
                ErrorKind::Remote(format!(
                    "describe target network {} of {}",
                    subnet_id, endpoint_id
                ))
            })?;
        for tn in resp.client_vpn_target_networks.unwrap_or_default() {
            associations.push(to_association(tn, subnet_id)?);
        }
        match resp.next_token {
            Some(ref token) if !token.is_empty() => next_token = Some(token.clone()),
            _ => break,
        }
    }
    debug!("Found associations: {:?}", associations);

    // disassociated records linger for a while next to a live one
    let live = associations
        .iter()
        .position(|a| a.status != AssociationStatus::Disassociated)
        .unwrap_or(0);
    if associations.is_empty() {
        Ok(None)
    } else {
        Ok(Some(associations.swap_remove(live)))
    }
}

fn to_association(tn: TargetNetwork, subnet_id: &str) -> Result<Association> {
    let id = tn.association_id.ok_or_else(|| {
        Error::from(format!(
            "expected target network to have an association id: {}",
            subnet_id
        ))
    })?;
    let (code, message) = match tn.status {
        Some(status) => (status.code.unwrap_or_default(), status.message),
        None => (String::new(), None),
    };
    Ok(Association {
        id,
        subnet_id: tn.target_network_id.unwrap_or_else(|| subnet_id.to_owned()),
        status: AssociationStatus::from(code.as_str()),
        message,
    })
}

pub(super) fn associate(client: &Ec2Client, endpoint_id: &str, subnet_id: &str) -> Result<String> {
    let req = AssociateClientVpnTargetNetworkRequest {
        client_vpn_endpoint_id: endpoint_id.to_owned(),
        subnet_id: subnet_id.to_owned(),
        ..Default::default()
    };
    debug!("Associating target network: {:?}", req);
    let resp = client
        .associate_client_vpn_target_network(req)
        .sync()
        .chain_err(|| {
            ErrorKind::Remote(format!("associate {} with {}", subnet_id, endpoint_id))
        })?;
    resp.association_id.ok_or_else(|| {
        format!(
            "expected association of {} with {} to return an id",
            subnet_id, endpoint_id
        ).into()
    })
}

pub(super) fn create_route(
    client: &Ec2Client,
    endpoint_id: &str,
    subnet_id: &str,
    destination: &IpNet,
) -> Result<()> {
    let req = CreateClientVpnRouteRequest {
        client_vpn_endpoint_id: endpoint_id.to_owned(),
        destination_cidr_block: destination.to_string(),
        target_vpc_subnet_id: subnet_id.to_owned(),
        ..Default::default()
    };
    debug!("Creating route: {:?}", req);
    client.create_client_vpn_route(req).sync().chain_err(|| {
        ErrorKind::Remote(format!(
            "create route {} via {} on {}",
            destination, subnet_id, endpoint_id
        ))
    })?;
    Ok(())
}

pub(super) fn disassociate(
    client: &Ec2Client,
    endpoint_id: &str,
    association_id: &str,
) -> Result<()> {
    let req = DisassociateClientVpnTargetNetworkRequest {
        client_vpn_endpoint_id: endpoint_id.to_owned(),
        association_id: association_id.to_owned(),
        ..Default::default()
    };
    debug!("Disassociating target network: {:?}", req);
    client
        .disassociate_client_vpn_target_network(req)
        .sync()
        .chain_err(|| {
            ErrorKind::Remote(format!(
                "disassociate {} from {}",
                association_id, endpoint_id
            ))
        })?;
    Ok(())
}
