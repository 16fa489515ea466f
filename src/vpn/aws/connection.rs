use errors::*;
use rusoto_ec2::ClientVpnConnection;
use rusoto_ec2::DescribeClientVpnConnectionsRequest;
use rusoto_ec2::Ec2;
use rusoto_ec2::Ec2Client;
use vpn::Connection;
use vpn::ConnectionStatus;

pub(super) fn list(client: &Ec2Client, endpoint_id: &str) -> Result<Vec<Connection>> {
    let mut connections = Vec::new();
    let mut next_token = None;
    loop {
        let req = DescribeClientVpnConnectionsRequest {
            client_vpn_endpoint_id: endpoint_id.to_owned(),
            next_token: next_token.take(),
            ..Default::default()
        };
        debug!("Describing connections: {:?}", req);
        let resp = client
            .describe_client_vpn_connections(req)
            .sync()
            .chain_err(|| ErrorKind::Remote(format!("describe connections of {}", endpoint_id)))?;
        connections.extend(resp.connections.unwrap_or_default().into_iter().map(to_connection));
        match resp.next_token {
            Some(ref token) if !token.is_empty() => next_token = Some(token.clone()),
            _ => break,
        }
    }
    debug!("Found {} connections", connections.len());
    Ok(connections)
}

fn to_connection(c: ClientVpnConnection) -> Connection {
    Connection {
        timestamp: c.timestamp,
        connection_id: c.connection_id,
        client_ip: c.client_ip,
        username: c.username,
        established_time: c.connection_established_time,
        end_time: c.connection_end_time,
        status: c.status.map(|s| ConnectionStatus {
            code: s.code.unwrap_or_default(),
            message: s.message,
        }),
        ingress_bytes: c.ingress_bytes,
        egress_bytes: c.egress_bytes,
        ingress_packets: c.ingress_packets,
        egress_packets: c.egress_packets,
        common_name: c.common_name,
    }
}
