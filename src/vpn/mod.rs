pub mod aws;
#[cfg(test)]
pub mod mem;

use errors::*;
use ipnet::IpNet;
use std::fmt;
use std::str;

/// A Client VPN endpoint, as seen through the remote API.
///
/// Every method is a single request/response (or a paginated listing). Errors
/// are surfaced as `ErrorKind::Remote` and are never retried here.
pub trait Endpoint: fmt::Debug {
    fn id(&self) -> &str;
    fn find_association(&self, subnet_id: &str) -> Result<Option<Association>>;
    // returns the new association id
    fn associate(&self, subnet_id: &str) -> Result<String>;
    fn create_route(&self, subnet_id: &str, destination: &IpNet) -> Result<()>;
    fn disassociate(&self, association_id: &str) -> Result<()>;
    fn list_connections(&self) -> Result<Vec<Connection>>;
}

/// A target network record linking the endpoint to a subnet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub id: String,
    pub subnet_id: String,
    pub status: AssociationStatus,
    pub message: Option<String>,
}

impl Association {
    /// The status code followed by the remote message, if there is one.
    pub fn describe(&self) -> String {
        match self.message {
            Some(ref message) => format!("{}: {}", self.status, message),
            None => self.status.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationStatus {
    Associating,
    Associated,
    AssociationFailed,
    Disassociating,
    Disassociated,
    Unknown(String),
}

impl AssociationStatus {
    pub fn code(&self) -> &str {
        match *self {
            AssociationStatus::Associating => "associating",
            AssociationStatus::Associated => "associated",
            AssociationStatus::AssociationFailed => "association-failed",
            AssociationStatus::Disassociating => "disassociating",
            AssociationStatus::Disassociated => "disassociated",
            AssociationStatus::Unknown(ref code) => code,
        }
    }
}

impl<'a> From<&'a str> for AssociationStatus {
    fn from(code: &'a str) -> AssociationStatus {
        match code {
            "associating" => AssociationStatus::Associating,
            "associated" => AssociationStatus::Associated,
            "association-failed" => AssociationStatus::AssociationFailed,
            "disassociating" => AssociationStatus::Disassociating,
            "disassociated" => AssociationStatus::Disassociated,
            x => AssociationStatus::Unknown(x.to_owned()),
        }
    }
}

impl fmt::Display for AssociationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One row of `describe-client-vpn-connections`. Every field is optional on
/// the wire; the reporter decides how to render the missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub timestamp: Option<String>,
    pub connection_id: Option<String>,
    pub client_ip: Option<String>,
    pub username: Option<String>,
    pub established_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<ConnectionStatus>,
    pub ingress_bytes: Option<String>,
    pub egress_bytes: Option<String>,
    pub ingress_packets: Option<String>,
    pub egress_packets: Option<String>,
    pub common_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub code: String,
    pub message: Option<String>,
}
