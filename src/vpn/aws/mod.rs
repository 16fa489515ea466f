use config::Target;
use errors::*;
use ipnet::IpNet;
use rusoto_core::credential::DefaultCredentialsProvider;
use rusoto_core::credential::ProfileProvider;
use rusoto_core::HttpClient;
use rusoto_core::Region;
use rusoto_ec2::Ec2Client;
use std::fmt;
use std::str::FromStr;
use vpn::Association;
use vpn::Connection;
use vpn::Endpoint;

mod association;
mod connection;

pub struct AwsEndpoint {
    id: String,
    client: Ec2Client,
}

impl AwsEndpoint {
    /// Creates the single client used for the whole invocation.
    pub fn connect(target: &Target) -> Result<AwsEndpoint> {
        let region = AwsEndpoint::region(target)?;
        debug!("Using region {:?} and profile {:?}", region, target.profile);
        let dispatcher = HttpClient::new().chain_err(|| "could not create TLS client")?;
        let client = match target.profile {
            Some(ref profile) => {
                let mut provider = ProfileProvider::new()
                    .chain_err(|| "could not create profile credentials provider")?;
                provider.set_profile(profile.as_str());
                Ec2Client::new_with(dispatcher, provider, region)
            }
            None => {
                let provider = DefaultCredentialsProvider::new()
                    .chain_err(|| "could not create credentials provider")?;
                Ec2Client::new_with(dispatcher, provider, region)
            }
        };
        Ok(AwsEndpoint {
            id: target.endpoint_id.clone(),
            client,
        })
    }

    fn region(target: &Target) -> Result<Region> {
        match target.region {
            Some(ref name) => Region::from_str(name).chain_err(|| {
                ErrorKind::Config(format!("invalid region in [{}]: {}", target.section, name))
            }),
            // AWS_DEFAULT_REGION, then AWS_REGION, then us-east-1
            None => Ok(Region::default()),
        }
    }
}

impl fmt::Debug for AwsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Endpoint for AwsEndpoint {
    fn id(&self) -> &str {
        &self.id
    }

    fn find_association(&self, subnet_id: &str) -> Result<Option<Association>> {
        association::find(&self.client, &self.id, subnet_id)
    }

    fn associate(&self, subnet_id: &str) -> Result<String> {
        association::associate(&self.client, &self.id, subnet_id)
    }

    fn create_route(&self, subnet_id: &str, destination: &IpNet) -> Result<()> {
        association::create_route(&self.client, &self.id, subnet_id, destination)
    }

    fn disassociate(&self, association_id: &str) -> Result<()> {
        association::disassociate(&self.client, &self.id, association_id)
    }

    fn list_connections(&self) -> Result<Vec<Connection>> {
        connection::list(&self.client, &self.id)
    }
}
