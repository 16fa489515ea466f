use errors::*;
use ipnet::IpNet;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use vpn::Association;
use vpn::AssociationStatus;
use vpn::Connection;
use vpn::Endpoint;

/// A scripted endpoint. Each `find_association` consumes the next scripted
/// lookup; the last one keeps being returned once the script runs out.
///
/// `Latest` records carry the id handed out by the most recent `associate`
/// call (`cvpn-assoc-0` before any), `Stale` records a fixed older one.
#[derive(Clone)]
pub struct MemEndpoint {
    id: String,
    state: Rc<RefCell<MemEndpointState>>,
}

struct MemEndpointState {
    lookups: VecDeque<Lookup>,
    connections: Vec<Connection>,
    fail_routes: bool,
    associations: u32,
    calls: Vec<Call>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Absent,
    Latest(AssociationStatus),
    Stale(AssociationStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindAssociation(String),
    Associate(String),
    CreateRoute(String, IpNet),
    Disassociate(String),
    ListConnections,
}

impl MemEndpoint {
    pub fn new(id: &str) -> MemEndpoint {
        MemEndpoint {
            id: id.to_owned(),
            state: Rc::new(RefCell::new(MemEndpointState {
                lookups: VecDeque::new(),
                connections: Vec::new(),
                fail_routes: false,
                associations: 0,
                calls: Vec::new(),
            })),
        }
    }

    pub fn script<I>(&self, lookups: I)
    where
        I: IntoIterator<Item = Option<AssociationStatus>>,
    {
        self.script_lookups(lookups.into_iter().map(|status| match status {
            Some(status) => Lookup::Latest(status),
            None => Lookup::Absent,
        }));
    }

    pub fn script_lookups<I>(&self, lookups: I)
    where
        I: IntoIterator<Item = Lookup>,
    {
        self.state.borrow_mut().lookups = lookups.into_iter().collect();
    }

    pub fn set_connections(&self, connections: Vec<Connection>) {
        self.state.borrow_mut().connections = connections;
    }

    pub fn fail_routes(&self) {
        self.state.borrow_mut().fail_routes = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count_calls<F>(&self, pred: F) -> usize
    where
        F: Fn(&Call) -> bool,
    {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }
}

impl fmt::Debug for MemEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Endpoint for MemEndpoint {
    fn id(&self) -> &str {
        &self.id
    }

    fn find_association(&self, subnet_id: &str) -> Result<Option<Association>> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::FindAssociation(subnet_id.to_owned()));
        let lookup = if state.lookups.len() > 1 {
            state.lookups.pop_front()
        } else {
            state.lookups.front().cloned()
        };
        let (id, status) = match lookup {
            None | Some(Lookup::Absent) => return Ok(None),
            Some(Lookup::Latest(status)) => (format!("cvpn-assoc-{}", state.associations), status),
            Some(Lookup::Stale(status)) => ("cvpn-assoc-stale".to_owned(), status),
        };
        Ok(Some(Association {
            id,
            subnet_id: subnet_id.to_owned(),
            status,
            message: None,
        }))
    }

    fn associate(&self, subnet_id: &str) -> Result<String> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Associate(subnet_id.to_owned()));
        state.associations += 1;
        Ok(format!("cvpn-assoc-{}", state.associations))
    }

    fn create_route(&self, subnet_id: &str, destination: &IpNet) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(Call::CreateRoute(subnet_id.to_owned(), *destination));
        if state.fail_routes {
            bail!(ErrorKind::Remote(format!(
                "create route {} via {} on {}",
                destination, subnet_id, self.id
            )));
        }
        Ok(())
    }

    fn disassociate(&self, association_id: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(Call::Disassociate(association_id.to_owned()));
        Ok(())
    }

    fn list_connections(&self) -> Result<Vec<Connection>> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ListConnections);
        Ok(state.connections.clone())
    }
}
