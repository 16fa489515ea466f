use vpn::Connection;
use vpn::ConnectionStatus;

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Field {
    Timestamp,
    ConnectionId,
    ClientIp,
    Username,
    EstablishedTime,
    EndTime,
    Status,
    IngressBytes,
    EgressBytes,
    IngressPackets,
    EgressPackets,
    CommonName,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: Field,
    pub label: &'static str,
    pub width: usize,
    pub enabled_by_default: bool,
}

// display order
pub const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        field: Field::Timestamp,
        label: "Timestamp",
        width: 20,
        enabled_by_default: false,
    },
    ColumnSpec {
        field: Field::ConnectionId,
        label: "Connection Id",
        width: 34,
        enabled_by_default: false,
    },
    ColumnSpec {
        field: Field::ClientIp,
        label: "Client IP",
        width: 16,
        enabled_by_default: true,
    },
    ColumnSpec {
        field: Field::Username,
        label: "Username",
        width: 20,
        enabled_by_default: true,
    },
    ColumnSpec {
        field: Field::EstablishedTime,
        label: "Established",
        width: 20,
        enabled_by_default: true,
    },
    ColumnSpec {
        field: Field::EndTime,
        label: "End Time",
        width: 20,
        enabled_by_default: false,
    },
    ColumnSpec {
        field: Field::Status,
        label: "Status",
        width: 28,
        enabled_by_default: true,
    },
    ColumnSpec {
        field: Field::IngressBytes,
        label: "Ingress Bytes",
        width: 14,
        enabled_by_default: true,
    },
    ColumnSpec {
        field: Field::EgressBytes,
        label: "Egress Bytes",
        width: 14,
        enabled_by_default: true,
    },
    ColumnSpec {
        field: Field::IngressPackets,
        label: "Ingress Packets",
        width: 16,
        enabled_by_default: false,
    },
    ColumnSpec {
        field: Field::EgressPackets,
        label: "Egress Packets",
        width: 16,
        enabled_by_default: false,
    },
    ColumnSpec {
        field: Field::CommonName,
        label: "Common Name",
        width: 24,
        enabled_by_default: false,
    },
];

/// A connection field, tagged by how it is rendered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cell<'a> {
    Text(Option<&'a str>),
    Status(Option<&'a ConnectionStatus>),
}

impl Field {
    pub fn cell<'a>(self, c: &'a Connection) -> Cell<'a> {
        let text = |x: &'a Option<String>| Cell::Text(x.as_ref().map(String::as_str));
        match self {
            Field::Timestamp => text(&c.timestamp),
            Field::ConnectionId => text(&c.connection_id),
            Field::ClientIp => text(&c.client_ip),
            Field::Username => text(&c.username),
            Field::EstablishedTime => text(&c.established_time),
            Field::EndTime => text(&c.end_time),
            Field::Status => Cell::Status(c.status.as_ref()),
            Field::IngressBytes => text(&c.ingress_bytes),
            Field::EgressBytes => text(&c.egress_bytes),
            Field::IngressPackets => text(&c.ingress_packets),
            Field::EgressPackets => text(&c.egress_packets),
            Field::CommonName => text(&c.common_name),
        }
    }
}

impl<'a> Cell<'a> {
    /// Renders the cell left-justified to `width`. Missing values fall back
    /// to an empty string (or an empty status); long values are not cut.
    pub fn render(&self, width: usize) -> String {
        match *self {
            Cell::Text(value) => pad(value.unwrap_or(""), width),
            Cell::Status(status) => {
                let empty = ConnectionStatus::default();
                let status = status.unwrap_or(&empty);
                match status.message {
                    Some(ref message) if !message.is_empty() => {
                        pad(&format!("{}: {}", status.code, message), width)
                    }
                    _ => pad(&status.code, width),
                }
            }
        }
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

pub fn select(all: bool) -> Vec<&'static ColumnSpec> {
    COLUMNS
        .iter()
        .filter(|col| all || col.enabled_by_default)
        .collect()
}

pub fn header(columns: &[&ColumnSpec]) -> String {
    columns
        .iter()
        .map(|col| pad(col.label, col.width))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn row(columns: &[&ColumnSpec], connection: &Connection) -> String {
    columns
        .iter()
        .map(|col| col.field.cell(connection).render(col.width))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_field_has_one_column() {
        let fields: HashSet<Field> = COLUMNS.iter().map(|col| col.field).collect();
        assert_eq!(COLUMNS.len(), fields.len());
        assert_eq!(12, fields.len());
        for col in COLUMNS {
            assert!(col.label.len() <= col.width, "{} is too narrow", col.label);
        }
    }

    #[test]
    fn test_default_selection_is_a_subset_in_display_order() {
        let labels: Vec<&str> = select(false).iter().map(|col| col.label).collect();
        assert_eq!(
            vec![
                "Client IP",
                "Username",
                "Established",
                "Status",
                "Ingress Bytes",
                "Egress Bytes",
            ],
            labels
        );
        assert_eq!(COLUMNS.len(), select(true).len());
    }

    #[test]
    fn test_render_text() {
        assert_eq!("abc   ", Cell::Text(Some("abc")).render(6));
        assert_eq!("      ", Cell::Text(None).render(6));
        assert_eq!("abcdefgh", Cell::Text(Some("abcdefgh")).render(6));
    }

    #[test]
    fn test_render_status() {
        let active = ConnectionStatus {
            code: "active".to_owned(),
            message: None,
        };
        assert_eq!("active    ", Cell::Status(Some(&active)).render(10));

        let failed = ConnectionStatus {
            code: "failed-to-terminate".to_owned(),
            message: Some("timeout".to_owned()),
        };
        assert_eq!(
            "failed-to-terminate: timeout ",
            Cell::Status(Some(&failed)).render(29)
        );

        let blank = ConnectionStatus {
            code: "active".to_owned(),
            message: Some(String::new()),
        };
        assert_eq!("active", Cell::Status(Some(&blank)).render(4));

        assert_eq!("    ", Cell::Status(None).render(4));
    }

    #[test]
    fn test_row_with_missing_username() {
        let connection = Connection {
            connection_id: Some("cvpn-connection-0".to_owned()),
            client_ip: Some("10.0.0.2".to_owned()),
            ..Default::default()
        };
        let columns = select(true);
        let line = row(&columns, &connection);

        let username = COLUMNS
            .iter()
            .find(|col| col.field == Field::Username)
            .unwrap();
        let offset: usize = COLUMNS
            .iter()
            .take_while(|col| col.field != Field::Username)
            .map(|col| col.width + 1)
            .sum();
        assert_eq!(
            " ".repeat(username.width),
            &line[offset..offset + username.width]
        );
        assert!(line.starts_with(&format!(
            "{:<20} {:<34} {:<16} ",
            "", "cvpn-connection-0", "10.0.0.2"
        )));
    }
}
