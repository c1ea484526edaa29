//! Human-readable output for mapping lists and the gateway table.

use ps_03_gateway_client::GatewayMappingEntry;
use shared_types::PortMapping;

const TABLE_HEADERS: [&str; 7] = [
    "External Port",
    "Internal Port",
    "Protocol",
    "Internal IP",
    "Description",
    "Lease Duration",
    "Enabled",
];

const COLUMN_GAP: usize = 2;

/// One mapping per line, indented.
pub fn render_mappings(mappings: &[PortMapping]) -> String {
    if mappings.is_empty() {
        return "No port mappings.".to_string();
    }
    let mut out = format!("Port mappings ({}):", mappings.len());
    for mapping in mappings {
        out.push_str("\n  ");
        out.push_str(&mapping.to_string());
    }
    out
}

/// Aligned table of gateway entries with a dashed rule under the header.
pub fn render_gateway_table(entries: &[GatewayMappingEntry]) -> String {
    if entries.is_empty() {
        return "No active port mappings found.".to_string();
    }

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(entries.len() + 2);
    rows.push(TABLE_HEADERS.iter().map(|h| h.to_string()).collect());
    rows.push(TABLE_HEADERS.iter().map(|h| "-".repeat(h.len())).collect());
    for entry in entries {
        rows.push(vec![
            entry.external_port.to_string(),
            entry.internal_port.to_string(),
            entry.protocol.clone(),
            entry.internal_ip.clone(),
            entry.description.clone(),
            entry.lease_display(),
            entry.enabled.to_string(),
        ]);
    }

    let mut widths = [0usize; TABLE_HEADERS.len()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let last = TABLE_HEADERS.len() - 1;
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i < last {
                    let pad = widths[i] - cell.chars().count() + COLUMN_GAP;
                    line.push_str(&" ".repeat(pad));
                }
            }
            line
        })
        .collect();

    format!("Active port mappings:\n{}", lines.join("\n"))
}
