//! Flat CSV export, one row per experience

use crate::experience::Experience;

const HEADER: &str = "id,timestamp,learner,location,type,domains,description";

pub fn to_csv(records: &[Experience]) -> String {
    let mut out = String::with_capacity(64 * (records.len() + 1));
    out.push_str(HEADER);
    out.push('\n');
    for record in records {
        let row = [
            record.id.clone(),
            record.timestamp.to_rfc3339(),
            record.learner.id.clone(),
            record.location_name().to_string(),
            record.experience.kind.clone(),
            record.experience.domains.join(";"),
            record.experience.description.clone(),
        ];
        let line: Vec<String> = row.iter().map(|field| quote(field)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// RFC 4180 quoting
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
