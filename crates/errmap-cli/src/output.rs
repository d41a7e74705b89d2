use errmap_core::EntrySummary;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print catalog entries as an aligned `STATUS  CODE  MATCHES  MESSAGE` table.
pub fn print_entries(entries: &[EntrySummary]) {
    let rows: Vec<[String; 4]> = entries
        .iter()
        .map(|e| {
            [
                e.status.to_string(),
                e.code.clone(),
                e.matches.clone(),
                e.message.clone(),
            ]
        })
        .collect();
    let headers = ["STATUS", "CODE", "MATCHES", "MESSAGE"];

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let line = |cells: [&str; 4]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:w$}"))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };

    line(headers);
    line(widths.map(|w| "-".repeat(w)).each_ref().map(String::as_str));
    for row in &rows {
        line(row.each_ref().map(String::as_str));
    }
}
