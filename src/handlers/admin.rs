//! Read-only admin page listing every key.
//!
//! - GET /admin - HTML table of key records

use std::fmt::Write;

use crate::{
    error::AppError,
    models::key_record::{KeyRecord, KeyStatus},
    store::SharedStore,
};
use axum::{extract::State, response::Html};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>License Admin Panel</title>
    <meta charset="utf-8">
    <style>
        body { font-family: Arial; margin: 20px; background: #1a1a1a; color: #fff; }
        h1 { color: #4CAF50; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { padding: 12px; text-align: left; border-bottom: 1px solid #333; }
        th { background: #2d2d2d; color: #4CAF50; }
        tr:hover { background: #2d2d2d; }
        .active { color: #4CAF50; }
        .expired { color: #f44336; }
        .unactivated { color: #ff9800; }
    </style>
</head>
<body>
    <h1>License Admin Panel</h1>
"#;

const TABLE_HEAD: &str = r#"    <table>
        <tr>
            <th>Key</th>
            <th>Owner</th>
            <th>Status</th>
            <th>HWID</th>
            <th>Total Hours</th>
            <th>Expire At</th>
        </tr>
"#;

const PAGE_TAIL: &str = "    </table>\n</body>\n</html>\n";

/// Number of fingerprint characters shown per key.
const HWID_PREVIEW_LEN: usize = 8;

/// Admin page handler.
///
/// Reads through the key store like any other caller, so it never observes
/// a half-applied verification. Never writes.
pub async fn admin_page(State(store): State<SharedStore>) -> Result<Html<String>, AppError> {
    let records = tokio::task::spawn_blocking(move || store.load_all()).await?;

    Ok(Html(render(&records)))
}

/// Render the admin table for `records`.
pub fn render(records: &[KeyRecord]) -> String {
    let mut html = String::from(PAGE_HEAD);
    let _ = writeln!(
        html,
        "    <p>Total Keys: <strong>{}</strong></p>",
        records.len()
    );
    html.push_str(TABLE_HEAD);

    for record in records {
        let status = record
            .status
            .as_ref()
            .map(KeyStatus::as_str)
            .unwrap_or_default();
        // Any stored value is previewed, including the unbound placeholder
        let hwid = match record.hwid.as_deref() {
            Some(hwid) if !hwid.is_empty() => {
                hwid.chars().take(HWID_PREVIEW_LEN).collect::<String>()
            }
            _ => "Not activated".to_string(),
        };
        let total = record
            .total
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let _ = write!(
            html,
            concat!(
                "        <tr>\n",
                "            <td><code>{key}</code></td>\n",
                "            <td>{owner}</td>\n",
                "            <td class=\"{status}\">{status}</td>\n",
                "            <td>{hwid}</td>\n",
                "            <td>{total}h</td>\n",
                "            <td>{expire_at}</td>\n",
                "        </tr>\n",
            ),
            key = escape(&record.key),
            owner = escape(record.owner.as_deref().unwrap_or_default()),
            status = escape(status),
            hwid = escape(&hwid),
            total = total,
            expire_at = escape(record.expire_at.as_deref().unwrap_or("N/A")),
        );
    }

    html.push_str(PAGE_TAIL);
    html
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
