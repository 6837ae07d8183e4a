//! Spreadsheet share-link handling and the built-in sample table.

use std::sync::OnceLock;

use regex::Regex;

use crate::table::Table;

/// CSV export URL derived directly from a share link.
///
/// Share links ending in `edit?usp=sharing` or containing `edit` have that
/// part swapped for the export query; anything else gets the export path
/// appended.
pub fn export_url(share_url: &str) -> String {
    if share_url.contains("edit?usp=sharing") {
        share_url.replace("edit?usp=sharing", "export?format=csv")
    } else if share_url.contains("edit") {
        share_url.replace("edit", "export?format=csv")
    } else {
        format!("{}/export?format=csv", share_url.trim_end_matches('/'))
    }
}

/// Host serving spreadsheet exports.
pub const EXPORT_BASE: &str = "https://docs.google.com";

/// CSV export URL rebuilt from the sheet id in the share link.
pub fn export_url_from_id(share_url: &str) -> Option<String> {
    export_url_from_id_with_base(share_url, EXPORT_BASE)
}

/// [`export_url_from_id`] against another export host.
pub fn export_url_from_id_with_base(share_url: &str, base: &str) -> Option<String> {
    let base = base.trim_end_matches('/');
    sheet_id(share_url).map(|id| format!("{base}/spreadsheets/d/{id}/export?format=csv"))
}

/// The document id segment following `/d/`.
pub fn sheet_id(share_url: &str) -> Option<&str> {
    static ID: OnceLock<Option<Regex>> = OnceLock::new();
    let re = ID
        .get_or_init(|| Regex::new(r"/d/([a-zA-Z0-9_-]+)").ok())
        .as_ref()?;
    re.captures(share_url)?.get(1).map(|m| m.as_str())
}

/// Small stand-in table used when no spreadsheet could be read.
pub fn sample_table() -> Table {
    let mut table = Table::new([
        "Company",
        "Document type",
        "Value",
        "Date Created",
        "Signed On",
        "Signed by",
    ]);
    let rows = [
        [
            "BHA Strategy",
            "https://betterproposals.io/2/proposals/view?id=2366358",
            "$33,200.00",
            "18 Mar 2025",
            "08 May 2025",
            "Katy Sully",
        ],
        [
            "Integrity Design",
            "https://betterproposals.io/2/proposals/view?id=2392944",
            "$41,920.00",
            "04 Apr 2025",
            "30 Apr 2025",
            "Brandon Earls",
        ],
        [
            "Providence Diamond",
            "https://betterproposals.io/2/proposals/view?id=2423564",
            "$39,710.00",
            "29 Apr 2025",
            "30 Apr 2025",
            "Daniel Pritsker",
        ],
    ];
    for row in rows {
        table.rows.push(row.iter().map(|c| c.to_string()).collect());
    }
    table
}
