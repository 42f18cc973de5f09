//! HTML report of the tags matching an address.
//!
//! ```text
//! +==============+===============+
//! |   Adres IP   | Pasujące tagi |
//! +--------------+---------------+
//! | 192.0.2.9    | bak           |
//! |              +---------------+
//! |              | foo           |
//! +==============+===============+
//! ```

use std::net::Ipv4Addr;

/// Render an HTML table with `addr` spanning one row per tag.
///
/// An address without tags still gets a single row with an empty tag cell.
/// Tag text is HTML-escaped.
pub fn render<S: AsRef<str>>(addr: Ipv4Addr, tags: &[S]) -> String {
    let rowspan = tags.len().max(1);
    let first = tags.first().map(|t| escape(t.as_ref())).unwrap_or_default();

    let rest: String = tags
        .iter()
        .skip(1)
        .map(|tag| format!("<tr><td>{}</td></tr>", escape(tag.as_ref())))
        .collect();

    format!(
        r#"<table border="1">
    <tr>
        <th>Adres IP</th>
        <th>Pasujące tagi</th>
    </tr>
    <tr>
        <td rowspan="{rowspan}">{addr}</td>
        <td>{first}</td>
    </tr>
    {rest}
</table>
"#
    )
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
