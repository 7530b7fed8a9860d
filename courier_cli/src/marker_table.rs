use comfy_table::Table;
use courier_routing::markers::Marker;

pub fn print_markers(markers: &[Marker]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Role", "Lat", "Lon", "Label"]);

    for (i, marker) in markers.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            marker.role.to_string(),
            format!("{:.6}", marker.lat),
            format!("{:.6}", marker.lon),
            plain_label(&marker.html_label),
        ]);
    }

    println!("{table}");
}

/// Drops markup from a marker label, one line per `<br />`.
fn plain_label(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for line in html.split("<br />") {
        if !text.is_empty() && !line.trim().is_empty() {
            text.push('\n');
        }
        for c in line.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
    }

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
