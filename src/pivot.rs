#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Pivot,
    End,
}

fn zone_marker(line: &str) -> Option<Marker> {
    let rest = line.trim().strip_prefix(":::")?.trim_start();
    if rest.starts_with("zone pivot=") {
        Some(Marker::Pivot)
    } else if rest.starts_with("zone-end") {
        Some(Marker::End)
    } else {
        None
    }
}

/// Collapses `::: zone pivot=...` regions so that only the first region in
/// the document survives. Marker lines are always removed.
///
/// `selected_language` does not influence which region is kept.
pub fn filter_zone_pivots(markdown: &str, selected_language: &str) -> String {
    tracing::debug!(
        selected_language,
        "zone pivot filter keeps the first pivot region"
    );

    let mut out = String::with_capacity(markdown.len());
    let mut zone_count = 0usize;
    let mut in_dropped_zone = false;

    for line in markdown.split_inclusive('\n') {
        match zone_marker(line) {
            Some(Marker::Pivot) => {
                zone_count += 1;
                in_dropped_zone = zone_count > 1;
            }
            Some(Marker::End) => {
                in_dropped_zone = false;
            }
            None if in_dropped_zone => {}
            None => out.push_str(line),
        }
    }

    out
}
