//! Plain-text inventory summary for sharing.

use std::fmt::Write as _;

use crate::inventory::layout::{ContainerKind, Layout};
use crate::inventory::stats::per_freezer;
use crate::inventory::store::SlotStore;

/// First line of every report.
pub const REPORT_HEADER: &str = "Estoque dos freezers";

/// Render the summary: one line per freezer holding anything, then totals.
#[must_use]
pub fn format_report(layout: &Layout, store: &SlotStore) -> String {
    let mut out = String::from(REPORT_HEADER);
    out.push('\n');

    let mut potes_total = 0;
    let mut caixas_total = 0;
    for (config, stats) in per_freezer(layout, store) {
        potes_total += stats.pote_full;
        caixas_total += stats.caixa_full;
        if stats.full() == 0 {
            continue;
        }
        let _ = match config.kind {
            ContainerKind::Split { .. } => writeln!(
                out,
                "{}: {} Potes / {} Caixas",
                config.name, stats.pote_full, stats.caixa_full
            ),
            ContainerKind::Pote | ContainerKind::Caixa => writeln!(
                out,
                "{} ({}): {} cheios",
                config.name,
                config.kind,
                stats.full()
            ),
        };
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total de Potes cheios: {potes_total}");
    let _ = write!(out, "Total de Caixas cheias: {caixas_total}");
    out
}

/// Percent-encode `text` for use as a URL query value.
///
/// Every UTF-8 byte outside the RFC 3986 unreserved set is escaped as `%XX`.
#[must_use]
pub fn percent_encode(text: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(text.len() * 3);
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(byte >> 4)]));
            out.push(char::from(HEX[usize::from(byte & 0x0f)]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::layout::LayoutPreset;

    fn named() -> (Layout, SlotStore) {
        let layout = Layout::preset(LayoutPreset::Named);
        let store = SlotStore::empty_for(&layout);
        (layout, store)
    }

    #[test]
    fn empty_inventory_has_only_totals() {
        let (layout, store) = named();
        assert_eq!(
            format_report(&layout, &store),
            "Estoque dos freezers\n\nTotal de Potes cheios: 0\nTotal de Caixas cheias: 0"
        );
    }

    #[test]
    fn split_freezer_line_shows_both_zones() {
        let (layout, mut store) = named();
        store.toggle(12, 0).unwrap();
        store.toggle(12, 12).unwrap();
        let report = format_report(&layout, &store);
        assert!(report.contains("\nHK/Festa: 1 Potes / 1 Caixas\n"), "{report}");
        assert!(report.ends_with("Total de Potes cheios: 1\nTotal de Caixas cheias: 1"));
    }

    #[test]
    fn single_type_freezer_line_and_omission() {
        let (layout, mut store) = named();
        for slot in 0..3 {
            store.toggle(1, slot).unwrap();
        }
        store.toggle(0, 5).unwrap();
        let report = format_report(&layout, &store);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Estoque dos freezers",
                "Caixas (Caixa): 1 cheios",
                "Freezer 2 (Pote): 3 cheios",
                "",
                "Total de Potes cheios: 3",
                "Total de Caixas cheias: 1",
            ]
        );
        assert!(!report.contains("Freezer 3"));
        assert!(!report.contains("HK/Festa"));
    }

    #[test]
    fn split_line_kept_when_only_one_zone_full() {
        let (layout, mut store) = named();
        store.toggle(12, 20).unwrap();
        assert!(format_report(&layout, &store).contains("HK/Festa: 0 Potes / 1 Caixas"));
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(
            percent_encode("HK/Festa: 1 Potes / 1 Caixas"),
            "HK%2FFesta%3A%201%20Potes%20%2F%201%20Caixas"
        );
        assert_eq!(percent_encode("a\nb&c=d?"), "a%0Ab%26c%3Dd%3F");
        assert_eq!(percent_encode("safe-._~AZ09"), "safe-._~AZ09");
    }

    #[test]
    fn encodes_utf8_multibyte() {
        assert_eq!(percent_encode("ção"), "%C3%A7%C3%A3o");
    }
}
