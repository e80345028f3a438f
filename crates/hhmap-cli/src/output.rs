//! Plain-text rendering of the view models

use crate::headless::HeadlessMap;
use hhmap_core::{
    CategoryOption, Notification, NotificationLevel, PlaceDetailsView, PlaceListView,
};
use std::fmt::Write;

/// One dropdown option per line, value and label tab separated
#[must_use]
pub fn categories(options: &[CategoryOption]) -> String {
    let mut out = String::new();
    for option in options {
        let _ = writeln!(out, "{}\t{}", option.value, option.label);
    }
    out
}

/// The sidebar list, selected entry starred
#[must_use]
pub fn place_list(view: &PlaceListView) -> String {
    if view.is_empty() {
        return "(no places)\n".to_string();
    }
    let mut out = String::new();
    for item in &view.items {
        let mark = if item.selected { '*' } else { ' ' };
        let _ = writeln!(out, "{mark} {}", item.title);
        if let Some(snippet) = &item.snippet {
            let _ = writeln!(out, "    {snippet}");
        }
        for link in &item.links {
            let _ = writeln!(out, "    [{:?}] {}", link.kind, link.url);
        }
    }
    out
}

#[must_use]
pub fn details(view: &PlaceDetailsView) -> String {
    let mut out = format!("{}\n", view.title);
    for (label, value) in [
        ("address", view.address.as_deref()),
        ("about", view.description.as_deref()),
        ("image", view.image_url.as_deref()),
        ("instagram", view.instagram.as_ref().map(|l| l.url.as_str())),
        ("reserve", view.reservation.as_ref().map(|l| l.url.as_str())),
    ] {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }
    out
}

/// Viewport, visible markers and the open popup
#[must_use]
pub fn map_summary(map: &HeadlessMap) -> String {
    let mut out = String::new();
    if let Some((center, zoom)) = map.view() {
        let _ = writeln!(out, "view: {:.4},{:.4} @ z{zoom}", center.lat, center.lng);
    }
    let visible: Vec<_> = map.visible_markers().collect();
    let _ = writeln!(out, "markers: {}", visible.len());
    for marker in visible {
        let _ = writeln!(
            out,
            "  {} {} ({:?})",
            marker.handle, marker.title, marker.variant
        );
    }
    if let Some((anchor, content)) = map.popup() {
        let _ = writeln!(out, "popup on {anchor}: {}", content.title);
    }
    out
}

#[must_use]
pub fn notification(n: &Notification) -> String {
    let tag = match n.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}", n.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hhmap_core::{AppConfig, MapApp};
    use hhmap_test_utils::tel_aviv_places;
    use pretty_assertions::assert_eq;

    fn loaded() -> MapApp<HeadlessMap> {
        let mut app = MapApp::new(AppConfig::default(), HeadlessMap::new());
        app.apply_places(Ok(tel_aviv_places())).unwrap();
        app
    }

    #[test]
    fn list_marks_selection_and_links() {
        let mut app = loaded();
        app.on_filter_change("Until 19:00");
        app.on_list_item_click("Bellboy").unwrap();

        assert_eq!(
            place_list(&app.list_view()),
            "* Bellboy\n    1+1 on cocktails\n    [Reservation] https://tabitisrael.co.il/bellboy\n    [Instagram] https://instagram.com/bellboybar\n"
        );
    }

    #[test]
    fn categories_are_tab_separated() {
        let app = loaded();
        let text = categories(app.categories());
        assert!(text.starts_with("all\tכל השעות\n"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn details_skip_missing_fields() {
        let app = loaded();
        let view = app.details_view("Port Said").unwrap();
        assert_eq!(details(&view), "Port Said\n  address: Har Sinai 5, Tel Aviv\n");
    }

    #[test]
    fn map_summary_reports_popup() {
        let mut app = loaded();
        app.on_list_item_click("Port Said").unwrap();
        let text = map_summary(app.map());
        assert!(text.contains("markers: 7"));
        assert!(text.contains("popup on marker#2: Port Said"));
    }

    #[test]
    fn empty_list_says_so() {
        assert_eq!(place_list(&PlaceListView::default()), "(no places)\n");
    }
}
