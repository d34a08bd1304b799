//! Text rendering of the page.

use std::fmt::Write;
use waymark_markers::Camera;
use waymark_markers::view::{ButtonView, MapView};

fn button(view: &ButtonView) -> String {
    if view.active {
        format!("[{}*]", view.caption)
    } else {
        format!("[{}]", view.caption)
    }
}

/// Draw `view` with the map looking at `camera`.
#[must_use]
pub fn render(view: &MapView, camera: &Camera) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Map  {} @ zoom {}", camera.center, camera.zoom);
    let _ = writeln!(
        out,
        "{} {} {}",
        button(&view.toolbar.add_mode),
        button(&view.toolbar.clear_all),
        button(&view.toolbar.list_toggle)
    );

    if view.pins.is_empty() {
        let _ = writeln!(out, "  (no markers)");
    }
    for pin in &view.pins {
        let _ = writeln!(out, "  ({:>2}) {}  [{}]", pin.label, pin.title, pin.key);
    }

    if let Some(list) = &view.list {
        let _ = writeln!(out, "{}", list.header);
        for entry in &list.entries {
            let _ = writeln!(out, "  {}", entry.label);
        }
    }

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {}", notice.message);
    }

    out
}
