//! Task and project color palette.

use serde::Serialize;

/// Color used when a task or project does not specify one.
pub const DEFAULT_COLOR: &str = "yellow";

/// Display properties of one palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorProperties {
    pub name: &'static str,
    pub background: &'static str,
    pub border: &'static str,
}

const PALETTE: [(&str, ColorProperties); 16] = [
    ("yellow", ColorProperties { name: "Yellow", background: "rgb(245, 247, 196)", border: "rgb(223, 227, 45)" }),
    ("blue", ColorProperties { name: "Blue", background: "rgb(219, 235, 255)", border: "rgb(168, 207, 255)" }),
    ("green", ColorProperties { name: "Green", background: "rgb(189, 244, 203)", border: "rgb(74, 227, 113)" }),
    ("purple", ColorProperties { name: "Purple", background: "rgb(223, 176, 255)", border: "rgb(205, 133, 254)" }),
    ("red", ColorProperties { name: "Red", background: "rgb(255, 187, 187)", border: "rgb(255, 151, 151)" }),
    ("orange", ColorProperties { name: "Orange", background: "rgb(255, 215, 179)", border: "rgb(255, 172, 98)" }),
    ("grey", ColorProperties { name: "Grey", background: "rgb(238, 238, 238)", border: "rgb(204, 204, 204)" }),
    ("brown", ColorProperties { name: "Brown", background: "#d7ccc8", border: "#4e342e" }),
    ("deep_orange", ColorProperties { name: "Deep Orange", background: "#ffab91", border: "#e64a19" }),
    ("dark_grey", ColorProperties { name: "Dark Grey", background: "#cfd8dc", border: "#455a64" }),
    ("pink", ColorProperties { name: "Pink", background: "#f48fb1", border: "#d81b60" }),
    ("teal", ColorProperties { name: "Teal", background: "#80cbc4", border: "#00695c" }),
    ("cyan", ColorProperties { name: "Cyan", background: "#b2ebf2", border: "#00bcd4" }),
    ("lime", ColorProperties { name: "Lime", background: "#e6ee9c", border: "#afb42b" }),
    ("light_green", ColorProperties { name: "Light Green", background: "#dcedc8", border: "#689f38" }),
    ("amber", ColorProperties { name: "Amber", background: "#ffe082", border: "#ffa000" }),
];

/// Lookup over the fixed palette.
#[derive(Debug, Clone, Default)]
pub struct ColorPalette;

impl ColorPalette {
    /// Returns `(id, name)` pairs in palette order.
    pub fn list(&self) -> Vec<(&'static str, &'static str)> {
        PALETTE.iter().map(|(id, props)| (*id, props.name)).collect()
    }

    /// Returns true if `id` is a palette color id.
    pub fn exists(&self, id: &str) -> bool {
        PALETTE.iter().any(|(key, _)| *key == id)
    }

    /// Returns the properties for `id`, falling back to the default color.
    pub fn properties(&self, id: &str) -> ColorProperties {
        PALETTE
            .iter()
            .find(|(key, _)| *key == id)
            .or_else(|| PALETTE.iter().find(|(key, _)| *key == DEFAULT_COLOR))
            .map(|(_, props)| *props)
            .unwrap_or(PALETTE[0].1)
    }

    /// Resolves a color id from either an id or a display name
    /// (case-insensitive), as typed in a search.
    pub fn find(&self, text: &str) -> Option<&'static str> {
        let needle = text.trim().to_lowercase().replace(' ', "_");
        PALETTE
            .iter()
            .find(|(id, props)| {
                *id == needle || props.name.to_lowercase().replace(' ', "_") == needle
            })
            .map(|(id, _)| *id)
    }
}
