//! Inline script generation for the rendered dashboard page.
//!
//! The Leaflet map and D3 chart functions live in `assets/js/*.js` and are
//! embedded into the page as plain globals (no ES modules). This module builds
//! the `<script>` bodies that define them and the guarded calls that draw each
//! artifact. Data is handed over as a JSON string literal and parsed on the
//! page side.

use serde::Serialize;

// Embed all map and chart JS files at compile time
static TOOLTIP_JS: &str = include_str!("../assets/js/tooltip.js");
static FACILITY_MAP_JS: &str = include_str!("../assets/js/facility-map.js");
static BAR_CHART_JS: &str = include_str!("../assets/js/bar-chart.js");
static PIE_CHART_JS: &str = include_str!("../assets/js/pie-chart.js");
static TREEMAP_JS: &str = include_str!("../assets/js/treemap.js");

pub const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
pub const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
pub const D3_JS: &str = "https://cdn.jsdelivr.net/npm/d3@7";

/// All map and chart function definitions, to be evaluated once per page.
pub fn chart_scripts() -> String {
    [
        TOOLTIP_JS,
        FACILITY_MAP_JS,
        BAR_CHART_JS,
        PIE_CHART_JS,
        TREEMAP_JS,
    ]
    .join("\n")
}

/// Serialize `value` into a JS string literal holding its JSON text.
///
/// `<`, `>` and `&` are written as unicode escapes so the literal can never
/// close the surrounding `<script>` element.
pub fn json_literal<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(value)?;
    let literal = serde_json::to_string(&json)?;
    Ok(literal
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// A call to one of the embedded render functions, wrapped in try/catch so a
/// failing chart does not stop the rest of the page from drawing.
pub fn render_call(function: &str, container_id: &str, args: &[String]) -> String {
    let mut call_args = vec![format!("'{container_id}'")];
    call_args.extend(args.iter().cloned());
    format!(
        "try {{ {function}({}); }} catch(e) {{ console.error('[KHF] {function} error:', e); }}",
        call_args.join(", ")
    )
}
