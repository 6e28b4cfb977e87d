use crate::types::{Marker, Region};
use anyhow::{anyhow, Result};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::{Coord, LineString, MultiPolygon, Rect};
use std::f64::consts::PI;
use std::fmt::Write;

const REGION_FILL: &str = "#ffffff";
const REGION_BORDER: &str = "#a0aec0";
const HIGHLIGHT_FILL: &str = "#fed7aa";
const HIGHLIGHT_BORDER: &str = "#f97316";
const MARKER_FILL: &str = "#1e3a8a";

const PAGE_TEMPLATE: &str = include_str!("../templates/page.html");
// The configured boundaries path is reported alongside this on stderr.
const MAP_UNAVAILABLE_NOTICE: &str =
    r#"<p class="map-error">Could not load India state boundaries.</p>"#;

/// Web Mercator projection fitted so that a geographic extent exactly fills
/// the pixel viewport (uniform scale, centered on the slack axis).
pub struct Projection {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

// Normalized Web Mercator world coordinates in [0, 1]; y grows southward.
fn mercator(coord: Coord<f64>) -> (f64, f64) {
    let x = (coord.x + 180.0) / 360.0;
    let lat_rad = coord.y.to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (x, y)
}

impl Projection {
    pub fn fit(bounds: &Rect<f64>, width: u32, height: u32) -> Self {
        // North-west corner maps to the smallest projected x and y.
        let (x0, y1) = mercator(bounds.min());
        let (x1, y0) = mercator(bounds.max());

        let span_x = (x1 - x0).max(f64::EPSILON);
        let span_y = (y1 - y0).max(f64::EPSILON);

        let scale = (width as f64 / span_x).min(height as f64 / span_y);
        let offset_x = (width as f64 - span_x * scale) / 2.0 - x0 * scale;
        let offset_y = (height as f64 - span_y * scale) / 2.0 - y0 * scale;

        Projection {
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn project(&self, coord: Coord<f64>) -> (f64, f64) {
        let (mx, my) = mercator(coord);
        (mx * self.scale + self.offset_x, my * self.scale + self.offset_y)
    }
}

/// Combined extent of the rendered layer. The input here is already filtered,
/// so the viewport never accounts for excluded features.
pub fn layer_bounds(regions: &[Region]) -> Option<Rect<f64>> {
    let mut bounds: Option<Rect<f64>> = None;

    for region in regions {
        let rect = match region.geometry.bounding_rect() {
            Some(r) => r,
            None => continue,
        };
        bounds = Some(match bounds {
            Some(acc) => Rect::new(
                Coord {
                    x: acc.min().x.min(rect.min().x),
                    y: acc.min().y.min(rect.min().y),
                },
                Coord {
                    x: acc.max().x.max(rect.max().x),
                    y: acc.max().y.max(rect.max().y),
                },
            ),
            None => rect,
        });
    }

    bounds
}

/// Draw the boundary layer and then the marker pins as a standalone SVG.
///
/// The SVG itself is the static-map contract: there is nothing to pan or
/// zoom. Interactive regions get a `<title>` popup, a CSS hover highlight and
/// a pointer cursor; leaving the shape falls back to the class style, so the
/// reset is exact. Static regions keep the default cursor and carry no popup.
pub fn render_map_svg(
    regions: &[Region],
    markers: &[Marker],
    width: u32,
    height: u32,
) -> Result<String> {
    let bounds =
        layer_bounds(regions).ok_or_else(|| anyhow!("No renderable regions in boundary layer"))?;
    let projection = Projection::fit(&bounds, width, height);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
        width, height, width, height
    );
    let _ = writeln!(
        svg,
        "<style>\n\
         .region {{ fill:{REGION_FILL}; fill-opacity:1; stroke:{REGION_BORDER}; stroke-width:1; stroke-opacity:1; cursor:default; }}\n\
         .region.interactive {{ cursor:pointer; }}\n\
         .region.interactive:hover {{ fill:{HIGHLIGHT_FILL}; stroke:{HIGHLIGHT_BORDER}; stroke-width:2; }}\n\
         .marker circle {{ fill:{MARKER_FILL}; stroke:#ffffff; stroke-width:1.5; }}\n\
         </style>"
    );

    for region in regions {
        let d = path_data(&region.geometry, &projection);
        if region.is_interactive() {
            let _ = writeln!(
                svg,
                r#"<path class="region interactive" fill-rule="evenodd" d="{}"><title>{}</title></path>"#,
                d,
                xml_escape(&region.name)
            );
        } else {
            let _ = writeln!(
                svg,
                r#"<path class="region" fill-rule="evenodd" d="{}"/>"#,
                d
            );
        }
    }

    for marker in markers {
        let (x, y) = projection.project(Coord {
            x: marker.position.x(),
            y: marker.position.y(),
        });
        let _ = writeln!(
            svg,
            r#"<g class="marker"><circle cx="{:.2}" cy="{:.2}" r="5"/><title>{}</title></g>"#,
            x,
            y,
            xml_escape(marker.label)
        );
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Assemble the page, inlining the rendered SVGs. A missing map means the
/// boundary load failed; its slot carries the user-visible notice instead and
/// the charts stand on their own.
pub fn render_page(map_svg: Option<&str>, funding_svg: &str, students_svg: &str) -> String {
    PAGE_TEMPLATE
        .replace("__MAP__", map_svg.unwrap_or(MAP_UNAVAILABLE_NOTICE))
        .replace("__FUNDING__", funding_svg)
        .replace("__STUDENTS__", students_svg)
}

fn path_data(geometry: &MultiPolygon<f64>, projection: &Projection) -> String {
    let mut d = String::new();
    for polygon in &geometry.0 {
        ring_path(polygon.exterior(), projection, &mut d);
        for interior in polygon.interiors() {
            ring_path(interior, projection, &mut d);
        }
    }
    d
}

fn ring_path(ring: &LineString<f64>, projection: &Projection, out: &mut String) {
    for (i, coord) in ring.coords().enumerate() {
        let (x, y) = projection.project(*coord);
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{}{:.2} {:.2} ", cmd, x, y);
    }
    out.push_str("Z ");
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
