use geo::{MultiPolygon, Point};

/// How a rendered region responds to the pointer. Interactive regions carry a
/// popup, a hover highlight and a pointer cursor; static regions render with
/// the default cursor and no popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interactivity {
    Interactive,
    Static,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    pub interactivity: Interactivity,
}

impl Region {
    pub fn is_interactive(&self) -> bool {
        self.interactivity == Interactivity::Interactive
    }
}

/// A pinned location, placed on the map once the boundary layer is in.
#[derive(Debug, Clone)]
pub struct Marker {
    pub label: &'static str,
    pub position: Point<f64>,
}
