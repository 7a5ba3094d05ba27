use serde::{Deserialize, Serialize};

/// One row of the school location sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct School {
    pub name: String,
    pub state: String,
    pub lga_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Summary of every school sharing a (state, LGA name) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LgaAggregate {
    pub state: String,
    pub lga_name: String,
    pub mean_latitude: f64,
    pub mean_longitude: f64,
    pub school_count: u32,
}

impl LgaAggregate {
    pub fn centroid(&self) -> Coordinate {
        Coordinate {
            lat: self.mean_latitude,
            lng: self.mean_longitude,
        }
    }

    pub fn contains(&self, school: &School) -> bool {
        self.state == school.state && self.lga_name == school.lga_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Payload posted by the map widget on every click.
///
/// `last_clicked` is set for any click on the map, `last_object_clicked`
/// only when a marker was hit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClickEvent {
    #[serde(default)]
    pub last_clicked: Option<Coordinate>,
    #[serde(default)]
    pub last_object_clicked: Option<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Closest,
}
