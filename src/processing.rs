use crate::types::{LgaAggregate, School};
use std::collections::BTreeMap;

#[derive(Default)]
struct Accumulator {
    lat_sum: f64,
    lon_sum: f64,
    count: u32,
}

/// Groups schools by exact (state, LGA name) and averages their coordinates.
///
/// Output is ordered by key. Names are not normalised, so "Albury" and
/// "Albury " end up as separate LGAs.
pub fn aggregate(schools: &[School]) -> Vec<LgaAggregate> {
    let mut groups: BTreeMap<(&str, &str), Accumulator> = BTreeMap::new();

    for school in schools {
        let acc = groups.entry((school.state.as_str(), school.lga_name.as_str())).or_default();
        acc.lat_sum += school.latitude;
        acc.lon_sum += school.longitude;
        acc.count += 1;
    }

    let aggregates: Vec<LgaAggregate> = groups.into_iter().map(|((state, lga_name), acc)| {
        LgaAggregate {
            state: state.to_string(),
            lga_name: lga_name.to_string(),
            mean_latitude: acc.lat_sum / acc.count as f64,
            mean_longitude: acc.lon_sum / acc.count as f64,
            school_count: acc.count,
        }
    }).collect();

    tracing::debug!("Aggregated {} schools into {} LGAs", schools.len(), aggregates.len());
    aggregates
}

/// Largest school count in the set, 0 when empty.
pub fn max_school_count(aggregates: &[LgaAggregate]) -> u32 {
    aggregates.iter().map(|a| a.school_count).max().unwrap_or(0)
}
