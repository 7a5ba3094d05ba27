use crate::error::ResolutionError;
use crate::types::{Coordinate, LgaAggregate, MatchKind, School};

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub lga: LgaAggregate,
    pub kind: MatchKind,
    pub school_names: Vec<String>,
}

/// Finds the LGA behind a clicked point and lists its schools.
///
/// Marker clicks echo the stored centroid, so an exact float comparison is
/// tried first. Anything else falls back to the smallest |dlat| + |dlng|,
/// first one wins on ties.
pub fn resolve(
    click: Coordinate,
    aggregates: &[LgaAggregate],
    schools: &[School],
) -> Result<Resolution, ResolutionError> {
    if !click.lat.is_finite() || !click.lng.is_finite() {
        return Err(ResolutionError::InvalidCoordinate {
            lat: click.lat,
            lng: click.lng,
        });
    }

    let (lga, kind) = match exact_match(click, aggregates) {
        Some(lga) => (lga, MatchKind::Exact),
        None => (
            closest_match(click, aggregates).ok_or(ResolutionError::NoAggregates)?,
            MatchKind::Closest,
        ),
    };

    let school_names = schools.iter()
        .filter(|s| lga.contains(s))
        .map(|s| s.name.clone())
        .collect();

    Ok(Resolution {
        lga: lga.clone(),
        kind,
        school_names,
    })
}

#[allow(clippy::float_cmp)]
fn exact_match(click: Coordinate, aggregates: &[LgaAggregate]) -> Option<&LgaAggregate> {
    aggregates.iter()
        .find(|a| a.mean_latitude == click.lat && a.mean_longitude == click.lng)
}

fn l1_distance(a: Coordinate, b: Coordinate) -> f64 {
    (a.lat - b.lat).abs() + (a.lng - b.lng).abs()
}

fn closest_match(click: Coordinate, aggregates: &[LgaAggregate]) -> Option<&LgaAggregate> {
    let mut best: Option<(&LgaAggregate, f64)> = None;
    for agg in aggregates {
        let d = l1_distance(click, agg.centroid());
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((agg, d)),
        }
    }
    best.map(|(agg, _)| agg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::aggregate;
    use crate::processing::tests::{sample_schools, school};

    fn at(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    #[test]
    fn exact_click_on_worked_example() {
        let schools = sample_schools();
        let aggregates = aggregate(&schools);

        let res = resolve(at(-30.0, 140.0), &aggregates, &schools).unwrap();

        assert_eq!(res.kind, MatchKind::Exact);
        assert_eq!(res.lga.lga_name, "LGA1");
        assert_eq!(res.school_names, vec!["A", "B"]);
    }

    #[test]
    fn centroid_with_rounding_noise_still_matches_exactly() {
        let schools = vec![
            school("X", "QLD", "Townsville", -19.1, 146.7),
            school("Y", "QLD", "Townsville", -19.3, 146.9),
            school("Z", "QLD", "Townsville", -19.27, 146.81),
            school("W", "QLD", "Cairns", -16.9, 145.7),
        ];
        let aggregates = aggregate(&schools);
        let target = aggregates.iter().find(|a| a.lga_name == "Townsville").unwrap();

        let res = resolve(target.centroid(), &aggregates, &schools).unwrap();

        assert_eq!(res.kind, MatchKind::Exact);
        assert_eq!(&res.lga, target);
        assert_eq!(res.school_names.len(), target.school_count as usize);
    }

    #[test]
    fn off_marker_click_falls_back_to_closest() {
        let schools = sample_schools();
        let aggregates = aggregate(&schools);

        let res = resolve(at(-30.9, 140.8), &aggregates, &schools).unwrap();

        assert_eq!(res.kind, MatchKind::Closest);
        assert_eq!(res.lga.lga_name, "LGA2");
        assert_eq!(res.school_names, vec!["C"]);
    }

    #[test]
    fn closest_agrees_with_brute_force_scan() {
        let schools: Vec<School> = (0..40)
            .map(|i| {
                let f = i as f64;
                school(&format!("S{i}"), "NT", &format!("LGA{}", i % 13), -12.0 - (f * 0.37) % 9.0, 130.0 + (f * 0.91) % 8.0)
            })
            .collect();
        let aggregates = aggregate(&schools);

        for click in [at(-14.2, 131.1), at(-20.0, 137.5), at(-11.0, 129.0), at(-16.66, 134.02)] {
            let res = resolve(click, &aggregates, &schools).unwrap();

            let best = aggregates.iter()
                .map(|a| (a.mean_latitude - click.lat).abs() + (a.mean_longitude - click.lng).abs())
                .fold(f64::INFINITY, f64::min);
            let got = (res.lga.mean_latitude - click.lat).abs() + (res.lga.mean_longitude - click.lng).abs();

            assert_eq!(res.kind, MatchKind::Closest);
            assert_eq!(got, best);
            assert_eq!(res.school_names.len(), res.lga.school_count as usize);
        }
    }

    #[test]
    fn ties_go_to_the_first_aggregate() {
        let schools = vec![
            school("A", "SA", "East", -30.0, 139.0),
            school("B", "SA", "West", -30.0, 137.0),
        ];
        let aggregates = aggregate(&schools);

        let res = resolve(at(-30.0, 138.0), &aggregates, &schools).unwrap();
        assert_eq!(res.lga.lga_name, aggregates[0].lga_name);
    }

    #[test]
    fn same_lga_name_in_other_state_is_not_listed() {
        let schools = vec![
            school("A", "NSW", "Campbelltown", -34.07, 150.82),
            school("B", "SA", "Campbelltown", -34.88, 138.66),
        ];
        let aggregates = aggregate(&schools);

        let res = resolve(at(-34.8, 138.7), &aggregates, &schools).unwrap();
        assert_eq!(res.lga.state, "SA");
        assert_eq!(res.school_names, vec!["B"]);
    }

    #[test]
    fn empty_aggregates_is_an_error() {
        assert_eq!(
            resolve(at(-30.0, 140.0), &[], &[]),
            Err(ResolutionError::NoAggregates)
        );
    }

    #[test]
    fn non_finite_click_is_an_error() {
        let schools = sample_schools();
        let aggregates = aggregate(&schools);
        let err = resolve(at(f64::NAN, 140.0), &aggregates, &schools).unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidCoordinate { .. }));
    }
}
