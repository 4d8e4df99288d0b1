// Copyright  (C) 2022, Hove and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Hove (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

mod utils;
use anyhow::Error;
use launch::config::RequestParams;
use launch::transit_raptor::{
    ModeFilter, PatternFilters, RoutingError, TransitLayer, TransitMode, TransitNetwork,
};
use rstest::rstest;
use utils::{
    build_and_solve, datetime, make_request, model_builder::ModelBuilder, reach, route_ids,
    transit_legs,
};

fn create_network() -> TransitNetwork {
    ModelBuilder::default()
        .route("bus_line", |r| {
            r.mode = TransitMode::Bus;
        })
        .route("tram_line", |r| {
            r.mode = TransitMode::Tram;
            r.submode = Some("streetcar".to_string());
        })
        .vj("bus_trip", |vj_builder| {
            vj_builder
                .route("bus_line")
                .st("A", "10:00:00", "10:00:00")
                .st("C", "10:30:00", "10:30:00");
        })
        .vj("tram_trip", |vj_builder| {
            vj_builder
                .route("tram_line")
                .st("A", "10:00:00", "10:00:00")
                .st("C", "10:20:00", "10:20:00");
        })
        .build()
}

#[rstest]
#[case(&[], &[], Some("tram_line"))]
#[case(&["bus"], &[], Some("bus_line"))]
#[case(&["tram"], &[], Some("tram_line"))]
#[case(&["tram:streetcar"], &[], Some("tram_line"))]
#[case(&["bus", "tram:light_rail"], &[], Some("bus_line"))]
#[case(&["tram:light_rail"], &[], None)]
#[case(&[], &["tram_line"], Some("bus_line"))]
#[case(&["tram"], &["tram_line"], None)]
#[case(&[], &["tram_line", "bus_line"], None)]
fn test_routing_with_filters(
    #[case] allowed_modes: &[&str],
    #[case] banned_routes: &[&str],
    #[case] expected_route: Option<&str>,
) -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = create_network();
    let params = RequestParams {
        max_nb_of_transfers: 0,
        allowed_modes: allowed_modes.iter().map(|mode| mode.to_string()).collect(),
        banned_routes: banned_routes.iter().map(|route| route.to_string()).collect(),
        ..RequestParams::default()
    };
    let request = params.to_request(
        vec![reach("A", 0)],
        vec![reach("C", 0)],
        datetime("20200101T100000"),
    )?;
    let response = build_and_solve(&network, &request)?;

    match expected_route {
        Some(route_id) => {
            assert_eq!(response.itineraries.len(), 1);
            assert_eq!(route_ids(&response.itineraries[0]), vec![route_id]);
        }
        None => assert!(response.itineraries.is_empty()),
    }

    Ok(())
}

#[rstest]
#[case(&["spaceship"])]
#[case(&["bus:"])]
#[case(&["tram:  "])]
fn test_malformed_mode_filters_are_rejected(#[case] allowed_modes: &[&str]) {
    let _log_guard = launch::logger::init_test_logger();

    let params = RequestParams {
        allowed_modes: allowed_modes.iter().map(|mode| mode.to_string()).collect(),
        ..RequestParams::default()
    };
    assert!(params.filters().is_err());
}

#[test]
fn test_an_empty_mode_filter_is_rejected() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = create_network();
    let mut request = make_request("20200101T100000", "A", "C");
    request.filters = PatternFilters {
        modes: ModeFilter::none(),
        ..PatternFilters::default()
    };
    let layer = TransitLayer::new(&network)?;
    let result = launch::transit_raptor::route(&layer, &request);
    assert!(matches!(result, Err(RoutingError::InvalidParameter(_))));

    Ok(())
}

#[test]
fn test_trips_of_a_pattern_are_split_by_mode() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("bus_trip", |vj_builder| {
            vj_builder
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:10:00", "10:10:00");
        })
        .vj("coach_trip", |vj_builder| {
            vj_builder
                .mode(TransitMode::Coach)
                .st("A", "10:05:00", "10:05:00")
                .st("B", "10:12:00", "10:12:00");
        })
        .build();
    assert_eq!(network.patterns.len(), 1);

    let layer = TransitLayer::new(&network)?;
    assert_eq!(layer.nb_of_patterns(), 2);
    let modes: Vec<TransitMode> = layer.patterns().map(|(_, pattern)| pattern.mode()).collect();
    assert_eq!(modes, vec![TransitMode::Bus, TransitMode::Coach]);
    for (_, pattern) in layer.patterns() {
        assert_eq!(pattern.source_pattern_id(), "default_route:0");
        assert_eq!(pattern.schedules().len(), 1);
    }

    let request = make_request("20200101T100000", "A", "B");
    let response = build_and_solve(&network, &request)?;
    // the coach departs later, and arrives later
    assert_eq!(response.itineraries.len(), 2);

    let mut request = make_request("20200101T100000", "A", "B");
    request.filters.modes = ModeFilter::none().allow(TransitMode::Coach);
    let response = build_and_solve(&network, &request)?;
    assert_eq!(response.itineraries.len(), 1);
    assert_eq!(
        transit_legs(&response.itineraries[0]),
        vec![("coach_trip", "A", "B")]
    );

    Ok(())
}

#[test]
fn test_overtaking_trips() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("slow", |vj_builder| {
            vj_builder
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .vj("fast", |vj_builder| {
            vj_builder
                .st("A", "10:05:00", "10:05:00")
                .st("B", "10:15:00", "10:15:00");
        })
        .build();

    let layer = TransitLayer::new(&network)?;
    assert_eq!(layer.nb_of_patterns(), 1);
    assert!(layer.patterns().all(|(_, pattern)| !pattern.is_fifo()));

    let request = make_request("20200101T100000", "A", "B");
    let response = build_and_solve(&network, &request)?;
    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(transit_legs(itinerary), vec![("fast", "A", "B")]);
    assert_eq!(itinerary.arrival, datetime("20200101T101500"));

    Ok(())
}
