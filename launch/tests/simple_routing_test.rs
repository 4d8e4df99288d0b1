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
use launch::transit_raptor::{
    itinerary::WalkKind, Leg, NaiveDate, PositiveDuration, SearchProfile, TransitMode,
};
use utils::{
    build_and_solve, datetime, first_transit_leg, make_request, model_builder::ModelBuilder,
    reach, route_ids, transit_legs,
};

#[test]
fn test_simple_routing() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .route("1", |r| {
            r.name = String::from("bob");
        })
        .vj("toto", |vj_builder| {
            vj_builder
                .route("1")
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:05:00", "10:05:00")
                .st("C", "10:10:00", "10:10:00");
        })
        .build();

    let mut request = make_request("20200101T100000", "A", "C");
    request.max_nb_of_transfers = 0;
    let response = build_and_solve(&network, &request)?;

    assert!(!response.truncated);
    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(transit_legs(itinerary), vec![("toto", "A", "C")]);
    assert_eq!(itinerary.nb_of_transfers, 0);
    assert_eq!(itinerary.departure, datetime("20200101T100000"));
    assert_eq!(itinerary.arrival, datetime("20200101T101000"));
    assert_eq!(itinerary.duration, PositiveDuration::from_hms(0, 10, 0));
    assert_eq!(itinerary.legs.len(), 3);

    match first_transit_leg(itinerary) {
        Some(Leg::Transit {
            route_id,
            route_name,
            mode,
            service_date,
            departure,
            arrival,
            geometry,
            ..
        }) => {
            assert_eq!(route_id, "1");
            assert_eq!(route_name, "bob");
            assert_eq!(*mode, TransitMode::Bus);
            assert_eq!(*service_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
            assert_eq!(*departure, datetime("20200101T100000"));
            assert_eq!(*arrival, datetime("20200101T101000"));
            // A, B and C
            assert_eq!(geometry.len(), 3);
        }
        _ => panic!("a transit leg is expected"),
    }
    assert!(matches!(
        itinerary.legs.first(),
        Some(Leg::Walk {
            kind: WalkKind::Access,
            from: None,
            ..
        })
    ));
    assert!(matches!(
        itinerary.legs.last(),
        Some(Leg::Walk {
            kind: WalkKind::Egress,
            to: None,
            ..
        })
    ));

    Ok(())
}

#[test]
fn test_routing_with_one_transfer() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("trip1", |vj_builder| {
            vj_builder
                .route("1")
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:05:00", "10:05:00");
        })
        .vj("trip2", |vj_builder| {
            vj_builder
                .route("2")
                .st("B", "10:06:00", "10:06:00")
                .st("C", "10:15:00", "10:15:00");
        })
        .build();

    let mut request = make_request("20200101T100000", "A", "C");
    request.max_nb_of_transfers = 1;
    request.min_transfer_time = PositiveDuration::from_hms(0, 1, 0);
    let response = build_and_solve(&network, &request)?;

    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(
        transit_legs(itinerary),
        vec![("trip1", "A", "B"), ("trip2", "B", "C")]
    );
    assert_eq!(itinerary.nb_of_transfers, 1);
    assert_eq!(itinerary.arrival, datetime("20200101T101500"));
    // access, 2 vehicles, egress : no walking transfer is needed at B
    assert_eq!(itinerary.legs.len(), 4);

    Ok(())
}

#[test]
fn test_min_transfer_time_is_enforced() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("trip1", |vj_builder| {
            vj_builder
                .route("1")
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:05:00", "10:05:00");
        })
        .vj("trip2", |vj_builder| {
            vj_builder
                .route("2")
                .st("B", "10:06:00", "10:06:00")
                .st("C", "10:15:00", "10:15:00");
        })
        .vj("trip3", |vj_builder| {
            vj_builder
                .route("2")
                .st("B", "10:16:00", "10:16:00")
                .st("C", "10:25:00", "10:25:00");
        })
        .build();

    let mut request = make_request("20200101T100000", "A", "C");
    request.min_transfer_time = PositiveDuration::from_hms(0, 2, 0);
    let response = build_and_solve(&network, &request)?;

    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(
        transit_legs(itinerary),
        vec![("trip1", "A", "B"), ("trip3", "B", "C")]
    );
    assert_eq!(itinerary.arrival, datetime("20200101T102500"));

    Ok(())
}

#[test]
fn test_routing_with_walking_transfer() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("toto", |vj_builder| {
            vj_builder
                .route("1")
                .st("A", "10:00:00", "10:00:01")
                .st("B", "10:05:00", "10:05:01")
                .st("C", "10:10:00", "10:10:01");
        })
        .vj("tata", |vj_builder| {
            vj_builder
                .route("2")
                .st("E", "10:05:00", "10:05:01")
                .st("F", "10:20:00", "10:20:01")
                .st("G", "10:30:00", "10:30:01");
        })
        .add_transfer("B", "F", 120)
        .build();

    let request = make_request("20200101T095900", "A", "G");
    let response = build_and_solve(&network, &request)?;

    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(
        transit_legs(itinerary),
        vec![("toto", "A", "B"), ("tata", "F", "G")]
    );
    assert_eq!(itinerary.nb_of_transfers, 1);
    assert_eq!(itinerary.arrival, datetime("20200101T103000"));

    let transfer = itinerary
        .legs
        .iter()
        .find(|leg| {
            matches!(
                leg,
                Leg::Walk {
                    kind: WalkKind::Transfer,
                    ..
                }
            )
        })
        .expect("a transfer leg is expected");
    assert_eq!(transfer.departure(), datetime("20200101T100500"));
    assert_eq!(transfer.arrival(), datetime("20200101T100700"));

    // stops of the builder are about 111 meters apart
    assert!((itinerary.walking_distance() - 333.6).abs() < 1.0);
    assert!((itinerary.transit_distance() - 222.4).abs() < 1.0);

    Ok(())
}

#[test]
fn test_transfer_only_journey() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    // no trip serves A or D
    let network = ModelBuilder::default()
        .vj("elsewhere", |vj_builder| {
            vj_builder
                .st("E", "10:00:00", "10:00:00")
                .st("F", "10:10:00", "10:10:00");
        })
        .add_transfer("A", "D", 120)
        .build();

    let mut request = make_request("20200101T100000", "A", "D");
    request.max_rounds = Some(0);
    let response = build_and_solve(&network, &request)?;

    assert_eq!(response.stats.nb_of_pattern_scans, 0);
    assert_eq!(response.stats.nb_of_iterations, 1);
    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(itinerary.nb_of_transit_legs(), 0);
    assert_eq!(itinerary.nb_of_transfers, 0);
    assert_eq!(itinerary.duration, PositiveDuration::from_seconds(120));
    assert_eq!(itinerary.departure, datetime("20200101T100000"));
    assert_eq!(itinerary.arrival, datetime("20200101T100200"));

    Ok(())
}

#[test]
fn test_transfer_only_journey_needs_zero_rounds() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("elsewhere", |vj_builder| {
            vj_builder
                .st("E", "10:00:00", "10:00:00")
                .st("F", "10:10:00", "10:10:00");
        })
        .add_transfer("A", "D", 120)
        .build();

    let request = make_request("20200101T100000", "A", "D");
    let response = build_and_solve(&network, &request)?;

    assert!(response.itineraries.is_empty());

    Ok(())
}

#[test]
fn test_no_path() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("toto", |vj_builder| {
            vj_builder
                .st("B", "10:00:00", "10:00:00")
                .st("C", "10:10:00", "10:10:00");
        })
        .stop("A", |_| {})
        .build();

    let request = make_request("20200101T090000", "A", "C");
    let response = build_and_solve(&network, &request)?;

    assert!(response.itineraries.is_empty());
    assert!(!response.truncated);

    Ok(())
}

#[test]
fn test_unknown_stops_give_no_path() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("toto", |vj_builder| {
            vj_builder
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:10:00", "10:10:00");
        })
        .build();

    let request = make_request("20200101T090000", "A", "unknown");
    let response = build_and_solve(&network, &request)?;
    assert!(response.itineraries.is_empty());

    let mut request = make_request("20200101T090000", "A", "B");
    request.access.clear();
    let response = build_and_solve(&network, &request)?;
    assert!(response.itineraries.is_empty());
    assert_eq!(response.stats.nb_of_iterations, 0);

    Ok(())
}

#[test]
fn test_trip_running_past_midnight() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::new("2020-01-01", "2020-01-02")
        .calendar("first_day", &["2020-01-01"])
        .vj("night", |vj_builder| {
            vj_builder
                .calendar("first_day")
                .st("A", "23:50:00", "23:50:00")
                .st("B", "24:10:00", "24:10:00")
                .st("C", "24:20:00", "24:20:00");
        })
        .build();

    let request = make_request("20200102T000000", "B", "C");
    let response = build_and_solve(&network, &request)?;

    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(transit_legs(itinerary), vec![("night", "B", "C")]);
    assert_eq!(itinerary.departure, datetime("20200102T001000"));
    assert_eq!(itinerary.arrival, datetime("20200102T002000"));
    match first_transit_leg(itinerary) {
        Some(Leg::Transit { service_date, .. }) => {
            assert_eq!(*service_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        }
        _ => panic!("a transit leg is expected"),
    }

    Ok(())
}

#[test]
fn test_trip_running_past_midnight_from_its_service_date() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::new("2020-01-01", "2020-01-02")
        .calendar("first_day", &["2020-01-01"])
        .vj("night", |vj_builder| {
            vj_builder
                .calendar("first_day")
                .st("A", "23:50:00", "23:50:00")
                .st("B", "24:10:00", "24:10:00")
                .st("C", "24:20:00", "24:20:00");
        })
        .build();

    let request = make_request("20200101T234000", "A", "C");
    let response = build_and_solve(&network, &request)?;

    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(transit_legs(itinerary), vec![("night", "A", "C")]);
    assert_eq!(itinerary.departure, datetime("20200101T235000"));
    assert_eq!(itinerary.arrival, datetime("20200102T002000"));
    match first_transit_leg(itinerary) {
        Some(Leg::Transit { service_date, .. }) => {
            assert_eq!(*service_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        }
        _ => panic!("a transit leg is expected"),
    }

    Ok(())
}

#[test]
fn test_trip_running_past_midnight_of_the_last_service_date() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::new("2020-01-01", "2020-01-01")
        .vj("night", |vj_builder| {
            vj_builder
                .st("A", "23:50:00", "23:50:00")
                .st("B", "24:10:00", "24:10:00")
                .st("C", "24:20:00", "24:20:00");
        })
        .build();

    let request = make_request("20200102T000000", "B", "C");
    let response = build_and_solve(&network, &request)?;

    assert_eq!(response.itineraries.len(), 1);
    let itinerary = &response.itineraries[0];
    assert_eq!(transit_legs(itinerary), vec![("night", "B", "C")]);
    assert_eq!(itinerary.arrival, datetime("20200102T002000"));

    Ok(())
}

#[test]
fn test_range_gives_one_journey_per_departure() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("early", |vj_builder| {
            vj_builder
                .st("A", "10:00:00", "10:00:00")
                .st("B", "10:20:00", "10:20:00");
        })
        .vj("late", |vj_builder| {
            vj_builder
                .st("A", "10:30:00", "10:30:00")
                .st("B", "10:50:00", "10:50:00");
        })
        .build();

    let mut request = make_request("20200101T094500", "A", "B");
    request.access = vec![reach("A", 300)];
    request.search_window = PositiveDuration::from_hms(1, 0, 0);
    let response = build_and_solve(&network, &request)?;

    assert_eq!(response.itineraries.len(), 2);
    let early = &response.itineraries[0];
    let late = &response.itineraries[1];
    assert_eq!(transit_legs(early), vec![("early", "A", "B")]);
    assert_eq!(transit_legs(late), vec![("late", "A", "B")]);
    // the departure is shifted to just catch the vehicle
    assert_eq!(early.departure, datetime("20200101T095500"));
    assert_eq!(late.departure, datetime("20200101T102500"));

    Ok(())
}

#[test]
fn test_standard_and_multi_criteria_profiles() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let network = ModelBuilder::default()
        .vj("fast", |vj_builder| {
            vj_builder
                .route("fast")
                .st("A", "10:00:00", "10:00:00")
                .st("C1", "10:10:00", "10:10:00");
        })
        .vj("cheap", |vj_builder| {
            vj_builder
                .route("cheap")
                .st("A", "10:00:00", "10:00:00")
                .st("C2", "10:15:00", "10:15:00");
        })
        .build();

    let mut expensive_egress = reach("C1", 0);
    expensive_egress.cost = Some(5000);
    let mut request = make_request("20200101T100000", "A", "C1");
    request.egress = vec![expensive_egress, reach("C2", 300)];
    request.max_nb_of_transfers = 0;

    request.search_profile = SearchProfile::Standard;
    let response = build_and_solve(&network, &request)?;
    assert_eq!(response.itineraries.len(), 1);
    assert_eq!(route_ids(&response.itineraries[0]), vec!["fast"]);

    request.search_profile = SearchProfile::MultiCriteria;
    let response = build_and_solve(&network, &request)?;
    assert_eq!(response.itineraries.len(), 2);
    let fast = &response.itineraries[0];
    let cheap = &response.itineraries[1];
    assert_eq!(route_ids(fast), vec!["fast"]);
    assert_eq!(route_ids(cheap), vec!["cheap"]);
    assert_eq!(fast.arrival, datetime("20200101T101000"));
    assert_eq!(cheap.arrival, datetime("20200101T102000"));
    // boarding 60, in vehicle 600, egress 5000
    assert_eq!(fast.generalized_cost, 5660);
    // boarding 60, in vehicle 900, egress 300 walked with reluctance 2
    assert_eq!(cheap.generalized_cost, 1560);

    Ok(())
}
