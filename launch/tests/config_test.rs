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

use anyhow::Error;
use launch::{
    config::{
        request_params::{DEFAULT_MAX_NB_OF_TRANSFERS, DEFAULT_SEARCH_WINDOW},
        RequestParams, SolverConfig,
    },
    transit_raptor::{NaiveDate, PositiveDuration, SearchProfile, TransitMode},
};
use std::io::Write;

#[test]
fn test_empty_config_gives_defaults() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let config = SolverConfig::from_json_str("{}")?;
    assert_eq!(config.request_params, RequestParams::default());
    assert_eq!(config.request_params.max_nb_of_transfers, DEFAULT_MAX_NB_OF_TRANSFERS);
    assert_eq!(config.request_params.search_window, DEFAULT_SEARCH_WINDOW);
    assert_eq!(config.request_params.search_profile, SearchProfile::Standard);
    Ok(())
}

#[test]
fn test_config_from_json() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let json = r#"{
        "nb_workers": 4,
        "request_params": {
            "max_nb_of_transfers": 3,
            "search_window": "02:00:00",
            "iteration_step": "00:02:00",
            "walk_speed": 1.5,
            "search_profile": "multi_criteria",
            "costs": { "boarding_cost": 100, "walk_reluctance": 3.0 },
            "allowed_modes": ["bus", "rail:regional"],
            "banned_routes": ["R1"],
            "timeout": "00:00:05"
        }
    }"#;
    let config = SolverConfig::from_json_str(json)?;
    let params = &config.request_params;
    assert_eq!(params.max_nb_of_transfers, 3);
    assert_eq!(params.search_window, PositiveDuration::from_hms(2, 0, 0));
    assert_eq!(params.iteration_step, PositiveDuration::from_hms(0, 2, 0));
    assert_eq!(params.search_profile, SearchProfile::MultiCriteria);
    assert_eq!(params.costs.boarding_cost, 100);
    // unspecified costs keep their default
    assert_eq!(params.costs.transfer_cost, 120);
    assert_eq!(params.timeout, Some(PositiveDuration::from_seconds(5)));

    let filters = params.filters()?;
    assert!(filters.modes.accepts(TransitMode::Bus, None));
    assert!(filters.modes.accepts(TransitMode::Rail, Some("regional")));
    assert!(!filters.modes.accepts(TransitMode::Rail, Some("high_speed")));
    assert!(!filters.modes.accepts(TransitMode::Tram, None));
    assert!(filters.banned_routes.contains("R1"));

    let departure = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let request = params.to_request(Vec::new(), Vec::new(), departure)?;
    assert_eq!(request.max_rounds(), 4);
    assert_eq!(request.walk_speed, 1.5);
    assert!(request.deadline.is_some());
    Ok(())
}

#[test]
fn test_config_file() -> Result<(), Error> {
    let _log_guard = launch::logger::init_test_logger();

    let path = std::env::temp_dir().join(format!("raptor_config_{}.json", std::process::id()));
    {
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, r#"{{ "request_params": {{ "day_range": 5 }} }}"#)?;
    }
    let config = SolverConfig::from_json_file(&path);
    std::fs::remove_file(&path)?;
    assert_eq!(config?.request_params.day_range, 5);

    let missing = std::env::temp_dir().join("raptor_config_that_does_not_exist.json");
    assert!(SolverConfig::from_json_file(&missing).is_err());
    Ok(())
}

#[test]
fn test_bad_configs_are_rejected() {
    let _log_guard = launch::logger::init_test_logger();

    let bad_configs = [
        r#"{ "unknown_field": 1 }"#,
        r#"{ "request_params": { "search_window": "1h" } }"#,
        r#"{ "request_params": { "search_profile": "fastest" } }"#,
        r#"{ "request_params": { "costs": { "bribe": 1 } } }"#,
        r#"{ "nb_workers": -1 }"#,
    ];
    for json in bad_configs {
        assert!(SolverConfig::from_json_str(json).is_err(), "{} is accepted", json);
    }
}
