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

use super::{
    PatternIdx, ServiceCode, StopData, StopIdx, Transfer, TransitLayer, TripPattern,
    TripPatternForDate, TripSchedule,
};
use crate::{
    geometry::distance_coord_to_coord,
    model::{self, TransitMode, TransitNetwork},
    time::{Calendar, DaysPattern, DaysPatterns, SecondsSinceServiceDayStart},
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("{referenced_by} references an unknown stop `{stop_id}`")]
    UnknownStop {
        referenced_by: String,
        stop_id: String,
    },
    #[error("pattern `{pattern_id}` references an unknown route `{route_id}`")]
    UnknownRoute { pattern_id: String, route_id: String },
    #[error("trip `{trip_id}` references an unknown service `{service_id}`")]
    UnknownService { trip_id: String, service_id: String },
    #[error("pattern `{pattern_id}` has {nb_of_stops} stops, at least 2 are needed")]
    PatternTooShort {
        pattern_id: String,
        nb_of_stops: usize,
    },
    #[error("trip `{trip_id}` has {found} stop times but its pattern has {expected} stops")]
    ScheduleLengthMismatch {
        trip_id: String,
        expected: usize,
        found: usize,
    },
    #[error("trip `{trip_id}` has an invalid schedule")]
    BadSchedule {
        trip_id: String,
        #[source]
        error: ScheduleError,
    },
    #[error("transfer from `{from_stop_id}` to `{to_stop_id}` has an invalid distance")]
    BadTransferDistance {
        from_stop_id: String,
        to_stop_id: String,
    },
    #[error("services span from {first_date} to {last_date}, which is too long")]
    CalendarTooLong {
        first_date: NaiveDate,
        last_date: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("time at position {position} is outside of the supported service day")]
    TimeOutOfBounds { position: usize },
    #[error("departure is before arrival at position {position}")]
    DepartureBeforeArrival { position: usize },
    #[error("arrival at position {downstream} is before departure at position {upstream}")]
    DecreasingTimes { upstream: usize, downstream: usize },
}

struct Services {
    calendar: Option<Calendar>,
    days_patterns: DaysPatterns,
    service_codes: HashMap<String, ServiceCode>,
    service_days: Vec<DaysPattern>,
}

impl TransitLayer {
    pub fn new(network: &TransitNetwork) -> Result<Self, BuildError> {
        info!(
            "Building transit layer from {} stops, {} patterns and {} trips",
            network.stops.len(),
            network.patterns.len(),
            network.nb_of_trips()
        );

        let (stops, stop_indices) = create_stops(network);
        let services = create_services(network)?;
        let patterns = create_patterns(network, &stop_indices, &services.service_codes)?;
        let transfers = create_transfers(network, &stops, &stop_indices)?;
        let patterns_for_date = create_patterns_for_date(&patterns, &services);

        let layer = Self {
            stops,
            stop_indices,
            patterns,
            transfers,
            service_codes: services.service_codes,
            service_days: services.service_days,
            days_patterns: services.days_patterns,
            calendar: services.calendar,
            patterns_for_date,
        };

        info!(
            "Transit layer built with {} stops, {} trip patterns and {} transfers",
            layer.nb_of_stops(),
            layer.nb_of_patterns(),
            layer.nb_of_transfers()
        );
        Ok(layer)
    }
}

fn create_stops(network: &TransitNetwork) -> (Vec<StopData>, HashMap<String, StopIdx>) {
    let mut stops = Vec::with_capacity(network.stops.len());
    let mut stop_indices = HashMap::with_capacity(network.stops.len());
    for stop in network.stops.values() {
        let stop_idx = StopIdx { idx: stops.len() };
        stops.push(StopData {
            id: stop.id.clone(),
            name: stop.name.clone(),
            coord: stop.coord,
        });
        stop_indices.insert(stop.id.clone(), stop_idx);
    }
    (stops, stop_indices)
}

fn create_services(network: &TransitNetwork) -> Result<Services, BuildError> {
    let all_dates = || network.services.values().flat_map(|service| service.dates.iter());
    let (first_date, last_date) = match (all_dates().min(), all_dates().max()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            warn!("No service has an active date. No trip will ever run.");
            let service_codes = network
                .services
                .values()
                .enumerate()
                .map(|(idx, service)| (service.id.clone(), ServiceCode { idx: idx as u32 }))
                .collect();
            return Ok(Services {
                calendar: None,
                days_patterns: DaysPatterns::new(0),
                service_codes,
                service_days: Vec::new(),
            });
        }
    };

    let calendar = Calendar::new(first_date, last_date).ok_or(BuildError::CalendarTooLong {
        first_date,
        last_date,
    })?;
    let mut days_patterns = DaysPatterns::new(usize::from(calendar.nb_of_days()));
    let mut service_codes = HashMap::with_capacity(network.services.len());
    let mut service_days = Vec::with_capacity(network.services.len());
    for service in network.services.values() {
        let days_pattern = days_patterns.get_or_insert(service.dates.iter(), &calendar);
        let service_code = ServiceCode {
            idx: service_days.len() as u32,
        };
        service_days.push(days_pattern);
        service_codes.insert(service.id.clone(), service_code);
    }
    debug!(
        "{} services share {} distinct day patterns between {} and {}",
        service_days.len(),
        days_patterns.nb_of_patterns(),
        first_date,
        last_date
    );

    Ok(Services {
        calendar: Some(calendar),
        days_patterns,
        service_codes,
        service_days,
    })
}

fn create_patterns(
    network: &TransitNetwork,
    stop_indices: &HashMap<String, StopIdx>,
    service_codes: &HashMap<String, ServiceCode>,
) -> Result<Vec<TripPattern>, BuildError> {
    let mut patterns = Vec::with_capacity(network.patterns.len());
    for source in network.patterns.values() {
        let route = network
            .routes
            .get(&source.route_id)
            .ok_or_else(|| BuildError::UnknownRoute {
                pattern_id: source.id.clone(),
                route_id: source.route_id.clone(),
            })?;
        if source.stop_ids.len() < 2 {
            return Err(BuildError::PatternTooShort {
                pattern_id: source.id.clone(),
                nb_of_stops: source.stop_ids.len(),
            });
        }
        let stops = source
            .stop_ids
            .iter()
            .map(|stop_id| {
                stop_indices
                    .get(stop_id)
                    .copied()
                    .ok_or_else(|| BuildError::UnknownStop {
                        referenced_by: format!("pattern `{}`", source.id),
                        stop_id: stop_id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut schedules_by_mode: BTreeMap<(TransitMode, Option<String>), Vec<TripSchedule>> =
            BTreeMap::new();
        for trip in &source.trips {
            let schedule = create_schedule(trip, stops.len(), service_codes)?;
            let mode = trip.mode.unwrap_or(route.mode);
            let submode = trip.submode.clone().or_else(|| route.submode.clone());
            schedules_by_mode
                .entry((mode, submode))
                .or_default()
                .push(schedule);
        }

        if schedules_by_mode.is_empty() {
            warn!("Pattern {} has no trip. I ignore it.", source.id);
            continue;
        }

        let nb_of_modes = schedules_by_mode.len();
        if nb_of_modes > 1 {
            debug!(
                "Pattern {} is served by {} modes, it is split into as many trip patterns.",
                source.id, nb_of_modes
            );
        }
        for ((mode, submode), mut schedules) in schedules_by_mode {
            schedules.sort_by(|lhs, rhs| {
                lhs.first_departure()
                    .cmp(&rhs.first_departure())
                    .then_with(|| lhs.trip_id.cmp(&rhs.trip_id))
            });
            let fifo = schedules.windows(2).all(|pair| {
                (0..stops.len()).all(|position| {
                    pair[0].departure(position) <= pair[1].departure(position)
                        && pair[0].arrival(position) <= pair[1].arrival(position)
                })
            });
            if !fifo {
                debug!("Pattern {} has overtaking trips for mode {}", source.id, mode);
            }
            let id = match (nb_of_modes, &submode) {
                (1, _) => source.id.clone(),
                (_, Some(submode)) => format!("{}:{}:{}", source.id, mode, submode),
                (_, None) => format!("{}:{}", source.id, mode),
            };
            patterns.push(TripPattern {
                id,
                source_pattern_id: source.id.clone(),
                route_id: route.id.clone(),
                route_name: route.name.clone(),
                mode,
                submode,
                stops: stops.clone(),
                schedules,
                fifo,
            });
        }
    }
    Ok(patterns)
}

fn create_schedule(
    trip: &model::Trip,
    nb_of_positions: usize,
    service_codes: &HashMap<String, ServiceCode>,
) -> Result<TripSchedule, BuildError> {
    if trip.stop_times.len() != nb_of_positions {
        return Err(BuildError::ScheduleLengthMismatch {
            trip_id: trip.id.clone(),
            expected: nb_of_positions,
            found: trip.stop_times.len(),
        });
    }
    let service_code =
        service_codes
            .get(&trip.service_id)
            .copied()
            .ok_or_else(|| BuildError::UnknownService {
                trip_id: trip.id.clone(),
                service_id: trip.service_id.clone(),
            })?;
    let times = inspect(&trip.stop_times).map_err(|error| BuildError::BadSchedule {
        trip_id: trip.id.clone(),
        error,
    })?;
    Ok(TripSchedule {
        trip_id: trip.id.clone(),
        service_code,
        times,
    })
}

fn inspect(
    stop_times: &[model::StopTime],
) -> Result<Vec<(SecondsSinceServiceDayStart, SecondsSinceServiceDayStart)>, ScheduleError> {
    let to_time = |seconds: u32, position: usize| {
        i32::try_from(seconds)
            .ok()
            .and_then(SecondsSinceServiceDayStart::from_seconds)
            .ok_or(ScheduleError::TimeOutOfBounds { position })
    };
    let mut times: Vec<(SecondsSinceServiceDayStart, SecondsSinceServiceDayStart)> =
        Vec::with_capacity(stop_times.len());
    for (position, stop_time) in stop_times.iter().enumerate() {
        let arrival = to_time(stop_time.arrival_time, position)?;
        let departure = to_time(stop_time.departure_time, position)?;
        if departure < arrival {
            return Err(ScheduleError::DepartureBeforeArrival { position });
        }
        if let Some((_, upstream_departure)) = times.last() {
            if arrival < *upstream_departure {
                return Err(ScheduleError::DecreasingTimes {
                    upstream: position - 1,
                    downstream: position,
                });
            }
        }
        times.push((arrival, departure));
    }
    Ok(times)
}

fn create_transfers(
    network: &TransitNetwork,
    stops: &[StopData],
    stop_indices: &HashMap<String, StopIdx>,
) -> Result<Vec<Vec<Transfer>>, BuildError> {
    let lookup = |stop_id: &String| {
        stop_indices
            .get(stop_id)
            .copied()
            .ok_or_else(|| BuildError::UnknownStop {
                referenced_by: "a transfer".to_string(),
                stop_id: stop_id.clone(),
            })
    };
    let mut transfers = vec![Vec::new(); stops.len()];
    for transfer in &network.transfers {
        let from = lookup(&transfer.from_stop_id)?;
        let to = lookup(&transfer.to_stop_id)?;
        let distance = transfer.distance.unwrap_or_else(|| {
            distance_coord_to_coord(&stops[from.idx].coord, &stops[to.idx].coord)
        });
        if !distance.is_finite() || distance < 0.0 {
            return Err(BuildError::BadTransferDistance {
                from_stop_id: transfer.from_stop_id.clone(),
                to_stop_id: transfer.to_stop_id.clone(),
            });
        }
        transfers[from.idx].push(Transfer {
            to,
            distance,
            duration: transfer.duration,
            cost: transfer.cost,
        });
    }
    Ok(transfers)
}

fn create_patterns_for_date(
    patterns: &[TripPattern],
    services: &Services,
) -> Vec<Vec<TripPatternForDate>> {
    let calendar = match &services.calendar {
        Some(calendar) => calendar,
        None => return Vec::new(),
    };
    calendar
        .days()
        .map(|day| {
            patterns
                .iter()
                .enumerate()
                .filter_map(|(idx, pattern)| {
                    let schedules: Vec<usize> = pattern
                        .schedules
                        .iter()
                        .enumerate()
                        .filter(|(_, schedule)| {
                            services
                                .service_days
                                .get(schedule.service_code.idx as usize)
                                .map(|days_pattern| {
                                    services.days_patterns.is_allowed(days_pattern, &day)
                                })
                                .unwrap_or(false)
                        })
                        .map(|(schedule_idx, _)| schedule_idx)
                        .collect();
                    if schedules.is_empty() {
                        None
                    } else {
                        Some(TripPatternForDate {
                            pattern: PatternIdx { idx },
                            schedules,
                        })
                    }
                })
                .collect()
        })
        .collect()
}
