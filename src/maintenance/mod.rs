// SPDX-License-Identifier: MIT
//! Maintenance planning core.
//!
//! A fixed catalog of recurring service items ([`catalog`]) and a pure
//! planner ([`planner::upcoming_maintenance`]) that turns an odometer reading
//! plus a service history into a ranked list of upcoming and overdue work.
//! Everything in this module is synchronous, allocation-only, and safe to
//! call from any number of tasks concurrently.

pub mod catalog;
pub mod planner;

pub use catalog::{catalog, ItemPriority, MaintenanceItem};
pub use planner::{
    upcoming_maintenance, DuePriority, MaintenanceSummary, ServiceRecord, UpcomingMaintenance,
    MAX_LOOKAHEAD_MILES,
};
