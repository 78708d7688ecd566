// SPDX-License-Identifier: MIT
// Maintenance due computation.
//
// Pure arithmetic over the static catalog: no I/O, no shared mutable state,
// no failure path. Callers validate odometer input before calling; the
// planner itself accepts any integer and simply produces the corresponding
// numeric answer.

use serde::{Deserialize, Serialize};

use super::catalog::{catalog, MaintenanceItem};

/// Entries further out than this many miles are dropped from the plan
/// entirely — they do not appear in any bucket.
pub const MAX_LOOKAHEAD_MILES: i64 = 5000;

/// The mileage at which a service type was last performed.
///
/// When several records share a type, the first one encountered wins. The
/// lookup is a plain first-match linear search and clients observe that
/// behavior; keep it first-match, not most-recent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(rename = "type")]
    pub service_type: String,
    pub mileage: i64,
}

/// Urgency band derived from `miles_until_due`, distinct from the catalog's
/// informational [`ItemPriority`](super::ItemPriority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuePriority {
    Overdue,
    Urgent,
    Soon,
    Upcoming,
}

impl DuePriority {
    /// Band a signed miles-until-due value.
    ///
    /// Boundaries are inclusive on the near side: 0 and 1000 are `Urgent`,
    /// 1001 and 3000 are `Soon`, 3001 and up are `Upcoming`.
    pub fn for_miles_until_due(miles_until_due: i64) -> Self {
        if miles_until_due < 0 {
            DuePriority::Overdue
        } else if miles_until_due <= 1000 {
            DuePriority::Urgent
        } else if miles_until_due <= 3000 {
            DuePriority::Soon
        } else {
            DuePriority::Upcoming
        }
    }
}

/// One upcoming (or overdue) maintenance obligation.
///
/// Freshly allocated on every planner call and owned by the caller; nothing
/// is cached between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingMaintenance {
    #[serde(rename = "type")]
    pub service_type: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Odometer value at which the next occurrence is due.
    pub due_mileage: i64,
    /// Signed distance to `due_mileage`; negative means overdue.
    pub miles_until_due: i64,
    pub estimated_cost_low: f64,
    pub estimated_cost_high: f64,
    pub priority: DuePriority,
}

/// Compute the ranked maintenance plan for a vehicle.
///
/// For each catalog item independently: find the first matching history
/// record (missing type ⇒ last serviced at mile 0), project the next due
/// mileage one interval out, and band the signed distance from the current
/// odometer. Entries more than [`MAX_LOOKAHEAD_MILES`] ahead are dropped;
/// the rest sort ascending by `miles_until_due`, so the most overdue item
/// comes first. Equal distances keep catalog order (the sort is stable),
/// which makes identical inputs produce identical output.
pub fn upcoming_maintenance(
    current_mileage: i64,
    service_history: &[ServiceRecord],
) -> Vec<UpcomingMaintenance> {
    let mut plan: Vec<UpcomingMaintenance> = catalog()
        .iter()
        .map(|item| project_item(item, current_mileage, service_history))
        .filter(|entry| entry.miles_until_due <= MAX_LOOKAHEAD_MILES)
        .collect();
    plan.sort_by_key(|entry| entry.miles_until_due);
    plan
}

fn project_item(
    item: &MaintenanceItem,
    current_mileage: i64,
    service_history: &[ServiceRecord],
) -> UpcomingMaintenance {
    let last_mileage = service_history
        .iter()
        .find(|record| record.service_type == item.service_type)
        .map(|record| record.mileage)
        .unwrap_or(0);
    let due_mileage = last_mileage + item.interval_miles;
    let miles_until_due = due_mileage - current_mileage;

    UpcomingMaintenance {
        service_type: item.service_type,
        label: item.label,
        description: item.description,
        due_mileage,
        miles_until_due,
        estimated_cost_low: item.estimated_cost_low,
        estimated_cost_high: item.estimated_cost_high,
        priority: DuePriority::for_miles_until_due(miles_until_due),
    }
}

/// Roll-up counts for a planned sequence, as returned by the plan endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceSummary {
    pub total_items: usize,
    pub overdue_count: usize,
    pub estimated_cost_low: f64,
    pub estimated_cost_high: f64,
}

impl MaintenanceSummary {
    /// Summarize a planned sequence.
    pub fn of(plan: &[UpcomingMaintenance]) -> Self {
        Self {
            total_items: plan.len(),
            overdue_count: plan
                .iter()
                .filter(|entry| entry.priority == DuePriority::Overdue)
                .count(),
            estimated_cost_low: plan.iter().map(|entry| entry.estimated_cost_low).sum(),
            estimated_cost_high: plan.iter().map(|entry| entry.estimated_cost_high).sum(),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
