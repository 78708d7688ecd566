// SPDX-License-Identifier: MIT
// Static maintenance service catalog.
//
// The catalog is process-wide, read-only configuration: it is baked into the
// binary and shared by reference across every planner call and every route
// handler. Intervals and cost ranges mirror the schedule published on the
// consumer site.

use serde::Serialize;

/// How important a service item is, as shown to the customer.
///
/// Informational only — the planner ranks by mileage, not by this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPriority {
    Essential,
    Recommended,
    Optional,
}

/// A single recurring service type with its interval and cost range.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MaintenanceItem {
    /// Unique symbolic identifier (e.g. `oil_change`). Keys service history.
    #[serde(rename = "type")]
    pub service_type: &'static str,
    /// Human-readable name.
    pub label: &'static str,
    /// Distance between services, in miles.
    pub interval_miles: i64,
    /// Time between services, in months. Carried for display; the planner's
    /// due math is mileage-only.
    pub interval_months: u32,
    pub estimated_cost_low: f64,
    pub estimated_cost_high: f64,
    pub priority: ItemPriority,
    pub description: &'static str,
}

static CATALOG: &[MaintenanceItem] = &[
    MaintenanceItem {
        service_type: "oil_change",
        label: "Oil Change",
        interval_miles: 5000,
        interval_months: 6,
        estimated_cost_low: 35.0,
        estimated_cost_high: 75.0,
        priority: ItemPriority::Essential,
        description: "Engine oil and filter replacement",
    },
    MaintenanceItem {
        service_type: "tire_rotation",
        label: "Tire Rotation",
        interval_miles: 7500,
        interval_months: 6,
        estimated_cost_low: 20.0,
        estimated_cost_high: 50.0,
        priority: ItemPriority::Essential,
        description: "Rotate tires front-to-rear to even out tread wear",
    },
    MaintenanceItem {
        service_type: "wiper_blades",
        label: "Wiper Blades",
        interval_miles: 10000,
        interval_months: 12,
        estimated_cost_low: 25.0,
        estimated_cost_high: 55.0,
        priority: ItemPriority::Optional,
        description: "Replace front wiper blade inserts",
    },
    MaintenanceItem {
        service_type: "brake_inspection",
        label: "Brake Inspection",
        interval_miles: 15000,
        interval_months: 12,
        estimated_cost_low: 0.0,
        estimated_cost_high: 40.0,
        priority: ItemPriority::Essential,
        description: "Inspect pads, rotors, and brake lines for wear",
    },
    MaintenanceItem {
        service_type: "engine_air_filter",
        label: "Engine Air Filter",
        interval_miles: 15000,
        interval_months: 12,
        estimated_cost_low: 20.0,
        estimated_cost_high: 45.0,
        priority: ItemPriority::Recommended,
        description: "Replace the engine intake air filter",
    },
    MaintenanceItem {
        service_type: "cabin_air_filter",
        label: "Cabin Air Filter",
        interval_miles: 15000,
        interval_months: 12,
        estimated_cost_low: 25.0,
        estimated_cost_high: 60.0,
        priority: ItemPriority::Recommended,
        description: "Replace the cabin ventilation filter",
    },
    MaintenanceItem {
        service_type: "brake_fluid",
        label: "Brake Fluid Exchange",
        interval_miles: 30000,
        interval_months: 24,
        estimated_cost_low: 70.0,
        estimated_cost_high: 120.0,
        priority: ItemPriority::Recommended,
        description: "Flush and replace brake hydraulic fluid",
    },
    MaintenanceItem {
        service_type: "transmission_service",
        label: "Transmission Service",
        interval_miles: 60000,
        interval_months: 48,
        estimated_cost_low: 150.0,
        estimated_cost_high: 300.0,
        priority: ItemPriority::Recommended,
        description: "Drain and refill automatic transmission fluid",
    },
    MaintenanceItem {
        service_type: "coolant_flush",
        label: "Coolant Flush",
        interval_miles: 60000,
        interval_months: 60,
        estimated_cost_low: 100.0,
        estimated_cost_high: 200.0,
        priority: ItemPriority::Recommended,
        description: "Flush the cooling system and replace coolant",
    },
    MaintenanceItem {
        service_type: "spark_plugs",
        label: "Spark Plugs",
        interval_miles: 60000,
        interval_months: 60,
        estimated_cost_low: 120.0,
        estimated_cost_high: 250.0,
        priority: ItemPriority::Recommended,
        description: "Replace spark plugs and inspect ignition coils",
    },
];

/// The fixed service catalog. Loaded once, never mutated at runtime.
pub fn catalog() -> &'static [MaintenanceItem] {
    CATALOG
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn service_types_are_unique() {
        let mut seen = HashSet::new();
        for item in catalog() {
            assert!(
                seen.insert(item.service_type),
                "duplicate service_type: {}",
                item.service_type
            );
        }
    }

    #[test]
    fn intervals_and_costs_are_sane() {
        for item in catalog() {
            assert!(item.interval_miles > 0, "{}: interval_miles", item.service_type);
            assert!(item.interval_months > 0, "{}: interval_months", item.service_type);
            assert!(item.estimated_cost_low >= 0.0, "{}: cost_low", item.service_type);
            assert!(
                item.estimated_cost_low <= item.estimated_cost_high,
                "{}: cost_low > cost_high",
                item.service_type
            );
        }
    }

    #[test]
    fn serializes_type_field_name() {
        let json = serde_json::to_value(catalog()[0]).unwrap();
        assert_eq!(json["type"], "oil_change");
        assert_eq!(json["priority"], "essential");
        assert!(json.get("service_type").is_none());
    }
}
