//! Demo fleet data for local runs

use crate::records::*;
use crate::{FleetStore, StoreError};
use chrono::{Duration, Utc};
use tracing::info;

/// Populate the store with a small demo fleet: three service centers,
/// their technicians, and a handful of vehicles across tiers.
pub fn load_demo_fleet(store: &FleetStore) -> Result<(), StoreError> {
    for center in demo_centers() {
        store.insert_center(center)?;
    }
    for tech in demo_technicians() {
        store.insert_technician(tech)?;
    }
    for vehicle in demo_vehicles() {
        store.upsert_vehicle(vehicle)?;
    }
    info!("Demo fleet loaded: 3 centers, 6 technicians, 8 vehicles");
    Ok(())
}

fn demo_centers() -> Vec<ServiceCenter> {
    vec![
        ServiceCenter {
            center_id: "SC001".to_string(),
            name: "FleetCare North".to_string(),
            region: "north".to_string(),
            location: "Sector 18, Rohini".to_string(),
            latitude: 28.7041,
            longitude: 77.1025,
            capacity_bays: 15,
            open_hour: 8,
            close_hour: 20,
            contact_phone: "+91-11-12345678".to_string(),
            is_active: true,
        },
        ServiceCenter {
            center_id: "SC002".to_string(),
            name: "FleetCare South".to_string(),
            region: "south".to_string(),
            location: "Saket".to_string(),
            latitude: 28.5244,
            longitude: 77.2066,
            capacity_bays: 12,
            open_hour: 9,
            close_hour: 19,
            contact_phone: "+91-11-23456789".to_string(),
            is_active: true,
        },
        ServiceCenter {
            center_id: "SC003".to_string(),
            name: "FleetCare Gurgaon".to_string(),
            region: "west".to_string(),
            location: "Cyber City, Gurgaon".to_string(),
            latitude: 28.4595,
            longitude: 77.0266,
            capacity_bays: 20,
            open_hour: 8,
            close_hour: 21,
            contact_phone: "+91-124-3456789".to_string(),
            is_active: true,
        },
    ]
}

fn demo_technicians() -> Vec<Technician> {
    let specs = [
        ("T001", "Arjun Mehta", "SC001", "senior", "engine"),
        ("T002", "Priya Nair", "SC001", "expert", "electrical"),
        ("T003", "Rahul Verma", "SC002", "junior", "brakes"),
        ("T004", "Sana Khan", "SC002", "senior", "general"),
        ("T005", "Dev Patel", "SC003", "expert", "engine"),
        ("T006", "Meera Iyer", "SC003", "senior", "general"),
    ];
    specs
        .iter()
        .map(|(id, name, center, level, spec)| Technician {
            tech_id: id.to_string(),
            name: name.to_string(),
            center_id: center.to_string(),
            skill_level: level.to_string(),
            specialization: spec.to_string(),
            is_available: true,
            contact_phone: "+91-98-00000000".to_string(),
        })
        .collect()
}

fn demo_vehicles() -> Vec<Vehicle> {
    let now = Utc::now();
    let specs: [(&str, &str, &str, CustomerTier, u32); 8] = [
        ("V001", "MH12AB0001", "Tata Nexon EV", CustomerTier::Fleet, 52_300),
        ("V002", "MH12AB0002", "Mahindra XUV700", CustomerTier::Premium, 38_900),
        ("V003", "MH12AB0003", "Maruti Ertiga", CustomerTier::Standard, 61_200),
        ("V004", "MH12AB0004", "Tata Ace", CustomerTier::Fleet, 88_450),
        ("V005", "MH12AB0005", "Hyundai Creta", CustomerTier::Premium, 24_700),
        ("V006", "MH12AB0006", "Maruti Swift", CustomerTier::Standard, 45_100),
        ("V007", "MH12AB0007", "Ashok Leyland Dost", CustomerTier::Fleet, 102_800),
        ("V008", "MH12AB0008", "Kia Seltos", CustomerTier::Standard, 19_300),
    ];
    specs
        .iter()
        .enumerate()
        .map(|(i, (id, vin, model, tier, mileage))| Vehicle {
            vehicle_id: id.to_string(),
            vin: vin.to_string(),
            model: model.to_string(),
            year: 2021 + (i as i32 % 4),
            owner_name: format!("Owner {}", i + 1),
            owner_contact: format!("+91-90000000{:02}", i),
            owner_email: Some(format!("owner{}@example.com", i + 1)),
            region: ["north", "south", "west"][i % 3].to_string(),
            mileage: *mileage,
            last_service_date: Some(now - Duration::days(90 + 30 * i as i64)),
            customer_tier: *tier,
        })
        .collect()
}
