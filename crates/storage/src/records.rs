//! Persisted record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer tier, used by the priority scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTier {
    Standard,
    Premium,
    Fleet,
}

impl CustomerTier {
    /// Rank used for ordering comparisons (fleet > premium > standard)
    pub fn rank(self) -> u8 {
        match self {
            CustomerTier::Standard => 0,
            CustomerTier::Premium => 1,
            CustomerTier::Fleet => 2,
        }
    }
}

/// Vehicle reference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String,
    pub vin: String,
    pub model: String,
    pub year: i32,
    pub owner_name: String,
    pub owner_contact: String,
    pub owner_email: Option<String>,
    pub region: String,
    pub mileage: u32,
    pub last_service_date: Option<DateTime<Utc>>,
    pub customer_tier: CustomerTier,
}

/// Reported brake condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrakeCondition {
    Good,
    Warning,
    Poor,
}

/// One telemetry reading as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub vehicle_id: String,
    pub timestamp: DateTime<Utc>,
    pub mileage: u32,
    pub engine_load: f64,
    pub oil_quality: f64,
    pub battery_percent: f64,
    pub brake_condition: BrakeCondition,
    pub brake_temp: f64,
    pub tire_pressure: f64,
    pub fuel_consumption: f64,
}

/// Vehicle flagged for maintenance by the telemetry/ML collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceFlag {
    pub flag_id: u64,
    pub vehicle_id: String,
    pub flagged_at: DateTime<Utc>,
    pub confidence: f64,
    pub risk_factors: Vec<String>,
    /// Continuous severity on a 0-100 scale
    pub severity_score: f64,
    pub is_scheduled: bool,
    pub scheduled_booking_id: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Flag fields supplied by the flagging collaborator; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewFlag {
    pub vehicle_id: String,
    pub flagged_at: DateTime<Utc>,
    pub confidence: f64,
    pub risk_factors: Vec<String>,
    pub severity_score: f64,
}

/// Service center reference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCenter {
    pub center_id: String,
    pub name: String,
    pub region: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Bays available per hour-slot
    pub capacity_bays: u32,
    /// Opening hour, whole hours UTC
    pub open_hour: u32,
    /// Closing hour, exclusive
    pub close_hour: u32,
    pub contact_phone: String,
    pub is_active: bool,
}

/// Technician reference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub tech_id: String,
    pub name: String,
    pub center_id: String,
    pub skill_level: String,
    pub specialization: String,
    pub is_available: bool,
    pub contact_phone: String,
}

/// Severity classification, display purposes only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityLevel {
    /// Classify a continuous 0-100 severity score
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            SeverityLevel::Critical
        } else if score >= 60.0 {
            SeverityLevel::High
        } else if score >= 40.0 {
            SeverityLevel::Medium
        } else {
            SeverityLevel::Low
        }
    }
}

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Provisional,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Whether the booking still holds a bay (counts against capacity)
    pub fn counts_against_capacity(self) -> bool {
        self != BookingStatus::Cancelled
    }

    /// Whether the booking is open (neither cancelled nor completed)
    pub fn is_open(self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Legal transition graph:
    /// provisional -> confirmed -> in_progress -> completed,
    /// provisional|confirmed -> cancelled
    pub fn can_transition(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Provisional, Confirmed)
                | (Confirmed, InProgress)
                | (InProgress, Completed)
                | (Provisional, Cancelled)
                | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Provisional => "provisional",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Service appointment booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub vehicle_id: String,
    pub center_id: String,
    pub tech_id: Option<String>,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub status: BookingStatus,
    /// Priority score snapshot taken at allocation time
    pub priority_score: f64,
    /// Severity classification snapshot taken at allocation time
    pub severity_level: SeverityLevel,
    pub service_type: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Booking fields supplied by the allocator; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub vehicle_id: String,
    pub center_id: String,
    pub tech_id: Option<String>,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub priority_score: f64,
    pub severity_level: SeverityLevel,
    pub service_type: String,
    /// Allocation instant, becomes `created_at` on the committed booking
    pub created_at: DateTime<Utc>,
}

/// Customer notification log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub booking_id: String,
    pub recipient_name: String,
    pub recipient_contact: String,
    pub recipient_email: Option<String>,
    pub kind: String,
    pub message: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
}
