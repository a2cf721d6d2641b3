//! Customer Notifications
//!
//! Fire-and-forget collaborator invoked after a booking is explicitly
//! confirmed (never by the allocator). Delivery is mocked: messages are
//! rendered, logged, and recorded in the notification log. A failure here
//! never invalidates the booking it refers to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::{Booking, FleetStore, NotificationRecord, StoreError};
use thiserror::Error;
use tracing::info;

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("booking not found: {0}")]
    BookingNotFound(String),

    #[error("vehicle not found for booking {0}")]
    VehicleNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Message template selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingConfirmation,
    Reminder,
    Completion,
}

impl NotificationKind {
    fn as_str(self) -> &'static str {
        match self {
            NotificationKind::BookingConfirmation => "booking_confirmation",
            NotificationKind::Reminder => "reminder",
            NotificationKind::Completion => "completion",
        }
    }
}

/// Renders and records customer notifications
pub struct Notifier<'a> {
    store: &'a FleetStore,
}

impl<'a> Notifier<'a> {
    pub fn new(store: &'a FleetStore) -> Self {
        Self { store }
    }

    /// Send a notification for a booking.
    ///
    /// Looks up the booking, vehicle, and center, renders the template,
    /// logs the (mocked) delivery, and appends a notification record.
    pub fn send(
        &self,
        booking_id: &str,
        kind: NotificationKind,
        now: DateTime<Utc>,
    ) -> Result<NotificationRecord, NotifyError> {
        let booking = self
            .store
            .get_booking(booking_id)?
            .ok_or_else(|| NotifyError::BookingNotFound(booking_id.to_string()))?;
        let vehicle = self
            .store
            .get_vehicle(&booking.vehicle_id)?
            .ok_or_else(|| NotifyError::VehicleNotFound(booking_id.to_string()))?;
        let center_name = self
            .store
            .get_center(&booking.center_id)?
            .map(|c| c.name)
            .unwrap_or_else(|| booking.center_id.clone());

        let message = render_message(kind, &booking, &vehicle.owner_name, &center_name);

        info!(
            "Notification sent to {} ({}): booking {}",
            vehicle.owner_contact,
            kind.as_str(),
            booking.booking_id
        );

        let record = NotificationRecord {
            booking_id: booking.booking_id.clone(),
            recipient_name: vehicle.owner_name,
            recipient_contact: vehicle.owner_contact,
            recipient_email: vehicle.owner_email,
            kind: kind.as_str().to_string(),
            message,
            status: "sent".to_string(),
            sent_at: now,
        };
        self.store.insert_notification(record.clone())?;
        Ok(record)
    }
}

fn render_message(
    kind: NotificationKind,
    booking: &Booking,
    owner_name: &str,
    center_name: &str,
) -> String {
    let slot = booking.slot_start.format("%B %d, %Y at %H:%M");
    match kind {
        NotificationKind::BookingConfirmation => format!(
            "Dear {}, your maintenance appointment is confirmed for {} at {}. \
             Booking ID: {}. Please arrive 10 minutes early.",
            owner_name, slot, center_name, booking.booking_id
        ),
        NotificationKind::Reminder => format!(
            "Reminder: your maintenance appointment is on {} at {}. Booking ID: {}.",
            slot, center_name, booking.booking_id
        ),
        NotificationKind::Completion => format!(
            "Service for your vehicle is complete and ready for pickup at {}. Booking ID: {}.",
            center_name, booking.booking_id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use storage::{CustomerTier, NewBooking, NewFlag, ServiceCenter, SeverityLevel, Vehicle};

    fn setup() -> (FleetStore, String) {
        let store = FleetStore::new();
        store
            .insert_center(ServiceCenter {
                center_id: "SC01".to_string(),
                name: "FleetCare North".to_string(),
                region: "north".to_string(),
                location: "Depot Road".to_string(),
                latitude: 0.0,
                longitude: 0.0,
                capacity_bays: 5,
                open_hour: 8,
                close_hour: 18,
                contact_phone: String::new(),
                is_active: true,
            })
            .unwrap();
        store
            .upsert_vehicle(Vehicle {
                vehicle_id: "V001".to_string(),
                vin: "VINV001".to_string(),
                model: "Test Model".to_string(),
                year: 2023,
                owner_name: "Asha Rao".to_string(),
                owner_contact: "+91-9000000001".to_string(),
                owner_email: Some("asha@example.com".to_string()),
                region: "north".to_string(),
                mileage: 40_000,
                last_service_date: None,
                customer_tier: CustomerTier::Premium,
            })
            .unwrap();
        let flag = store
            .insert_flag(NewFlag {
                vehicle_id: "V001".to_string(),
                flagged_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
                confidence: 0.9,
                risk_factors: vec![],
                severity_score: 70.0,
            })
            .unwrap();
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let booking = store
            .commit_booking(
                NewBooking {
                    vehicle_id: "V001".to_string(),
                    center_id: "SC01".to_string(),
                    tech_id: None,
                    slot_start: start,
                    slot_end: start + Duration::minutes(60),
                    priority_score: 60.0,
                    severity_level: SeverityLevel::High,
                    service_type: "general_inspection".to_string(),
                    created_at: start,
                },
                flag.flag_id,
            )
            .unwrap();
        (store, booking.booking_id)
    }

    #[test]
    fn test_confirmation_notification_recorded() {
        let (store, booking_id) = setup();
        let notifier = Notifier::new(&store);
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let record = notifier
            .send(&booking_id, NotificationKind::BookingConfirmation, now)
            .unwrap();

        assert_eq!(record.recipient_name, "Asha Rao");
        assert_eq!(record.kind, "booking_confirmation");
        assert!(record.message.contains(&booking_id));
        assert!(record.message.contains("FleetCare North"));

        let log = store.list_notifications(Some(&booking_id), 10).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].status, "sent");
    }

    #[test]
    fn test_unknown_booking_errors() {
        let (store, _) = setup();
        let notifier = Notifier::new(&store);
        let now = Utc::now();

        let err = notifier
            .send("BKG-MISSING", NotificationKind::Reminder, now)
            .unwrap_err();
        assert!(matches!(err, NotifyError::BookingNotFound(_)));
        assert!(store.list_notifications(None, 10).unwrap().is_empty());
    }
}
