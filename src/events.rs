use std::sync::Mutex;

use tracing::debug;

/// Named cross-surface notifications. Payloads are plain primitives; a
/// subscriber that needs more re-reads the database on receipt.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    DataChanged,
    MedicineDispensed { medicine: String },
    UserCreated { username: String },
    PatientSelected { patient_id: i64 },
}

type Subscriber = Box<dyn Fn(&AppEvent) + Send + Sync>;

/// Session-scoped publish point. Instances are injected through app data so
/// tests can build isolated buses. Emission is synchronous fire-and-forget;
/// subscribers guard their own failures.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(Box::new(subscriber));
        }
    }

    pub fn emit(&self, event: AppEvent) {
        debug!(?event, "emit");
        if let Ok(subs) = self.subscribers.lock() {
            for sub in subs.iter() {
                sub(&event);
            }
        }
    }
}
