//! Alert request contract for the notification pipeline.
//!
//! The engine does not deliver notifications. When a verdict is an accident,
//! an external pipeline first asks the rider to confirm they are fine, and
//! only if they do not cancel within [`CANCEL_WINDOW_SECS`] does it alert
//! emergency contacts. This module defines the JSON request that pipeline
//! consumes.

use serde::{Deserialize, Serialize};

use crate::types::{DangerLevel, DangerResult};

/// Seconds the rider has to cancel before contacts are alerted.
pub const CANCEL_WINDOW_SECS: u64 = 30;

/// Which stage of the notification flow a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Private prompt to the rider, who may still cancel.
    UserConfirmation,
    /// Broadcast to emergency contacts after the cancel window lapsed.
    EmergencyAlert,
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Map link for the position.
    pub fn maps_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// Request body handed to the notification pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    #[serde(rename = "emailType")]
    pub kind: AlertKind,
    pub latitude: f64,
    pub longitude: f64,
    pub danger_percentage: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(rename = "contact1", default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
}

impl AlertRequest {
    /// Builds a request for an accident verdict. Non-accidents yield `None`.
    pub fn from_verdict(verdict: &DangerResult, kind: AlertKind, at: GeoPoint) -> Option<Self> {
        if !verdict.is_accident {
            return None;
        }
        Some(Self {
            kind,
            latitude: at.latitude,
            longitude: at.longitude,
            danger_percentage: verdict.danger_percentage,
            user_email: None,
            contact: None,
            dashboard_url: None,
        })
    }

    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_dashboard_url(mut self, url: impl Into<String>) -> Self {
        self.dashboard_url = Some(url.into());
        self
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn level(&self) -> DangerLevel {
        DangerLevel::from_percentage(self.danger_percentage)
    }
}
