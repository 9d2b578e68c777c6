//! Response view models
//!
//! Handlers never return raw rows for public pages. These types carry the
//! display labels and fallbacks clients render directly.

pub mod event_card;
pub mod list_page;
pub mod profile_card;

use serde::{Deserialize, Serialize};

pub use event_card::{EventCard, EventDetail};
pub use list_page::EventListPage;
pub use profile_card::ProfileCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// Transient notification attached to mutation responses and error bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Error, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Info, message: message.into() }
    }
}

/// Payload plus an optional toast
#[derive(Debug, Clone, Serialize)]
pub struct WithToast<T> {
    #[serde(flatten)]
    pub data: T,
    pub toast: Option<Toast>,
}

impl<T> WithToast<T> {
    pub fn new(data: T, toast: Toast) -> Self {
        Self { data, toast: Some(toast) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_serializes_lowercase_kind() {
        let json = serde_json::to_value(Toast::error("Nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "error", "message": "Nope" }));
    }

    #[test]
    fn test_with_toast_flattens_payload() {
        #[derive(Serialize)]
        struct Payload {
            id: u32,
        }

        let json = serde_json::to_value(WithToast::new(Payload { id: 7 }, Toast::success("Saved"))).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["toast"]["kind"], "success");
    }
}
