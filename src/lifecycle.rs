//! Lifecycle event names and field classification
//!
//! The set of recognized lifecycle names is fixed and closed: a field whose
//! name is not in this set and is not the reserved data field is a custom
//! field. Classification happens once per field name and the result is
//! carried through the merge loop as an explicit discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved name of the page data field
pub const DATA_FIELD: &str = "data";

/// The closed set of lifecycle events a page descriptor can subscribe to
///
/// Each variant corresponds to one host-framework callback field. The host
/// invokes these at times of its own choosing; the composer only fixes the
/// dispatch order when several descriptors subscribe to the same event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// Page load (`onLoad`)
    #[serde(rename = "onLoad")]
    Load,
    /// Page became visible (`onShow`)
    #[serde(rename = "onShow")]
    Show,
    /// Initial render finished (`onReady`)
    #[serde(rename = "onReady")]
    Ready,
    /// Page became hidden (`onHide`)
    #[serde(rename = "onHide")]
    Hide,
    /// Page torn down (`onUnload`)
    #[serde(rename = "onUnload")]
    Unload,
    /// Pull-down refresh gesture (`onPullDownRefresh`)
    #[serde(rename = "onPullDownRefresh")]
    PullDownRefresh,
    /// Scrolled to the bottom (`onReachBottom`)
    #[serde(rename = "onReachBottom")]
    ReachBottom,
    /// Share request (`onShareAppMessage`)
    #[serde(rename = "onShareAppMessage")]
    ShareAppMessage,
    /// Page scrolled (`onPageScroll`)
    #[serde(rename = "onPageScroll")]
    PageScroll,
    /// Viewport resized (`onResize`)
    #[serde(rename = "onResize")]
    Resize,
    /// Tab bar item tapped (`onTabItemTap`)
    #[serde(rename = "onTabItemTap")]
    TabItemTap,
}

impl LifecycleEvent {
    /// All recognized lifecycle events, in canonical order
    pub const ALL: [LifecycleEvent; 11] = [
        LifecycleEvent::Load,
        LifecycleEvent::Show,
        LifecycleEvent::Ready,
        LifecycleEvent::Hide,
        LifecycleEvent::Unload,
        LifecycleEvent::PullDownRefresh,
        LifecycleEvent::ReachBottom,
        LifecycleEvent::ShareAppMessage,
        LifecycleEvent::PageScroll,
        LifecycleEvent::Resize,
        LifecycleEvent::TabItemTap,
    ];

    /// The host-framework field name for this event
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Load => "onLoad",
            LifecycleEvent::Show => "onShow",
            LifecycleEvent::Ready => "onReady",
            LifecycleEvent::Hide => "onHide",
            LifecycleEvent::Unload => "onUnload",
            LifecycleEvent::PullDownRefresh => "onPullDownRefresh",
            LifecycleEvent::ReachBottom => "onReachBottom",
            LifecycleEvent::ShareAppMessage => "onShareAppMessage",
            LifecycleEvent::PageScroll => "onPageScroll",
            LifecycleEvent::Resize => "onResize",
            LifecycleEvent::TabItemTap => "onTabItemTap",
        }
    }

    /// Look up an event by its host-framework field name
    ///
    /// Returns `None` for any name outside the closed set; such names are
    /// custom fields by definition.
    pub fn from_name(name: &str) -> Option<Self> {
        LifecycleEvent::ALL
            .iter()
            .copied()
            .find(|event| event.as_str() == name)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a descriptor field name
///
/// Computed once per name and carried through the merge loop instead of
/// re-checking string membership at every use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// A recognized lifecycle field
    Lifecycle(LifecycleEvent),
    /// The reserved page data field
    Data,
    /// Anything else
    Custom,
}

impl FieldClass {
    /// Classify a field name against the closed lifecycle set and the
    /// reserved data-field name
    pub fn classify(name: &str) -> Self {
        if let Some(event) = LifecycleEvent::from_name(name) {
            FieldClass::Lifecycle(event)
        } else if name == DATA_FIELD {
            FieldClass::Data
        } else {
            FieldClass::Custom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn name_round_trip_covers_every_event() {
        for event in LifecycleEvent::ALL {
            assert_eq!(LifecycleEvent::from_name(event.as_str()), Some(event));
        }
    }

    #[test]
    fn serde_names_match_host_field_names() {
        for event in LifecycleEvent::ALL {
            let json = serde_json::to_value(event).unwrap();
            assert_eq!(json, serde_json::Value::String(event.as_str().to_string()));
        }
    }

    #[test_case("onLoad", FieldClass::Lifecycle(LifecycleEvent::Load))]
    #[test_case("onTabItemTap", FieldClass::Lifecycle(LifecycleEvent::TabItemTap))]
    #[test_case("data", FieldClass::Data)]
    #[test_case("initData", FieldClass::Custom)]
    #[test_case("onload", FieldClass::Custom; "lifecycle names are case sensitive")]
    #[test_case("helper", FieldClass::Custom)]
    fn classification_is_by_exact_name(name: &str, expected: FieldClass) {
        assert_eq!(FieldClass::classify(name), expected);
    }

    #[test]
    fn the_lifecycle_set_is_closed() {
        assert_eq!(LifecycleEvent::ALL.len(), 11);
        assert_eq!(LifecycleEvent::from_name("onRouteDone"), None);
        assert_eq!(LifecycleEvent::from_name(""), None);
    }
}
