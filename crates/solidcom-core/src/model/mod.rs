// ── Domain model ──
//
// Typed views over the device's numeric and string codes. The wire
// structs themselves live in `solidcom_api::models` and are re-exported
// here so consumers only need this crate.

mod headset;

pub use headset::{BusLabel, ChannelTarget, HeadsetSelector, TalkMode};
pub use solidcom_api::models::{
    BaseStation, CHANNEL_SLOTS, FIXED_ENDPOINT_NAMES, Headset, PackInfo, Role, RoleRef,
    is_fixed_endpoint,
};
