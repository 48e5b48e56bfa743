// Device API wire types
//
// Models for the base station's `/action/*` JSON documents. The push
// endpoints are whole-document replace, so every struct keeps the fields it
// does not model in a flattened `extra` map and writes them back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names of the fixed interface entries the device lists alongside headsets.
///
/// These are the wired four-wire and USB audio ports of the base station.
/// They are never headsets and never take part in headset lookups.
pub const FIXED_ENDPOINT_NAMES: [&str; 4] = ["4WIRE_IN", "4WIRE_OUT", "UAC_IN", "UAC_OUT"];

/// Number of channel slots on every headset.
pub const CHANNEL_SLOTS: usize = 6;

/// Returns `true` if `name` is one of the fixed interface entries.
pub fn is_fixed_endpoint(name: &str) -> bool {
    FIXED_ENDPOINT_NAMES.contains(&name)
}

// ── Pack info ────────────────────────────────────────────────────────

/// The full `getAllPpInfo` / `setPpInfo` document: one entry per base station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackInfo {
    pub base_stations: Vec<BaseStation>,
}

impl PackInfo {
    /// The station lookups and mutations operate on. Only one base
    /// station is supported; any further entries are carried but ignored.
    pub fn primary(&self) -> Option<&BaseStation> {
        self.base_stations.first()
    }

    pub fn primary_mut(&mut self) -> Option<&mut BaseStation> {
        self.base_stations.first_mut()
    }
}

// ── Base station ─────────────────────────────────────────────────────

/// A base station and the headsets registered to it.
///
/// On the wire the headsets live in `PP` together with the fixed interface
/// entries. Deserialization splits those off into a private list and
/// serialization puts them back, so a fetched document pushes back complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBaseStation", into = "RawBaseStation")]
pub struct BaseStation {
    pub id: u32,
    pub name: String,
    pub online: u8,
    pub cascade: u8,
    pub roam: u8,
    pub serial_number: String,
    pub ip: String,
    pub headsets: Vec<Headset>,
    endpoints: Vec<Headset>,
    pub extra: Map<String, Value>,
}

impl BaseStation {
    pub fn is_online(&self) -> bool {
        self.online == 1
    }

    /// The fixed interface entries split off the `PP` list.
    pub fn endpoints(&self) -> &[Headset] {
        &self.endpoints
    }

    pub fn headset_by_id(&self, id: u32) -> Option<&Headset> {
        self.headsets.iter().find(|h| h.id == id)
    }

    pub fn headset_by_name(&self, name: &str) -> Option<&Headset> {
        self.headsets.iter().find(|h| h.name == name)
    }
}

#[derive(Serialize, Deserialize)]
struct RawBaseStation {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    online: u8,
    #[serde(default)]
    cascade: u8,
    #[serde(default)]
    roam: u8,
    #[serde(default)]
    sn: String,
    #[serde(default)]
    ip: String,
    #[serde(rename = "PP", default)]
    pp: Vec<Headset>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawBaseStation> for BaseStation {
    fn from(raw: RawBaseStation) -> Self {
        let (endpoints, headsets) = raw
            .pp
            .into_iter()
            .partition(|pp: &Headset| is_fixed_endpoint(&pp.name));
        Self {
            id: raw.id,
            name: raw.name,
            online: raw.online,
            cascade: raw.cascade,
            roam: raw.roam,
            serial_number: raw.sn,
            ip: raw.ip,
            headsets,
            endpoints,
            extra: raw.extra,
        }
    }
}

impl From<BaseStation> for RawBaseStation {
    fn from(bs: BaseStation) -> Self {
        let mut pp = bs.headsets;
        pp.extend(bs.endpoints);
        Self {
            id: bs.id,
            name: bs.name,
            online: bs.online,
            cascade: bs.cascade,
            roam: bs.roam,
            sn: bs.serial_number,
            ip: bs.ip,
            pp,
            extra: bs.extra,
        }
    }
}

// ── Headset ──────────────────────────────────────────────────────────

/// A wireless beltpack (`PP` entry).
///
/// Some firmware reports an empty channel slot as `null` rather than `""`.
/// Both read as an empty string; a slot that arrived as `null` and is still
/// empty is written back as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHeadset", into = "RawHeadset")]
pub struct Headset {
    pub id: u32,
    pub name: String,
    pub online: u8,
    /// Battery level, 1-7.
    pub cell: u8,
    /// Signal strength, 0-4.
    pub rssi: u8,
    pub role: Option<RoleRef>,
    /// 1 = PTT & force listen, 2 = talk & listen, 3 = talk & force listen.
    pub talk_mode: u8,
    /// One bus label (or empty string) per channel slot.
    pub channel: Vec<String>,
    /// 0 for beltpacks.
    pub device_type: u8,
    pub extra: Map<String, Value>,
    null_slots: Vec<usize>,
}

#[derive(Serialize, Deserialize)]
struct RawHeadset {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    online: u8,
    #[serde(default)]
    cell: u8,
    #[serde(default)]
    rssi: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<RoleRef>,
    #[serde(rename = "talkMode", default)]
    talk_mode: u8,
    #[serde(default)]
    channel: Vec<Option<String>>,
    #[serde(rename = "type", default)]
    device_type: u8,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawHeadset> for Headset {
    fn from(raw: RawHeadset) -> Self {
        let null_slots = raw
            .channel
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| i)
            .collect();
        Self {
            id: raw.id,
            name: raw.name,
            online: raw.online,
            cell: raw.cell,
            rssi: raw.rssi,
            role: raw.role,
            talk_mode: raw.talk_mode,
            channel: raw.channel.into_iter().map(Option::unwrap_or_default).collect(),
            device_type: raw.device_type,
            extra: raw.extra,
            null_slots,
        }
    }
}

impl From<Headset> for RawHeadset {
    fn from(h: Headset) -> Self {
        let channel = h
            .channel
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                if slot.is_empty() && h.null_slots.contains(&i) {
                    None
                } else {
                    Some(slot)
                }
            })
            .collect();
        Self {
            id: h.id,
            name: h.name,
            online: h.online,
            cell: h.cell,
            rssi: h.rssi,
            role: h.role,
            talk_mode: h.talk_mode,
            channel,
            device_type: h.device_type,
            extra: h.extra,
        }
    }
}

impl Headset {
    pub fn is_online(&self) -> bool {
        self.online == 1
    }

    /// 1-based slot numbers currently holding `label`.
    pub fn slots_for(&self, label: &str) -> Vec<usize> {
        self.channel
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == label)
            .map(|(i, _)| i + 1)
            .collect()
    }
}

/// The role copy embedded in a headset record.
///
/// Changing the role catalog does not touch these copies; only a
/// `setPpInfo` carrying a new copy does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRef {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub head: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Role catalog ─────────────────────────────────────────────────────

/// A `getBsRole` / `setBsRole` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub head: u8,
    /// Write-only: `1` asks the device to apply the role immediately.
    #[serde(rename = "takeEffect", default, skip_serializing_if = "Option::is_none")]
    pub take_effect: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Role {
    /// The copy a headset embeds when assigned this role.
    pub fn to_ref(&self, head: bool) -> RoleRef {
        RoleRef {
            id: self.id,
            name: self.name.clone(),
            head: u8::from(head),
            extra: Map::new(),
        }
    }

    /// The record pushed to `setBsRole` so the device applies it at once.
    pub fn taking_effect(&self, head: bool) -> Self {
        Self {
            head: u8::from(head),
            take_effect: Some(1),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw_station() -> Value {
        json!([{
            "id": 1,
            "name": "BS-1",
            "online": 1,
            "cascade": 0,
            "roam": 0,
            "sn": "SN0001",
            "ip": "192.168.218.10",
            "firmware": "1.2.3",
            "PP": [
                { "id": 1, "name": "Director", "online": 1, "cell": 6, "rssi": 4,
                  "role": { "id": 2, "name": "Production", "head": 1 },
                  "talkMode": 2, "channel": ["A", "", "B", "", "", ""], "type": 0,
                  "volume": 7 },
                { "id": 90, "name": "4WIRE_IN", "type": 1 },
                { "id": 91, "name": "UAC_OUT", "type": 1 },
                { "id": 2, "name": "Camera", "online": 0, "cell": 2, "rssi": 1,
                  "talkMode": 1, "channel": ["", "", "", "", "", ""], "type": 0 }
            ]
        }])
    }

    #[test]
    fn fixed_endpoints_are_split_from_headsets() {
        let pack: PackInfo = serde_json::from_value(raw_station()).unwrap();
        let bs = pack.primary().unwrap();

        let names: Vec<&str> = bs.headsets.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Director", "Camera"]);
        assert_eq!(bs.endpoints().len(), 2);
        assert!(bs.headset_by_name("4WIRE_IN").is_none());
        assert!(bs.headset_by_id(90).is_none());
    }

    #[test]
    fn serialization_restores_endpoints_and_unknown_fields() {
        let pack: PackInfo = serde_json::from_value(raw_station()).unwrap();
        let value = serde_json::to_value(&pack).unwrap();

        let pp = value[0]["PP"].as_array().unwrap();
        assert_eq!(pp.len(), 4);
        assert!(pp.iter().any(|p| p["name"] == "4WIRE_IN"));
        assert_eq!(value[0]["firmware"], "1.2.3");
        assert_eq!(value[0]["sn"], "SN0001");
        assert_eq!(pp[0]["volume"], 7);

        let again: PackInfo = serde_json::from_value(value).unwrap();
        assert_eq!(again, pack);
    }

    #[test]
    fn null_channel_slots_read_as_empty_and_push_back_as_null() {
        let mut raw = raw_station();
        raw[0]["PP"][0]["channel"] = json!(["A", null, "", "", "", null]);
        let mut pack: PackInfo = serde_json::from_value(raw).unwrap();

        let director = pack.primary().unwrap().headset_by_id(1).unwrap();
        assert_eq!(director.channel, ["A", "", "", "", "", ""]);
        assert_eq!(director.slots_for("A"), [1]);

        let value = serde_json::to_value(&pack).unwrap();
        assert_eq!(value[0]["PP"][0]["channel"], json!(["A", null, "", "", "", null]));

        // A null slot that gets a bus is written as that bus.
        let director = pack.primary_mut().unwrap().headsets.first_mut().unwrap();
        "B".clone_into(&mut director.channel[1]);
        let value = serde_json::to_value(&pack).unwrap();
        assert_eq!(value[0]["PP"][0]["channel"], json!(["A", "B", "", "", "", null]));
    }

    #[test]
    fn slots_for_reports_one_based_positions() {
        let pack: PackInfo = serde_json::from_value(raw_station()).unwrap();
        let director = pack.primary().unwrap().headset_by_id(1).unwrap();
        assert_eq!(director.slots_for("A"), [1]);
        assert_eq!(director.slots_for("B"), [3]);
        assert!(director.slots_for("C").is_empty());
    }

    #[test]
    fn taking_effect_sets_flags_and_keeps_catalog_fields() {
        let role: Role =
            serde_json::from_value(json!({ "id": 4, "name": "Lighting", "head": 0, "color": 3 }))
                .unwrap();
        let pushed = serde_json::to_value(role.taking_effect(true)).unwrap();
        assert_eq!(
            pushed,
            json!({ "id": 4, "name": "Lighting", "head": 1, "takeEffect": 1, "color": 3 })
        );

        // Not emitted when unset.
        let plain = serde_json::to_value(&role).unwrap();
        assert!(plain.get("takeEffect").is_none());
    }
}
