// ── Published variables ──
//
// Flattens a pack snapshot into the named values the host shows on
// buttons, together with the definitions (id + label) it registers.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::{BaseStation, BusLabel, Headset, PackInfo};

/// A variable's value: device numbers stay numbers, everything else is text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariableValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u8> for VariableValue {
    fn from(n: u8) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<u32> for VariableValue {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<&str> for VariableValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for VariableValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableDefinition {
    pub variable_id: String,
    pub name: String,
}

/// Every variable derived from one snapshot.
///
/// Definitions keep derivation order (stations, then their headsets);
/// values are keyed by variable id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariableSet {
    definitions: Vec<VariableDefinition>,
    values: BTreeMap<String, VariableValue>,
}

impl VariableSet {
    pub fn get(&self, variable_id: &str) -> Option<&VariableValue> {
        self.values.get(variable_id)
    }

    pub fn definitions(&self) -> &[VariableDefinition] {
        &self.definitions
    }

    pub fn values(&self) -> &BTreeMap<String, VariableValue> {
        &self.values
    }

    /// `(definition, value)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&VariableDefinition, &VariableValue)> {
        self.definitions
            .iter()
            .filter_map(|d| self.values.get(&d.variable_id).map(|v| (d, v)))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Ids whose value differs from `previous` (including ids that are new).
    pub fn changed_since<'a>(&'a self, previous: &VariableSet) -> Vec<&'a str> {
        self.values
            .iter()
            .filter(|(id, value)| previous.values.get(*id) != Some(*value))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    fn push(&mut self, prefix: &str, suffix: &str, label: &str, value: impl Into<VariableValue>) {
        let variable_id = format!("{prefix}_{suffix}");
        self.definitions.push(VariableDefinition {
            variable_id: variable_id.clone(),
            name: format!("{prefix} - {label}"),
        });
        self.values.insert(variable_id, value.into());
    }
}

/// Derive the variable set for every base station in `pack`.
pub fn derive_variables(pack: &PackInfo) -> VariableSet {
    let mut set = VariableSet::default();
    for station in &pack.base_stations {
        push_station(&mut set, station);
        for headset in &station.headsets {
            push_headset(&mut set, headset);
        }
    }
    set
}

fn push_station(set: &mut VariableSet, station: &BaseStation) {
    let prefix = format!("BaseStation_{}", station.id);
    set.push(&prefix, "Name", "Name", station.name.as_str());
    set.push(&prefix, "Online", "Online", station.online);
    set.push(&prefix, "Cascade", "Cascade", station.cascade);
    set.push(&prefix, "Roam", "Roam", station.roam);
    set.push(&prefix, "SN", "SN", station.serial_number.as_str());
    set.push(&prefix, "IP", "IP", station.ip.as_str());
}

fn push_headset(set: &mut VariableSet, headset: &Headset) {
    let prefix = format!("Headset_{}", headset.id);
    set.push(&prefix, "Name", "Name", headset.name.as_str());
    set.push(&prefix, "Online", "Online", headset.online);
    set.push(&prefix, "Cell", "Cell", headset.cell);
    set.push(&prefix, "RSSI", "RSSI", headset.rssi);

    if let Some(ref role) = headset.role {
        set.push(&prefix, "RoleID", "Role ID", role.id);
        set.push(&prefix, "RoleName", "Role Name", role.name.as_str());
        set.push(&prefix, "RoleHead", "Role Head", role.head);
    }

    if headset.channel.is_empty() {
        return;
    }
    for (i, label) in headset.channel.iter().enumerate() {
        let n = i + 1;
        set.push(
            &prefix,
            &format!("Channel{n}"),
            &format!("Channel {n}"),
            label.as_str(),
        );
    }
    for bus in [BusLabel::A, BusLabel::B] {
        let slots = headset.slots_for(bus.as_str());
        let value = if slots.is_empty() {
            "-".to_owned()
        } else {
            slots
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        };
        set.push(
            &prefix,
            &format!("Com_{bus}"),
            &format!("Com {bus} Channels"),
            value,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn pack() -> PackInfo {
        serde_json::from_value(json!([{
            "id": 1, "name": "BS-1", "online": 1, "cascade": 0, "roam": 1,
            "sn": "SC0042", "ip": "192.168.218.10",
            "PP": [
                { "id": 3, "name": "Director", "online": 1, "cell": 6, "rssi": 4,
                  "role": { "id": 1, "name": "Production", "head": 1 },
                  "talkMode": 2, "channel": ["A", "", "A", "B", "", ""], "type": 0 },
                { "id": 4, "name": "Spare", "online": 0, "cell": 0, "rssi": 0,
                  "talkMode": 1, "channel": ["", "", "", "", "", ""], "type": 0 },
                { "id": 90, "name": "4WIRE_OUT", "type": 1 }
            ]
        }]))
        .unwrap()
    }

    #[test]
    fn station_and_headset_values() {
        let vars = derive_variables(&pack());
        assert_eq!(vars.get("BaseStation_1_SN"), Some(&"SC0042".into()));
        assert_eq!(vars.get("BaseStation_1_Roam"), Some(&VariableValue::Number(1)));
        assert_eq!(vars.get("Headset_3_RoleName"), Some(&"Production".into()));
        assert_eq!(vars.get("Headset_3_RoleHead"), Some(&VariableValue::Number(1)));
        assert_eq!(vars.get("Headset_3_Channel4"), Some(&"B".into()));
        assert_eq!(vars.get("Headset_3_Channel2"), Some(&"".into()));
    }

    #[test]
    fn com_variables_list_slots_or_dash() {
        let vars = derive_variables(&pack());
        assert_eq!(vars.get("Headset_3_Com_A").unwrap().to_string(), "1 3");
        assert_eq!(vars.get("Headset_3_Com_B").unwrap().to_string(), "4");
        assert_eq!(vars.get("Headset_4_Com_A").unwrap().to_string(), "-");
    }

    #[test]
    fn role_variables_only_when_role_present() {
        let vars = derive_variables(&pack());
        assert!(vars.get("Headset_4_RoleID").is_none());
        assert!(vars.get("Headset_4_Name").is_some());
    }

    #[test]
    fn fixed_endpoints_have_no_variables() {
        let vars = derive_variables(&pack());
        assert!(vars.values().keys().all(|k| !k.starts_with("Headset_90_")));
    }

    #[test]
    fn definitions_carry_labels_in_order() {
        let vars = derive_variables(&pack());
        let first = &vars.definitions()[0];
        assert_eq!(first.variable_id, "BaseStation_1_Name");
        assert_eq!(first.name, "BaseStation_1 - Name");
        let com = vars
            .definitions()
            .iter()
            .find(|d| d.variable_id == "Headset_3_Com_B")
            .unwrap();
        assert_eq!(com.name, "Headset_3 - Com B Channels");
        assert_eq!(vars.len(), vars.values().len());
    }

    #[test]
    fn changed_since_reports_differences() {
        let before = derive_variables(&pack());
        let mut renamed = pack();
        renamed.primary_mut().unwrap().headsets[0].name = "Stage".into();
        let after = derive_variables(&renamed);
        assert_eq!(after.changed_since(&before), ["Headset_3_Name"]);
        assert!(after.changed_since(&after).is_empty());
    }
}
