// ── Option choices ──
//
// Selection lists the host offers for headset and role pickers, built
// from whatever is cached. An empty cache yields a single placeholder so
// pickers are never blank.

use serde::Serialize;

use crate::model::{BaseStation, Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

impl Choice {
    fn placeholder(label: &str) -> Self {
        Self {
            id: String::new(),
            label: label.to_owned(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

pub const NO_HEADSETS: &str = "No headsets found - refresh variables first";
pub const NO_ROLES: &str = "No roles found - refresh variables first";

/// Beltpacks (`type == 0`) of the cached station, keyed by name.
pub fn headset_choices(station: Option<&BaseStation>) -> Vec<Choice> {
    let choices: Vec<Choice> = station
        .into_iter()
        .flat_map(|bs| bs.headsets.iter())
        .filter(|h| h.device_type == 0)
        .map(|h| Choice {
            id: h.name.clone(),
            label: format!("{} (ID: {})", h.name, h.id),
        })
        .collect();

    if choices.is_empty() {
        vec![Choice::placeholder(NO_HEADSETS)]
    } else {
        choices
    }
}

/// Named roles from the cached catalog.
pub fn role_choices(roles: &[Role]) -> Vec<Choice> {
    let choices: Vec<Choice> = roles
        .iter()
        .filter(|r| !r.name.is_empty())
        .map(|r| Choice {
            id: r.name.clone(),
            label: r.name.clone(),
        })
        .collect();

    if choices.is_empty() {
        vec![Choice::placeholder(NO_ROLES)]
    } else {
        choices
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::PackInfo;

    #[test]
    fn headset_choices_skip_non_beltpacks() {
        let pack: PackInfo = serde_json::from_value(json!([{
            "id": 1, "name": "BS-1",
            "PP": [
                { "id": 1, "name": "Director", "type": 0 },
                { "id": 7, "name": "Hub", "type": 4 },
                { "id": 90, "name": "UAC_IN", "type": 0 }
            ]
        }]))
        .unwrap();

        let choices = headset_choices(pack.primary());
        assert_eq!(
            choices,
            [Choice {
                id: "Director".into(),
                label: "Director (ID: 1)".into()
            }]
        );
    }

    #[test]
    fn empty_cache_yields_placeholders() {
        let headsets = headset_choices(None);
        assert_eq!(headsets.len(), 1);
        assert!(headsets[0].is_placeholder());
        assert_eq!(headsets[0].label, NO_HEADSETS);

        let roles = role_choices(&[]);
        assert_eq!(roles[0].label, NO_ROLES);
    }

    #[test]
    fn role_choices_skip_unnamed() {
        let roles: Vec<Role> = serde_json::from_value(json!([
            { "id": 1, "name": "Production" },
            { "id": 2, "name": "" }
        ]))
        .unwrap();
        let choices = role_choices(&roles);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].id, "Production");
    }
}
