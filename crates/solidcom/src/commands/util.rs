//! Shared helpers for command handlers.

use std::sync::Arc;

use solidcom_core::{Controller, HeadsetSelector, PackSnapshot};

use crate::cli::{GlobalOpts, HeadsetArg};
use crate::error::CliError;
use crate::output;

/// Turn the positional headset argument into a selector.
pub fn selector(arg: &HeadsetArg) -> Result<HeadsetSelector, CliError> {
    if arg.by_id {
        let id = arg
            .headset
            .trim()
            .parse::<u32>()
            .map_err(|_| CliError::Validation {
                field: "headset".into(),
                reason: format!("'{}' is not a numeric ID", arg.headset),
            })?;
        Ok(HeadsetSelector::Id(id))
    } else {
        Ok(HeadsetSelector::Name(arg.headset.clone()))
    }
}

/// The cached snapshot, fetching once if the connect-time refresh failed.
pub async fn snapshot(controller: &Controller) -> Result<Arc<PackSnapshot>, CliError> {
    if let Some(snapshot) = controller.store().snapshot() {
        return Ok(snapshot);
    }
    controller.refresh().await?;
    controller
        .store()
        .snapshot()
        .ok_or_else(|| CliError::Internal("device returned no pack info".into()))
}

pub fn color(global: &GlobalOpts) -> bool {
    output::should_color(global.color)
}

/// Bus slots as 1-based positions, e.g. "1 3", or "-".
pub fn slot_list(slots: &[usize]) -> String {
    if slots.is_empty() {
        return "-".into();
    }
    slots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn arg(headset: &str, by_id: bool) -> HeadsetArg {
        HeadsetArg {
            headset: headset.into(),
            by_id,
        }
    }

    #[test]
    fn selector_by_name_and_id() {
        assert_eq!(
            selector(&arg("Camera 1", false)).unwrap(),
            HeadsetSelector::Name("Camera 1".into())
        );
        assert_eq!(selector(&arg(" 7 ", true)).unwrap(), HeadsetSelector::Id(7));
        assert!(matches!(
            selector(&arg("seven", true)),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn slot_lists() {
        assert_eq!(slot_list(&[]), "-");
        assert_eq!(slot_list(&[1, 3]), "1 3");
    }
}
