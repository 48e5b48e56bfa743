// ── Pack tree transformations ──
//
// The "modify" step of each read-modify-write cycle. Every function works
// on a freshly fetched copy of the tree and touches nothing but the
// addressed headset on the primary base station.

use crate::error::CoreError;
use crate::model::{
    BusLabel, CHANNEL_SLOTS, ChannelTarget, Headset, HeadsetSelector, PackInfo, Role, TalkMode,
};

/// Resolve `selector` against the primary station of `pack`.
pub fn locate_headset<'a>(
    pack: &'a mut PackInfo,
    selector: &HeadsetSelector,
) -> Result<&'a mut Headset, CoreError> {
    pack.primary_mut()
        .and_then(|bs| bs.headsets.iter_mut().find(|h| selector.matches(h)))
        .ok_or_else(|| CoreError::HeadsetNotFound {
            identifier: selector.to_string(),
        })
}

pub fn rename_headset(
    pack: &mut PackInfo,
    selector: &HeadsetSelector,
    name: &str,
) -> Result<u32, CoreError> {
    let headset = locate_headset(pack, selector)?;
    headset.name = name.to_owned();
    Ok(headset.id)
}

/// Move `bus` to `target`, clearing it from every slot it held first.
///
/// An out-of-range slot is rejected before the tree is touched.
pub fn assign_channel(
    pack: &mut PackInfo,
    selector: &HeadsetSelector,
    bus: BusLabel,
    target: ChannelTarget,
) -> Result<u32, CoreError> {
    let target = target.validate()?;
    let headset = locate_headset(pack, selector)?;
    reassign_bus(&mut headset.channel, bus, target)?;
    Ok(headset.id)
}

/// Clear `bus` from `slots`, then write it into `target` unless that is
/// `ChannelTarget::None`. A short slot list is padded to the full width.
pub fn reassign_bus(
    slots: &mut Vec<String>,
    bus: BusLabel,
    target: ChannelTarget,
) -> Result<(), CoreError> {
    let target = target.validate()?;
    let label = bus.as_str();
    for slot in slots.iter_mut().filter(|s| s.as_str() == label) {
        slot.clear();
    }
    if let Some(index) = target.index() {
        if slots.len() < CHANNEL_SLOTS {
            slots.resize(CHANNEL_SLOTS, String::new());
        }
        if let Some(slot) = slots.get_mut(index) {
            label.clone_into(slot);
        }
    }
    Ok(())
}

/// Overwrite the headset's embedded role copy with `role`.
pub fn assign_role(
    pack: &mut PackInfo,
    selector: &HeadsetSelector,
    role: &Role,
    head: bool,
) -> Result<u32, CoreError> {
    let headset = locate_headset(pack, selector)?;
    let extra = headset
        .role
        .take()
        .map(|r| r.extra)
        .unwrap_or_default();
    let mut embedded = role.to_ref(head);
    embedded.extra = extra;
    headset.role = Some(embedded);
    Ok(headset.id)
}

pub fn set_talk_mode(
    pack: &mut PackInfo,
    selector: &HeadsetSelector,
    mode: TalkMode,
) -> Result<u32, CoreError> {
    let headset = locate_headset(pack, selector)?;
    headset.talk_mode = mode.code();
    Ok(headset.id)
}

/// Find a role in the catalog by exact name.
pub fn find_role<'a>(roles: &'a [Role], name: &str) -> Result<&'a Role, CoreError> {
    roles
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| CoreError::RoleNotFound {
            name: name.to_owned(),
        })
}
