//! Integration tests for the configuration-portal save flow.
//!
//! Verifies the end-to-end sequence: the store registers its fields with
//! the portal, the user edits and saves, the host loop applies the save,
//! the values survive a reboot, and the form keeps showing what the store
//! holds.

use plugcore::adapters::eeprom::RamEeprom;
use plugcore::adapters::portal::{FormPortal, PortalError};
use plugcore::drivers::button::PressEvent;
use plugcore::params::{FieldSpec, ParamStore};

use crate::mock_hw::ButtonRig;

const TAG: u16 = 0xFA01;

const SCHEMA: [FieldSpec; 3] = [
    FieldSpec::new("name", "Device name", 16),
    FieldSpec::new("ctrl_host", "Controller host", 24),
    FieldSpec::new("ctrl_pass", "Controller password", 16).with_render_hint("type=\"password\""),
];

fn boot(medium: RamEeprom) -> ParamStore<RamEeprom, FormPortal> {
    ParamStore::init(medium, TAG, &SCHEMA, FormPortal::new()).unwrap()
}

#[test]
fn init_registers_every_field_with_current_value() {
    let mut store = boot(RamEeprom::new(128));
    store.set_setting(0, b"kitchen").unwrap();

    let store = boot(store.into_medium());
    let portal = store.portal();
    let fields = portal.fields();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].spec.id, "name");
    assert_eq!(fields[2].spec.render_hint, "type=\"password\"");
    assert_eq!(portal.value("name"), Some(&b"kitchen"[..]));
    assert_eq!(portal.value("ctrl_host"), Some(&b""[..]));
}

#[test]
fn saved_edits_are_persisted_and_survive_reboot() {
    let mut store = boot(RamEeprom::new(128));

    let portal = store.portal_mut();
    portal.submit("ctrl_host", b"192.168.1.20").unwrap();
    portal.submit("ctrl_pass", b"hunter2").unwrap();
    portal.save();
    assert_eq!(store.apply_portal_edits(), Ok(true));

    assert_eq!(store.get_setting_str(1), Some("192.168.1.20"));
    assert_eq!(store.portal().value("ctrl_host"), Some(&b"192.168.1.20"[..]));

    let store = boot(store.into_medium());
    assert_eq!(store.get_setting_str(0), Some(""));
    assert_eq!(store.get_setting_str(1), Some("192.168.1.20"));
    assert_eq!(store.get_setting_str(2), Some("hunter2"));
}

#[test]
fn set_setting_is_visible_in_form() {
    let mut store = boot(RamEeprom::new(128));
    store.set_setting(0, b"kitchen").unwrap();
    assert_eq!(store.portal().value("name"), Some(&b"kitchen"[..]));

    store.reset_all().unwrap();
    assert_eq!(store.portal().value("name"), Some(&b""[..]));
}

#[test]
fn discarded_input_never_reaches_form_or_store() {
    let mut store = boot(RamEeprom::new(128));
    store.set_setting(0, b"kitchen").unwrap();

    let portal = store.portal_mut();
    portal.submit("name", b"typo").unwrap();
    assert_eq!(portal.value("name"), Some(&b"kitchen"[..]));
    portal.discard();

    // A later save that does not touch the field keeps both in agreement.
    let portal = store.portal_mut();
    portal.submit("ctrl_host", b"hub.local").unwrap();
    portal.save();
    assert_eq!(store.apply_portal_edits(), Ok(true));

    assert_eq!(store.get_setting_str(0), Some("kitchen"));
    assert_eq!(store.portal().value("name"), Some(&b"kitchen"[..]));
    assert_eq!(store.portal().value("ctrl_host"), Some(&b"hub.local"[..]));
}

#[test]
fn save_without_changes_does_not_write() {
    let mut store = boot(RamEeprom::new(128));
    let flushes = store.medium().flushes();

    store.portal_mut().submit("name", b"").unwrap();
    store.portal_mut().save();
    assert_eq!(store.apply_portal_edits(), Ok(true));
    assert_eq!(store.medium().flushes(), flushes);
}

#[test]
fn nothing_applied_until_saved() {
    let mut store = boot(RamEeprom::new(128));
    store.portal_mut().submit("name", b"den").unwrap();
    assert_eq!(store.apply_portal_edits(), Ok(false));
    assert_eq!(store.get_setting_str(0), Some(""));
}

#[test]
fn oversized_submission_is_rejected_by_form() {
    let mut store = boot(RamEeprom::new(128));
    assert_eq!(
        store.portal_mut().submit("ctrl_pass", b"this password is too long"),
        Err(PortalError::TooLong)
    );
}

#[test]
fn long_press_opens_portal_and_save_reaches_store() {
    // Host-loop composition: a long press enables the portal, the user
    // saves, and the loop applies the save.
    let mut store = boot(RamEeprom::new(128));
    let mut rig = ButtonRig::new(true);

    rig.press();
    rig.tick_at(0);
    rig.tick_at(2000);
    assert_eq!(rig.events(), vec![PressEvent::Long]);

    store.portal_mut().submit("name", b"living room").unwrap();
    store.portal_mut().save();
    rig.release();
    rig.tick_at(2100);

    assert_eq!(store.apply_portal_edits(), Ok(true));
    assert_eq!(store.get_setting_str(0), Some("living room"));
    assert_eq!(rig.events().len(), 1);
}
