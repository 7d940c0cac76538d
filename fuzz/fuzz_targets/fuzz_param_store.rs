//! Fuzz target: `ParamStore` load from arbitrary EEPROM contents
//!
//! The first two fuzz bytes select the format tag; the rest become the
//! device image. Verifies:
//! - No panics under arbitrary stored bytes (tag match or mismatch)
//! - Every loaded value fits its field and contains no NUL
//! - A persist straight after init writes nothing
//! - A set / reboot cycle reads back what was set
//!
//! cargo fuzz run fuzz_param_store

#![no_main]

use libfuzzer_sys::fuzz_target;
use plugcore::adapters::eeprom::RamEeprom;
use plugcore::adapters::portal::NullPortal;
use plugcore::params::{FieldSpec, ParamStore};

const SCHEMA: [FieldSpec; 4] = [
    FieldSpec::new("name", "Device name", 16),
    FieldSpec::new("host", "Host", 32),
    FieldSpec::new("user", "User", 8),
    FieldSpec::new("pass", "Password", 24),
];

const DEVICE_LEN: usize = 96;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let tag = u16::from_le_bytes([data[0], data[1]]);
    let mut image = [0xFFu8; DEVICE_LEN];
    let n = (data.len() - 2).min(DEVICE_LEN);
    image[..n].copy_from_slice(&data[2..2 + n]);

    let mut store = match ParamStore::init(RamEeprom::from_bytes(&image), tag, &SCHEMA, NullPortal) {
        Ok(s) => s,
        Err(e) => panic!("init failed on a large enough medium: {e}"),
    };

    for (i, spec) in SCHEMA.iter().enumerate() {
        let value = store.get_setting(i).unwrap_or_default();
        assert!(value.len() <= spec.capacity(), "field {i} overflows");
        assert!(!value.contains(&0), "field {i} holds a NUL");
    }

    let writes = store.medium().byte_writes();
    assert_eq!(store.persist(), Ok(0), "persist after init must be a no-op");
    assert_eq!(store.medium().byte_writes(), writes);

    // Round trip one field through a reboot.
    let index = data[0] as usize % SCHEMA.len();
    let value: Vec<u8> = data[2..].iter().copied().filter(|&b| b != 0).take(40).collect();
    assert_eq!(store.set_setting(index, &value), Ok(true));

    let cap = SCHEMA[index].capacity();
    let store = match ParamStore::init(store.into_medium(), tag, &SCHEMA, NullPortal) {
        Ok(s) => s,
        Err(e) => panic!("re-init failed: {e}"),
    };
    assert_eq!(store.get_setting(index), Some(&value[..value.len().min(cap)]));
});
