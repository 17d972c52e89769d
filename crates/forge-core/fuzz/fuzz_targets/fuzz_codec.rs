#![no_main]
use forge_core::codec::{from_storage_order, to_storage_order};
use libfuzzer_sys::fuzz_target;
use uuid::Uuid;

fuzz_target!(|data: [u8; 16]| {
    let id = Uuid::from_bytes(data);
    assert_eq!(from_storage_order(to_storage_order(id)), id);
});
