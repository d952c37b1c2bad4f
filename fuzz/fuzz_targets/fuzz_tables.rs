#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = hullsprite_spec::OverrideTable::from_json(text, "fuzz");
        let _ = hullsprite_spec::SizeTable::from_json(text, "fuzz");
        let _ = hullsprite_spec::TypeCatalog::from_json(text, "fuzz");
    }
});
