#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mesh) = hullsprite_cli::analysis::stl::parse_stl(data, Path::new("fuzz.stl")) {
        if let Ok(extent) = mesh.extent() {
            let plan = hullsprite_spec::choose_orientation(&extent, None);
            let _ = mesh.rotated_extent(&plan);
        }
    }
});
