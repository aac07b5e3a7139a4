use std::path::Path;

use implant_probe::io::Format;

pub fn input(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "lammpstrj" | "dump" => Some(Format::LammpsDump),
        "data" | "lmp" => Some(Format::LammpsData),
        "xyz" | "csv" | "tsv" => Some(Format::PointList),
        _ => None,
    }
}
