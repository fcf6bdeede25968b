use std::{collections::HashSet, env, fs, path::PathBuf};

use serde::Deserialize;

/// Lowest and highest ID reserved for the standard library.
const STD_RANGE: (u16, u16) = (0x0100, 0x0FFF);

#[derive(Deserialize)]
struct SysIdDef {
    name: String,
    value: String,
    description: String,
}

fn parse_hex(hex_str: &str) -> Result<u16, std::num::ParseIntError> {
    let clean_hex = hex_str.trim().trim_start_matches("0x").replace("_", "");
    u16::from_str_radix(clean_hex.as_str(), 16)
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let defs_str = fs::read_to_string(PathBuf::from(manifest_dir).join("sys_ids.json")).unwrap();
    let defs: Vec<SysIdDef> = match serde_json::from_str(&defs_str) {
        Ok(defs) => defs,
        Err(err) => panic!("Malformed sys_ids.json: {}", err),
    };
    let ids = validate(&defs);
    make_ids(&defs, &ids);
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=sys_ids.json");
}

fn validate(defs: &[SysIdDef]) -> Vec<u16> {
    let mut names = HashSet::new();
    let mut values = HashSet::new();
    let mut ids = Vec::with_capacity(defs.len());
    for def in defs {
        let value = match parse_hex(&def.value) {
            Ok(value) => value,
            Err(err) => panic!("Invalid value '{}' for {}: {}", def.value, def.name, err),
        };
        if value < STD_RANGE.0 || value > STD_RANGE.1 {
            panic!("{} = {:#06x} is outside the standard range.", def.name, value);
        }
        if !names.insert(def.name.as_str()) {
            panic!("Duplicated SYS name {}.", def.name);
        }
        if !values.insert(value) {
            panic!("Duplicated SYS value {:#06x} ({}).", value, def.name);
        }
        ids.push(value);
    }
    ids
}

fn make_ids(defs: &[SysIdDef], ids: &[u16]) {
    let mut s = String::from("");
    for (def, id) in defs.iter().zip(ids) {
        s += format!("/// {}\n", def.description).as_str();
        s += format!("pub const {}: u16 = {:#06x};\n", def.name, id).as_str();
    }
    s += "\n/// Every SYS ID in definition order.\npub static SYS_ID_TABLE: &[SysIdInfo] = &[\n";
    for def in defs {
        s += format!(
            "    SysIdInfo {{ id: {}, name: {:?}, description: {:?} }},\n",
            def.name, def.name, def.description
        )
        .as_str();
    }
    s += "];\n";
    let out_dir = env::var("OUT_DIR").unwrap();
    let path = PathBuf::from(out_dir).join("sys_ids.rs");
    fs::write(path, s).unwrap();
}
