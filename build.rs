use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LOCALE: &str = "en";

fn main() {
    println!("cargo:rerun-if-changed=locales");

    let manifest_dir = PathBuf::from(env("CARGO_MANIFEST_DIR"));
    let locales_dir = manifest_dir.join("locales");
    let locales = load_locales(&locales_dir);

    if !locales.contains_key(DEFAULT_LOCALE) {
        panic!("default locale `{DEFAULT_LOCALE}` missing from {}", locales_dir.display());
    }

    let mut generated = String::new();
    generated.push_str(&format!(
        "pub const DEFAULT_LOCALE: &str = {DEFAULT_LOCALE:?};\n\n"
    ));
    generated.push_str("pub static LOCALES: &[(&str, &[(&str, &str)])] = &[\n");
    for (locale, entries) in &locales {
        generated.push_str(&format!("    ({locale:?}, &[\n"));
        for (key, value) in entries {
            generated.push_str(&format!("        ({key:?}, {value:?}),\n"));
        }
        generated.push_str("    ]),\n");
    }
    generated.push_str("];\n");

    let out_dir = PathBuf::from(env("OUT_DIR"));
    fs::write(out_dir.join("folioform_i18n_generated.rs"), generated)
        .unwrap_or_else(|error| panic!("failed to write generated catalog: {error}"));
}

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} is not set"))
}

fn load_locales(dir: &Path) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut locales = BTreeMap::new();
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|error| panic!("failed to read {}: {error}", dir.display()));

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        println!("cargo:rerun-if-changed={}", path.display());

        let raw = fs::read_to_string(&path)
            .unwrap_or_else(|error| panic!("failed to read {}: {error}", path.display()));
        let table: toml::Table = toml::from_str(&raw)
            .unwrap_or_else(|error| panic!("invalid locale file {}: {error}", path.display()));

        let mut flat = BTreeMap::new();
        flatten("", &table, &mut flat, &path);
        locales.insert(locale.to_string(), flat);
    }
    locales
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>, path: &Path) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            toml::Value::Table(nested) => flatten(&full_key, nested, out, path),
            _ => panic!(
                "{}: `{full_key}` must be a string or a table",
                path.display()
            ),
        }
    }
}
