use std::path::{Path, PathBuf};

/// A `.grug` file found under the mods directory, with its mod name and
/// entity type already extracted from its path and filename.
pub struct DiscoveredFile {
    /// Top-level directory name under `mods/` the file belongs to.
    pub mod_name: String,
    pub entity_type: String,
    /// Path relative to the mods directory root, e.g. `guns/ak47-Gun.grug`.
    pub relative_path: String,
    pub absolute_path: PathBuf,
}

/// Walks `mods_dir` recursively, collecting every `.grug` file.
///
/// Mirrors the original engine's whole-tree compile: each top-level entry
/// under `mods_dir` is a mod, and `.grug` files may be nested arbitrarily
/// deep inside it.
pub fn discover_mod_files(mods_dir: &Path) -> Result<Vec<DiscoveredFile>, String> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(mods_dir)
        .map_err(|e| format!("failed to read mods directory '{}': {e}", mods_dir.display()))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("failed to read a directory entry: {e}"))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let mod_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("mod directory '{}' has a non-UTF-8 name", path.display()))?
            .to_string();
        walk_mod_dir(mods_dir, &path, &mod_name, &mut files)?;
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

fn walk_mod_dir(mods_dir: &Path, dir: &Path, mod_name: &str, out: &mut Vec<DiscoveredFile>) -> Result<(), String> {
    let entries = std::fs::read_dir(dir).map_err(|e| format!("failed to read '{}': {e}", dir.display()))?;
    for entry in entries {
        let entry = entry.map_err(|e| format!("failed to read a directory entry: {e}"))?;
        let path = entry.path();
        if path.is_dir() {
            walk_mod_dir(mods_dir, &path, mod_name, out)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("grug") {
            continue;
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("'{}' has a non-UTF-8 filename", path.display()))?;
        let entity_type = entity_type_from_filename(filename)?;
        let relative_path = path
            .strip_prefix(mods_dir)
            .map_err(|_| format!("'{}' is not inside '{}'", path.display(), mods_dir.display()))?
            .to_string_lossy()
            .replace('\\', "/");
        out.push(DiscoveredFile {
            mod_name: mod_name.to_string(),
            entity_type,
            relative_path,
            absolute_path: path,
        });
    }
    Ok(())
}

/// Extracts and validates the entity type from a grug filename, e.g.
/// `'furnace-BlockEntity.grug'` -> `"BlockEntity"`.
pub fn entity_type_from_filename(filename: &str) -> Result<String, String> {
    let dash_index = filename.find('-');
    let dash_index = match dash_index {
        Some(i) if i + 1 < filename.len() => i,
        _ => {
            return Err(format!(
                "'{filename}' is missing an entity type in its name; use a dash to specify it, like 'ak47-Gun.grug'"
            ))
        }
    };

    let after_dash = &filename[dash_index + 1..];
    let period_index = match after_dash.find('.') {
        Some(i) => i,
        None => return Err(format!("'{filename}' is missing a period in its filename")),
    };

    let entity_type = &after_dash[..period_index];
    if entity_type.is_empty() {
        return Err(format!(
            "'{filename}' is missing an entity type in its name; use a dash to specify it, like 'ak47-Gun.grug'"
        ));
    }

    check_pascal_case(entity_type)?;
    Ok(entity_type.to_string())
}

/// A custom id type name must start uppercase and contain only ASCII
/// letters and digits.
fn check_pascal_case(type_name: &str) -> Result<(), String> {
    let first = type_name.chars().next().expect("checked non-empty above");
    if !first.is_ascii_uppercase() {
        return Err(format!("'{type_name}' seems like a custom ID type, but isn't in PascalCase"));
    }
    for c in type_name.chars() {
        if !c.is_ascii_alphanumeric() {
            return Err(format!(
                "'{type_name}' seems like a custom ID type, but it contains '{c}', which isn't uppercase/lowercase/a digit"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn extracts_entity_type_from_a_well_formed_filename() {
        assert_eq!(entity_type_from_filename("furnace-BlockEntity.grug").unwrap(), "BlockEntity");
    }

    #[test]
    fn rejects_a_filename_with_no_dash() {
        assert!(entity_type_from_filename("furnace.grug").is_err());
    }

    #[test]
    fn rejects_a_filename_with_no_period() {
        assert!(entity_type_from_filename("furnace-BlockEntity").is_err());
    }

    #[test]
    fn rejects_a_lowercase_entity_type() {
        assert!(entity_type_from_filename("furnace-blockEntity.grug").is_err());
    }

    #[test]
    fn rejects_an_entity_type_with_non_alphanumeric_characters() {
        assert!(entity_type_from_filename("furnace-Block_Entity.grug").is_err());
    }

    #[test]
    fn discovers_nested_grug_files_under_their_mod_name() {
        let dir = tempfile::tempdir().unwrap();
        let mods_dir = dir.path();
        fs::create_dir_all(mods_dir.join("guns/variants")).unwrap();
        fs::write(mods_dir.join("guns/ak47-Gun.grug"), "").unwrap();
        fs::write(mods_dir.join("guns/variants/deagle-Gun.grug"), "").unwrap();
        fs::write(mods_dir.join("guns/readme.txt"), "").unwrap();

        let mut files = discover_mod_files(mods_dir).unwrap();
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].mod_name, "guns");
        assert_eq!(files[0].entity_type, "Gun");
        assert_eq!(files[0].relative_path, "guns/ak47-Gun.grug");
        assert_eq!(files[1].relative_path, "guns/variants/deagle-Gun.grug");
    }
}
