//! String-literal validation for the `resource` and `entity` types.
//!
//! Neither type is ever a variable's declared type; both only arise when
//! a string literal is passed where the mod API expects one, at which
//! point the propagator rewrites the argument's result type and checks
//! the literal's shape with these functions.

pub fn validate_resource_string(s: &str, resource_extension: Option<&str>) -> Result<(), String> {
    if s.is_empty() {
        return Err("a resource string can't be empty".to_string());
    }
    if s.starts_with('/') {
        return Err(format!("resource string '{s}' can't start with '/'"));
    }
    if s.ends_with('/') {
        return Err(format!("resource string '{s}' can't end with '/'"));
    }
    if s.ends_with('.') {
        return Err(format!("resource string '{s}' can't end with '.'"));
    }
    if s.contains('\\') {
        return Err(format!("resource string '{s}' can't contain '\\'"));
    }
    if s.contains("//") {
        return Err(format!("resource string '{s}' can't contain '//'"));
    }
    for segment in s.split('/') {
        if segment == "." || segment == ".." {
            return Err(format!("resource string '{s}' can't contain a '.' or '..' path segment"));
        }
    }
    if let Some(ext) = resource_extension {
        if !s.ends_with(ext) {
            return Err(format!("resource string '{s}' must end with '{ext}'"));
        }
    }
    Ok(())
}

pub fn validate_entity_string(s: &str, current_mod: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("an entity string can't be empty".to_string());
    }
    let (mod_part, name_part) = match s.split_once(':') {
        Some((m, n)) => (Some(m), n),
        None => (None, s),
    };
    if let Some(m) = mod_part {
        if m.is_empty() {
            return Err(format!("entity string '{s}' has an empty mod prefix"));
        }
        if m == current_mod {
            return Err(format!(
                "entity string '{s}' redundantly prefixes its own mod '{current_mod}'"
            ));
        }
        if !m.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-') {
            return Err(format!(
                "mod prefix in entity string '{s}' must be lowercase letters, digits, '_', or '-'"
            ));
        }
    }
    if name_part.is_empty() {
        return Err(format!("entity string '{s}' has an empty name"));
    }
    if !name_part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-') {
        return Err(format!(
            "entity name in '{s}' must be lowercase letters, digits, '_', or '-'"
        ));
    }
    Ok(())
}
