//! Part naming conventions.
//!
//! Part names follow `SK_<OUTFIT>_<OUTFIT2>_..._<NNTYPE>_<SPxx>`: the second
//! to last segment starts with the two digit part type, the last segment
//! starts with the species code.

use crate::enums::CharacterPartType;
use crate::species::Species;
use crate::BASE_PART_MARKER;

/// Second to last `_` segment, e.g. `10TORS`.
pub fn part_type_segment(name: &str) -> Option<&str> {
    name.rsplit('_').nth(1)
}

/// Part type encoded in the name's type segment.
pub fn part_type_from_name(name: &str) -> Option<CharacterPartType> {
    let segment = part_type_segment(name)?;
    let digits = segment.get(..2)?;
    let value: i32 = digits.parse().ok()?;
    CharacterPartType::try_from(value).ok()
}

/// Outfit a part belongs to: the first two segments after the `SK_` prefix.
pub fn outfit_name(name: &str) -> String {
    match name.get(3..) {
        Some(rest) if !rest.is_empty() => rest.split('_').take(2).collect::<Vec<_>>().join("_"),
        _ => "None".to_string(),
    }
}

/// Two letter species code at the start of the last segment.
pub fn species_code(name: &str) -> Option<&str> {
    name.rsplit('_').next().and_then(|last| last.get(..2))
}

/// Species whose code matches the name, falling back to the first species.
pub fn infer_species<'a>(species: &'a [Species], name: &str) -> Option<&'a Species> {
    let code = species_code(name);
    code.and_then(|code| species.iter().find(|s| s.code.eq_ignore_ascii_case(code)))
        .or_else(|| species.first())
}

pub fn is_base_part(name: &str) -> bool {
    name.contains(BASE_PART_MARKER)
}

/// Resource path for an asset location.
///
/// Everything up to and including the `Resources/` directory is dropped and
/// the file extension removed: `Assets/X/Resources/Meshes/SK_A.prefab`
/// becomes `Meshes/SK_A`. Returns `None` when the location has no
/// `Resources/` segment.
pub fn resource_path(location: &str) -> Option<String> {
    const MARKER: &str = "Resources/";
    let normalized = location.replace('\\', "/");
    let start = normalized.find(MARKER)? + MARKER.len();
    let relative = &normalized[start..];
    let (dir, file) = match relative.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, relative),
    };
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    if stem.is_empty() {
        return None;
    }
    Some(match dir {
        Some(dir) if !dir.is_empty() => format!("{dir}/{stem}"),
        _ => stem.to_string(),
    })
}
