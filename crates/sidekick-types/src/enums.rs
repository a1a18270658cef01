//! Persisted enumerations.
//!
//! Every variant carries an explicit discriminant. Those integers are what the
//! catalog stores, so reordering variants must never change them.

use serde::{Deserialize, Serialize};

use crate::TypeError;

/// Slot a part occupies on a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum CharacterPartType {
    Head = 1,
    Hair = 2,
    EyebrowLeft = 3,
    EyebrowRight = 4,
    EyeLeft = 5,
    EyeRight = 6,
    EarLeft = 7,
    EarRight = 8,
    FacialHair = 9,
    Torso = 10,
    ArmUpperLeft = 11,
    ArmUpperRight = 12,
    ArmLowerLeft = 13,
    ArmLowerRight = 14,
    HandLeft = 15,
    HandRight = 16,
    Hips = 17,
    LegLeft = 18,
    LegRight = 19,
    FootLeft = 20,
    FootRight = 21,
    AttachmentHead = 22,
    AttachmentFace = 23,
    AttachmentBack = 24,
    AttachmentHipsFront = 25,
    AttachmentHipsBack = 26,
    AttachmentHipsLeft = 27,
    AttachmentHipsRight = 28,
    AttachmentShoulderLeft = 29,
    AttachmentShoulderRight = 30,
    AttachmentElbowLeft = 31,
    AttachmentElbowRight = 32,
    AttachmentKneeLeft = 33,
    AttachmentKneeRight = 34,
    Nose = 35,
    Teeth = 36,
    Tongue = 37,
    Wrap = 38,
}

/// Part type, shortcode, group, joint name (attachments driven by blend shapes only).
const PART_TYPE_TABLE: [(CharacterPartType, &str, PartGroup, Option<&str>); 38] = {
    use CharacterPartType as T;
    use PartGroup as G;
    [
        (T::Head, "01HEAD", G::Head, None),
        (T::Hair, "02HAIR", G::Head, None),
        (T::EyebrowLeft, "03EBRL", G::Head, None),
        (T::EyebrowRight, "04EBRR", G::Head, None),
        (T::EyeLeft, "05EYEL", G::Head, None),
        (T::EyeRight, "06EYER", G::Head, None),
        (T::EarLeft, "07EARL", G::Head, None),
        (T::EarRight, "08EARR", G::Head, None),
        (T::FacialHair, "09FCHR", G::Head, None),
        (T::Torso, "10TORS", G::UpperBody, None),
        (T::ArmUpperLeft, "11AUPL", G::UpperBody, None),
        (T::ArmUpperRight, "12AUPR", G::UpperBody, None),
        (T::ArmLowerLeft, "13ALWL", G::UpperBody, None),
        (T::ArmLowerRight, "14ALWR", G::UpperBody, None),
        (T::HandLeft, "15HNDL", G::UpperBody, None),
        (T::HandRight, "16HNDR", G::UpperBody, None),
        (T::Hips, "17HIPS", G::LowerBody, None),
        (T::LegLeft, "18LEGL", G::LowerBody, None),
        (T::LegRight, "19LEGR", G::LowerBody, None),
        (T::FootLeft, "20FOTL", G::LowerBody, None),
        (T::FootRight, "21FOTR", G::LowerBody, None),
        (T::AttachmentHead, "22AHED", G::Head, None),
        (T::AttachmentFace, "23AFAC", G::Head, None),
        (T::AttachmentBack, "24ABAC", G::UpperBody, Some("backAttach")),
        (T::AttachmentHipsFront, "25AHPF", G::LowerBody, Some("hipAttachFront")),
        (T::AttachmentHipsBack, "26AHPB", G::LowerBody, Some("hipAttachBack")),
        (T::AttachmentHipsLeft, "27AHPL", G::LowerBody, Some("hipAttach_l")),
        (T::AttachmentHipsRight, "28AHPR", G::LowerBody, Some("hipAttach_r")),
        (T::AttachmentShoulderLeft, "29ASHL", G::UpperBody, Some("shoulderAttach_l")),
        (T::AttachmentShoulderRight, "30ASHR", G::UpperBody, Some("shoulderAttach_r")),
        (T::AttachmentElbowLeft, "31AEBL", G::UpperBody, Some("elbowAttach_l")),
        (T::AttachmentElbowRight, "32AEBR", G::UpperBody, Some("elbowAttach_r")),
        (T::AttachmentKneeLeft, "33AKNL", G::LowerBody, Some("kneeAttach_l")),
        (T::AttachmentKneeRight, "34AKNR", G::LowerBody, Some("kneeAttach_r")),
        (T::Nose, "35NOSE", G::Head, None),
        (T::Teeth, "36TETH", G::Head, None),
        (T::Tongue, "37TONG", G::Head, None),
        (T::Wrap, "38WRAP", G::UpperBody, None),
    ]
};

impl CharacterPartType {
    /// All part types in discriminant order.
    pub fn all() -> impl Iterator<Item = CharacterPartType> {
        PART_TYPE_TABLE.iter().map(|entry| entry.0)
    }

    /// Persisted integer value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    fn entry(self) -> &'static (CharacterPartType, &'static str, PartGroup, Option<&'static str>) {
        // Discriminants are contiguous from 1, so the table index is value - 1.
        &PART_TYPE_TABLE[(self as usize) - 1]
    }

    /// Six character code used in part names and preset rows, e.g. `10TORS`.
    pub fn shortcode(self) -> &'static str {
        self.entry().1
    }

    /// Parse a shortcode such as `24ABAC`. Matching is case-insensitive.
    pub fn from_shortcode(code: &str) -> Result<Self, TypeError> {
        PART_TYPE_TABLE
            .iter()
            .find(|entry| entry.1.eq_ignore_ascii_case(code))
            .map(|entry| entry.0)
            .ok_or_else(|| TypeError::InvalidShortcode(code.to_string()))
    }

    /// Body group this part type belongs to.
    pub fn part_group(self) -> PartGroup {
        self.entry().2
    }

    /// Rig joint moved by blend shapes when a part of this type is worn.
    pub fn joint_name(self) -> Option<&'static str> {
        self.entry().3
    }

    /// Part types that move a joint under blend shapes.
    pub fn joint_mapped() -> impl Iterator<Item = CharacterPartType> {
        PART_TYPE_TABLE
            .iter()
            .filter(|entry| entry.3.is_some())
            .map(|entry| entry.0)
    }

    pub fn is_attachment(self) -> bool {
        (Self::AttachmentHead as i32..=Self::AttachmentKneeRight as i32).contains(&(self as i32))
    }

    /// Head features whose meshes differ per species.
    pub fn is_species_specific(self) -> bool {
        matches!(
            self,
            Self::Head
                | Self::Hair
                | Self::EyebrowLeft
                | Self::EyebrowRight
                | Self::EyeLeft
                | Self::EyeRight
                | Self::EarLeft
                | Self::EarRight
                | Self::FacialHair
                | Self::Nose
                | Self::Teeth
                | Self::Tongue
        )
    }
}

impl TryFrom<i32> for CharacterPartType {
    type Error = TypeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        PART_TYPE_TABLE
            .iter()
            .find(|entry| entry.0 as i32 == value)
            .map(|entry| entry.0)
            .ok_or(TypeError::InvalidDiscriminant {
                kind: "part type",
                value: value.into(),
            })
    }
}

impl std::fmt::Display for CharacterPartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Coarse body region used to group parts and presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum PartGroup {
    Head = 1,
    UpperBody = 2,
    LowerBody = 3,
}

impl PartGroup {
    pub const ALL: [PartGroup; 3] = [Self::Head, Self::UpperBody, Self::LowerBody];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Part types in this group, in discriminant order.
    pub fn part_types(self) -> Vec<CharacterPartType> {
        PART_TYPE_TABLE
            .iter()
            .filter(|entry| entry.2 == self)
            .map(|entry| entry.0)
            .collect()
    }
}

impl TryFrom<i32> for PartGroup {
    type Error = TypeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Head),
            2 => Ok(Self::UpperBody),
            3 => Ok(Self::LowerBody),
            _ => Err(TypeError::InvalidDiscriminant {
                kind: "part group",
                value: value.into(),
            }),
        }
    }
}

/// Grouping of color properties and color presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum ColorGroup {
    Species = 1,
    Outfits = 2,
    Attachments = 3,
    Materials = 4,
    Elements = 5,
}

impl ColorGroup {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ColorGroup {
    type Error = TypeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Species),
            2 => Ok(Self::Outfits),
            3 => Ok(Self::Attachments),
            4 => Ok(Self::Materials),
            5 => Ok(Self::Elements),
            _ => Err(TypeError::InvalidDiscriminant {
                kind: "color group",
                value: value.into(),
            }),
        }
    }
}

/// Kind of a part filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum FilterType {
    Outfit = 1,
    Species = 2,
}

impl FilterType {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for FilterType {
    type Error = TypeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Outfit),
            2 => Ok(Self::Species),
            _ => Err(TypeError::InvalidDiscriminant {
                kind: "filter type",
                value: value.into(),
            }),
        }
    }
}

/// How a filter, or a nested filter group, folds into the part names
/// selected so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCombineType {
    /// Keep only names present in both.
    And,
    /// Keep names present in either.
    Or,
    /// Drop names the filter selects.
    Not,
}

/// Body blend shape axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum BlendShapeType {
    Feminine = 0,
    Heavy = 1,
    Skinny = 2,
    Bulk = 3,
}

impl BlendShapeType {
    pub const ALL: [BlendShapeType; 4] = [Self::Feminine, Self::Heavy, Self::Skinny, Self::Bulk];

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for BlendShapeType {
    type Error = TypeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Feminine),
            1 => Ok(Self::Heavy),
            2 => Ok(Self::Skinny),
            3 => Ok(Self::Bulk),
            _ => Err(TypeError::InvalidDiscriminant {
                kind: "blend shape type",
                value: value.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_type_table_is_contiguous() {
        for (index, part_type) in CharacterPartType::all().enumerate() {
            assert_eq!(part_type.as_i32(), index as i32 + 1);
            assert_eq!(
                CharacterPartType::try_from(part_type.as_i32()).expect("decode"),
                part_type
            );
        }
        assert_eq!(CharacterPartType::all().count(), 38);
    }

    #[test]
    fn test_shortcodes() {
        assert_eq!(CharacterPartType::Torso.shortcode(), "10TORS");
        assert_eq!(CharacterPartType::AttachmentBack.shortcode(), "24ABAC");
        assert_eq!(
            CharacterPartType::from_shortcode("36teth").expect("shortcode"),
            CharacterPartType::Teeth
        );
        assert!(CharacterPartType::from_shortcode("99NOPE").is_err());
    }

    #[test]
    fn test_invalid_discriminants() {
        assert!(CharacterPartType::try_from(0).is_err());
        assert!(CharacterPartType::try_from(39).is_err());
        assert!(PartGroup::try_from(4).is_err());
        assert!(BlendShapeType::try_from(-1).is_err());
    }

    #[test]
    fn test_part_groups_cover_every_type_once() {
        let total: usize = PartGroup::ALL.iter().map(|g| g.part_types().len()).sum();
        assert_eq!(total, 38);
        assert!(PartGroup::Head.part_types().contains(&CharacterPartType::Nose));
        assert!(PartGroup::UpperBody
            .part_types()
            .contains(&CharacterPartType::Wrap));
        assert!(PartGroup::LowerBody
            .part_types()
            .contains(&CharacterPartType::AttachmentKneeLeft));
    }

    #[test]
    fn test_joint_map() {
        assert_eq!(CharacterPartType::AttachmentBack.joint_name(), Some("backAttach"));
        assert_eq!(CharacterPartType::AttachmentHipsLeft.joint_name(), Some("hipAttach_l"));
        assert_eq!(CharacterPartType::Torso.joint_name(), None);
        assert_eq!(CharacterPartType::joint_mapped().count(), 11);
        assert!(CharacterPartType::joint_mapped().all(|t| t.is_attachment()));
    }

    #[test]
    fn test_species_specific() {
        assert!(CharacterPartType::Teeth.is_species_specific());
        assert!(!CharacterPartType::AttachmentFace.is_species_specific());
        assert!(!CharacterPartType::Torso.is_species_specific());
    }
}
