//! Blend shape rig movement query functions.
//!
//! At most one movement exists per `(part_type, blend_type)`.

use std::collections::BTreeMap;

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::{BlendShapeRigMovement, BlendShapeType, CharacterPartType};

use crate::{enum_column, Result};

const COLUMNS: &str = "id, part_type, blend_type, \
                       max_offset_x, max_offset_y, max_offset_z, \
                       max_rotation_x, max_rotation_y, max_rotation_z, \
                       max_scale_x, max_scale_y, max_scale_z";

/// Movements for every joint-mapped part type, keyed by part type then blend type.
pub type MovementLibrary =
    BTreeMap<CharacterPartType, BTreeMap<BlendShapeType, Option<BlendShapeRigMovement>>>;

fn from_row(row: &Row<'_>) -> rusqlite::Result<BlendShapeRigMovement> {
    let vec3 = |start: usize| -> rusqlite::Result<[f32; 3]> {
        Ok([
            row.get::<_, f64>(start)? as f32,
            row.get::<_, f64>(start + 1)? as f32,
            row.get::<_, f64>(start + 2)? as f32,
        ])
    };
    Ok(BlendShapeRigMovement {
        id: row.get(0)?,
        part_type: enum_column(row, 1)?,
        blend_type: enum_column(row, 2)?,
        max_offset: vec3(3)?,
        max_rotation: vec3(6)?,
        max_scale: vec3(9)?,
    })
}

/// Get a movement by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<BlendShapeRigMovement>> {
    let movement = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_blend_shape_rig_movement WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(movement)
}

/// Find the stored movement for a part type and blend type.
pub fn find(
    conn: &Connection,
    part_type: CharacterPartType,
    blend_type: BlendShapeType,
) -> Result<Option<BlendShapeRigMovement>> {
    let movement = conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM sk_blend_shape_rig_movement
                 WHERE part_type = ?1 AND blend_type = ?2"
            ),
            [part_type.as_i32(), blend_type.as_i32()],
            from_row,
        )
        .optional()?;
    Ok(movement)
}

/// Movement for a part type and blend type, or an unsaved zero movement.
pub fn get_by_part_and_blend_type(
    conn: &Connection,
    part_type: CharacterPartType,
    blend_type: BlendShapeType,
) -> Result<BlendShapeRigMovement> {
    Ok(find(conn, part_type, blend_type)?
        .unwrap_or_else(|| BlendShapeRigMovement::zero(part_type, blend_type)))
}

/// List every movement.
pub fn list(conn: &Connection) -> Result<Vec<BlendShapeRigMovement>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM sk_blend_shape_rig_movement ORDER BY part_type, blend_type"
    ))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// All movements for every joint-mapped part type and every blend type.
pub fn library(conn: &Connection) -> Result<MovementLibrary> {
    let mut library: MovementLibrary = CharacterPartType::joint_mapped()
        .map(|part_type| {
            let slots = BlendShapeType::ALL.iter().map(|b| (*b, None)).collect();
            (part_type, slots)
        })
        .collect();

    for movement in list(conn)? {
        if let Some(slots) = library.get_mut(&movement.part_type) {
            slots.insert(movement.blend_type, Some(movement));
        }
    }
    Ok(library)
}

/// Insert or update a movement. Returns its id.
///
/// Saving an unsaved movement for a key that already exists replaces the
/// stored values and adopts the existing id.
pub fn save(conn: &Connection, movement: &mut BlendShapeRigMovement) -> Result<i64> {
    let [ox, oy, oz] = movement.max_offset.map(f64::from);
    let [rx, ry, rz] = movement.max_rotation.map(f64::from);
    let [sx, sy, sz] = movement.max_scale.map(f64::from);
    if movement.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_blend_shape_rig_movement SET part_type = ?2, blend_type = ?3,
                 max_offset_x = ?4, max_offset_y = ?5, max_offset_z = ?6,
                 max_rotation_x = ?7, max_rotation_y = ?8, max_rotation_z = ?9,
                 max_scale_x = ?10, max_scale_y = ?11, max_scale_z = ?12
             WHERE id = ?1",
            rusqlite::params![
                movement.id,
                movement.part_type.as_i32(),
                movement.blend_type.as_i32(),
                ox,
                oy,
                oz,
                rx,
                ry,
                rz,
                sx,
                sy,
                sz,
            ],
        )?;
        super::expect_changed(changed, "rig movement", movement.id, "update")?;
    } else {
        let id: i64 = conn.query_row(
            "INSERT INTO sk_blend_shape_rig_movement (part_type, blend_type,
                 max_offset_x, max_offset_y, max_offset_z,
                 max_rotation_x, max_rotation_y, max_rotation_z,
                 max_scale_x, max_scale_y, max_scale_z)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(part_type, blend_type) DO UPDATE SET
                 max_offset_x = excluded.max_offset_x,
                 max_offset_y = excluded.max_offset_y,
                 max_offset_z = excluded.max_offset_z,
                 max_rotation_x = excluded.max_rotation_x,
                 max_rotation_y = excluded.max_rotation_y,
                 max_rotation_z = excluded.max_rotation_z,
                 max_scale_x = excluded.max_scale_x,
                 max_scale_y = excluded.max_scale_y,
                 max_scale_z = excluded.max_scale_z
             RETURNING id",
            rusqlite::params![
                movement.part_type.as_i32(),
                movement.blend_type.as_i32(),
                ox,
                oy,
                oz,
                rx,
                ry,
                rz,
                sx,
                sy,
                sz,
            ],
            |row| row.get(0),
        )?;
        movement.id = id;
    }
    Ok(movement.id)
}

/// Delete a movement.
pub fn delete(conn: &Connection, movement: &BlendShapeRigMovement) -> Result<()> {
    super::delete_by_id(conn, "sk_blend_shape_rig_movement", "rig movement", movement.id)
}
