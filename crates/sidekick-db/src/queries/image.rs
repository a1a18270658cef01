//! Thumbnail query functions.
//!
//! Each [`ImageKind`] has its own table; preset images are additionally
//! keyed by their group. Images whose owner no longer exists are deleted
//! when read.

use rusqlite::{Connection, Row};
use sidekick_types::{ImageKind, Thumbnail};

use crate::queries::exists;
use crate::Result;

struct ImageTable {
    table: &'static str,
    owner: &'static str,
    group: Option<&'static str>,
}

fn table_for(kind: ImageKind) -> ImageTable {
    let (table, owner, group) = match kind {
        ImageKind::Species => ("sk_species_image", "ptr_species", None),
        ImageKind::Part => ("sk_part_image", "ptr_part", None),
        ImageKind::PartPreset => ("sk_part_preset_image", "ptr_part_preset", Some("part_group")),
        ImageKind::ColorSet => ("sk_color_set_image", "ptr_color_set", None),
        ImageKind::ColorPreset => ("sk_color_preset_image", "ptr_color_preset", Some("color_group")),
        ImageKind::BodyShapePreset => ("sk_body_shape_preset_image", "ptr_body_shape_preset", None),
    };
    ImageTable { table, owner, group }
}

/// The owner table each image kind points at.
pub(crate) fn owner_table(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Species => "sk_species",
        ImageKind::Part => "sk_part",
        ImageKind::PartPreset => "sk_part_preset",
        ImageKind::ColorSet => "sk_color_set",
        ImageKind::ColorPreset => "sk_color_preset",
        ImageKind::BodyShapePreset => "sk_body_shape_preset",
    }
}

fn select(kind: ImageKind, filter: &str) -> String {
    let t = table_for(kind);
    let group = t.group.unwrap_or("NULL");
    format!(
        "SELECT id, {owner}, {group}, img_data, img_width, img_height FROM {table} {filter}",
        owner = t.owner,
        table = t.table,
    )
}

fn from_row(kind: ImageKind, row: &Row<'_>) -> rusqlite::Result<Thumbnail> {
    Ok(Thumbnail {
        id: row.get(0)?,
        kind,
        owner_id: row.get(1)?,
        group: row.get(2)?,
        data: row.get(3)?,
        width: row.get(4)?,
        height: row.get(5)?,
    })
}

/// Read images, deleting those whose owner row is gone.
fn query_valid(
    conn: &Connection,
    kind: ImageKind,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Thumbnail>> {
    let mut stmt = conn.prepare(&select(kind, filter))?;
    let images = stmt
        .query_map(params, |row| from_row(kind, row))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut valid = Vec::with_capacity(images.len());
    for image in images {
        if !exists(conn, owner_table(kind), image.owner_id)? {
            tracing::debug!(id = image.id, owner = image.owner_id, ?kind, "Removing orphaned image");
            delete(conn, &image)?;
            continue;
        }
        valid.push(image);
    }
    Ok(valid)
}

/// Get an image by id.
pub fn get(conn: &Connection, kind: ImageKind, id: i64) -> Result<Option<Thumbnail>> {
    Ok(query_valid(conn, kind, "WHERE id = ?1", [id])?.into_iter().next())
}

/// Get the image of one owner. Grouped kinds also match on `group`.
pub fn get_for_owner(
    conn: &Connection,
    kind: ImageKind,
    owner_id: i64,
    group: Option<i32>,
) -> Result<Option<Thumbnail>> {
    let t = table_for(kind);
    let images = match (t.group, group) {
        (Some(column), Some(group)) => query_valid(
            conn,
            kind,
            &format!("WHERE {} = ?1 AND {column} = ?2 ORDER BY id LIMIT 1", t.owner),
            rusqlite::params![owner_id, group],
        )?,
        _ => query_valid(
            conn,
            kind,
            &format!("WHERE {} = ?1 ORDER BY id LIMIT 1", t.owner),
            [owner_id],
        )?,
    };
    Ok(images.into_iter().next())
}

/// List every image of one kind.
pub fn list_for_kind(conn: &Connection, kind: ImageKind) -> Result<Vec<Thumbnail>> {
    query_valid(conn, kind, "ORDER BY id", [])
}

/// Insert or update an image. Returns its id.
pub fn save(conn: &Connection, image: &mut Thumbnail) -> Result<i64> {
    let t = table_for(image.kind);
    let group = match t.group {
        Some(_) => Some(image.group.unwrap_or_default()),
        None => None,
    };
    if image.id > 0 {
        let changed = match t.group {
            Some(column) => conn.execute(
                &format!(
                    "UPDATE {} SET {} = ?2, {column} = ?3, img_data = ?4, img_width = ?5,
                         img_height = ?6
                     WHERE id = ?1",
                    t.table, t.owner
                ),
                rusqlite::params![image.id, image.owner_id, group, image.data, image.width, image.height],
            )?,
            None => conn.execute(
                &format!(
                    "UPDATE {} SET {} = ?2, img_data = ?3, img_width = ?4, img_height = ?5
                     WHERE id = ?1",
                    t.table, t.owner
                ),
                rusqlite::params![image.id, image.owner_id, image.data, image.width, image.height],
            )?,
        };
        super::expect_changed(changed, "image", image.id, "update")?;
    } else {
        match t.group {
            Some(column) => conn.execute(
                &format!(
                    "INSERT INTO {} ({}, {column}, img_data, img_width, img_height)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    t.table, t.owner
                ),
                rusqlite::params![image.owner_id, group, image.data, image.width, image.height],
            )?,
            None => conn.execute(
                &format!(
                    "INSERT INTO {} ({}, img_data, img_width, img_height) VALUES (?1, ?2, ?3, ?4)",
                    t.table, t.owner
                ),
                rusqlite::params![image.owner_id, image.data, image.width, image.height],
            )?,
        };
        image.id = conn.last_insert_rowid();
    }
    image.group = group;
    Ok(image.id)
}

/// Delete an image.
pub fn delete(conn: &Connection, image: &Thumbnail) -> Result<()> {
    super::delete_by_id(conn, table_for(image.kind).table, "image", image.id)
}

/// Delete the images of one owner, or only those of one group when given.
pub(crate) fn delete_for_owner(
    conn: &Connection,
    kind: ImageKind,
    owner_id: i64,
    group: Option<i32>,
) -> Result<usize> {
    let t = table_for(kind);
    let removed = match (t.group, group) {
        (Some(column), Some(group)) => conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1 AND {column} = ?2", t.table, t.owner),
            rusqlite::params![owner_id, group],
        )?,
        _ => conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1", t.table, t.owner),
            [owner_id],
        )?,
    };
    Ok(removed)
}

/// Delete images whose owner row no longer exists.
pub(crate) fn delete_orphans(conn: &Connection, kind: ImageKind) -> Result<usize> {
    let t = table_for(kind);
    let removed = conn.execute(
        &format!(
            "DELETE FROM {table} WHERE {owner} NOT IN (SELECT id FROM {parent})",
            table = t.table,
            owner = t.owner,
            parent = owner_table(kind),
        ),
        [],
    )?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{color_preset, part_preset, species};
    use sidekick_types::{ColorGroup, ColorPreset, PartGroup, PartPreset, Species};

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count")
    }

    #[test]
    fn test_save_and_get_for_owner() {
        let conn = test_db();
        let mut elf = Species::new("Elf", "EL");
        species::save(&conn, &mut elf).expect("species");
        let mut image = Thumbnail::new(ImageKind::Species, elf.id, vec![1, 2, 3, 4], 2, 2);
        save(&conn, &mut image).expect("save");

        let loaded = get_for_owner(&conn, ImageKind::Species, elf.id, None)
            .expect("get")
            .expect("exists");
        assert_eq!(loaded, image);
        assert_eq!(loaded.group, None);
        assert!(get_for_owner(&conn, ImageKind::Part, elf.id, None).expect("get").is_none());
    }

    #[test]
    fn test_image_without_owner_heals_on_read() {
        let conn = test_db();
        let mut image = Thumbnail::new(ImageKind::Part, 4242, vec![0], 1, 1);
        save(&conn, &mut image).expect("save");

        assert!(get_for_owner(&conn, ImageKind::Part, 4242, None).expect("get").is_none());
        assert_eq!(count(&conn, "sk_part_image"), 0);

        save(&conn, &mut Thumbnail::new(ImageKind::Part, 4243, vec![0], 1, 1)).expect("save");
        assert!(list_for_kind(&conn, ImageKind::Part).expect("list").is_empty());
        assert_eq!(count(&conn, "sk_part_image"), 0);

        let mut by_id = Thumbnail::new(ImageKind::Part, 4244, vec![0], 1, 1);
        save(&conn, &mut by_id).expect("save");
        assert!(get(&conn, ImageKind::Part, by_id.id).expect("get").is_none());
        assert_eq!(count(&conn, "sk_part_image"), 0);
    }

    #[test]
    fn test_grouped_images() {
        let conn = test_db();
        let mut preset = PartPreset::new("Knight", PartGroup::Head, -1);
        part_preset::save(&conn, &mut preset).expect("preset");
        let head = PartGroup::Head.as_i32();
        let lower = PartGroup::LowerBody.as_i32();
        let mut a = Thumbnail::new(ImageKind::PartPreset, preset.id, vec![0xAA], 1, 1).with_group(head);
        let mut b = Thumbnail::new(ImageKind::PartPreset, preset.id, vec![0xBB], 1, 1).with_group(lower);
        save(&conn, &mut a).expect("save a");
        save(&conn, &mut b).expect("save b");

        let found = get_for_owner(&conn, ImageKind::PartPreset, preset.id, Some(lower))
            .expect("get")
            .expect("exists");
        assert_eq!(found.data, vec![0xBB]);

        assert_eq!(
            delete_for_owner(&conn, ImageKind::PartPreset, preset.id, Some(head)).expect("del"),
            1
        );
        assert_eq!(list_for_kind(&conn, ImageKind::PartPreset).expect("list").len(), 1);
    }

    #[test]
    fn test_update_replaces_data() {
        let conn = test_db();
        let mut preset = ColorPreset::new("Tan", ColorGroup::Species, -1);
        color_preset::save(&conn, &mut preset).expect("preset");
        let group = ColorGroup::Species.as_i32();
        let mut image = Thumbnail::new(ImageKind::ColorPreset, preset.id, vec![1], 1, 1).with_group(group);
        save(&conn, &mut image).expect("save");
        image.data = vec![9, 9];
        image.width = 2;
        save(&conn, &mut image).expect("update");

        let loaded = get(&conn, ImageKind::ColorPreset, image.id).expect("get").expect("exists");
        assert_eq!(loaded.data, vec![9, 9]);
        assert_eq!(loaded.group, Some(group));
    }

    #[test]
    fn test_orphans_removed() {
        let conn = test_db();
        save(&conn, &mut Thumbnail::new(ImageKind::Part, 500, vec![0], 1, 1)).expect("save");
        assert_eq!(delete_orphans(&conn, ImageKind::Part).expect("sweep"), 1);
    }
}
