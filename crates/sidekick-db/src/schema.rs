//! SQL schema definitions.
//!
//! Table and column names match catalog files shipped with existing asset
//! packs, so a shipped catalog opens without conversion. References between
//! tables are plain integer columns: orphans are handled by the integrity
//! layer rather than by SQLite foreign keys.

/// Complete schema for a v1 catalog.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Species & Parts
-- ============================================================

CREATE TABLE IF NOT EXISTS sk_species (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    code TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_part (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_species INTEGER NOT NULL DEFAULT -1,
    type INTEGER NOT NULL,
    part_group INTEGER NOT NULL,
    name TEXT NOT NULL,
    part_file_name TEXT NOT NULL,
    part_location TEXT NOT NULL DEFAULT '',
    uses_wrap INTEGER NOT NULL DEFAULT 0,
    file_exists INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_sk_part_type ON sk_part(type);
CREATE INDEX IF NOT EXISTS idx_sk_part_species ON sk_part(ptr_species);

CREATE TABLE IF NOT EXISTS sk_part_species_link (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_species INTEGER NOT NULL,
    ptr_part INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sk_part_species_link_part ON sk_part_species_link(ptr_part);

-- ============================================================
-- Part Presets
-- ============================================================

CREATE TABLE IF NOT EXISTS sk_part_preset (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    part_group INTEGER NOT NULL,
    ptr_species INTEGER NOT NULL DEFAULT -1,
    outfit TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS sk_part_preset_row (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    part_name TEXT NOT NULL,
    ptr_part_preset INTEGER NOT NULL,
    ptr_part INTEGER NOT NULL DEFAULT -1,
    part_type TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sk_part_preset_row_preset ON sk_part_preset_row(ptr_part_preset);

-- ============================================================
-- Filters
-- ============================================================

CREATE TABLE IF NOT EXISTS sk_part_filter (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filter_type INTEGER NOT NULL,
    filter_term TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_part_filter_row (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_filter INTEGER NOT NULL,
    ptr_part INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sk_part_filter_row_filter ON sk_part_filter_row(ptr_filter);

CREATE TABLE IF NOT EXISTS sk_preset_filter (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filter_term TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_preset_filter_row (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_filter INTEGER NOT NULL,
    ptr_preset INTEGER NOT NULL
);

-- ============================================================
-- Colors
-- ============================================================

CREATE TABLE IF NOT EXISTS sk_color_property (
    id INTEGER PRIMARY KEY,
    color_group INTEGER NOT NULL,
    name TEXT NOT NULL,
    u INTEGER NOT NULL,
    v INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_color_set (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_species INTEGER NOT NULL DEFAULT -1,
    name TEXT NOT NULL,
    src_color TEXT NOT NULL DEFAULT '',
    src_metallic TEXT NOT NULL DEFAULT '',
    src_smoothness TEXT NOT NULL DEFAULT '',
    src_reflection TEXT NOT NULL DEFAULT '',
    src_emission TEXT NOT NULL DEFAULT '',
    src_opacity TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS sk_color_row (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_color_set INTEGER NOT NULL,
    ptr_color_property INTEGER NOT NULL,
    color TEXT NOT NULL,
    metallic TEXT NOT NULL,
    smoothness TEXT NOT NULL,
    reflection TEXT NOT NULL,
    emission TEXT NOT NULL,
    opacity TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sk_color_row_set ON sk_color_row(ptr_color_set);

CREATE TABLE IF NOT EXISTS sk_color_preset (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    color_group INTEGER NOT NULL,
    ptr_species INTEGER NOT NULL DEFAULT -1
);

CREATE TABLE IF NOT EXISTS sk_color_preset_row (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_color_preset INTEGER NOT NULL,
    ptr_color_property INTEGER NOT NULL,
    color TEXT NOT NULL,
    metallic TEXT NOT NULL,
    smoothness TEXT NOT NULL,
    reflection TEXT NOT NULL,
    emission TEXT NOT NULL,
    opacity TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sk_color_preset_row_preset ON sk_color_preset_row(ptr_color_preset);

-- ============================================================
-- Body Shapes
-- ============================================================

CREATE TABLE IF NOT EXISTS sk_body_shape_preset (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    body_type INTEGER NOT NULL DEFAULT 0,
    body_size INTEGER NOT NULL DEFAULT 0,
    musculature INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS sk_blend_shape_rig_movement (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    part_type INTEGER NOT NULL,
    blend_type INTEGER NOT NULL,
    max_offset_x REAL NOT NULL DEFAULT 0,
    max_offset_y REAL NOT NULL DEFAULT 0,
    max_offset_z REAL NOT NULL DEFAULT 0,
    max_rotation_x REAL NOT NULL DEFAULT 0,
    max_rotation_y REAL NOT NULL DEFAULT 0,
    max_rotation_z REAL NOT NULL DEFAULT 0,
    max_scale_x REAL NOT NULL DEFAULT 0,
    max_scale_y REAL NOT NULL DEFAULT 0,
    max_scale_z REAL NOT NULL DEFAULT 0
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_sk_rig_movement_key
    ON sk_blend_shape_rig_movement(part_type, blend_type);

-- ============================================================
-- Thumbnails
-- ============================================================

CREATE TABLE IF NOT EXISTS sk_species_image (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_species INTEGER NOT NULL,
    img_data BLOB NOT NULL,
    img_width INTEGER NOT NULL,
    img_height INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_part_image (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_part INTEGER NOT NULL,
    img_data BLOB NOT NULL,
    img_width INTEGER NOT NULL,
    img_height INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_part_preset_image (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_part_preset INTEGER NOT NULL,
    part_group INTEGER NOT NULL,
    img_data BLOB NOT NULL,
    img_width INTEGER NOT NULL,
    img_height INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_color_set_image (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_color_set INTEGER NOT NULL,
    img_data BLOB NOT NULL,
    img_width INTEGER NOT NULL,
    img_height INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_color_preset_image (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_color_preset INTEGER NOT NULL,
    color_group INTEGER NOT NULL,
    img_data BLOB NOT NULL,
    img_width INTEGER NOT NULL,
    img_height INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sk_body_shape_preset_image (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ptr_body_shape_preset INTEGER NOT NULL,
    img_data BLOB NOT NULL,
    img_width INTEGER NOT NULL,
    img_height INTEGER NOT NULL
);

-- ============================================================
-- Catalog version
-- ============================================================

CREATE TABLE IF NOT EXISTS sk_vdata (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    semantic_version TEXT NOT NULL,
    update_time INTEGER NOT NULL
);
"#;
