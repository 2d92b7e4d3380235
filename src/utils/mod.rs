pub mod field_map;
