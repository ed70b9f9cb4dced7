//! Orchestration across two servers: schema comparison and data migration

pub mod compare;
pub mod migrate;

pub use compare::{FieldComparison, compare, compare_entities, compare_entities_with, compare_field_lists};
pub use migrate::{
    MigrationOptions, MigrationReport, migrate, migrate_entities, migrate_entities_with, project_record,
};
