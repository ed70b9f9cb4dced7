//! Record migration between two servers
//!
//! Records are read from the source with a scalar projection, trimmed to the
//! fields both servers know, and created one by one on the destination.
//! Running the same migration twice creates the records twice; there is no
//! matching on the destination.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use super::compare::compare;
use crate::api::{ApiError, FieldType, OdooClient, Record, ServerConfig};

/// Knobs for a single migration run
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Fields to read from the source; the filtered listing when `None` or empty
    pub fields: Option<Vec<String>>,
    /// Domain filter for the source read; every record when `None`
    pub domain: Option<Vec<Value>>,
    /// Field kinds left out of both the read and the comparison
    pub exclude_kinds: Vec<FieldType>,
    /// Project records without creating anything
    pub dry_run: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            fields: None,
            domain: None,
            exclude_kinds: FieldType::RELATIONAL.to_vec(),
            dry_run: false,
        }
    }
}

/// What a migration run read, wrote and skipped
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub entity: String,
    pub common_fields: BTreeSet<String>,
    /// Records as they were (or would be, on a dry run) sent to the destination
    pub projected: Vec<Record>,
    pub created_ids: Vec<i64>,
    pub dry_run: bool,
}

impl MigrationReport {
    pub fn records_read(&self) -> usize {
        self.projected.len()
    }

    /// Records whose create call failed
    pub fn failed(&self) -> usize {
        if self.dry_run {
            0
        } else {
            self.projected.len() - self.created_ids.len()
        }
    }
}

/// Keep only the keys of `record` that are in `common`
///
/// Keys missing from the record stay missing; the destination applies its own
/// default for them.
pub fn project_record(record: &Record, common: &BTreeSet<String>) -> Record {
    record
        .iter()
        .filter(|(key, _)| common.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Migrate `entity` between two connected servers
pub async fn migrate(
    source: &OdooClient,
    destination: &OdooClient,
    entity: &str,
    options: &MigrationOptions,
) -> Result<MigrationReport, ApiError> {
    let fields = match &options.fields {
        Some(fields) if !fields.is_empty() => fields.clone(),
        _ => source.list_fields(entity, &options.exclude_kinds).await?,
    };
    let records = source
        .read_records(entity, Some(&fields), options.domain.as_deref())
        .await?;

    let comparison = compare(entity, source, destination, &options.exclude_kinds).await?;

    let projected: Vec<Record> = records
        .iter()
        .map(|record| project_record(record, &comparison.common))
        .collect();

    let created_ids = if options.dry_run || projected.is_empty() {
        Vec::new()
    } else {
        destination.create_records(entity, &projected).await
    };

    log::info!(
        "Migrated {}: {} read, {} created{}",
        entity,
        projected.len(),
        created_ids.len(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    Ok(MigrationReport {
        entity: entity.to_string(),
        common_fields: comparison.common,
        projected,
        created_ids,
        dry_run: options.dry_run,
    })
}

/// Copy records of `entity` from `source` to `destination`
///
/// Returns the ids created on the destination. Failed creates are logged and
/// missing from the result; compare its length with the source count to
/// detect them.
pub async fn migrate_entities(
    source: &ServerConfig,
    destination: &ServerConfig,
    entity: &str,
    fields: Option<Vec<String>>,
    domain: Option<Vec<Value>>,
) -> Result<Vec<i64>, ApiError> {
    let options = MigrationOptions {
        fields,
        domain,
        ..Default::default()
    };
    let report = migrate_entities_with(source, destination, entity, &options).await?;
    Ok(report.created_ids)
}

/// [`migrate_entities`] with full options and the detailed report
pub async fn migrate_entities_with(
    source: &ServerConfig,
    destination: &ServerConfig,
    entity: &str,
    options: &MigrationOptions,
) -> Result<MigrationReport, ApiError> {
    let result: Result<MigrationReport, ApiError> = async {
        let source_client = OdooClient::connect(source).await?;
        let destination_client = OdooClient::connect(destination).await?;
        migrate(&source_client, &destination_client, entity, options).await
    }
    .await;

    if let Err(e) = &result {
        log::error!("Error migrating {} between servers: {}", entity, e);
    }
    result
}
