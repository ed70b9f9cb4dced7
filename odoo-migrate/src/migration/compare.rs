//! Field schema comparison between two servers
//!
//! Only the filtered field listing of each side takes part, so fields of an
//! excluded kind never show up in any of the three sets.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::api::{ApiError, FieldType, OdooClient, ServerConfig};

/// Set relationship between the field names of one entity on two servers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldComparison {
    pub unique_to_source: BTreeSet<String>,
    pub unique_to_destination: BTreeSet<String>,
    pub common: BTreeSet<String>,
}

impl FieldComparison {
    /// True when both sides expose the same fields
    pub fn is_identical(&self) -> bool {
        self.unique_to_source.is_empty() && self.unique_to_destination.is_empty()
    }
}

/// Pure set algebra over two field lists
pub fn compare_field_lists<A, B>(source: A, destination: B) -> FieldComparison
where
    A: IntoIterator,
    A::Item: Into<String>,
    B: IntoIterator,
    B::Item: Into<String>,
{
    let source: BTreeSet<String> = source.into_iter().map(Into::into).collect();
    let destination: BTreeSet<String> = destination.into_iter().map(Into::into).collect();

    FieldComparison {
        unique_to_source: source.difference(&destination).cloned().collect(),
        unique_to_destination: destination.difference(&source).cloned().collect(),
        common: source.intersection(&destination).cloned().collect(),
    }
}

/// Compare the fields of `entity` on two connected servers
pub async fn compare(
    entity: &str,
    source: &OdooClient,
    destination: &OdooClient,
    exclude_kinds: &[FieldType],
) -> Result<FieldComparison, ApiError> {
    let source_fields = source.list_fields(entity, exclude_kinds).await?;
    let destination_fields = destination.list_fields(entity, exclude_kinds).await?;

    let comparison = compare_field_lists(source_fields, destination_fields);
    log::debug!(
        "{}: {} common, {} source only, {} destination only",
        entity,
        comparison.common.len(),
        comparison.unique_to_source.len(),
        comparison.unique_to_destination.len()
    );
    Ok(comparison)
}

/// Connect to both servers and compare the non-relational fields of `entity`
pub async fn compare_entities(
    source: &ServerConfig,
    destination: &ServerConfig,
    entity: &str,
) -> Result<FieldComparison, ApiError> {
    compare_entities_with(source, destination, entity, &FieldType::RELATIONAL).await
}

/// [`compare_entities`] with a caller-chosen exclusion set
pub async fn compare_entities_with(
    source: &ServerConfig,
    destination: &ServerConfig,
    entity: &str,
    exclude_kinds: &[FieldType],
) -> Result<FieldComparison, ApiError> {
    let result: Result<FieldComparison, ApiError> = async {
        let source_client = OdooClient::connect(source).await?;
        let destination_client = OdooClient::connect(destination).await?;
        compare(entity, &source_client, &destination_client, exclude_kinds).await
    }
    .await;

    if let Err(e) = &result {
        log::error!("Error comparing {} between servers: {}", entity, e);
    }
    result
}
