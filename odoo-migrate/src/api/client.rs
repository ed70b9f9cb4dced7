//! Odoo XML-RPC client
//!
//! One [`OdooClient`] owns one authenticated session against one server.
//! Every call is awaited before the next is issued.

use serde_json::{Map, Value, json};
use std::sync::Arc;

use super::error::{ApiError, Result};
use super::metadata::{FieldDescriptor, FieldType, kind_of, parse_fields_get};
use super::models::{ServerConfig, Session};
use super::xmlrpc::{Endpoint, HttpTransport, RpcError, RpcTransport};

/// A record as exchanged with `search_read` and `create`
pub type Record = Map<String, Value>;

/// Authenticated client for a single Odoo server
pub struct OdooClient {
    session: Session,
    transport: Arc<dyn RpcTransport>,
}

impl OdooClient {
    /// Connect over HTTP and authenticate
    pub async fn connect(config: &ServerConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.url.clone()));
        Self::with_transport(config, transport).await
    }

    /// Authenticate through an existing transport
    pub async fn with_transport(config: &ServerConfig, transport: Arc<dyn RpcTransport>) -> Result<Self> {
        let session = authenticate(transport.as_ref(), config).await?;
        Ok(Self { session, transport })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn uid(&self) -> i64 {
        self.session.uid
    }

    /// Introspect every field of `entity` with its type, in server order
    pub async fn describe_fields(&self, entity: &str) -> Result<Vec<FieldDescriptor>> {
        let response = self
            .execute_kw(entity, "fields_get", vec![], Some(json!({"attributes": ["type"]})))
            .await
            .and_then(|response| parse_fields_get(&response));

        response.map_err(|e| {
            log::error!("Error getting fields of {}: {}", entity, e);
            ApiError::schema(entity, e)
        })
    }

    /// Field names of `entity` whose type is not in `exclude_kinds`
    ///
    /// Pass `&FieldType::RELATIONAL` for the listing used by record transfer.
    pub async fn list_fields(&self, entity: &str, exclude_kinds: &[FieldType]) -> Result<Vec<String>> {
        let fields = self.describe_fields(entity).await?;
        Ok(fields
            .into_iter()
            .filter(|f| !exclude_kinds.contains(&f.field_type))
            .map(|f| f.name)
            .collect())
    }

    /// Every field name of `entity`, relational ones included
    pub async fn list_all_fields(&self, entity: &str) -> Result<Vec<String>> {
        self.list_fields(entity, &[]).await
    }

    /// Read records of `entity` matching `domain`
    ///
    /// `fields` defaults to the non-relational fields of the entity, also when
    /// an empty list is given, and `domain` to `[]`, which matches every record.
    pub async fn read_records(
        &self,
        entity: &str,
        fields: Option<&[String]>,
        domain: Option<&[Value]>,
    ) -> Result<Vec<Record>> {
        let fields = match fields {
            Some(fields) if !fields.is_empty() => fields.to_vec(),
            // `search_read` answers an empty list with every field
            _ => self.list_fields(entity, &FieldType::RELATIONAL).await?,
        };
        let domain = domain.map(<[Value]>::to_vec).unwrap_or_default();

        let response = self
            .execute_kw(
                entity,
                "search_read",
                vec![Value::Array(domain)],
                Some(json!({"fields": fields})),
            )
            .await
            .and_then(into_records);

        match response {
            Ok(records) => {
                log::info!("Read {} records from {} on {}", records.len(), entity, self.session.url());
                Ok(records)
            }
            Err(e) => {
                log::error!("Error getting data from {}: {}", entity, e);
                Err(ApiError::read(entity, e))
            }
        }
    }

    /// Create one record per entry, continuing past failures
    ///
    /// Returns the ids of the records that were created, in input order. A
    /// failed create is logged and left out; nothing is rolled back.
    pub async fn create_records(&self, entity: &str, records: &[Record]) -> Vec<i64> {
        let mut created_ids = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            match self.create_record(entity, record).await {
                Ok(id) => created_ids.push(id),
                Err(e) => {
                    log::error!("Record {} of {}: {}", index + 1, records.len(), e.format_detailed());
                }
            }
        }

        if created_ids.len() < records.len() {
            log::warn!(
                "Created {} of {} records on {}",
                created_ids.len(),
                records.len(),
                entity
            );
        }

        created_ids
    }

    /// Create a single record and return its id
    pub async fn create_record(&self, entity: &str, record: &Record) -> Result<i64> {
        let response = self
            .execute_kw(entity, "create", vec![Value::Object(record.clone())], None)
            .await
            .and_then(into_id);

        response.map_err(|e| ApiError::create(entity, e))
    }

    async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Option<Value>,
    ) -> std::result::Result<Value, RpcError> {
        let mut params = vec![
            json!(self.session.config.database),
            json!(self.session.uid),
            json!(self.session.config.password),
            json!(model),
            json!(method),
            Value::Array(args),
        ];
        if let Some(kwargs) = kwargs {
            params.push(kwargs);
        }

        self.transport.call(Endpoint::Object, "execute_kw", params).await
    }
}

/// `common.authenticate(db, login, password, {})`
///
/// Odoo answers `false` for bad credentials; any non-positive or
/// non-integer identity is treated the same way.
pub async fn authenticate(transport: &dyn RpcTransport, config: &ServerConfig) -> Result<Session> {
    let params = vec![
        json!(config.database),
        json!(config.username),
        json!(config.password),
        json!({}),
    ];

    let failure = |reason: String, source: Option<RpcError>| {
        log::error!("Authentication error for {}@{}: {}", config.username, config.url, reason);
        ApiError::Authentication {
            database: config.database.clone(),
            username: config.username.clone(),
            reason,
            source,
        }
    };

    let response = transport
        .call(Endpoint::Common, "authenticate", params)
        .await
        .map_err(|e| failure("server call failed".to_string(), Some(e)))?;

    match response.as_i64() {
        Some(uid) if uid > 0 => {
            log::info!("Authenticated as {} (uid {}) on {}", config.username, uid, config.url);
            Ok(Session {
                config: config.clone(),
                uid,
            })
        }
        _ => Err(failure(
            "credentials rejected, check database, username and password".to_string(),
            None,
        )),
    }
}

fn into_records(response: Value) -> std::result::Result<Vec<Record>, RpcError> {
    let items = match response {
        Value::Array(items) => items,
        other => {
            return Err(RpcError::UnexpectedResponse(format!(
                "search_read returned {} instead of an array",
                kind_of(&other)
            )));
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(RpcError::UnexpectedResponse(format!(
                "search_read returned {} instead of a record",
                kind_of(&other)
            ))),
        })
        .collect()
}

fn into_id(response: Value) -> std::result::Result<i64, RpcError> {
    let id = match &response {
        Value::Number(n) => n.as_i64(),
        // Newer servers answer a list of ids when given a list of records
        Value::Array(ids) if ids.len() == 1 => ids[0].as_i64(),
        _ => None,
    };
    id.ok_or_else(|| {
        RpcError::UnexpectedResponse(format!("create returned {} instead of an id", kind_of(&response)))
    })
}
