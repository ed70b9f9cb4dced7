//! In-memory Odoo server speaking the RpcTransport protocol

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, ThreadId};

use odoo_migrate::api::{Endpoint, OdooClient, Record, RpcError, RpcTransport, ServerConfig};

pub const UID: i64 = 2;

/// One call as seen by the fake server
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub method: String,
    pub params: Vec<Value>,
}

impl RecordedCall {
    /// The model method of an `execute_kw` call
    pub fn kw_method(&self) -> Option<&str> {
        self.params.get(4).and_then(Value::as_str)
    }
}

#[derive(Default)]
struct State {
    next_id: i64,
    records: Vec<Record>,
    calls: Vec<RecordedCall>,
}

/// A single-model Odoo server
pub struct FakeOdoo {
    pub model: String,
    pub fields: Vec<(String, String)>,
    pub accept_login: bool,
    pub fail_fields_get: bool,
    pub fail_search_read: bool,
    /// Records whose `name` is in this set are rejected by `create`
    pub reject_names: HashSet<String>,
    state: Mutex<State>,
}

impl FakeOdoo {
    pub fn new(model: &str, fields: &[(&str, &str)]) -> Self {
        Self {
            model: model.to_string(),
            fields: fields
                .iter()
                .map(|(name, kind)| (name.to_string(), kind.to_string()))
                .collect(),
            accept_login: true,
            fail_fields_get: false,
            fail_search_read: false,
            reject_names: HashSet::new(),
            state: Mutex::new(State {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Seed a record; an `id` is assigned
    pub fn with_record(self, record: Value) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_id;
            state.next_id += 1;
            let mut record = as_record(record);
            record.insert("id".to_string(), json!(id));
            state.records.push(record);
        }
        self
    }

    pub fn rejecting(mut self, name: &str) -> Self {
        self.reject_names.insert(name.to_string());
        self
    }

    pub fn records(&self) -> Vec<Record> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Payloads of every `create` call, failed ones included
    pub fn create_payloads(&self) -> Vec<Record> {
        self.calls()
            .into_iter()
            .filter(|c| c.kw_method() == Some("create"))
            .filter_map(|c| c.params.get(5).cloned())
            .filter_map(|args| args.get(0).cloned())
            .map(as_record)
            .collect()
    }

    pub fn count_kw(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.kw_method() == Some(method)).count()
    }

    fn fault(message: impl Into<String>) -> RpcError {
        RpcError::Fault {
            code: 1,
            message: message.into(),
        }
    }

    fn execute_kw(&self, params: &[Value]) -> Result<Value, RpcError> {
        let uid = params.get(1).and_then(Value::as_i64);
        if uid != Some(UID) {
            return Err(Self::fault("Access Denied"));
        }
        let model = params.get(3).and_then(Value::as_str).unwrap_or_default();
        if model != self.model {
            return Err(Self::fault(format!("Object {} doesn't exist", model)));
        }
        let method = params.get(4).and_then(Value::as_str).unwrap_or_default();
        let args = params.get(5).and_then(Value::as_array).cloned().unwrap_or_default();
        let kwargs = params.get(6).cloned().unwrap_or_else(|| json!({}));

        match method {
            "fields_get" => {
                if self.fail_fields_get {
                    return Err(Self::fault("fields_get exploded"));
                }
                let mut fields = Map::new();
                for (name, kind) in &self.fields {
                    fields.insert(name.clone(), json!({"type": kind}));
                }
                Ok(Value::Object(fields))
            }
            "search_read" => {
                if self.fail_search_read {
                    return Err(Self::fault("search_read exploded"));
                }
                let domain = args.first().and_then(Value::as_array).cloned().unwrap_or_default();
                let requested: Vec<String> = kwargs
                    .get("fields")
                    .and_then(Value::as_array)
                    .map(|f| f.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                    .unwrap_or_default();

                let state = self.state.lock().unwrap();
                let rows = state
                    .records
                    .iter()
                    .filter(|r| matches_domain(r, &domain))
                    .map(|r| {
                        let mut row = Map::new();
                        row.insert("id".to_string(), r["id"].clone());
                        for field in &requested {
                            // Unset values come back as false, like Odoo does
                            row.insert(field.clone(), r.get(field).cloned().unwrap_or(json!(false)));
                        }
                        Value::Object(row)
                    })
                    .collect();
                Ok(Value::Array(rows))
            }
            "create" => {
                let values = args.first().cloned().map(as_record).unwrap_or_default();
                for key in values.keys() {
                    if !self.fields.iter().any(|(name, _)| name == key) {
                        return Err(Self::fault(format!("Invalid field '{}' on model '{}'", key, self.model)));
                    }
                }
                if let Some(name) = values.get("name").and_then(Value::as_str) {
                    if self.reject_names.contains(name) {
                        return Err(Self::fault(format!("Cannot create '{}'", name)));
                    }
                }
                let mut state = self.state.lock().unwrap();
                let id = state.next_id;
                state.next_id += 1;
                let mut record = values;
                record.insert("id".to_string(), json!(id));
                state.records.push(record);
                Ok(json!(id))
            }
            other => Err(Self::fault(format!("Unknown method {}", other))),
        }
    }
}

#[async_trait]
impl RpcTransport for FakeOdoo {
    async fn call(&self, endpoint: Endpoint, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        self.state.lock().unwrap().calls.push(RecordedCall {
            endpoint,
            method: method.to_string(),
            params: params.clone(),
        });

        match (endpoint, method) {
            (Endpoint::Common, "authenticate") => {
                if self.accept_login {
                    Ok(json!(UID))
                } else {
                    Ok(json!(false))
                }
            }
            (Endpoint::Object, "execute_kw") => self.execute_kw(&params),
            _ => Err(Self::fault(format!("Unknown method {}", method))),
        }
    }
}

/// Equality-only domain matching: `[[field, "=", value], ...]`
fn matches_domain(record: &Record, domain: &[Value]) -> bool {
    domain.iter().all(|term| match term.as_array().map(Vec::as_slice) {
        Some([field, op, value]) if op == "=" => field
            .as_str()
            .map(|f| record.get(f).unwrap_or(&json!(false)) == value)
            .unwrap_or(false),
        _ => true,
    })
}

pub fn as_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

pub fn config(name: &str) -> ServerConfig {
    ServerConfig::new(format!("http://{}.test", name), name, "admin", "admin")
}

pub async fn connect(server: &Arc<FakeOdoo>, name: &str) -> OdooClient {
    let transport: Arc<dyn RpcTransport> = server.clone();
    OdooClient::with_transport(&config(name), transport).await.unwrap()
}

/// `crm.tag` with a relational partner link, as on an older server
pub fn crm_tag_source() -> FakeOdoo {
    FakeOdoo::new(
        "crm.tag",
        &[
            ("name", "char"),
            ("color", "integer"),
            ("active", "boolean"),
            ("partner_id", "many2one"),
        ],
    )
}

/// `crm.tag` with a description field instead of `active`
pub fn crm_tag_destination() -> FakeOdoo {
    FakeOdoo::new(
        "crm.tag",
        &[("name", "char"), ("color", "integer"), ("description", "text")],
    )
}

/// Log records captured per test thread
///
/// `#[tokio::test]` drives its future on the test's own thread, so filtering by
/// thread keeps parallel tests from seeing each other's entries.
pub struct LogCapture {
    entries: Mutex<Vec<(ThreadId, log::Level, String)>>,
}

impl log::Log for LogCapture {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.entries
            .lock()
            .unwrap()
            .push((thread::current().id(), record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

impl LogCapture {
    /// Position to read this thread's entries from
    pub fn mark(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Messages logged at `level` on the current thread since `mark`
    pub fn since(&self, mark: usize, level: log::Level) -> Vec<String> {
        let me = thread::current().id();
        self.entries.lock().unwrap()[mark..]
            .iter()
            .filter(|(thread, lvl, _)| *thread == me && *lvl == level)
            .map(|(_, _, message)| message.clone())
            .collect()
    }
}

/// Install the capturing logger once per test binary
pub fn capture_logs() -> &'static LogCapture {
    static CAPTURE: OnceLock<LogCapture> = OnceLock::new();
    let capture = CAPTURE.get_or_init(|| LogCapture {
        entries: Mutex::new(Vec::new()),
    });
    if log::set_logger(capture).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
    capture
}
