//! XML-RPC wire format
//!
//! Requests are rendered with quick-xml, responses are parsed with roxmltree.
//! Values are carried as `serde_json::Value` on both sides:
//!
//! | XML-RPC              | JSON            |
//! |----------------------|-----------------|
//! | int / i4 / i8        | integer number  |
//! | double               | float number    |
//! | boolean              | bool            |
//! | string, bare text    | string          |
//! | dateTime.iso8601     | string          |
//! | base64               | string          |
//! | nil                  | null            |
//! | array                | array           |
//! | struct               | object          |

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Number, Value};
use std::io;

use super::RpcError;

/// Render a `<methodCall>` document for `method` with the given positional params
pub fn encode_call(method: &str, params: &[Value]) -> Result<String, RpcError> {
    let mut writer = Writer::new(Vec::new());
    write_call(&mut writer, method, params).map_err(|e| RpcError::Encode(e.to_string()))?;
    String::from_utf8(writer.into_inner()).map_err(|e| RpcError::Encode(e.to_string()))
}

fn write_call(writer: &mut Writer<Vec<u8>>, method: &str, params: &[Value]) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("methodCall")))?;
    write_text_element(writer, "methodName", method)?;
    writer.write_event(Event::Start(BytesStart::new("params")))?;
    for param in params {
        writer.write_event(Event::Start(BytesStart::new("param")))?;
        write_value(writer, param)?;
        writer.write_event(Event::End(BytesEnd::new("param")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("params")))?;
    writer.write_event(Event::End(BytesEnd::new("methodCall")))?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_value(writer: &mut Writer<Vec<u8>>, value: &Value) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("value")))?;
    match value {
        Value::Null => writer.write_event(Event::Empty(BytesStart::new("nil")))?,
        Value::Bool(b) => write_text_element(writer, "boolean", if *b { "1" } else { "0" })?,
        Value::Number(n) => write_number(writer, n)?,
        Value::String(s) => write_text_element(writer, "string", s)?,
        Value::Array(items) => {
            writer.write_event(Event::Start(BytesStart::new("array")))?;
            writer.write_event(Event::Start(BytesStart::new("data")))?;
            for item in items {
                write_value(writer, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new("data")))?;
            writer.write_event(Event::End(BytesEnd::new("array")))?;
        }
        Value::Object(members) => {
            writer.write_event(Event::Start(BytesStart::new("struct")))?;
            for (name, member) in members {
                writer.write_event(Event::Start(BytesStart::new("member")))?;
                write_text_element(writer, "name", name)?;
                write_value(writer, member)?;
                writer.write_event(Event::End(BytesEnd::new("member")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("struct")))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("value")))?;
    Ok(())
}

fn write_number(writer: &mut Writer<Vec<u8>>, n: &Number) -> io::Result<()> {
    if let Some(i) = n.as_i64() {
        // <int> is 32-bit on the wire; larger values need the i8 extension
        if i32::try_from(i).is_ok() {
            write_text_element(writer, "int", &i.to_string())
        } else {
            write_text_element(writer, "i8", &i.to_string())
        }
    } else {
        let f = n.as_f64().unwrap_or_default();
        write_text_element(writer, "double", &f.to_string())
    }
}

/// Parse a `<methodResponse>` document into its single return value
///
/// A `<fault>` response is returned as [`RpcError::Fault`].
pub fn decode_response(body: &str) -> Result<Value, RpcError> {
    let doc = roxmltree::Document::parse(body).map_err(|e| RpcError::Xml(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "methodResponse" {
        return Err(RpcError::Xml(format!(
            "expected <methodResponse>, found <{}>",
            root.tag_name().name()
        )));
    }

    let body = first_element(root)
        .ok_or_else(|| RpcError::Xml("empty <methodResponse>".to_string()))?;

    match body.tag_name().name() {
        "params" => {
            let value = first_element(body)
                .and_then(first_element)
                .ok_or_else(|| RpcError::Xml("<params> without a <param><value>".to_string()))?;
            parse_value(value)
        }
        "fault" => {
            let value = first_element(body)
                .ok_or_else(|| RpcError::Xml("<fault> without a <value>".to_string()))?;
            Err(fault_from_value(parse_value(value)?))
        }
        other => Err(RpcError::Xml(format!("unexpected <{}> in response", other))),
    }
}

fn fault_from_value(value: Value) -> RpcError {
    let code = value.get("faultCode").and_then(Value::as_i64).unwrap_or_default();
    let message = match value.get("faultString") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    RpcError::Fault { code, message }
}

fn first_element<'a, 'input>(node: roxmltree::Node<'a, 'input>) -> Option<roxmltree::Node<'a, 'input>> {
    node.children().find(|n| n.is_element())
}

fn parse_value(node: roxmltree::Node) -> Result<Value, RpcError> {
    if node.tag_name().name() != "value" {
        return Err(RpcError::Xml(format!(
            "expected <value>, found <{}>",
            node.tag_name().name()
        )));
    }

    // <value>text</value> without a type element is a string
    let Some(typed) = first_element(node) else {
        return Ok(Value::String(node.text().unwrap_or_default().to_string()));
    };

    let text = typed.text().unwrap_or_default();
    match typed.tag_name().name() {
        "int" | "i4" | "i8" => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| RpcError::Xml(format!("invalid integer '{}': {}", text, e))),
        "double" => {
            let f = text
                .trim()
                .parse::<f64>()
                .map_err(|e| RpcError::Xml(format!("invalid double '{}': {}", text, e)))?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| RpcError::Xml(format!("non-finite double '{}'", text)))
        }
        "boolean" => match text.trim() {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(RpcError::Xml(format!("invalid boolean '{}'", other))),
        },
        "string" | "dateTime.iso8601" => Ok(Value::String(text.to_string())),
        "base64" => Ok(Value::String(text.split_whitespace().collect())),
        "nil" => Ok(Value::Null),
        "array" => {
            let Some(data) = first_element(typed) else {
                return Ok(Value::Array(Vec::new()));
            };
            data.children()
                .filter(|n| n.is_element())
                .map(parse_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "struct" => {
            let mut members = Map::new();
            for member in typed.children().filter(|n| n.is_element()) {
                let mut name = None;
                let mut value = None;
                for child in member.children().filter(|n| n.is_element()) {
                    match child.tag_name().name() {
                        "name" => name = Some(child.text().unwrap_or_default().to_string()),
                        "value" => value = Some(parse_value(child)?),
                        _ => {}
                    }
                }
                match (name, value) {
                    (Some(name), Some(value)) => {
                        members.insert(name, value);
                    }
                    _ => return Err(RpcError::Xml("incomplete struct <member>".to_string())),
                }
            }
            Ok(Value::Object(members))
        }
        other => Err(RpcError::Xml(format!("unsupported value type <{}>", other))),
    }
}
