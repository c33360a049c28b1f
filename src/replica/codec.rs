//! Record codec between JSON values and nested document objects
//!
//! Records cross the session boundary as `serde_json::Value`; inside the
//! shared document they are stored as structured map/list objects so the
//! engine can merge them field-wise rather than as opaque blobs.

use super::ReplicaError;
use automerge::transaction::Transactable;
use automerge::{ObjId, ObjType, Prop, ReadDoc, ScalarValue};
use serde_json::{Map, Number, Value};

/// Where a value lands inside its parent object.
enum Slot<'a> {
    Key(&'a str),
    Index(usize),
}

/// Write a whole record under `key` in the map object `obj`.
pub(crate) fn write_entry<T: Transactable>(
    tx: &mut T,
    obj: &ObjId,
    key: &str,
    value: &Value,
) -> Result<(), ReplicaError> {
    write_value(tx, obj, Slot::Key(key), value)
}

/// Hydrate the record stored under `key` in the map object `obj`.
pub(crate) fn read_entry<D: ReadDoc>(
    doc: &D,
    obj: &ObjId,
    key: &str,
) -> Result<Value, ReplicaError> {
    read_prop(doc, obj, key.to_string())
}

pub(crate) fn doc_err(err: automerge::AutomergeError) -> ReplicaError {
    ReplicaError::Document(err.to_string())
}

fn write_value<T: Transactable>(
    tx: &mut T,
    obj: &ObjId,
    slot: Slot<'_>,
    value: &Value,
) -> Result<(), ReplicaError> {
    match value {
        Value::Object(fields) => {
            let child = put_object(tx, obj, slot, ObjType::Map)?;
            for (key, field) in fields {
                write_value(tx, &child, Slot::Key(key), field)?;
            }
        }
        Value::Array(items) => {
            let child = put_object(tx, obj, slot, ObjType::List)?;
            for (index, item) in items.iter().enumerate() {
                write_value(tx, &child, Slot::Index(index), item)?;
            }
        }
        Value::Null => put_scalar(tx, obj, slot, ScalarValue::Null)?,
        Value::Bool(b) => put_scalar(tx, obj, slot, ScalarValue::Boolean(*b))?,
        Value::Number(n) => put_scalar(tx, obj, slot, number_scalar(n)?)?,
        Value::String(s) => put_scalar(tx, obj, slot, ScalarValue::Str(s.as_str().into()))?,
    }
    Ok(())
}

fn put_object<T: Transactable>(
    tx: &mut T,
    obj: &ObjId,
    slot: Slot<'_>,
    kind: ObjType,
) -> Result<ObjId, ReplicaError> {
    match slot {
        Slot::Key(key) => tx.put_object(obj, key, kind).map_err(doc_err),
        Slot::Index(index) => tx.insert_object(obj, index, kind).map_err(doc_err),
    }
}

fn put_scalar<T: Transactable>(
    tx: &mut T,
    obj: &ObjId,
    slot: Slot<'_>,
    value: ScalarValue,
) -> Result<(), ReplicaError> {
    match slot {
        Slot::Key(key) => tx.put(obj, key, value).map_err(doc_err),
        Slot::Index(index) => tx.insert(obj, index, value).map_err(doc_err),
    }
}

fn number_scalar(n: &Number) -> Result<ScalarValue, ReplicaError> {
    if let Some(i) = n.as_i64() {
        Ok(ScalarValue::Int(i))
    } else if let Some(u) = n.as_u64() {
        Ok(ScalarValue::Uint(u))
    } else if let Some(f) = n.as_f64() {
        Ok(ScalarValue::F64(f))
    } else {
        Err(ReplicaError::Codec(format!("unrepresentable number: {n}")))
    }
}

fn read_prop<D: ReadDoc, P: Into<Prop>>(
    doc: &D,
    obj: &ObjId,
    prop: P,
) -> Result<Value, ReplicaError> {
    match doc.get(obj, prop).map_err(doc_err)? {
        None => Ok(Value::Null),
        Some((automerge::Value::Object(ObjType::Map), id))
        | Some((automerge::Value::Object(ObjType::Table), id)) => read_map(doc, &id),
        Some((automerge::Value::Object(ObjType::List), id)) => read_list(doc, &id),
        Some((automerge::Value::Object(ObjType::Text), id)) => {
            Ok(Value::String(doc.text(&id).map_err(doc_err)?))
        }
        Some((automerge::Value::Scalar(s), _)) => Ok(json_scalar(s.as_ref())),
    }
}

fn read_map<D: ReadDoc>(doc: &D, obj: &ObjId) -> Result<Value, ReplicaError> {
    let keys: Vec<String> = doc.keys(obj).collect();
    let mut out = Map::new();
    for key in keys {
        let value = read_prop(doc, obj, key.clone())?;
        out.insert(key, value);
    }
    Ok(Value::Object(out))
}

fn read_list<D: ReadDoc>(doc: &D, obj: &ObjId) -> Result<Value, ReplicaError> {
    let len = doc.length(obj);
    let mut out = Vec::with_capacity(len);
    for index in 0..len {
        out.push(read_prop(doc, obj, index)?);
    }
    Ok(Value::Array(out))
}

fn json_scalar(scalar: &ScalarValue) -> Value {
    match scalar {
        ScalarValue::Null => Value::Null,
        ScalarValue::Boolean(b) => Value::Bool(*b),
        ScalarValue::Int(i) => Value::Number((*i).into()),
        ScalarValue::Uint(u) => Value::Number((*u).into()),
        ScalarValue::F64(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        ScalarValue::Counter(c) => Value::Number(i64::from(c).into()),
        ScalarValue::Timestamp(t) => Value::Number((*t).into()),
        ScalarValue::Str(s) => Value::String(s.to_string()),
        // No JSON rendering for raw bytes or unknown scalar kinds
        ScalarValue::Bytes(_) | ScalarValue::Unknown { .. } => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automerge::{Automerge, ROOT};
    use serde_json::json;

    fn doc_with_entry(key: &str, record: &Value) -> (Automerge, ObjId) {
        let mut doc = Automerge::new();
        let mut tx = doc.transaction();
        let map = tx.put_object(ROOT, "nodes", ObjType::Map).unwrap();
        write_entry(&mut tx, &map, key, record).unwrap();
        tx.commit();
        let (_, map) = doc.get(ROOT, "nodes").unwrap().unwrap();
        (doc, map)
    }

    #[test]
    fn nested_record_round_trips() {
        let record = json!({
            "id": "n1",
            "type": "graphNode",
            "position": { "x": 250.0, "y": 100.0 },
            "dragging": false,
            "data": {
                "label": "Background",
                "nodeType": "M",
                "creator": "graphCollab:LLM"
            }
        });
        let (doc, map) = doc_with_entry("n1", &record);
        let back = read_entry(&doc, &map, "n1").unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn null_fields_survive_the_round_trip() {
        let record = json!({ "sourceHandle": null, "targetHandle": null });
        let (doc, map) = doc_with_entry("e1", &record);
        let back = read_entry(&doc, &map, "e1").unwrap();
        assert!(back["sourceHandle"].is_null());
        assert!(back["targetHandle"].is_null());
    }

    #[test]
    fn arrays_keep_order() {
        let record = json!({ "items": [1, "two", 3.5, null, { "k": true }] });
        let (doc, map) = doc_with_entry("r", &record);
        let back = read_entry(&doc, &map, "r").unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn integers_and_floats_stay_distinct() {
        let record = json!({ "count": 3, "width": 300.0 });
        let (doc, map) = doc_with_entry("r", &record);
        let back = read_entry(&doc, &map, "r").unwrap();
        assert!(back["count"].is_i64());
        assert!(back["width"].is_f64());
    }

    #[test]
    fn missing_entry_reads_as_null() {
        let (doc, map) = doc_with_entry("present", &json!({"id": "x"}));
        assert_eq!(read_entry(&doc, &map, "absent").unwrap(), Value::Null);
    }

    #[test]
    fn overwrite_replaces_the_whole_record() {
        let mut doc = Automerge::new();
        let mut tx = doc.transaction();
        let map = tx.put_object(ROOT, "nodes", ObjType::Map).unwrap();
        write_entry(&mut tx, &map, "n1", &json!({ "a": 1, "b": 2 })).unwrap();
        tx.commit();

        let (_, map) = doc.get(ROOT, "nodes").unwrap().unwrap();
        let mut tx = doc.transaction();
        write_entry(&mut tx, &map, "n1", &json!({ "c": 3 })).unwrap();
        tx.commit();

        let back = read_entry(&doc, &map, "n1").unwrap();
        assert_eq!(back, json!({ "c": 3 }));
    }
}
