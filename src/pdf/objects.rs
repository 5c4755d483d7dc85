//! Dictionary lookups that follow indirect references

use lopdf::{Dictionary, Document, Object};

use crate::error::ScanError;

/// Follow a reference chain to the object it points at
pub fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, ScanError> {
    Ok(doc.dereference(object)?.1)
}

/// Look up `key` and resolve it, `None` if the key is absent
pub fn get<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Result<Option<&'a Object>, ScanError> {
    match dict.get(key) {
        Ok(object) => resolve(doc, object).map(Some),
        Err(_) => Ok(None),
    }
}

pub fn get_int(
    doc: &Document,
    dict: &Dictionary,
    key: &'static str,
) -> Result<Option<i64>, ScanError> {
    get(doc, dict, key.as_bytes())?
        .map(|o| o.as_i64().map_err(|_| ScanError::BadKey(key)))
        .transpose()
}

pub fn get_bool(
    doc: &Document,
    dict: &Dictionary,
    key: &'static str,
) -> Result<Option<bool>, ScanError> {
    get(doc, dict, key.as_bytes())?
        .map(|o| o.as_bool().map_err(|_| ScanError::BadKey(key)))
        .transpose()
}

pub fn get_name<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &'static str,
) -> Result<Option<&'a [u8]>, ScanError> {
    get(doc, dict, key.as_bytes())?
        .map(|o| o.as_name().map_err(|_| ScanError::BadKey(key)))
        .transpose()
}

/// Names in `/Filter`, which may be a single name or an array
pub fn filter_names<'a>(doc: &'a Document, dict: &'a Dictionary) -> Result<Vec<&'a [u8]>, ScanError> {
    match get(doc, dict, b"Filter")? {
        None => Ok(Vec::new()),
        Some(Object::Name(name)) => Ok(vec![name.as_slice()]),
        Some(Object::Array(items)) => items
            .iter()
            .map(|item| {
                resolve(doc, item)?
                    .as_name()
                    .map_err(|_| ScanError::BadKey("Filter"))
            })
            .collect(),
        Some(_) => Err(ScanError::BadKey("Filter")),
    }
}

/// `/DecodeParms` for a stream with a single filter
pub fn decode_parms<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
) -> Result<Option<&'a Dictionary>, ScanError> {
    let parms = match get(doc, dict, b"DecodeParms")? {
        None | Some(Object::Null) => return Ok(None),
        Some(Object::Array(items)) => match items.first() {
            Some(first) => resolve(doc, first)?,
            None => return Ok(None),
        },
        Some(other) => other,
    };
    match parms {
        Object::Null => Ok(None),
        Object::Dictionary(d) => Ok(Some(d)),
        _ => Err(ScanError::BadKey("DecodeParms")),
    }
}
