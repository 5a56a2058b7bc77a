//! Reply decoding shared by the command builders
//!
//! Each function maps one reply shape used by RedisBloom to a typed value.
//! Error replies, including ones nested inside an array, surface as
//! [`RedisError::Response`]; shape mismatches as
//! [`RedisError::UnexpectedResponse`].

use bytes::Bytes;
use redis_bloom_core::{
    error::{RedisError, RedisResult},
    types::{
        BloomInfo, CfInsertOutcome, CountMinSketchInfo, CuckooInfo, ScanDumpChunk, TopKInfo,
    },
    value::RespValue,
};
use std::collections::HashMap;

fn unexpected(expected: &str, got: &RespValue) -> RedisError {
    RedisError::UnexpectedResponse(format!("expected {}, got {:?}", expected, got))
}

/// Array elements may carry their own error reply, e.g. a full
/// non-scaling filter in the middle of `BF.MADD`
fn reject_error(response: RespValue) -> RedisResult<RespValue> {
    match response {
        RespValue::Error(msg) => Err(RedisError::Response(msg)),
        other => Ok(other),
    }
}

/// `0`/`1` integer (or `OK`) to bool
pub fn to_bool(response: RespValue) -> RedisResult<bool> {
    let response = reject_error(response)?;
    response.as_bool().map_err(|_| unexpected("0 or 1", &response))
}

/// `OK` status to `true`
pub fn to_ok(response: RespValue) -> RedisResult<bool> {
    match reject_error(response)? {
        RespValue::SimpleString(ref s) if s == "OK" => Ok(true),
        other => Err(unexpected("OK", &other)),
    }
}

/// Integer count
pub fn to_int(response: RespValue) -> RedisResult<i64> {
    let response = reject_error(response)?;
    response.as_int().map_err(|_| unexpected("integer", &response))
}

/// Array of `0`/`1` to a bool per element
pub fn to_bool_array(response: RespValue) -> RedisResult<Vec<bool>> {
    into_elements(response)?.into_iter().map(to_bool).collect()
}

/// Array of integers
pub fn to_int_array(response: RespValue) -> RedisResult<Vec<i64>> {
    into_elements(response)?.into_iter().map(to_int).collect()
}

/// `CF.INSERT` / `CF.INSERTNX` array of `1`, `0` or `-1` per item
pub fn to_cf_insert_outcomes(response: RespValue) -> RedisResult<Vec<CfInsertOutcome>> {
    into_elements(response)?
        .into_iter()
        .map(|item| match reject_error(item)? {
            RespValue::Integer(1) => Ok(CfInsertOutcome::Added),
            RespValue::Integer(0) => Ok(CfInsertOutcome::Exists),
            RespValue::Integer(-1) => Ok(CfInsertOutcome::Full),
            other => Err(unexpected("1, 0 or -1", &other)),
        })
        .collect()
}

/// Array of nullable strings, e.g. items expelled from a Top-K
pub fn to_optional_string_array(response: RespValue) -> RedisResult<Vec<Option<String>>> {
    into_elements(response)?
        .into_iter()
        .map(|item| {
            let item = reject_error(item)?;
            item.as_optional_string()
                .map_err(|_| unexpected("string or null", &item))
        })
        .collect()
}

/// Array of strings
pub fn to_string_array(response: RespValue) -> RedisResult<Vec<String>> {
    into_elements(response)?
        .into_iter()
        .map(|item| {
            let item = reject_error(item)?;
            item.as_string().map_err(|_| unexpected("string", &item))
        })
        .collect()
}

/// Flat `[item, count, item, count, ...]` array to pairs
pub fn to_string_count_pairs(response: RespValue) -> RedisResult<Vec<(String, i64)>> {
    let elements = into_elements(response)?;
    if elements.len() % 2 != 0 {
        return Err(RedisError::UnexpectedResponse(format!(
            "expected item/count pairs, got {} elements",
            elements.len()
        )));
    }
    let mut pairs = Vec::with_capacity(elements.len() / 2);
    let mut iter = elements.into_iter();
    while let (Some(item), Some(count)) = (iter.next(), iter.next()) {
        let item = reject_error(item)?;
        let item = item.as_string().map_err(|_| unexpected("string", &item))?;
        pairs.push((item, to_int(count)?));
    }
    Ok(pairs)
}

/// `[cursor, payload]` pair returned by `SCANDUMP`
///
/// The final reply of a dump carries a null payload, decoded as empty bytes.
pub fn to_scan_dump_chunk(response: RespValue) -> RedisResult<ScanDumpChunk> {
    let elements = into_elements(response)?;
    let [cursor, payload]: [RespValue; 2] = elements.try_into().map_err(|v: Vec<RespValue>| {
        RedisError::UnexpectedResponse(format!(
            "expected [iterator, data], got {} elements",
            v.len()
        ))
    })?;
    let iterator = to_int(cursor)?;
    let data = match payload {
        RespValue::Null => Bytes::new(),
        other => other.as_bytes().map_err(|_| unexpected("bulk string", &other))?,
    };
    Ok(ScanDumpChunk::new(iterator, data))
}

/// Flat `[field, value, field, value, ...]` array to a map keyed by field
/// name
pub fn to_field_map(response: RespValue) -> RedisResult<HashMap<String, RespValue>> {
    let elements = into_elements(response)?;
    if elements.len() % 2 != 0 {
        return Err(RedisError::UnexpectedResponse(format!(
            "expected field/value pairs, got {} elements",
            elements.len()
        )));
    }
    let mut map = HashMap::with_capacity(elements.len() / 2);
    let mut iter = elements.into_iter();
    while let (Some(field), Some(value)) = (iter.next(), iter.next()) {
        let field = field.as_string().map_err(|_| unexpected("field name", &field))?;
        map.insert(field, value);
    }
    Ok(map)
}

/// Typed view over an INFO field map
struct Fields(HashMap<String, RespValue>);

impl Fields {
    fn take(&mut self, name: &str) -> RedisResult<RespValue> {
        self.0
            .remove(name)
            .ok_or_else(|| RedisError::UnexpectedResponse(format!("missing INFO field {:?}", name)))
    }

    fn int(&mut self, name: &str) -> RedisResult<i64> {
        let value = self.take(name)?;
        value
            .as_int()
            .map_err(|_| unexpected(&format!("integer for {:?}", name), &value))
    }

    fn optional_int(&mut self, name: &str) -> RedisResult<Option<i64>> {
        match self.0.remove(name) {
            None | Some(RespValue::Null) => Ok(None),
            Some(value) => value
                .as_int()
                .map(Some)
                .map_err(|_| unexpected(&format!("integer for {:?}", name), &value)),
        }
    }

    fn float(&mut self, name: &str) -> RedisResult<f64> {
        let value = self.take(name)?;
        value
            .as_float()
            .map_err(|_| unexpected(&format!("float for {:?}", name), &value))
    }
}

/// `BF.INFO`
pub fn to_bloom_info(response: RespValue) -> RedisResult<BloomInfo> {
    let mut fields = Fields(to_field_map(response)?);
    Ok(BloomInfo {
        capacity: fields.int("Capacity")?,
        size: fields.int("Size")?,
        number_of_filters: fields.int("Number of filters")?,
        number_of_items_inserted: fields.int("Number of items inserted")?,
        expansion_rate: fields.optional_int("Expansion rate")?,
    })
}

/// `CF.INFO`
pub fn to_cuckoo_info(response: RespValue) -> RedisResult<CuckooInfo> {
    let mut fields = Fields(to_field_map(response)?);
    Ok(CuckooInfo {
        size: fields.int("Size")?,
        number_of_buckets: fields.int("Number of buckets")?,
        number_of_filters: fields.int("Number of filters")?,
        number_of_items_inserted: fields.int("Number of items inserted")?,
        number_of_items_deleted: fields.int("Number of items deleted")?,
        bucket_size: fields.int("Bucket size")?,
        expansion_rate: fields.int("Expansion rate")?,
        max_iterations: fields.int("Max iterations")?,
    })
}

/// `CMS.INFO`
pub fn to_count_min_sketch_info(response: RespValue) -> RedisResult<CountMinSketchInfo> {
    let mut fields = Fields(to_field_map(response)?);
    Ok(CountMinSketchInfo {
        width: fields.int("width")?,
        depth: fields.int("depth")?,
        count: fields.int("count")?,
    })
}

/// `TOPK.INFO`
pub fn to_top_k_info(response: RespValue) -> RedisResult<TopKInfo> {
    let mut fields = Fields(to_field_map(response)?);
    Ok(TopKInfo {
        k: fields.int("k")?,
        width: fields.int("width")?,
        depth: fields.int("depth")?,
        decay: fields.float("decay")?,
    })
}

/// Body of a server `INFO` reply as `key -> value`, skipping section
/// headers and blank lines
pub fn to_server_info(response: RespValue) -> RedisResult<HashMap<String, String>> {
    let body = response
        .as_string()
        .map_err(|_| unexpected("INFO text", &response))?;
    Ok(body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect())
}

fn into_elements(response: RespValue) -> RedisResult<Vec<RespValue>> {
    match response {
        RespValue::Array(elements) => Ok(elements),
        other => Err(unexpected("array", &other)),
    }
}
