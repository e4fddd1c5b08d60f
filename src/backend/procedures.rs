//! The stored-procedure module the adapter relies on.
//!
//! The names and positional arguments below are a contract with procedures
//! deployed on the store independently of this crate. Every function takes
//! the bin name first. [`execute`] is the in-process rendition used by
//! [`super::MemoryBackend`]: it runs against the current bin value and leaves
//! the new value (or `None` to drop the bin) in `slot`.

use crate::backend::{BackendError, Value};

pub const MODULE: &str = "redis";

pub const STRLEN: &str = "strlen";
pub const GETRANGE: &str = "getrange";
pub const SETRANGE: &str = "setrange";
pub const ADD: &str = "add";
pub const INCRBYFLOAT: &str = "incrbyfloat";
pub const LPUSH: &str = "lpush";
pub const RPUSH: &str = "rpush";
pub const LPUSHX: &str = "lpushx";
pub const RPUSHX: &str = "rpushx";
pub const LPOP: &str = "lpop";
pub const RPOP: &str = "rpop";
pub const LLEN: &str = "llen";
pub const LSET: &str = "lset";
pub const LINDEX: &str = "lindex";
pub const LINSERT: &str = "linsert";
pub const LRANGE: &str = "lrange";
pub const LREM: &str = "lrem";
pub const LTRIM: &str = "ltrim";

pub const FUNCTIONS: [&str; 18] = [
    STRLEN, GETRANGE, SETRANGE, ADD, INCRBYFLOAT, LPUSH, RPUSH, LPUSHX, RPUSHX, LPOP, RPOP, LLEN,
    LSET, LINDEX, LINSERT, LRANGE, LREM, LTRIM,
];

/// Largest string a bin may hold, matching Redis' `proto-max-bulk-len`.
pub const MAX_STRING_LENGTH: usize = 512 * 1024 * 1024;

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";
const STRING_TOO_LONG: &str = "ERR string exceeds maximum allowed size (proto-max-bulk-len)";

pub fn is_known(function: &str) -> bool {
    FUNCTIONS.contains(&function)
}

/// Runs `function` against the bin value in `slot`. `arguments` excludes the
/// bin name.
pub fn execute(
    function: &str,
    arguments: &[Value],
    slot: &mut Option<Value>,
) -> Result<Value, BackendError> {
    match function {
        STRLEN => Ok(Value::Integer(string_of(slot)?.len() as i64)),
        GETRANGE => {
            let current = string_of(slot)?;
            let start = integer_argument(arguments, 0)?;
            let end = integer_argument(arguments, 1)?;

            match normalize_range(current.len(), start, end) {
                Some((start, end)) => Ok(Value::String(
                    String::from_utf8_lossy(&current.as_bytes()[start..=end]).into_owned(),
                )),
                None => Ok(Value::String(String::new())),
            }
        }
        SETRANGE => {
            let offset = integer_argument(arguments, 0)?;
            let value = string_argument(arguments, 1)?;
            let mut current = string_of(slot)?.into_bytes();

            if offset < 0 {
                return Err(procedure_error("ERR offset is out of range"));
            }
            if value.is_empty() {
                return Ok(Value::Integer(current.len() as i64));
            }

            let offset = usize::try_from(offset).map_err(|_| procedure_error(STRING_TOO_LONG))?;
            let end = offset
                .checked_add(value.len())
                .filter(|end| *end <= MAX_STRING_LENGTH)
                .ok_or_else(|| procedure_error(STRING_TOO_LONG))?;

            if current.len() < end {
                current.resize(end, 0);
            }
            current[offset..end].copy_from_slice(value.as_bytes());

            let length = current.len() as i64;
            *slot = Some(Value::String(String::from_utf8_lossy(&current).into_owned()));
            Ok(Value::Integer(length))
        }
        ADD => {
            let delta = integer_argument(arguments, 0)?;
            let current = string_of(slot)?;
            let current = if current.is_empty() {
                0
            } else {
                current
                    .parse::<i64>()
                    .map_err(|_| procedure_error("ERR value is not an integer or out of range"))?
            };

            let sum = current
                .checked_add(delta)
                .ok_or_else(|| procedure_error("ERR increment or decrement would overflow"))?;
            *slot = Some(Value::String(sum.to_string()));
            Ok(Value::Integer(sum))
        }
        INCRBYFLOAT => {
            let delta = parse_float(string_argument(arguments, 0)?)?;
            let current = string_of(slot)?;
            let current = if current.is_empty() {
                0.0
            } else {
                parse_float(&current)?
            };

            let sum = current + delta;
            if !sum.is_finite() {
                return Err(procedure_error(
                    "ERR increment would produce NaN or Infinity",
                ));
            }

            let formatted = format_float(sum);
            *slot = Some(Value::String(formatted.clone()));
            Ok(Value::String(formatted))
        }
        LPUSH | RPUSH => {
            let values = list_argument(arguments, 0)?;
            let mut list = list_of(slot)?;
            push_values(&mut list, values, function == LPUSH);

            let length = list.len() as i64;
            *slot = Some(Value::List(list));
            Ok(Value::Integer(length))
        }
        LPUSHX | RPUSHX => {
            let values = list_argument(arguments, 0)?;
            if slot.is_none() {
                return Ok(Value::Integer(0));
            }

            let mut list = list_of(slot)?;
            push_values(&mut list, values, function == LPUSHX);

            let length = list.len() as i64;
            *slot = Some(Value::List(list));
            Ok(Value::Integer(length))
        }
        LPOP | RPOP => {
            let count = match arguments.first() {
                Some(_) => Some(integer_argument(arguments, 0)?),
                None => None,
            };
            let mut list = list_of(slot)?;

            if list.is_empty() {
                return Ok(Value::Nil);
            }

            let amount = match count {
                Some(count) if count < 0 => {
                    return Err(procedure_error("ERR value is out of range, must be positive"));
                }
                Some(count) => (count as usize).min(list.len()),
                None => 1,
            };

            let popped = if function == LPOP {
                list.drain(..amount).collect::<Vec<Value>>()
            } else {
                let mut tail = list.split_off(list.len() - amount);
                tail.reverse();
                tail
            };

            store_list(slot, list);

            match count {
                Some(_) => Ok(Value::List(popped)),
                None => Ok(popped.into_iter().next().unwrap_or(Value::Nil)),
            }
        }
        LLEN => Ok(Value::Integer(list_of(slot)?.len() as i64)),
        LSET => {
            let index = integer_argument(arguments, 0)?;
            let value = string_argument(arguments, 1)?;

            if slot.is_none() {
                return Err(procedure_error("ERR no such key"));
            }

            let mut list = list_of(slot)?;
            let Some(position) = normalize_index(list.len(), index) else {
                return Err(procedure_error("ERR index out of range"));
            };

            list[position] = Value::String(value.to_string());
            *slot = Some(Value::List(list));
            Ok(Value::String("OK".to_string()))
        }
        LINDEX => {
            let index = integer_argument(arguments, 0)?;
            let list = list_of(slot)?;

            match normalize_index(list.len(), index) {
                Some(position) => Ok(list[position].clone()),
                None => Ok(Value::Nil),
            }
        }
        LINSERT => {
            let placement = string_argument(arguments, 0)?.to_uppercase();
            let pivot = string_argument(arguments, 1)?;
            let value = string_argument(arguments, 2)?;

            if placement != "BEFORE" && placement != "AFTER" {
                return Err(procedure_error("ERR syntax error"));
            }
            if slot.is_none() {
                return Ok(Value::Integer(0));
            }

            let mut list = list_of(slot)?;
            let Some(position) = list.iter().position(|element| element.as_str() == Some(pivot))
            else {
                return Ok(Value::Integer(-1));
            };

            let position = if placement == "BEFORE" {
                position
            } else {
                position + 1
            };
            list.insert(position, Value::String(value.to_string()));

            let length = list.len() as i64;
            *slot = Some(Value::List(list));
            Ok(Value::Integer(length))
        }
        LRANGE => {
            let start = integer_argument(arguments, 0)?;
            let stop = integer_argument(arguments, 1)?;
            let list = list_of(slot)?;

            match normalize_range(list.len(), start, stop) {
                Some((start, stop)) => Ok(Value::List(list[start..=stop].to_vec())),
                None => Ok(Value::List(Vec::new())),
            }
        }
        LREM => {
            let count = integer_argument(arguments, 0)?;
            let value = string_argument(arguments, 1)?;
            let mut list = list_of(slot)?;

            let limit = if count == 0 {
                usize::MAX
            } else {
                count.unsigned_abs() as usize
            };
            let mut removed = 0;

            if count >= 0 {
                list.retain(|element| {
                    if removed < limit && element.as_str() == Some(value) {
                        removed += 1;
                        false
                    } else {
                        true
                    }
                });
            } else {
                list.reverse();
                list.retain(|element| {
                    if removed < limit && element.as_str() == Some(value) {
                        removed += 1;
                        false
                    } else {
                        true
                    }
                });
                list.reverse();
            }

            if removed > 0 {
                store_list(slot, list);
            }
            Ok(Value::Integer(removed as i64))
        }
        LTRIM => {
            let start = integer_argument(arguments, 0)?;
            let stop = integer_argument(arguments, 1)?;
            let list = list_of(slot)?;

            if slot.is_some() {
                let kept = match normalize_range(list.len(), start, stop) {
                    Some((start, stop)) => list[start..=stop].to_vec(),
                    None => Vec::new(),
                };
                store_list(slot, kept);
            }
            Ok(Value::String("OK".to_string()))
        }
        _ => Err(procedure_error(&format!("ERR unknown procedure '{}'", function))),
    }
}

/// Normalizes inclusive Redis range indexes, where negative values count
/// from the end. Returns `None` when the range selects nothing.
pub fn normalize_range(length: usize, start: i64, end: i64) -> Option<(usize, usize)> {
    let length = length as i64;

    if length == 0 {
        return None;
    }

    let start = if start < 0 { length + start } else { start }.max(0);
    let end = if end < 0 { length + end } else { end }.min(length - 1);

    if start >= length || start > end {
        return None;
    }

    Some((start as usize, end as usize))
}

fn normalize_index(length: usize, index: i64) -> Option<usize> {
    let length = length as i64;
    let position = if index < 0 { length + index } else { index };

    if position < 0 || position >= length {
        None
    } else {
        Some(position as usize)
    }
}

fn push_values(list: &mut Vec<Value>, values: &[Value], at_head: bool) {
    for value in values {
        if at_head {
            list.insert(0, value.clone());
        } else {
            list.push(value.clone());
        }
    }
}

// Empty lists do not exist in Redis, so the bin goes away with its last element.
fn store_list(slot: &mut Option<Value>, list: Vec<Value>) {
    if list.is_empty() {
        *slot = None;
    } else {
        *slot = Some(Value::List(list));
    }
}

fn string_of(slot: &Option<Value>) -> Result<String, BackendError> {
    match slot {
        None | Some(Value::Nil) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Integer(i)) => Ok(i.to_string()),
        Some(Value::List(_)) => Err(procedure_error(WRONG_TYPE)),
    }
}

fn list_of(slot: &Option<Value>) -> Result<Vec<Value>, BackendError> {
    match slot {
        None | Some(Value::Nil) => Ok(Vec::new()),
        Some(Value::List(list)) => Ok(list.clone()),
        Some(_) => Err(procedure_error(WRONG_TYPE)),
    }
}

fn parse_float(input: &str) -> Result<f64, BackendError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| procedure_error("ERR value is not a valid float"))
}

fn integer_argument(arguments: &[Value], index: usize) -> Result<i64, BackendError> {
    match arguments.get(index) {
        Some(Value::Integer(i)) => Ok(*i),
        _ => Err(invalid_arguments()),
    }
}

fn string_argument(arguments: &[Value], index: usize) -> Result<&str, BackendError> {
    match arguments.get(index) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(invalid_arguments()),
    }
}

fn list_argument(arguments: &[Value], index: usize) -> Result<&[Value], BackendError> {
    match arguments.get(index) {
        Some(Value::List(values)) => Ok(values),
        _ => Err(invalid_arguments()),
    }
}

fn invalid_arguments() -> BackendError {
    procedure_error("ERR invalid procedure arguments")
}

/// Renders a float the way the procedure runtime prints numbers: 14
/// significant digits, trailing zeros dropped, exponent form outside
/// `1e-4..1e14`.
fn format_float(value: f64) -> String {
    let scientific = format!("{:.13e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent = exponent.parse::<i32>().unwrap_or(0);

    if !(-4..14).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs());
    }

    let decimals = (13 - exponent) as usize;
    trim_zeros(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

fn procedure_error(message: &str) -> BackendError {
    BackendError::Procedure(message.to_string())
}
