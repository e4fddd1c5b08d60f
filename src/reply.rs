use bytes::{BufMut, Bytes, BytesMut};

use crate::backend::Value;

/// A command result in Redis terms, ready to be handed to the wire framer.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(String),
    Array(Vec<Reply>),
    Null,
}

impl Reply {
    pub fn ok() -> Self {
        Reply::SimpleString("OK".to_string())
    }

    pub fn from_strings<I: IntoIterator<Item = String>>(values: I) -> Self {
        Reply::Array(values.into_iter().map(Reply::BulkString).collect())
    }

    /// Renders the reply as RESP2.
    pub fn encode(&self) -> Bytes {
        let mut buffer = BytesMut::new();
        self.encode_into(&mut buffer);
        buffer.freeze()
    }

    pub fn encode_to_string(&self) -> String {
        String::from_utf8_lossy(&self.encode()).into_owned()
    }

    fn encode_into(&self, buffer: &mut BytesMut) {
        match self {
            Reply::SimpleString(s) => {
                buffer.put_u8(b'+');
                buffer.put_slice(s.as_bytes());
                buffer.put_slice(b"\r\n");
            }
            Reply::Error(s) => {
                buffer.put_u8(b'-');
                buffer.put_slice(s.as_bytes());
                buffer.put_slice(b"\r\n");
            }
            Reply::Integer(i) => {
                buffer.put_slice(format!(":{}\r\n", i).as_bytes());
            }
            Reply::BulkString(s) => {
                buffer.put_slice(format!("${}\r\n", s.len()).as_bytes());
                buffer.put_slice(s.as_bytes());
                buffer.put_slice(b"\r\n");
            }
            Reply::Array(elements) => {
                buffer.put_slice(format!("*{}\r\n", elements.len()).as_bytes());
                for element in elements {
                    element.encode_into(buffer);
                }
            }
            Reply::Null => buffer.put_slice(b"$-1\r\n"),
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => Reply::Null,
            Value::Integer(i) => Reply::Integer(i),
            Value::String(s) => Reply::BulkString(s),
            Value::List(values) => Reply::Array(values.into_iter().map(Reply::from).collect()),
        }
    }
}
