#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// 64-bit floating point value
    F64(f64),

    /// Signed 64-bit integer
    I64(i64),

    /// A list of values, rendered as `(a, b, ...)`
    List(Vec<Value>),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),
}

impl Value {
    pub const fn null() -> Value {
        Value::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn list_from_vec(items: Vec<Value>) -> Value {
        Value::List(items)
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Value {
        Value::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Value {
        Value::I64(src.into())
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Value {
        Value::I64(src)
    }
}

impl From<u32> for Value {
    fn from(src: u32) -> Value {
        Value::I64(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Value {
        Value::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Value {
        Value::String(src)
    }
}

impl From<&[u8]> for Value {
    fn from(src: &[u8]) -> Value {
        Value::Bytes(src.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Value {
        Value::Bytes(src)
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Value {
        Value::List(src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Value {
        match src {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}
