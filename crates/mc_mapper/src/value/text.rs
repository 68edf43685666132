use alloc::string::{String, ToString};

use super::Value;
use crate::error::{MapError, MapResult};

impl Value {
    /// Parses the JSON text form.
    ///
    /// # Examples
    ///
    /// ```
    /// use mc_mapper::Value;
    ///
    /// let value = Value::from_text(r#"{"name":"Judy"}"#).unwrap();
    /// assert_eq!(value.as_map().unwrap().get("name"), Some(&Value::from("Judy")));
    /// ```
    pub fn from_text(text: &str) -> MapResult<Value> {
        serde_json::from_str(text).map_err(|e| MapError::Text(e.to_string()))
    }

    /// Prints the compact JSON text form.
    ///
    /// Non-finite floats have no JSON spelling and are reported as errors.
    pub fn to_text(&self) -> MapResult<String> {
        if self.has_non_finite() {
            return Err(MapError::Text("non-finite float has no text form".into()));
        }
        serde_json::to_string(self).map_err(|e| MapError::Text(e.to_string()))
    }

    fn has_non_finite(&self) -> bool {
        match self {
            Value::Float(f) => !f.is_finite(),
            Value::List(list) => list.iter().any(Value::has_non_finite),
            Value::Map(map) => map.values().any(Value::has_non_finite),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{MapError, Value};

    #[test]
    fn parse_errors_are_text_errors() {
        assert!(matches!(Value::from_text("{"), Err(MapError::Text(_))));
    }

    #[test]
    fn nan_cannot_be_printed() {
        assert!(matches!(
            Value::Float(f64::NAN).to_text(),
            Err(MapError::Text(_))
        ));
        assert_eq!(Value::Float(2.5).to_text().unwrap(), "2.5");
    }
}
