//! Form-style field coercion: clients send ids and scores either as JSON
//! numbers or as numeric strings.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Text(String),
}

/// `"0xabc"` or `123`; numbers are kept as their decimal text.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Int(n) => n.to_string(),
        Scalar::Text(text) => text,
    }))
}

/// `10` or `"10"`; any other string is rejected.
pub fn optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(n)),
        Some(Scalar::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "optional_text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "optional_integer")]
        count: Option<i64>,
    }

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        let fields: Fields = serde_json::from_str(r#"{"name":123,"count":"10"}"#).unwrap();
        assert_eq!(fields.name.as_deref(), Some("123"));
        assert_eq!(fields.count, Some(10));
    }

    #[test]
    fn missing_and_null_fields_are_none() {
        let fields: Fields = serde_json::from_str(r#"{"count":null}"#).unwrap();
        assert!(fields.name.is_none());
        assert!(fields.count.is_none());
    }

    #[test]
    fn non_numeric_integer_is_rejected() {
        let result = serde_json::from_str::<Fields>(r#"{"count":"ten"}"#);
        assert!(result.is_err());
    }
}
