use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::InputError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str, origin: &Path) -> Result<T, InputError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| InputError::Json {
        path: origin.to_path_buf(),
        json_path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Same as [`from_str_with_path`] for an already-parsed value.
pub fn from_value_with_path<T: DeserializeOwned>(
    value: serde_json::Value,
    origin: &Path,
) -> Result<T, InputError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| InputError::Json {
        path: origin.to_path_buf(),
        json_path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}
