use serde_json::Value;
use std::{fs, path::PathBuf};

const ROUND_KEYS: [&str; 5] = [
    "round_name",
    "total_arrows",
    "arrows_per_end",
    "use_target_face",
    "is_triple_spot",
];

/// # Errors
///
/// Will return `Err` if the file is not readable or is not valid json
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() || fs::metadata(&path).is_err() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("The json file '{file}' could not be read: {e}"))?;
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("The json file '{file}' is not valid json: {e}"))?;
    validate_json_format(&json)?;
    Ok(json)
}

/// Validate the json file format
/// format we expect is this:
/// [{ "round_name": "Portsmouth", "total_arrows": <int>, "arrows_per_end": <int>,
///    "use_target_face": <bool>, "is_triple_spot": <bool> }, ...]
/// the two booleans are optional.
///
/// # Errors
///
/// Will return `Err` if the json is not in the correct format
pub fn validate_json_format(json: &Value) -> Result<(), String> {
    let Some(rounds) = json.as_array() else {
        return Err("The json file is not in the correct format. Expected an array.".to_string());
    };

    for element in rounds {
        let Some(object) = element.as_object() else {
            return Err("The json file is not in the correct format. Expected objects.".to_string());
        };
        for key in object.keys() {
            if !ROUND_KEYS.contains(&key.as_str()) {
                return Err(format!(
                    "The json file is not in the correct format. Expected keys: {ROUND_KEYS:?}"
                ));
            }
        }
        if !element["round_name"].is_string() {
            return Err(
                "The json key round_name is not in the correct format. Expected a string."
                    .to_string(),
            );
        }
        for key in ["total_arrows", "arrows_per_end"] {
            if !element[key].is_u64() {
                return Err(format!(
                    "The json key {key} is not in the correct format. Expected a positive integer."
                ));
            }
        }
        for key in ["use_target_face", "is_triple_spot"] {
            if object.contains_key(key) && !element[key].is_boolean() {
                return Err(format!(
                    "The json key {key} is not in the correct format. Expected a boolean."
                ));
            }
        }
    }
    Ok(())
}

/// # Errors
///
/// Will return `Err` if the zoom is not a number of at least 1
pub fn check_zoom(value: &str) -> Result<f32, String> {
    let zoom: f32 = value
        .parse()
        .map_err(|_| format!("zoom '{value}' is not a number"))?;
    if zoom < 1.0 || !zoom.is_finite() {
        return Err(format!("zoom must be at least 1, got {zoom}"));
    }
    Ok(zoom)
}

pub const LENS_PX_RANGE: std::ops::RangeInclusive<u32> = 16..=1024;

/// # Errors
///
/// Will return `Err` if the lens size is not a whole number of pixels within `LENS_PX_RANGE`
pub fn check_lens_px(value: &str) -> Result<u32, String> {
    let px: u32 = value
        .parse()
        .map_err(|_| format!("lens size '{value}' is not a whole number of pixels"))?;
    if !LENS_PX_RANGE.contains(&px) {
        return Err(format!(
            "lens size must be between {} and {} pixels, got {px}",
            LENS_PX_RANGE.start(),
            LENS_PX_RANGE.end()
        ));
    }
    Ok(px)
}
