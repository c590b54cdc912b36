use serde_json::{Map, Value};

use crate::store::Member;

/// Fields a member payload must carry
const REQUIRED_FIELDS: [&str; 4] = ["id", "first_name", "age", "lucky_numbers"];

/// Validation failures for a POSTed member, checked in declaration order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("id must be an integer")]
    IdNotInteger,
    #[error("first_name must be a string")]
    FirstNameNotString,
    #[error("age must be an integer")]
    AgeNotInteger,
    #[error("lucky_numbers must be a list")]
    LuckyNumbersNotList,
    #[error("lucky_numbers must be a list of integers")]
    LuckyNumberNotInteger,
}

/// Build a member from a decoded JSON body.
///
/// Presence of all fields is checked before any type check. Booleans and
/// floats are not accepted as integers. Unknown fields are ignored.
pub fn parse_member(body: &Value) -> Result<Member, PayloadError> {
    let fields = body.as_object().ok_or(PayloadError::MissingFields)?;
    if !REQUIRED_FIELDS.iter().all(|key| fields.contains_key(*key)) {
        return Err(PayloadError::MissingFields);
    }

    let id = integer(fields, "id").ok_or(PayloadError::IdNotInteger)?;
    let first_name = fields["first_name"]
        .as_str()
        .ok_or(PayloadError::FirstNameNotString)?
        .to_string();
    let age = integer(fields, "age").ok_or(PayloadError::AgeNotInteger)?;
    let lucky_numbers = fields["lucky_numbers"]
        .as_array()
        .ok_or(PayloadError::LuckyNumbersNotList)?
        .iter()
        .map(|n| n.as_i64().ok_or(PayloadError::LuckyNumberNotInteger))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Member {
        id,
        first_name,
        age,
        lucky_numbers,
    })
}

fn integer(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    fields.get(key).and_then(Value::as_i64)
}
