//! Packed coordinate strings

use thiserror::Error;

/// A coordinate string that is not exactly two float tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an \"x,y\" float pair: '{0}'")]
pub struct CoordinateError(pub String);

/// Split a packed `"x,y"` string into a float pair.
///
/// Exactly one comma and two parseable float tokens are required; whitespace
/// around either token is tolerated.
pub fn parse_coordinates(coord: &str) -> Result<(f64, f64), CoordinateError> {
    let mut parts = coord.split(',');
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CoordinateError(coord.to_string()));
    };
    match (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(CoordinateError(coord.to_string())),
    }
}
