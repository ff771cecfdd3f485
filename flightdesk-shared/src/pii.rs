use serde::{Serialize, Deserialize, Serializer};
use std::fmt;

/// A wrapper for secrets (passwords) that masks its value in Debug and Display output.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Only request bodies carry a Masked value, so the real value goes over the wire.
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }

    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Masked(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_value() {
        let secret = Masked::from("pass123");
        assert_eq!(format!("{:?}", secret), "********");
        assert_eq!(secret.to_string(), "********");
        assert_eq!(secret.expose(), "pass123");
    }

    #[test]
    fn test_serde_is_transparent() {
        let secret: Masked<String> = serde_json::from_str("\"pass123\"").unwrap();
        assert_eq!(secret.expose(), "pass123");
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"pass123\"");
    }
}
