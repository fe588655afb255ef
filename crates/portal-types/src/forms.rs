use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};

// Forms and query strings are read leniently: a missing key reads as "",
// a repeated key keeps its first value, unknown keys are ignored.

#[derive(Debug, Default, Deserialize)]
#[serde(from = "FirstValues")]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl From<FirstValues> for LoginForm {
    fn from(mut values: FirstValues) -> Self {
        Self {
            username: values.take("username"),
            password: values.take("password"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(from = "FirstValues")]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

impl From<FirstValues> for RegisterForm {
    fn from(mut values: FirstValues) -> Self {
        Self {
            username: values.take("username"),
            email: values.take("email"),
            password1: values.take("password1"),
            password2: values.take("password2"),
        }
    }
}

impl RegisterForm {
    /// True when any of the required inputs is blank. The confirmation
    /// field is not required on its own; it only has to match.
    pub fn has_empty_field(&self) -> bool {
        self.username.is_empty() || self.email.is_empty() || self.password1.is_empty()
    }

    pub fn passwords_match(&self) -> bool {
        self.password1 == self.password2
    }
}

/// Query string accepted by `GET /login`. `next` is carried by the guard's
/// redirect but nothing consumes it yet.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "FirstValues")]
pub struct LoginQuery {
    pub next: Option<String>,
}

impl From<FirstValues> for LoginQuery {
    fn from(mut values: FirstValues) -> Self {
        Self {
            next: values.0.remove("next"),
        }
    }
}

/// Every key of a flat string map, first occurrence wins.
struct FirstValues(HashMap<String, String>);

impl FirstValues {
    fn take(&mut self, key: &str) -> String {
        self.0.remove(key).unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for FirstValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FirstValuesVisitor)
    }
}

struct FirstValuesVisitor;

impl<'de> Visitor<'de> for FirstValuesVisitor {
    type Value = FirstValues;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of string fields")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut values = HashMap::new();
        while let Some((key, value)) = map.next_entry::<String, String>()? {
            values.entry(key).or_insert(value);
        }
        Ok(FirstValues(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, p1: &str, p2: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            email: email.into(),
            password1: p1.into(),
            password2: p2.into(),
        }
    }

    #[test]
    fn empty_confirmation_alone_is_not_an_empty_field() {
        let f = form("alice", "a@x.com", "p", "");
        assert!(!f.has_empty_field());
        assert!(!f.passwords_match());
    }

    #[test]
    fn any_required_blank_counts_as_empty() {
        assert!(form("", "a@x.com", "p", "p").has_empty_field());
        assert!(form("alice", "", "p", "p").has_empty_field());
        assert!(form("alice", "a@x.com", "", "").has_empty_field());
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let f: LoginForm = serde_json::from_str(
            r#"{"username":"admin","password":"root","username":"other","extra":"x"}"#,
        )
        .unwrap();
        assert_eq!((f.username.as_str(), f.password.as_str()), ("admin", "root"));

        let q: LoginQuery =
            serde_json::from_str(r#"{"next":"/panel","next":"/other"}"#).unwrap();
        assert_eq!(q.next.as_deref(), Some("/panel"));

        let q: LoginQuery = serde_json::from_str("{}").unwrap();
        assert!(q.next.is_none());
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let f: RegisterForm = serde_json::from_str(r#"{"username":"bob"}"#).unwrap();
        assert_eq!(f.username, "bob");
        assert!(f.email.is_empty());
        assert!(f.has_empty_field());
    }
}
