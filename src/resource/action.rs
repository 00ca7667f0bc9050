//! Action requests
//!
//! Every non-CRUD state transition is a `POST .../action` whose body is a
//! JSON object with exactly one key, the action name, mapping to `null` or a
//! parameter object.

use crate::sgs::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

/// A typed action that can be sent to an action endpoint
pub trait ActionRequest {
    /// Action name, the single key of the request body
    fn name(&self) -> &'static str;

    /// Parameter object, `None` to send `null`
    fn params(&self) -> Result<Option<Value>>;

    /// Key holding the resource in the response, for actions that return one
    fn response_key(&self) -> Option<&'static str>;

    /// The `{"<name>": params|null}` request body
    fn envelope(&self) -> Result<Value> {
        let mut body = Map::new();
        body.insert(
            self.name().to_string(),
            self.params()?.unwrap_or(Value::Null),
        );
        Ok(Value::Object(body))
    }
}

/// Serialize a parameter struct for [`ActionRequest::params`]
pub fn params_of<T: Serialize>(params: &T) -> Result<Option<Value>> {
    Ok(Some(serde_json::to_value(params)?))
}

/// Action set of resource kinds that have no action endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoAction {}

impl ActionRequest for NoAction {
    fn name(&self) -> &'static str {
        match *self {}
    }

    fn params(&self) -> Result<Option<Value>> {
        match *self {}
    }

    fn response_key(&self) -> Option<&'static str> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Ping(Option<Value>);

    impl ActionRequest for Ping {
        fn name(&self) -> &'static str {
            "ping"
        }

        fn params(&self) -> Result<Option<Value>> {
            Ok(self.0.clone())
        }

        fn response_key(&self) -> Option<&'static str> {
            None
        }
    }

    #[test]
    fn test_envelope_without_params_is_null() {
        assert_eq!(Ping(None).envelope().unwrap(), json!({"ping": null}));
    }

    #[test]
    fn test_envelope_with_params() {
        let action = Ping(Some(json!({"force": true})));
        assert_eq!(action.envelope().unwrap(), json!({"ping": {"force": true}}));
    }
}
