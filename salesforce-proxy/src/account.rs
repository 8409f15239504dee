use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// SObject type name used by every account route.
pub const ACCOUNT_SOBJECT: &str = "Account";

/// Query behind `GET /accounts`.
pub const LIST_ACCOUNTS_SOQL: &str = "SELECT Id, Name, Phone, Industry FROM Account LIMIT 20";

/// Body accepted by `POST /accounts` and forwarded as-is.
///
/// Fields are not validated. Absent fields (`None`) are left out of the
/// forwarded payload; an explicit `null` is `Some(Value::Null)` and is sent
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    #[serde(
        rename = "Name",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Value>,
    #[serde(
        rename = "Phone",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Value>,
    #[serde(
        rename = "Industry",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub industry: Option<Value>,
}

// Only called for keys that are present, so `null` stays `Some(Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Reply to a successful `POST /accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Created {
    pub success: bool,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_the_three_fields_are_forwarded() {
        let body = json!({
            "Name": "Acme",
            "Phone": "555-1234",
            "Industry": "Tech",
            "OwnerId": "005xx000001SwiUAAS"
        });
        let account: NewAccount = serde_json::from_value(body).unwrap();
        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            json!({"Name": "Acme", "Phone": "555-1234", "Industry": "Tech"})
        );
    }

    #[test]
    fn absent_fields_are_omitted() {
        let account: NewAccount = serde_json::from_value(json!({"Name": "Acme"})).unwrap();
        assert_eq!(serde_json::to_value(&account).unwrap(), json!({"Name": "Acme"}));
    }

    #[test]
    fn explicit_null_is_forwarded() {
        let account: NewAccount =
            serde_json::from_value(json!({"Name": "Acme", "Industry": null})).unwrap();
        assert_eq!(account.industry, Some(Value::Null));
        assert_eq!(account.phone, None);
        assert_eq!(
            serde_json::to_value(&account).unwrap(),
            json!({"Name": "Acme", "Industry": null})
        );
    }
}
