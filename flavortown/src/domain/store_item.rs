use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::FlexNumber;

/// An item in the Flavortown store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: FlexNumber,
    pub name: Option<String>,
    pub description: Option<String>,
    pub stock: Option<FlexNumber>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub image_url: Option<String>,
    pub ticket_cost: Option<TicketCost>,
}

impl StoreItem {
    /// Resolved base cost in cookies, if the backend provided one.
    pub fn base_cost(&self) -> Option<i64> {
        self.ticket_cost.map(|cost| cost.base.value())
    }
}

/// Cost of a store item. The backend serves this either as a bare number
/// (in any flexible representation) or as an object carrying the base cost
/// under `base` or `base_cost`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TicketCost {
    pub base: FlexNumber,
}

impl Serialize for TicketCost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("TicketCost", 1)?;
        state.serialize_field("base", &self.base)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for TicketCost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let scalar = match &value {
            Value::Object(fields) => fields
                .get("base")
                .or_else(|| fields.get("base_cost"))
                .ok_or_else(|| de::Error::custom("ticket cost object has no base cost"))?,
            other => other,
        };
        let base: FlexNumber =
            serde_json::from_value(scalar.clone()).map_err(de::Error::custom)?;
        Ok(TicketCost { base })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> StoreItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn cost_decodes_from_bare_number() {
        let item = parse(r#"{"id": 1, "name": "Sticker", "ticket_cost": 30}"#);
        assert_eq!(item.base_cost(), Some(30));
    }

    #[test]
    fn cost_decodes_from_numeric_string() {
        let item = parse(r#"{"id": 1, "ticket_cost": "45"}"#);
        assert_eq!(item.base_cost(), Some(45));
    }

    #[test]
    fn cost_decodes_from_object() {
        let item = parse(r#"{"id": 1, "ticket_cost": {"base": 120}}"#);
        assert_eq!(item.base_cost(), Some(120));
        let item = parse(r#"{"id": 1, "ticket_cost": {"base_cost": "60"}}"#);
        assert_eq!(item.base_cost(), Some(60));
    }

    #[test]
    fn cost_rejects_unknown_object_shape() {
        let result: Result<StoreItem, _> =
            serde_json::from_str(r#"{"id": 1, "ticket_cost": {"amount": 10}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_cost_resolves_to_none() {
        let item = parse(r#"{"id": 2, "name": "Mystery box", "stock": "5"}"#);
        assert_eq!(item.base_cost(), None);
        assert_eq!(item.stock.map(FlexNumber::value), Some(5));
    }

    #[test]
    fn type_tag_round_trips() {
        let item = parse(r#"{"id": 3, "type": "physical", "ticket_cost": 10}"#);
        assert_eq!(item.item_type.as_deref(), Some("physical"));
        let encoded = serde_json::to_value(&item).unwrap();
        assert_eq!(encoded["type"], "physical");
        assert_eq!(encoded["ticket_cost"]["base"], 10);
    }
}
