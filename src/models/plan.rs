//! Paywall plan model.

use serde::{Deserialize, Serialize};

use super::{Amount, EncodeRequest, MAX_REFERENCE_LEN};

/// A paid plan offered behind the paywall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Backend identifier.
    pub id: String,
    /// Display name (e.g. "Mensal").
    pub name: String,
    /// Price in BRL; the backend may send a string or a number.
    pub price: Amount,
    /// Billing period in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_days: Option<u32>,
    /// Marketing description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Plan {
    /// Builds the encode request for paying this plan.
    ///
    /// The reference label is the plan id reduced to ASCII alphanumerics,
    /// so the payment can be matched to the plan on the bank statement.
    #[inline]
    #[must_use]
    pub fn encode_request(&self) -> EncodeRequest {
        let reference: String = self
            .id
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(MAX_REFERENCE_LEN)
            .collect();
        let request = EncodeRequest::new().amount(self.price);
        if reference.is_empty() {
            request
        } else {
            request.reference(reference)
        }
    }
}

/// Response body of the plan list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanList {
    /// Available plans, in display order.
    pub plans: Vec<Plan>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AmountInput;

    #[test]
    fn deserialize_plan_list() {
        let json = r#"{
            "plans": [
                {"id": "mensal", "name": "Mensal", "price": "49.90", "periodDays": 30},
                {"id": "anual", "name": "Anual", "price": 399, "description": "2 meses gratis"}
            ]
        }"#;
        let list: PlanList = serde_json::from_str(json).unwrap();
        assert_eq!(list.plans.len(), 2);
        assert_eq!(list.plans[0].price, Amount::from_cents(4990));
        assert_eq!(list.plans[0].period_days, Some(30));
        assert_eq!(list.plans[1].price, Amount::from_cents(39_900));
        assert_eq!(list.plans[1].description.as_deref(), Some("2 meses gratis"));
    }

    #[test]
    fn deserialize_rejects_bad_price() {
        let json = r#"{"id": "x", "name": "X", "price": "49.999"}"#;
        assert!(serde_json::from_str::<Plan>(json).is_err());
    }

    #[test]
    fn encode_request_carries_price_and_reference() {
        let plan = Plan {
            id: "plano-mensal_01".to_owned(),
            name: "Mensal".to_owned(),
            price: Amount::from_cents(4990),
            period_days: Some(30),
            description: None,
        };
        let request = plan.encode_request();
        assert_eq!(request.amount, Some(AmountInput::Text("49.90".to_owned())));
        assert_eq!(request.reference.as_deref(), Some("planomensal01"));
        assert!(request.payee_key.is_none());
    }

    #[test]
    fn encode_request_without_usable_reference() {
        let plan = Plan {
            id: "---".to_owned(),
            name: "Teste".to_owned(),
            price: Amount::from_cents(100),
            period_days: None,
            description: None,
        };
        assert!(plan.encode_request().reference.is_none());
    }
}
