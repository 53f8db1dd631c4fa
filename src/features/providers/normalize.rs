use serde_json::{Map, Value};

use crate::features::providers::ServiceKind;
use crate::shared::canonical::{canonical_amount, canonical_date};

/// A raw driver entry tagged with its provider and paired with the exact
/// dedup key derived from that provider's native fields. No cross-provider
/// schema unification happens here: callers that need a common "amount"
/// must know each provider's field names.
#[derive(Debug, Clone)]
pub struct NormalizedEntry {
    pub document: Value,
    pub dedup_key: String,
}

/// Due-date-like and amount-like field names, per provider. The water portal
/// exposes no due date; its entries key on the balance alone.
fn dedup_fields(service: ServiceKind) -> (Option<&'static str>, &'static str) {
    match service {
        ServiceKind::Electricity => (Some("dueDate"), "paymentAmount"),
        ServiceKind::Telecom => (Some("dueDate"), "totalAmount"),
        ServiceKind::Water => (None, "balance"),
    }
}

pub fn normalize(service: ServiceKind, entry: Value) -> NormalizedEntry {
    let mut doc = match entry {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("raw".to_string(), other);
            map
        }
    };

    let (due_field, amount_field) = dedup_fields(service);

    let due = due_field
        .and_then(|field| doc.get(field))
        .and_then(Value::as_str)
        .map(canonical_date)
        .unwrap_or_default();

    let amount = doc
        .get(amount_field)
        .and_then(Value::as_str)
        .map(canonical_amount)
        .unwrap_or_default();

    doc.insert(
        "provider".to_string(),
        Value::String(service.as_str().to_string()),
    );

    NormalizedEntry {
        dedup_key: format!("{}|{}", due, amount),
        document: Value::Object(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_entry_with_provider() {
        let entry = json!({"accountNumber": "123", "dueDate": "12/05", "paymentAmount": "85,00€"});
        let normalized = normalize(ServiceKind::Electricity, entry);

        assert_eq!(normalized.document["provider"], "electricity");
        assert_eq!(normalized.document["accountNumber"], "123");
    }

    #[test]
    fn dedup_key_uses_provider_native_fields() {
        let electricity = normalize(
            ServiceKind::Electricity,
            json!({"dueDate": " 12/05 ", "paymentAmount": "85,00€"}),
        );
        assert_eq!(electricity.dedup_key, "12/05|85,00");

        let telecom = normalize(
            ServiceKind::Telecom,
            json!({"connection": "69xxxxxxxx", "dueDate": "20/05", "totalAmount": "31,50€"}),
        );
        assert_eq!(telecom.dedup_key, "20/05|31,50");
    }

    #[test]
    fn water_keys_on_balance_alone() {
        let water = normalize(
            ServiceKind::Water,
            json!({"status": "Active", "balance": "42.30"}),
        );
        assert_eq!(water.dedup_key, "|42.30");
    }

    #[test]
    fn missing_fields_degrade_to_empty_key_parts() {
        let entry = normalize(ServiceKind::Electricity, json!({"address": "Main St 5"}));
        assert_eq!(entry.dedup_key, "|");
    }

    #[test]
    fn amounts_that_contain_each_other_stay_distinct() {
        // The exact key keeps "42,30" and "142,30" apart; a substring match
        // would have collapsed them.
        let a = normalize(
            ServiceKind::Electricity,
            json!({"dueDate": "12/05", "paymentAmount": "42,30€"}),
        );
        let b = normalize(
            ServiceKind::Electricity,
            json!({"dueDate": "12/05", "paymentAmount": "142,30€"}),
        );
        assert_ne!(a.dedup_key, b.dedup_key);
    }
}
