use serde::Deserialize;
use serde_json::Value;

use crate::store::{Document, Sort, SortOrder};

/// Field the services listing sorts on.
pub const PRICE_FIELD: &str = "servicePrice";

#[derive(Debug, Deserialize)]
pub struct ProviderQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SortQuery {
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

impl SortQuery {
    /// `asc`/`desc` sort by price; anything else keeps insertion order.
    pub fn sort(&self) -> Option<Sort> {
        let order = match self.sort_order.as_deref() {
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            _ => return None,
        };
        Some(Sort {
            field: PRICE_FIELD,
            order,
        })
    }
}

/// Body of `PUT /services/:id`. All six fields are written; an absent field
/// is stored as null. Other keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    pub service_name: Option<Value>,
    pub service_image: Option<Value>,
    pub service_area: Option<Value>,
    pub service_price: Option<Value>,
    pub service_description: Option<Value>,
    pub provider_email: Option<Value>,
}

impl ServiceUpdate {
    pub fn into_set(self) -> Document {
        [
            ("serviceName", self.service_name),
            ("serviceImage", self.service_image),
            ("serviceArea", self.service_area),
            (PRICE_FIELD, self.service_price),
            ("serviceDescription", self.service_description),
            ("providerEmail", self.provider_email),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.unwrap_or(Value::Null)))
        .collect()
    }
}
