use serde::Deserialize;

use crate::store::Filter;

pub const USER_EMAIL: &str = "userEmail";
pub const PROVIDER_EMAIL: &str = "serviceProviderEmail";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub user_email: Option<String>,
    pub service_provider_email: Option<String>,
}

impl BookingQuery {
    /// Builds the bookings filter.
    ///
    /// With both emails set the result is the union of the caller's own
    /// bookings and the bookings made with them as provider, so the two
    /// conditions are OR-ed rather than AND-ed. Empty values count as absent.
    pub fn filter(&self) -> Filter {
        let user = self.user_email.as_deref().filter(|v| !v.is_empty());
        let provider = self
            .service_provider_email
            .as_deref()
            .filter(|v| !v.is_empty());

        match (user, provider) {
            (None, None) => Filter::All,
            (Some(u), None) => Filter::eq(USER_EMAIL, u),
            (None, Some(p)) => Filter::eq(PROVIDER_EMAIL, p),
            (Some(u), Some(p)) => Filter::Or(vec![
                Filter::eq(USER_EMAIL, u),
                Filter::eq(PROVIDER_EMAIL, p),
            ]),
        }
    }
}
