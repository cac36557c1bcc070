use serde::Deserialize;

/// Body of `PUT /cookie-preferences`. `necessary` is implied.
#[derive(Debug, Deserialize)]
pub struct ConsentUpdate {
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub marketing: bool,
    #[serde(default)]
    pub preferences: bool,
}
