use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChatTaskQuery {
    pub project: Option<String>,
}
