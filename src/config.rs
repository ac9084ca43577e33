use serde::Deserialize;

#[derive(Deserialize)]
pub struct AppCfg {
    pub database_url: String,
}
