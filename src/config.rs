use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_endpoint_url: Option<String>,
    pub raw_bucket: String,
    pub processed_bucket: String,
    pub table_name: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let aws_region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let aws_access_key_id =
            env::var("AWS_ACCESS_KEY_ID").unwrap_or_else(|_| "test".to_string());
        let aws_secret_access_key =
            env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_else(|_| "test".to_string());
        let aws_endpoint_url = env::var("AWS_ENDPOINT_URL").ok();
        let raw_bucket = env::var("RAW_BUCKET").unwrap_or_else(|_| "ingestor-raw".to_string());
        let processed_bucket =
            env::var("PROCESSED_BUCKET").unwrap_or_else(|_| "ingestor-processed".to_string());
        let table_name = env::var("FILES_TABLE").unwrap_or_else(|_| "files".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            aws_region,
            aws_access_key_id,
            aws_secret_access_key,
            aws_endpoint_url,
            raw_bucket,
            processed_bucket,
            table_name,
            port,
        }
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
