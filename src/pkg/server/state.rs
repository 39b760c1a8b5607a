use ai::clients::openai::Client as AiClient;
use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::Region;
use sqlx::{PgPool, Pool, Postgres, Transaction, postgres::PgPoolOptions};
use std::sync::Arc;

use crate::{
    conf::settings,
    pkg::internal::{auth::AuthClient, errors::AiProviderError, storage},
    prelude::Result,
};

pub fn db_pool() -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(&settings.database_url)?;
    Ok(pool)
}

#[async_trait]
pub trait GetTxn {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>>;
}

#[async_trait]
impl GetTxn for Arc<PgPool> {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.begin().await?)
    }
}

async fn s3_client() -> S3Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(settings.s3_region.clone()))
        .endpoint_url(&settings.s3_endpoint)
        .load()
        .await;
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(true)
        .build();
    S3Client::from_conf(s3_config)
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    pub ai_client: Arc<AiClient>,
    pub auth_client: Arc<AuthClient>,
    pub s3_client: Arc<S3Client>,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        let ai = AiClient::from_url(&settings.ai_key, &settings.ai_endpoint).map_err(|_| {
            tracing::error!("could not construct evaluation backend client");
            AiProviderError::Unavailable
        })?;
        let s3 = s3_client().await;
        if let Err(e) = storage::create_bucket(&s3, &settings.s3_bucket_name).await {
            tracing::warn!("resume bucket not provisioned: {}", e);
        }
        Ok(AppState {
            db_pool: Arc::new(db_pool()?),
            ai_client: Arc::new(ai),
            auth_client: Arc::new(AuthClient::new()),
            s3_client: Arc::new(s3),
        })
    }
}
