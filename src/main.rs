use dotenvy::dotenv;

use profile_views::config::Config;
use profile_views::error::ApplicationError;
use profile_views::{api, logger};

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    api::serve(config).await
}
