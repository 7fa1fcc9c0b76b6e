#[tokio::main]
async fn main() -> Result<(), sm_api::error::ApiError> {
    sm_api::run().await
}
