use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use sustainability_index::utils::logger;
use sustainability_index::{ApiRequest, ApiResponse, LambdaConfig, ScoringService, SustainabilityEngine};

async fn function_handler(
    service: &ScoringService,
    event: LambdaEvent<ApiRequest>,
) -> Result<ApiResponse, Error> {
    tracing::info!(
        request_id = %event.context.request_id,
        route = ?event.payload.route,
        "Handling sustainability request"
    );

    let response = service.handle(&event.payload);

    tracing::info!(status = response.status, "Request completed");
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 配置錯誤直接讓冷啟動失敗
    let lambda_config = LambdaConfig::from_env()?;
    let engine = SustainabilityEngine::new(lambda_config.scoring_config()?)?;
    let service = ScoringService::new(engine);
    tracing::info!("Sustainability Lambda ready");

    let service = &service;
    run(service_fn(move |event| async move { function_handler(service, event).await })).await
}
