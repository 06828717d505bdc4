use aws_config::BehaviorVersion;
use lambda_runtime::{service_fn, tracing, LambdaEvent};
use model::event::IntakeEvent;
use model::Error;
use service::reporter::FunctionErrorReporter;
use service_lambda::LambdaInvoker;
use std::sync::Arc;
use store_s3::S3ObjectStore;
use workflow::config::IntakeConfig;
use workflow::intake::IntakeValidator;
use workflow::intake_fn;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config: Arc<IntakeConfig> = Arc::new(IntakeConfig::from_env()?);

    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client: Arc<aws_sdk_s3::Client> = Arc::new(aws_sdk_s3::Client::new(&sdk_config));
    let lambda_client: Arc<aws_sdk_lambda::Client> =
        Arc::new(aws_sdk_lambda::Client::new(&sdk_config));

    let invoker: Arc<LambdaInvoker> = Arc::new(LambdaInvoker::new(lambda_client));
    let reporter: FunctionErrorReporter = FunctionErrorReporter::new(
        invoker.clone(),
        config.error_handler.clone(),
        config.function_name.clone(),
    );

    let validator: IntakeValidator = IntakeValidator::new(
        config,
        Arc::new(S3ObjectStore::new(s3_client)),
        invoker,
        Arc::new(reporter),
    );
    let validator: &IntakeValidator = &validator;

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<IntakeEvent>| async move { intake_fn(validator, event).await },
    ))
    .await
}
