use crate::intake::IntakeValidator;
use lambda_runtime::tracing::{Instrument, Span};
use lambda_runtime::{LambdaEvent, tracing};
use model::Error;
use model::event::IntakeEvent;
use model::state::WorkflowState;

pub mod config;
pub mod intake;
pub mod retry;
pub mod thumbnail;

/// Handles a single intake event, for use with `lambda_runtime::run()`.
///
/// The returned state is the input of the next step in the pipeline.
///
/// ```no_compile
/// use lambda_runtime::{service_fn, LambdaEvent};
/// use model::event::IntakeEvent;
/// use workflow::intake_fn;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Error> {
///     let validator: IntakeValidator = IntakeValidator::new(config, store, invoker, reporter);
///     let validator: &IntakeValidator = &validator;
///
///     lambda_runtime::run(service_fn(move |event: LambdaEvent<IntakeEvent>| async move {
///         intake_fn(validator, event).await
///     }))
///     .await
/// }
/// ```
pub async fn intake_fn(
    validator: &IntakeValidator,
    event: LambdaEvent<IntakeEvent>,
) -> Result<WorkflowState, Error> {
    let guid: String = event.payload.guid.clone().unwrap_or_default();
    let intake_span: Span = tracing::span!(
        tracing::Level::INFO,
        "Intake",
        guid,
        request_id = %event.context.request_id
    );

    let state: WorkflowState = validator.handle(&event.payload).instrument(intake_span).await?;

    tracing::info!(
        "Completed intake of {} with thumbnail offset {}",
        state.src_video,
        state.thumbnail_frame_offset
    );

    Ok(state)
}
