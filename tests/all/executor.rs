use crate::helpers::{InMemoryContext, OrderPlaced};
use service_bus_common::context::{
    keys, IncomingMessageMetadata, MetadataValue, ReceivedMetadata, ServiceBusContext,
};
use service_bus_common::executor::{
    get_message_local_item, set_message_local_item, DefaultExecutorFactory, HandlerExecutor,
    MessageExecutor, MessageExecutorFactory,
};
use service_bus_common::handlers::{HandlerFuture, MessageHandler};
use service_bus_common::method_signature;
use service_bus_common::reflection::TypeCatalog;
use service_bus_common::retry::{
    FailureContext, NeverRetry, RetrySettings, RetryStrategy, RetryWithDelay,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

#[derive(Clone, Debug, PartialEq)]
struct ReservedBy(u64);

async fn reserve_stock(
    order: Arc<OrderPlaced>,
    _context: Arc<dyn ServiceBusContext>,
) -> Result<(), anyhow::Error> {
    set_message_local_item(ReservedBy(order.order_id));
    let reserved = get_message_local_item::<ReservedBy>();
    anyhow::ensure!(
        reserved == Some(ReservedBy(order.order_id)),
        "Message-local storage is not available"
    );
    Ok(())
}

async fn always_fails(
    _order: Arc<OrderPlaced>,
    _context: Arc<dyn ServiceBusContext>,
) -> Result<(), anyhow::Error> {
    Err(anyhow::anyhow!("Warehouse is closed"))
}

fn executor_for(handler: MessageHandler) -> Arc<dyn MessageExecutor> {
    DefaultExecutorFactory.create(handler)
}

fn descriptor(catalog: &TypeCatalog, fails: bool) -> MessageHandler {
    let builder = MessageHandler::builder(
        catalog,
        method_signature!(fn reserve_stock(order: OrderPlaced, context) -> HandlerFuture),
    );
    if fails {
        builder.handler(always_fails).unwrap()
    } else {
        builder.handler(reserve_stock).unwrap()
    }
}

#[tokio::test]
async fn a_successful_execution_has_access_to_message_local_storage() {
    let executor = executor_for(descriptor(&TypeCatalog::new(), false));

    executor
        .execute(
            Arc::new(OrderPlaced::fake()),
            Arc::new(InMemoryContext::new()),
        )
        .await
        .unwrap();

    // Message-local storage does not outlive the execution.
    assert_eq!(get_message_local_item::<ReservedBy>(), None);
}

#[tokio::test]
async fn a_failed_execution_is_wrapped_with_the_message_and_its_trace_id() {
    let executor = executor_for(descriptor(&TypeCatalog::new(), true));
    let context = Arc::new(InMemoryContext::new());
    let message = OrderPlaced::fake();

    let error = executor
        .execute(Arc::new(message.clone()), context.clone())
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Message execution failed: Warehouse is closed"
    );
    assert_eq!(error.trace_id, context.metadata.trace_id().to_owned());
    assert_eq!(error.message.downcast_ref::<OrderPlaced>(), Some(&message));
    assert!(executor.id().starts_with("OrderPlaced::reserve_stock"));
}

async fn reservation_fails(
    _order: Arc<OrderPlaced>,
    _context: Arc<dyn ServiceBusContext>,
) -> Result<(), anyhow::Error> {
    Err(anyhow::anyhow!("reserve failed"))
}

async fn notification_fails(
    _order: Arc<OrderPlaced>,
    _context: Arc<dyn ServiceBusContext>,
) -> Result<(), anyhow::Error> {
    Err(anyhow::anyhow!("notify failed"))
}

#[tokio::test]
async fn failures_of_handlers_sharing_a_method_name_are_all_recorded() {
    let catalog = TypeCatalog::new();
    let executors = vec![
        executor_for(
            MessageHandler::builder(
                &catalog,
                method_signature!(fn handle(order: OrderPlaced, context) -> HandlerFuture),
            )
            .handler(reservation_fails)
            .unwrap(),
        ),
        executor_for(
            MessageHandler::builder(
                &catalog,
                method_signature!(fn handle(order: OrderPlaced, context) -> HandlerFuture),
            )
            .handler(notification_fails)
            .unwrap(),
        ),
    ];
    let context = Arc::new(InMemoryContext::new());
    let message = Arc::new(OrderPlaced::fake());

    let mut failures = FailureContext::new();
    for executor in &executors {
        let error = executor
            .execute(message.clone(), context.clone())
            .await
            .unwrap_err();
        failures = failures.with_failure(executor.id(), error);
    }

    assert_ne!(executors[0].id(), executors[1].id());
    assert_eq!(failures.executors.len(), 2);
    assert_eq!(
        failures.executors.get(executors[0].id()).map(String::as_str),
        Some("Message execution failed: reserve failed")
    );
    assert_eq!(
        failures.executors.get(executors[1].id()).map(String::as_str),
        Some("Message execution failed: notify failed")
    );
    assert_eq!(failures.failed_in().split(',').count(), 2);
}

#[test]
fn an_executor_can_be_given_its_own_id() {
    let executor = HandlerExecutor::with_id(
        descriptor(&TypeCatalog::new(), false),
        "inventory.reserve_stock",
    );

    assert_eq!(executor.id(), "inventory.reserve_stock");
    assert_eq!(executor.handler().method_name(), "reserve_stock");
}

fn context_with_retries(retries: i64) -> Arc<InMemoryContext> {
    Arc::new(InMemoryContext::with_metadata(ReceivedMetadata::new(
        "message-id",
        "trace-id",
        [
            (keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, MetadataValue::from(retries)),
            ("tenant", MetadataValue::from("acme")),
        ],
    )))
}

#[tokio::test]
async fn retry_with_delay_returns_the_message_with_an_incremented_counter() {
    let strategy = RetryWithDelay::new(RetrySettings {
        max_retries: 3,
        delay_milliseconds: 250,
    });
    let context = context_with_retries(1);
    let details = FailureContext::new().with_failure("OrderPlaced::reserve_stock", "boom");

    strategy
        .retry(Arc::new(OrderPlaced::fake()), context.clone(), details)
        .await
        .unwrap();

    let returned = context.returned.lock().unwrap();
    assert_eq!(returned.len(), 1);
    let (delay, metadata) = &returned[0];
    let metadata = metadata.as_ref().unwrap();
    assert_eq!(*delay, Duration::from_millis(250));
    assert_eq!(
        metadata.get(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, MetadataValue::Null),
        MetadataValue::Integer(2)
    );
    assert_eq!(
        metadata.get(keys::SERVICE_BUS_MESSAGE_FAILED_IN, MetadataValue::Null),
        MetadataValue::from("OrderPlaced::reserve_stock")
    );
    assert_eq!(
        metadata.get(keys::SERVICE_BUS_TRACE_ID, MetadataValue::Null),
        MetadataValue::from("trace-id")
    );
    assert_eq!(
        metadata.get("tenant", MetadataValue::Null),
        MetadataValue::from("acme")
    );
}

#[tokio::test]
async fn retry_with_delay_gives_up_after_max_retries() {
    let strategy = RetryWithDelay::new(RetrySettings {
        max_retries: 3,
        delay_milliseconds: 250,
    });
    let context = context_with_retries(3);

    strategy
        .retry(
            Arc::new(OrderPlaced::fake()),
            context.clone(),
            FailureContext::new().with_failure("OrderPlaced::reserve_stock", "boom"),
        )
        .await
        .unwrap();

    assert!(context.returned.lock().unwrap().is_empty());
    assert_eq!(
        context.logger.messages(Level::ERROR),
        vec!["Giving up on message processing".to_owned()]
    );
}

#[tokio::test]
async fn never_retry_never_returns_messages_to_the_queue() {
    let context = context_with_retries(0);

    NeverRetry
        .retry(
            Arc::new(OrderPlaced::fake()),
            context.clone(),
            FailureContext::new().with_failure("OrderPlaced::reserve_stock", "boom"),
        )
        .await
        .unwrap();

    assert!(context.returned.lock().unwrap().is_empty());
    assert_eq!(context.logger.messages(Level::ERROR).len(), 1);
}

#[test]
fn retry_settings_have_sensible_defaults() {
    let settings = RetrySettings::default();

    assert_eq!(settings.max_retries, 3);
    assert_eq!(settings.delay(), Duration::from_secs(1));
}
