use crate::helpers::{InMemoryContext, OrderCancelled, OrderPlaced};
use fake::faker::lorem::en::Word;
use fake::Fake;
use service_bus_common::context::{
    keys, ContextLogger, DefaultContextLogger, IncomingMessageMetadata, MetadataValue,
    OutcomeMessageMetadata, ReceivedMetadata, ServiceBusContext, ValidationViolation,
    ValidationViolations,
};
use service_bus_common::delivery::DeliveryOptions;
use service_bus_common::messages::Message;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn bulk_deliveries_submit_every_message() {
    let context = InMemoryContext::new();
    let tenant: String = Word().fake();
    let messages: Vec<Arc<dyn Message>> = vec![
        Arc::new(OrderPlaced::fake()),
        Arc::new(OrderCancelled { order_id: 1 }),
    ];

    context
        .delivery_bulk(
            messages,
            Some(DeliveryOptions::new().with_header("tenant", tenant.as_str())),
            Some(OutcomeMessageMetadata::new().with("tenant", tenant.as_str())),
        )
        .await
        .unwrap();

    assert!(!context.is_bulk_delivery_atomic());
    let delivered = context.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 2);
    for delivery in delivered.iter() {
        let options = delivery.options.as_ref().unwrap();
        assert_eq!(
            options.headers().get("tenant"),
            Some(&MetadataValue::from(tenant.as_str()))
        );
        assert!(options.is_persistent());
        assert!(delivery.metadata.as_ref().unwrap().has("tenant"));
    }
}

#[tokio::test]
async fn a_failed_delivery_in_a_bulk_does_not_stop_the_others() {
    let mut context = InMemoryContext::new();
    context.rejects = Some(std::any::type_name::<OrderCancelled>());
    let messages: Vec<Arc<dyn Message>> = vec![
        Arc::new(OrderCancelled { order_id: 1 }),
        Arc::new(OrderPlaced::fake()),
    ];

    let error = context
        .delivery_bulk(messages, None, None)
        .await
        .unwrap_err();

    assert!(error.message.is::<OrderCancelled>());
    assert_eq!(error.trace_id, context.metadata.trace_id());
    assert!(error.to_string().contains("OrderCancelled"));
    assert_eq!(
        context.delivered_types(),
        vec![std::any::type_name::<OrderPlaced>()]
    );
}

#[tokio::test]
async fn messages_can_be_returned_to_the_queue() {
    let context = InMemoryContext::new();

    context
        .return_to_queue(
            Duration::from_secs(5),
            Some(OutcomeMessageMetadata::new().with(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, 1)),
        )
        .await
        .unwrap();

    let returned = context.returned.lock().unwrap();
    assert_eq!(returned[0].0, Duration::from_secs(5));
}

#[test]
fn violations_are_exposed_when_present() {
    let mut context = InMemoryContext::new();
    assert!(context.violations().is_none());

    context.violations = Some(
        vec![ValidationViolation::new("order_id", "must be positive")]
            .into_iter()
            .collect::<ValidationViolations>(),
    );

    let violations = context.violations().unwrap();
    assert_eq!(violations.len(), 1);
    let first = violations.iter().next().unwrap();
    assert_eq!(first.property, "order_id");
}

#[test]
fn incoming_metadata_falls_back_to_the_default() {
    let metadata = ReceivedMetadata::new(
        "message-id",
        "trace-id",
        [(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, MetadataValue::from("2"))],
    );

    assert_eq!(metadata.message_id(), "message-id");
    assert_eq!(metadata.trace_id(), "trace-id");
    assert!(metadata.has(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT));
    assert_eq!(
        metadata
            .get(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, MetadataValue::Null)
            .as_integer(),
        Some(2)
    );
    assert_eq!(
        metadata.get("missing", MetadataValue::from(false)),
        MetadataValue::Bool(false)
    );
}

#[test]
fn delivered_metadata_gets_a_fresh_message_id_and_keeps_the_trace() {
    let outcome = OutcomeMessageMetadata::new().with(keys::SERVICE_BUS_ACTOR_KIND, keys::ACTOR_KIND_INTERNAL_SAGA);

    let first = ReceivedMetadata::for_delivery("trace", &outcome);
    let second = ReceivedMetadata::for_delivery("trace", &outcome);

    assert_ne!(first.message_id(), second.message_id());
    assert_eq!(first.trace_id(), "trace");
    assert_eq!(
        first.get(keys::SERVICE_BUS_ACTOR_KIND, MetadataValue::Null),
        MetadataValue::from("internalSaga")
    );
}

#[test]
fn reserved_keys_are_recognised() {
    for key in keys::INTERNAL_METADATA_KEYS {
        assert!(keys::is_reserved(key));
    }
    assert!(keys::is_reserved("x-trace-id"));
    assert!(!keys::is_reserved("tenant"));
}

#[test]
fn metadata_serializes_scalars_untagged() {
    let outcome = OutcomeMessageMetadata::new()
        .with("attempt", 3)
        .with("tenant", "acme")
        .with("vip", true);

    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"variables": {"attempt": 3, "tenant": "acme", "vip": true}})
    );
}

#[test]
fn the_default_logger_reports_the_retry_count() {
    let metadata = Arc::new(ReceivedMetadata::new(
        "message-id",
        "trace-id",
        [(keys::SERVICE_BUS_MESSAGE_RETRY_COUNT, 4)],
    ));
    let logger = DefaultContextLogger::new(Arc::new(OrderPlaced::fake()), metadata);

    assert_eq!(logger.retries(), 4);
    // Emitting outside of a subscriber is a no-op, but must not panic.
    logger.info("Order reserved", &[("warehouse", "north".into())]);
    logger.throwable(
        &std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        &[],
        tracing::Level::ERROR,
    );
}
