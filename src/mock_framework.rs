//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] or [`create_mock_store`] to get a client-side
//! handle and the receiving end of its channel, then use helpers like
//! [`expect_create`] or [`expect_place_order`] to answer requests by hand.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::clients::StoreHandle;
use crate::domain::{OrderReceipt, UserId};
use crate::error::OrderError;
use crate::messages::{ServiceResponse, StoreRequest};

/// Creates a resource client backed by a channel the test controls.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Creates a store handle with the given timeout and no store service behind it.
pub fn create_mock_store(buffer_size: usize, timeout: Duration) -> (StoreHandle, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreHandle::new(sender, timeout), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next store message is a PlaceOrder request
pub async fn expect_place_order(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(UserId, ServiceResponse<OrderReceipt, OrderError>)> {
    match receiver.recv().await {
        Some(StoreRequest::PlaceOrder { user_id, respond_to }) => Some((user_id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{OrderClient, UserClient};
    use crate::domain::{Role, User, UserCreate};
    use crate::user_actor::{UserAction, UserError};
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn user_client_sends_create_params() {
        let (inner, mut receiver) = create_mock_client::<User>(10);
        let client = UserClient::new(inner);

        let register = tokio::spawn(async move { client.register(UserCreate::new("ann", "ann@example.com")).await });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.user_name, "ann");
        responder.send(Ok(7)).unwrap();

        assert_eq!(register.await.unwrap(), Ok(7));
    }

    #[tokio::test]
    async fn framework_errors_map_to_user_errors() {
        let (inner, mut receiver) = create_mock_client::<User>(10);
        let client = UserClient::new(inner);

        let promote = tokio::spawn(async move { client.promote_to_admin(3).await });

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, 3);
        assert!(matches!(action, UserAction::PromoteToAdmin));
        responder
            .send(Err(FrameworkError::NotFound("User not found: 3".to_string())))
            .unwrap();

        assert_eq!(
            promote.await.unwrap(),
            Err(UserError::NotFound("User not found: 3".to_string()))
        );
    }

    #[tokio::test]
    async fn admin_profiles_are_forbidden_before_any_update_is_sent() {
        let (inner, mut receiver) = create_mock_client::<User>(10);
        let client = UserClient::new(inner);

        let update = tokio::spawn(async move { client.update_profile(1, Default::default()).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        let admin = User {
            id,
            user_name: "root".to_string(),
            email: "root@example.com".to_string(),
            fullname: None,
            phone_no: None,
            address: None,
            post_code: None,
            role: Role::Admin,
            created_at: Utc::now(),
        };
        responder.send(Ok(Some(admin))).unwrap();

        assert!(matches!(update.await.unwrap(), Err(UserError::Forbidden(_))));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn order_client_returns_the_receipt() {
        let (store, mut receiver) = create_mock_store(10, Duration::from_secs(5));
        let client = OrderClient::new(store);

        let place = tokio::spawn(async move { client.place_order(4).await });

        let (user_id, responder) = expect_place_order(&mut receiver).await.expect("Expected PlaceOrder");
        assert_eq!(user_id, 4);
        let receipt = OrderReceipt {
            order_no: 12,
            total_price: Decimal::new(1700, 2),
        };
        responder.send(Ok(receipt.clone())).unwrap();

        assert_eq!(place.await.unwrap(), Ok(receipt));
    }

    #[tokio::test]
    async fn unanswered_request_times_out_and_closes_the_responder() {
        let (store, mut receiver) = create_mock_store(10, Duration::from_millis(50));
        let client = OrderClient::new(store);

        let place = tokio::spawn(async move { client.place_order(4).await });
        let (_, responder) = expect_place_order(&mut receiver).await.expect("Expected PlaceOrder");

        let err = place.await.unwrap().unwrap_err();
        assert!(matches!(err, OrderError::Storage(_)));
        assert!(err.to_string().contains("timed out"));
        // The store sees the caller is gone and can skip the commit.
        assert!(responder.is_closed());
    }

    #[tokio::test]
    async fn dropped_responder_is_a_storage_error() {
        let (store, mut receiver) = create_mock_store(10, Duration::from_secs(5));
        let client = OrderClient::new(store);

        let place = tokio::spawn(async move { client.place_order(4).await });
        let (_, responder) = expect_place_order(&mut receiver).await.expect("Expected PlaceOrder");
        drop(responder);

        let err = place.await.unwrap().unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
