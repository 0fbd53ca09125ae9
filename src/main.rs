use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use restaurant_orders::app_system::{setup_tracing, AppConfig, OrderSystem};
use restaurant_orders::domain::{MenuItemCreate, UserCreate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();
    setup_tracing(&config.log_filter);

    info!("Starting restaurant order system");
    let system = OrderSystem::start(&config)?;

    // Seed the menu
    let rolls = system
        .menu_client
        .create_menu_item(MenuItemCreate::new("Spring Rolls", Decimal::new(350, 2), 10))
        .await?;
    let curry = system
        .menu_client
        .create_menu_item(MenuItemCreate::new("Massaman Curry", Decimal::new(1000, 2), 4))
        .await?;
    info!(items = 2, "Menu seeded");

    let user_id = system
        .user_client
        .register(UserCreate::new("alice", "alice@example.com").with_fullname("Alice Example"))
        .await?;
    info!(user_id, "User registered");

    system.cart_client.add_line(user_id, rolls.id, 2).await?;
    system.cart_client.add_line(user_id, curry.id, 1).await?;

    let span = tracing::info_span!("order_processing", user_id);
    let order_result = async {
        info!("Placing order");
        system.order_client.place_order(user_id).await
    }
    .instrument(span)
    .await;

    match &order_result {
        Ok(receipt) => info!(order_no = receipt.order_no, total = %receipt.total_price, "Order placed"),
        Err(e) => error!(error = %e, status = e.status_code(), "Order placement failed"),
    }

    // An empty cart now; a second attempt is rejected without side effects.
    if let Err(e) = system.order_client.place_order(user_id).await {
        info!(error = %e, status = e.status_code(), "Second order rejected");
    }

    let today = chrono::Utc::now();
    let report = system
        .order_client
        .list_orders_by_date_range(today - chrono::Duration::days(1), today)
        .await?;
    info!(orders = report.len(), "Orders in the last day");

    if let Some(user) = system.user_client.get_user(user_id).await? {
        let feedback_id = system.feedback_client.submit(&user, "Great curry", 5).await?;
        info!(feedback_id, "Feedback recorded");
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
