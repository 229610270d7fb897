//! hotel-service - Hotel search, streaming checkout and support chat

use std::sync::Arc;
use std::time::Duration;

use stay_bootstrap::{build_reflection, run_server, ServiceContext, Services};
use stay_errors::AppError;
use tracing::info;

use hotel_service::api::rest::{self, RestState};
use hotel_service::api::HotelServiceImpl;
use hotel_service::application::{ChatHandler, CheckoutHandler, SearchHandler};
use hotel_service::domain::{Clock, InventoryProvider, SystemClock};
use hotel_service::infrastructure::{InMemoryInventory, InventoryReadiness};
use hotel_service::proto::hotel_service_server::HotelServiceServer;
use hotel_service::FILE_DESCRIPTOR_SET;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |ctx: ServiceContext, mut server| async move {
        info!("Initializing hotel-service...");
        let config = &ctx.config;

        // 生成合成库存
        let inventory: Arc<dyn InventoryProvider> =
            Arc::new(InMemoryInventory::from_config(&config.inventory));
        ctx.health
            .register(Arc::new(InventoryReadiness::new(inventory.clone())))
            .await;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let search = Arc::new(SearchHandler::from_config(inventory, &config.search));
        let checkout = Arc::new(CheckoutHandler::new(
            clock.clone(),
            Duration::from_millis(config.checkout.processing_delay_ms),
        ));
        let chat = Arc::new(ChatHandler::from_config(&config.chat, clock));

        let service = HotelServiceImpl::new(search.clone(), checkout, chat);
        let reflection_service = build_reflection(&[FILE_DESCRIPTOR_SET])
            .map_err(|e| AppError::internal(format!("reflection: {}", e)))?;

        let grpc = server
            .add_service(HotelServiceServer::new(service))
            .add_service(reflection_service);

        Ok(Services::grpc(grpc).with_http(rest::router(RestState::new(
            search,
            config.app_name.clone(),
        ))))
    })
    .await
}
