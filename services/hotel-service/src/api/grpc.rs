//! gRPC service implementation

use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use futures::{Stream, StreamExt};
use stay_bootstrap::metrics::{record_grpc_request, record_grpc_stream_message};
use stay_errors::{AppError, AppResult};
use tonic::{Request, Response, Status, Streaming};
use tracing::warn;

use super::proto;
use super::proto::hotel_service_server::HotelService;
use crate::application::{ChatHandler, CheckoutHandler, SearchHandler};
use crate::domain::{CartItem, InboundChatMessage, SearchCriteria};

const SERVICE: &str = "hotel.v1.HotelService";

pub type ChatReplyStream = Pin<Box<dyn Stream<Item = Result<proto::ChatMessage, Status>> + Send>>;

pub struct HotelServiceImpl {
    search: Arc<SearchHandler>,
    checkout: Arc<CheckoutHandler>,
    chat: Arc<ChatHandler>,
}

impl HotelServiceImpl {
    pub fn new(
        search: Arc<SearchHandler>,
        checkout: Arc<CheckoutHandler>,
        chat: Arc<ChatHandler>,
    ) -> Self {
        Self {
            search,
            checkout,
            chat,
        }
    }

    pub async fn search_hotels_inner(
        &self,
        req: proto::SearchHotelsRequest,
    ) -> AppResult<proto::SearchHotelsResponse> {
        let criteria = SearchCriteria::try_from(req)?;
        let outcome = self.search.search(criteria).await?;
        Ok(proto::SearchHotelsResponse {
            has_availability: outcome.has_availability,
            hotels: outcome.hotels.into_iter().map(Into::into).collect(),
        })
    }

    /// Drains the inbound cart stream; a transport error or malformed item aborts it.
    pub async fn checkout_inner<S>(&self, inbound: S) -> AppResult<proto::PurchaseConfirmation>
    where
        S: Stream<Item = Result<proto::CartItem, Status>> + Send,
    {
        let items = inbound.map(|next| {
            record_grpc_stream_message(SERVICE, "Checkout", "inbound");
            next.map_err(AppError::from).and_then(CartItem::try_from)
        });
        let confirmation = self.checkout.checkout(items).await?;
        proto::PurchaseConfirmation::try_from(confirmation)
    }

    pub fn support_chat_inner<S>(&self, inbound: S) -> ChatReplyStream
    where
        S: Stream<Item = Result<proto::ChatMessage, Status>> + Send + 'static,
    {
        let inbound = inbound.map(|next| {
            record_grpc_stream_message(SERVICE, "SupportChat", "inbound");
            next.map(InboundChatMessage::from).map_err(AppError::from)
        });
        let replies = self.chat.spawn(inbound).map(|reply| {
            record_grpc_stream_message(SERVICE, "SupportChat", "outbound");
            reply.map(proto::ChatMessage::from).map_err(Status::from)
        });
        Box::pin(replies)
    }
}

/// 记录 RPC 结果并转换为 tonic 响应
fn respond<T>(method: &str, started: Instant, result: AppResult<T>) -> Result<Response<T>, Status> {
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(body) => {
            record_grpc_request(SERVICE, method, "ok", duration_ms);
            Ok(Response::new(body))
        }
        Err(e) => {
            warn!(method, error = %e, "RPC failed");
            record_grpc_request(SERVICE, method, e.kind(), duration_ms);
            Err(e.into())
        }
    }
}

#[tonic::async_trait]
impl HotelService for HotelServiceImpl {
    async fn search_hotels(
        &self,
        request: Request<proto::SearchHotelsRequest>,
    ) -> Result<Response<proto::SearchHotelsResponse>, Status> {
        let started = Instant::now();
        let result = self.search_hotels_inner(request.into_inner()).await;
        respond("SearchHotels", started, result)
    }

    async fn checkout(
        &self,
        request: Request<Streaming<proto::CartItem>>,
    ) -> Result<Response<proto::PurchaseConfirmation>, Status> {
        let started = Instant::now();
        let result = self.checkout_inner(request.into_inner()).await;
        respond("Checkout", started, result)
    }

    type SupportChatStream = ChatReplyStream;

    async fn support_chat(
        &self,
        request: Request<Streaming<proto::ChatMessage>>,
    ) -> Result<Response<Self::SupportChatStream>, Status> {
        let started = Instant::now();
        let replies = self.support_chat_inner(request.into_inner());
        respond("SupportChat", started, Ok(replies))
    }
}
