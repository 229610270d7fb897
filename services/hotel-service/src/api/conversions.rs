//! Proto <-> Domain conversions

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use stay_errors::{AppError, AppResult};

use super::proto;
use crate::domain::{
    CartItem, Hotel, InboundChatMessage, OutboundChatMessage, PurchaseConfirmation, SearchCriteria,
};

// 非有限或负数价格在入站时即拒绝
impl TryFrom<proto::CartItem> for CartItem {
    type Error = AppError;

    fn try_from(item: proto::CartItem) -> AppResult<Self> {
        if !item.price.is_finite() {
            return Err(AppError::validation(format!(
                "cart item {} has a non-finite price",
                item.id
            )));
        }
        let price = Decimal::from_f64(item.price).ok_or_else(|| {
            AppError::validation(format!("cart item {} price is out of range", item.id))
        })?;
        CartItem::new(item.id, item.kind, price)
    }
}

impl TryFrom<PurchaseConfirmation> for proto::PurchaseConfirmation {
    type Error = AppError;

    fn try_from(confirmation: PurchaseConfirmation) -> AppResult<Self> {
        let item_count = i32::try_from(confirmation.item_count).map_err(|_| {
            AppError::internal(format!(
                "item count {} does not fit the wire format",
                confirmation.item_count
            ))
        })?;
        let total_value = confirmation
            .total_value
            .to_f64()
            .ok_or_else(|| AppError::internal("total value does not fit the wire format"))?;

        Ok(Self {
            success: confirmation.success,
            confirmation_code: confirmation.confirmation_code,
            total_value,
            item_count,
            errors: confirmation.errors,
            timestamp: confirmation.timestamp,
        })
    }
}

/// sender 和 timestamp 由服务端决定，入站时忽略
impl From<proto::ChatMessage> for InboundChatMessage {
    fn from(message: proto::ChatMessage) -> Self {
        InboundChatMessage::new(message.text, message.context)
    }
}

impl From<OutboundChatMessage> for proto::ChatMessage {
    fn from(message: OutboundChatMessage) -> Self {
        Self {
            sender: message.sender,
            text: message.text,
            timestamp: message.timestamp,
            context: message.context,
        }
    }
}

impl From<Hotel> for proto::Hotel {
    fn from(hotel: Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name,
            city: hotel.city,
            stars: i32::from(hotel.stars),
            price: hotel.price.to_f64().unwrap_or_default(),
            available: hotel.available,
            amenities: hotel.amenities,
            accommodation_type: hotel.accommodation_type,
        }
    }
}

impl TryFrom<proto::SearchHotelsRequest> for SearchCriteria {
    type Error = AppError;

    fn try_from(req: proto::SearchHotelsRequest) -> AppResult<Self> {
        SearchCriteria::from_wire(
            &req.city,
            req.min_stars,
            req.max_stars,
            req.min_price,
            req.max_price,
            &req.accommodation_type,
            &req.order_by,
            req.delay_seconds,
        )
    }
}
