//! Support chat messages, reply selection and stream state

use stay_errors::{AppError, AppResult};

use super::topic::{Classification, TopicClassifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundChatMessage {
    pub text: String,
    /// Caller hint: "general", "flight" or empty.
    pub context: String,
}

impl InboundChatMessage {
    pub fn new(text: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: context.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundChatMessage {
    pub sender: String,
    pub text: String,
    pub timestamp: String,
    /// Always the answering desk's domain tag, whatever the inbound context was.
    pub context: String,
}

/// Canned replies, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    PackagePitch,
    Greeting,
    Pricing,
    StarRating,
    Amenities,
    AccommodationTypes,
    Cities,
    Fallback,
}

impl ReplyKind {
    pub fn text(&self) -> &'static str {
        match self {
            Self::PackagePitch => {
                "🏨 HOTÉIS - Nossos pacotes incluem hospedagens confortáveis em hotéis, pousadas e resorts! A partir de R$ 80/noite com até 30% de desconto."
            }
            Self::Greeting => {
                "🏨 HOTÉIS - Posso te ajudar com informações sobre hospedagens! Temos hotéis, pousadas, resorts e hostels."
            }
            Self::Pricing => {
                "💰 Temos hotéis a partir de R$ 80/noite! Use os filtros de preço para encontrar as melhores ofertas."
            }
            Self::StarRating => {
                "⭐ Oferecemos hotéis de 1 a 5 estrelas. Hotéis 4 e 5 estrelas têm as melhores avaliações!"
            }
            Self::Amenities => {
                "🏊 Nossos hotéis oferecem: Wi-Fi, Piscina, Academia, Spa, Restaurante, Estacionamento, Café da Manhã e Ar Condicionado."
            }
            Self::AccommodationTypes => {
                "🏨 Temos 4 tipos de acomodação: Hotel, Pousada, Resort e Hostel. Qual você prefere?"
            }
            Self::Cities => {
                "🌆 Temos hotéis em: São Paulo, Rio de Janeiro, Brasília, Salvador, Fortaleza, Belo Horizonte, Recife, Manaus e Porto Alegre."
            }
            Self::Fallback => {
                "🏨 Olá! Como posso ajudar com informações sobre hotéis? Temos diversas opções de hospedagem!"
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PackagePitch => "package_pitch",
            Self::Greeting => "greeting",
            Self::Pricing => "pricing",
            Self::StarRating => "star_rating",
            Self::Amenities => "amenities",
            Self::AccommodationTypes => "accommodation_types",
            Self::Cities => "cities",
            Self::Fallback => "fallback",
        }
    }
}

enum Trigger {
    Package,
    General,
    AnyOf(&'static [&'static str]),
}

impl Trigger {
    fn fires(&self, classification: &Classification, lowered: &str) -> bool {
        match self {
            Self::Package => classification.is_package,
            Self::General => classification.is_general,
            Self::AnyOf(words) => words.iter().any(|w| lowered.contains(w)),
        }
    }
}

const REPLY_RULES: &[(Trigger, ReplyKind)] = &[
    (Trigger::Package, ReplyKind::PackagePitch),
    (Trigger::General, ReplyKind::Greeting),
    (Trigger::AnyOf(&["preco", "preço", "barato"]), ReplyKind::Pricing),
    (
        Trigger::AnyOf(&["estrela", "avaliacao", "avaliação"]),
        ReplyKind::StarRating,
    ),
    (
        Trigger::AnyOf(&["comodidade", "amenidade"]),
        ReplyKind::Amenities,
    ),
    (Trigger::AnyOf(&["tipo"]), ReplyKind::AccommodationTypes),
    (Trigger::AnyOf(&["cidade", "destino"]), ReplyKind::Cities),
];

/// First matching rule wins; nothing matched falls back to the greeting.
pub fn select_reply(classification: &Classification, lowered: &str) -> ReplyKind {
    REPLY_RULES
        .iter()
        .find(|(trigger, _)| trigger.fires(classification, lowered))
        .map(|(_, kind)| *kind)
        .unwrap_or(ReplyKind::Fallback)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Open,
    Closed,
}

/// Routing decision for one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routed {
    pub classification: Classification,
    pub reply: Option<ReplyKind>,
}

/// Per-stream chat state. Messages carry no history between each other.
#[derive(Debug)]
pub struct ChatSession {
    state: ChatState,
    received: u64,
    replied: u64,
}

impl ChatSession {
    pub fn open() -> Self {
        Self {
            state: ChatState::Open,
            received: 0,
            replied: 0,
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn replied(&self) -> u64 {
        self.replied
    }

    pub fn ignored(&self) -> u64 {
        self.received - self.replied
    }

    pub fn route(
        &mut self,
        classifier: &TopicClassifier,
        message: &InboundChatMessage,
    ) -> AppResult<Routed> {
        if self.state == ChatState::Closed {
            return Err(AppError::failed_precondition(
                "chat stream already closed",
            ));
        }
        self.received += 1;

        let lowered = message.text.to_lowercase();
        let classification = classifier.classify_lowered(&lowered, &message.context);
        let reply = classification
            .should_respond()
            .then(|| select_reply(&classification, &lowered));
        if reply.is_some() {
            self.replied += 1;
        }

        Ok(Routed {
            classification,
            reply,
        })
    }

    pub fn close(&mut self) {
        self.state = ChatState::Closed;
    }
}
