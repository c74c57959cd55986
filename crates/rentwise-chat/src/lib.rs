// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rentwise_app::{
    AddOn, AddOnId, AddOnOption, Car, CarId, Catalog, ChargeId, ChatRole, ChatUpdate, Price,
    Protection, ProtectionId, SelectionStrategy, SessionId,
};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/ai-engine";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: SessionId,
    pub booking: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMessage {
    pub role: ChatRole,
    pub content: String,
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub session_id: SessionId,
    pub messages: Vec<ReplyMessage>,
    pub catalog: Catalog,
}

impl ChatReply {
    pub fn last_assistant(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == ChatRole::Assistant)
            .map(|message| message.content.as_str())
    }

    pub fn into_update(self) -> ChatUpdate {
        ChatUpdate {
            assistant: self.last_assistant().map(str::to_owned),
            catalog: self.catalog,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("chat.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("chat.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "chat.base_url must use http or https, got {:?}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn start_session(&self, booking_id: &str) -> Result<Session> {
        let booking_id = booking_id.trim();
        if booking_id.is_empty() {
            bail!("booking id must not be empty -- pass one with --booking or set chat.booking_id");
        }
        debug!(booking_id, "starting chat session");

        let parsed: StartResponse = self.post("start/", &StartRequest { booking_id })?;
        Ok(Session {
            session_id: SessionId::new(parsed.chat_session_id),
            booking: parsed.booking,
        })
    }

    pub fn send(
        &self,
        session_id: &SessionId,
        message: &str,
        history: &[(ChatRole, String)],
    ) -> Result<ChatReply> {
        let request = ChatRequest {
            chat_session_id: session_id.as_str(),
            message,
            messages: history
                .iter()
                .map(|(role, content)| WireMessage {
                    role: role.as_str(),
                    content,
                })
                .collect(),
        };
        debug!(
            session = session_id.as_str(),
            history = history.len(),
            "sending chat message"
        );

        let parsed: ChatResponse = self.post("chat/", &request)?;
        Ok(parsed.into_reply(session_id))
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .http
            .post(format!("{}/{path}", self.base_url))
            .json(body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), path, "chat backend rejected request");
            return Err(clean_error_response(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode response from {path}"))
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- is the booking backend running? ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if let Ok(parsed) = serde_json::from_str::<DetailEnvelope>(body)
        && let Some(detail) = parsed.detail
        && !detail.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), detail);
    }

    if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}

pub fn amount_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn parse_timestamp(raw: Option<&str>) -> Option<OffsetDateTime> {
    raw.and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok())
}

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    booking_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    chat_session_id: String,
    #[serde(default)]
    booking: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    chat_session_id: &'a str,
    message: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    chat_session_id: Option<String>,
    #[serde(default)]
    messages: Vec<ResponseMessage>,
    #[serde(default)]
    cars: Vec<WireCar>,
    #[serde(default)]
    protections: Vec<WireProtection>,
    #[serde(default)]
    addons: Vec<WireAddOn>,
}

impl ChatResponse {
    fn into_reply(self, fallback_session: &SessionId) -> ChatReply {
        let session_id = self
            .chat_session_id
            .map_or_else(|| fallback_session.clone(), SessionId::new);
        let messages = self
            .messages
            .into_iter()
            .filter_map(|message| {
                let role = ChatRole::parse(&message.role)?;
                Some(ReplyMessage {
                    role,
                    content: message.content,
                    created_at: parse_timestamp(message.created_at.as_deref()),
                })
            })
            .collect();
        let add_ons = self
            .addons
            .into_iter()
            .enumerate()
            .map(|(index, add_on)| add_on.into_add_on(index))
            .collect();

        ChatReply {
            session_id,
            messages,
            catalog: Catalog {
                cars: self.cars.into_iter().map(WireCar::into_car).collect(),
                protections: self
                    .protections
                    .into_iter()
                    .map(WireProtection::into_protection)
                    .collect(),
                add_ons,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    role: String,
    content: String,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCar {
    id: String,
    name: String,
    brand: String,
    model: String,
    image: Option<String>,
    #[serde(default)]
    group_type: String,
    #[serde(default)]
    passengers: u32,
    #[serde(default)]
    bags: u32,
    #[serde(default)]
    transmission: String,
    #[serde(default)]
    fuel_type: String,
    #[serde(rename = "daily_price")]
    daily_price: f64,
    #[serde(rename = "total_price")]
    total_price: f64,
    currency: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl WireCar {
    fn into_car(self) -> Car {
        Car {
            id: CarId::new(self.id),
            name: self.name,
            brand: self.brand,
            model: self.model,
            image: self.image,
            group_type: self.group_type,
            passengers: self.passengers,
            bags: self.bags,
            transmission: self.transmission,
            fuel_type: self.fuel_type,
            daily_price: Price::new(&self.currency, amount_to_cents(self.daily_price), "/day"),
            total_price: Price::new(&self.currency, amount_to_cents(self.total_price), ""),
            tags: self.tags,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireProtection {
    id: String,
    name: String,
    total_price: f64,
    currency: String,
    #[serde(default)]
    is_recommended: bool,
}

impl WireProtection {
    fn into_protection(self) -> Protection {
        Protection {
            id: ProtectionId::new(self.id),
            name: self.name,
            deductible: None,
            rating_stars: 0,
            includes: Vec::new(),
            excludes: Vec::new(),
            total_price: Price::new(&self.currency, amount_to_cents(self.total_price), ""),
            is_nudge: self.is_recommended,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireAddOn {
    id: String,
    name: String,
    price_per_day: f64,
    currency: String,
    #[serde(default)]
    why: String,
    #[serde(default)]
    is_recommended: bool,
}

impl WireAddOn {
    // Recommendations arrive flat; each becomes a single-option group.
    fn into_add_on(self, index: usize) -> AddOn {
        let tags = if self.is_recommended {
            vec!["Recommended".to_owned()]
        } else {
            Vec::new()
        };
        AddOn {
            id: AddOnId::new(index as i64 + 1),
            name: self.name.clone(),
            options: vec![AddOnOption {
                charge_id: ChargeId::new(self.id),
                title: self.name,
                description: self.why,
                tags,
                price: Price::new(&self.currency, amount_to_cents(self.price_per_day), "/day"),
                enabled: true,
                strategy: SelectionStrategy::default(),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    detail: Option<String>,
}
