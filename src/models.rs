// Marketplace data structures: vehicles and tracked clicks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const USER_AGENT_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ars,
    Usd,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Ars => "ARS",
            Currency::Usd => "USD",
        }
    }
}

// A published vehicle, as stored in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub currency: Currency,
    pub year: Option<i32>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub kilometers: Option<i64>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub main_image_index: usize,
    pub whatsapp_number: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")] // Plus (complete) publication unless stated otherwise
    pub is_plus: bool,
}

fn default_true() -> bool {
    true
}

impl Vehicle {
    /// `$1.234.567` for pesos, `USD $1.234.567` for dollars.
    pub fn format_price(&self) -> String {
        let symbol = match self.currency {
            Currency::Ars => "$",
            Currency::Usd => "USD $",
        };
        format!("{}{}", symbol, group_thousands(self.price))
    }

    /// Free publications never show an image.
    pub fn main_image(&self) -> Option<&str> {
        if !self.is_plus || self.images.is_empty() {
            return None;
        }
        let index = if self.main_image_index < self.images.len() {
            self.main_image_index
        } else {
            0
        };
        self.images.get(index).map(String::as_str)
    }

    pub fn detail_path(&self) -> String {
        format!("/vehicle/{}", self.id)
    }

    pub fn whatsapp_contact_message(&self, site_url: &str) -> String {
        format!(
            "Hola! Me interesa el vehículo: {} - Precio: {} {}. Link: {}{}",
            self.title,
            self.format_price(),
            self.currency.code(),
            site_url.trim_end_matches('/'),
            self.detail_path()
        )
    }

    /// Every comma in the message, title included, becomes a dot.
    pub fn whatsapp_offer_message(&self, offer_amount: i64, site_url: &str) -> String {
        format!(
            "Hola! Quiero hacer una oferta por: {} - Precio de venta: {} {} - Mi oferta: ${} {}. Link: {}{}",
            self.title,
            self.format_price(),
            self.currency.code(),
            group_thousands(offer_amount),
            self.currency.code(),
            site_url.trim_end_matches('/'),
            self.detail_path()
        )
        .replace(',', ".")
    }

    /// Case-insensitive free-text match over title, brand, model and description.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(needle_lower);
        contains(self.title.as_str())
            || self.brand.as_deref().is_some_and(contains)
            || self.model.as_deref().is_some_and(contains)
            || contains(self.description.as_str())
    }
}

/// Groups digits with `.` separators, e.g. `1234567` -> `1.234.567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickType {
    WhatsApp,
    Offer,
    Other(String),
}

impl From<&str> for ClickType {
    fn from(raw: &str) -> Self {
        match raw {
            "whatsapp" => ClickType::WhatsApp,
            "offer" => ClickType::Offer,
            other => ClickType::Other(other.to_string()),
        }
    }
}

// One tracked contact/offer click
#[derive(Debug, Clone, Serialize)]
pub struct Click {
    pub vehicle_id: u32,
    pub click_type: ClickType,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub timestamp: DateTime<Utc>,
}

impl Click {
    pub fn new(
        vehicle_id: u32,
        click_type: ClickType,
        ip_address: Option<String>,
        user_agent: &str,
    ) -> Self {
        Self {
            vehicle_id,
            click_type,
            ip_address,
            user_agent: user_agent.chars().take(USER_AGENT_MAX_CHARS).collect(),
            timestamp: Utc::now(),
        }
    }
}
