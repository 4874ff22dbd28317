//! WASM bindings for bank statement transaction extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

use passbook_core::export;
use passbook_core::models::{
    AmountFillOrder, PageContent, PassbookConfig, ProcessingOutcome, TextFallback,
};
use passbook_core::pdf::PdfExtractor;
use passbook_core::statement::{rules, StatementEngine, TransactionExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract transactions from pre-decoded pages (`[{number, text, tables}]`).
#[wasm_bindgen]
pub fn process_pages(pages: JsValue) -> Result<JsValue, JsValue> {
    StatementProcessor::new().process_pages(pages)
}

/// Decode a PDF and extract its transactions.
#[wasm_bindgen]
pub fn process_pdf(data: &[u8], password: Option<String>) -> Result<JsValue, JsValue> {
    StatementProcessor::new().process_pdf(data, password)
}

/// Extract transactions from plain statement text.
#[wasm_bindgen]
pub fn process_text(text: &str) -> Result<JsValue, JsValue> {
    StatementProcessor::new().process_text(text)
}

/// Render the transactions of an outcome as CSV.
#[wasm_bindgen]
pub fn transactions_to_csv(outcome: JsValue) -> Result<String, JsValue> {
    let outcome: ProcessingOutcome = from_js(outcome)?;
    export::outcome_to_csv(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Normalize a statement date to `DD-MM-YYYY`; unknown formats pass through.
#[wasm_bindgen]
pub fn normalize_date(date: &str) -> String {
    rules::normalize_date(date)
}

/// Parse an amount to its non-negative magnitude (0 when unparseable).
#[wasm_bindgen]
pub fn normalize_amount(amount: &str) -> f64 {
    rules::amount_magnitude(amount).to_f64().unwrap_or(0.0)
}

/// Bank code for a document's text (`"unknown"` when no bank matches).
#[wasm_bindgen]
pub fn detect_bank(text: &str) -> String {
    PassbookConfig::default().banks.identify(text).to_string()
}

/// Display name for a bank code.
#[wasm_bindgen]
pub fn bank_display_name(code: &str) -> String {
    PassbookConfig::default().banks.display_name(code).to_string()
}

/// Statement processor class for browser use.
#[wasm_bindgen]
pub struct StatementProcessor {
    engine: StatementEngine,
}

#[wasm_bindgen]
impl StatementProcessor {
    /// Create a processor with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: StatementEngine::default(),
        }
    }

    /// Create a processor from a JSON configuration document.
    #[wasm_bindgen]
    pub fn from_config(config_json: &str) -> Result<StatementProcessor, JsValue> {
        let config: PassbookConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            engine: StatementEngine::new(config),
        })
    }

    /// Set when free-text extraction runs: `"when_tables_empty"` or `"always"`.
    #[wasm_bindgen]
    pub fn set_text_fallback(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: TextFallback = parse_setting(mode)?;
        self.engine = std::mem::take(&mut self.engine).with_text_fallback(mode);
        Ok(())
    }

    /// Set the amount fill order: `"balance_first"` or `"debit_first"`.
    #[wasm_bindgen]
    pub fn set_amount_fill_order(&mut self, order: &str) -> Result<(), JsValue> {
        let order: AmountFillOrder = parse_setting(order)?;
        self.engine = std::mem::take(&mut self.engine).with_fill_order(order);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn process_pages(&self, pages: JsValue) -> Result<JsValue, JsValue> {
        let pages: Vec<PageContent> = from_js(pages)?;
        to_js(&self.engine.process_pages(&pages))
    }

    /// Decode a PDF; `password` falls back to the configured one.
    #[wasm_bindgen]
    pub fn process_pdf(&self, data: &[u8], password: Option<String>) -> Result<JsValue, JsValue> {
        let config = self.engine.config();
        let extractor = PdfExtractor::from_config(&config.pdf);
        let password = password.as_deref().or(config.pdf.password.as_deref());
        to_js(&self.engine.process_document(&extractor, data, password))
    }

    #[wasm_bindgen]
    pub fn process_text(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.engine.extract_from_text(text))
    }

    /// Status record (`bank_name`, `transaction_count`, ...) of an outcome.
    #[wasm_bindgen]
    pub fn status(&self, outcome: JsValue) -> Result<JsValue, JsValue> {
        let outcome: ProcessingOutcome = from_js(outcome)?;
        to_js(&outcome.status())
    }

    /// CSV file name for an outcome, dated today.
    #[wasm_bindgen]
    pub fn download_filename(&self, outcome: JsValue) -> Result<String, JsValue> {
        let outcome: ProcessingOutcome = from_js(outcome)?;
        let now = js_sys::Date::new_0();
        let today = NaiveDate::from_ymd_opt(
            now.get_full_year() as i32,
            now.get_month() + 1,
            now.get_date(),
        )
        .ok_or_else(|| JsValue::from_str("invalid system date"))?;
        Ok(export::download_filename(outcome.bank_name(), today))
    }
}

impl Default for StatementProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_setting<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| JsValue::from_str(&format!("unknown setting: {}", value)))
}
