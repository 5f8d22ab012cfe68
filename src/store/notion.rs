use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::models::{Holding, HoldingInput};
use crate::store::holdings_store::{HoldingsStore, StoreError};

const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

pub struct NotionStore {
    client: reqwest::Client,
    token: String,
    database_id: String,
}

impl NotionStore {
    pub fn new(token: String, database_id: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            token,
            database_id,
        }
    }

    /// Fails fast when the Notion credentials are missing so a misconfigured
    /// process never starts serving.
    pub fn from_env() -> Result<Self, StoreError> {
        let token = std::env::var("NOTION_TOKEN")
            .map_err(|_| StoreError::Transport("NOTION_TOKEN not set".into()))?;
        let database_id = std::env::var("NOTION_DATABASE_ID")
            .map_err(|_| StoreError::Transport("NOTION_DATABASE_ID not set".into()))?;
        Ok(Self::new(token, database_id))
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        body: &Value,
    ) -> Result<Value, StoreError> {
        let resp = req
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = resp.status();
        let payload: Value = resp
            .json()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = classify_error(status, &payload);
            error!("Notion API error ({}): {}", status, err);
            return Err(err);
        }
        Ok(payload)
    }
}

// A page operation carries no database id, so object_not_found on that
// path can only mean the record itself is gone.
fn scope_to_page(err: StoreError, id: &str) -> StoreError {
    match err {
        StoreError::MissingTarget => StoreError::RecordNotFound(id.to_string()),
        other => other,
    }
}

// Notion reports failures as { "code": "...", "message": "..." }.
fn classify_error(status: reqwest::StatusCode, payload: &Value) -> StoreError {
    let code = payload.get("code").and_then(Value::as_str).unwrap_or("");
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");

    match code {
        "unauthorized" => StoreError::Unauthorized,
        "object_not_found" => StoreError::MissingTarget,
        "validation_error" => StoreError::InvalidPayload(message.to_string()),
        _ => StoreError::Transport(format!("{} ({})", message, status)),
    }
}

// ---------------------------------------------------------------------------
// Property schema mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    id: String,
    properties: PageProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageProperties {
    ticker: RichTextProp,
    name: TitleProp,
    shares: NumberProp,
    buy_price: NumberProp,
    created_at: DateProp,
    updated_at: DateProp,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RichTextProp {
    rich_text: Vec<TextFragment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TitleProp {
    title: Vec<TextFragment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextFragment {
    plain_text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NumberProp {
    number: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DateProp {
    date: Option<DateValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DateValue {
    start: String,
}

// Missing properties map to ''/0 rather than failing the whole listing;
// a half-filled row in Notion should not take the portfolio down.
fn page_to_holding(page: Page) -> Holding {
    let props = page.properties;
    Holding {
        id: page.id,
        ticker: props
            .ticker
            .rich_text
            .first()
            .map(|t| t.plain_text.clone())
            .unwrap_or_default(),
        name: props
            .name
            .title
            .first()
            .map(|t| t.plain_text.clone())
            .unwrap_or_default(),
        shares: props.shares.number.unwrap_or(0.0),
        buy_price: props.buy_price.number.unwrap_or(0.0),
        created_at: props.created_at.date.map(|d| d.start).unwrap_or_default(),
        updated_at: props.updated_at.date.map(|d| d.start).unwrap_or_default(),
    }
}

fn holding_properties(input: &HoldingInput, now: &str, include_created: bool) -> Value {
    let mut props = json!({
        "ticker": { "rich_text": [ { "text": { "content": input.ticker } } ] },
        "name": { "title": [ { "text": { "content": input.name } } ] },
        "shares": { "number": input.shares },
        "buy_price": { "number": input.buy_price },
        "updated_at": { "date": { "start": now } },
    });
    if include_created {
        props["created_at"] = json!({ "date": { "start": now } });
    }
    props
}

fn parse_page(payload: Value) -> Result<Holding, StoreError> {
    let page: Page = serde_json::from_value(payload)
        .map_err(|e| StoreError::Transport(format!("unexpected page shape: {e}")))?;
    Ok(page_to_holding(page))
}

#[async_trait]
impl HoldingsStore for NotionStore {
    async fn list(&self) -> Result<Vec<Holding>, StoreError> {
        // Notion excludes archived pages from database queries, which is
        // exactly the soft-delete semantics we want.
        let url = format!("{NOTION_API}/databases/{}/query", self.database_id);
        let body = json!({
            "sorts": [ { "property": "created_at", "direction": "descending" } ]
        });

        let payload = self.send(self.client.post(url), &body).await?;
        let response: QueryResponse = serde_json::from_value(payload)
            .map_err(|e| StoreError::Transport(format!("unexpected query shape: {e}")))?;

        Ok(response.results.into_iter().map(page_to_holding).collect())
    }

    async fn create(&self, input: &HoldingInput) -> Result<Holding, StoreError> {
        let url = format!("{NOTION_API}/pages");
        let now = Utc::now().to_rfc3339();
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": holding_properties(input, &now, true),
        });

        let payload = self.send(self.client.post(url), &body).await?;
        parse_page(payload)
    }

    async fn update(&self, id: &str, input: &HoldingInput) -> Result<Holding, StoreError> {
        let url = format!("{NOTION_API}/pages/{id}");
        let now = Utc::now().to_rfc3339();
        let body = json!({ "properties": holding_properties(input, &now, false) });

        let payload = self
            .send(self.client.patch(url), &body)
            .await
            .map_err(|e| scope_to_page(e, id))?;
        parse_page(payload)
    }

    async fn soft_delete(&self, id: &str) -> Result<(), StoreError> {
        let url = format!("{NOTION_API}/pages/{id}");
        let body = json!({ "archived": true });

        self.send(self.client.patch(url), &body)
            .await
            .map_err(|e| scope_to_page(e, id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Value {
        json!({
            "id": "page-123",
            "properties": {
                "ticker": { "rich_text": [ { "plain_text": "AAPL" } ] },
                "name": { "title": [ { "plain_text": "Apple Inc." } ] },
                "shares": { "number": 10.0 },
                "buy_price": { "number": 100.0 },
                "created_at": { "date": { "start": "2024-01-01T00:00:00+00:00" } },
                "updated_at": { "date": { "start": "2024-02-01T00:00:00+00:00" } }
            }
        })
    }

    #[test]
    fn maps_page_to_holding() {
        let holding = parse_page(sample_page()).unwrap();
        assert_eq!(holding.id, "page-123");
        assert_eq!(holding.ticker, "AAPL");
        assert_eq!(holding.name, "Apple Inc.");
        assert_eq!(holding.shares, 10.0);
        assert_eq!(holding.buy_price, 100.0);
        assert_eq!(holding.created_at, "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn missing_properties_default_instead_of_failing() {
        let holding = parse_page(json!({ "id": "page-9", "properties": {} })).unwrap();
        assert_eq!(holding.ticker, "");
        assert_eq!(holding.shares, 0.0);
        assert_eq!(holding.created_at, "");
    }

    #[test]
    fn create_properties_stamp_both_timestamps() {
        let input = HoldingInput {
            ticker: "AAPL".into(),
            name: "Apple".into(),
            shares: 10.0,
            buy_price: 100.0,
        };
        let props = holding_properties(&input, "2024-03-01T00:00:00+00:00", true);
        assert_eq!(
            props["created_at"]["date"]["start"],
            "2024-03-01T00:00:00+00:00"
        );
        assert_eq!(
            props["updated_at"]["date"]["start"],
            "2024-03-01T00:00:00+00:00"
        );
        assert_eq!(props["shares"]["number"], 10.0);
    }

    #[test]
    fn update_properties_leave_created_at_alone() {
        let input = HoldingInput {
            ticker: "AAPL".into(),
            name: "Apple".into(),
            shares: 10.0,
            buy_price: 100.0,
        };
        let props = holding_properties(&input, "2024-03-01T00:00:00+00:00", false);
        assert!(props.get("created_at").is_none());
        assert_eq!(
            props["updated_at"]["date"]["start"],
            "2024-03-01T00:00:00+00:00"
        );
    }

    #[test]
    fn page_operations_turn_missing_target_into_record_not_found() {
        let scoped = scope_to_page(StoreError::MissingTarget, "page-7");
        assert!(matches!(scoped, StoreError::RecordNotFound(id) if id == "page-7"));

        let passthrough = scope_to_page(StoreError::Unauthorized, "page-7");
        assert!(matches!(passthrough, StoreError::Unauthorized));
    }

    #[test]
    fn classifies_notion_error_codes() {
        let unauthorized = classify_error(
            reqwest::StatusCode::UNAUTHORIZED,
            &json!({ "code": "unauthorized", "message": "bad token" }),
        );
        assert!(matches!(unauthorized, StoreError::Unauthorized));

        let missing = classify_error(
            reqwest::StatusCode::NOT_FOUND,
            &json!({ "code": "object_not_found", "message": "no database" }),
        );
        assert!(matches!(missing, StoreError::MissingTarget));

        let invalid = classify_error(
            reqwest::StatusCode::BAD_REQUEST,
            &json!({ "code": "validation_error", "message": "shares is not a number" }),
        );
        assert!(matches!(invalid, StoreError::InvalidPayload(msg) if msg.contains("shares")));

        let other = classify_error(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            &json!({ "message": "boom" }),
        );
        assert!(matches!(other, StoreError::Transport(_)));
    }
}
