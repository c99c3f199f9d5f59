//! WASM HTTP client for the hosted data store.
//!
//! Talks to the store's REST surface (`/rest/v1/*`), object storage
//! (`/storage/v1/*`) and auth facade (`/auth/v1/*`). The store URL and
//! publishable key come from compile-time env vars, overridable at runtime
//! via a `?store=<url>` query parameter for local development.

use std::fmt;

use scraplink_common::assignment::{AssignmentDraft, OrderAssignment, PartnerId, PartnerProfile};
use scraplink_common::feedback::{OrderRating, RatingDraft};
use scraplink_common::identity::{Role, Session, UserId};
use scraplink_common::order::{Order, OrderDraft, OrderId, OrderStatus};
use scraplink_common::pricing::ScrapRate;
use scraplink_common::scrap::ScrapType;
use serde::Serialize;

/// Failure of a store interaction, kept coarse on purpose: the caller only
/// distinguishes "row does not exist" from "try again later".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested row does not exist.
    NotFound,
    /// Network or service failure; the request may be re-triggered by the
    /// user but is never retried automatically.
    Transport(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => f.write_str("not found"),
            StoreError::Transport(msg) => write!(f, "store request failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Default store endpoint for local development.
const DEFAULT_STORE_URL: &str = "http://localhost:54321";

/// Resolve the store base URL: `?store=` query parameter first, then the
/// compile-time `SCRAPLINK_STORE_URL`, then the local default.
pub(crate) fn store_url() -> String {
    #[cfg(target_family = "wasm")]
    {
        let from_query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|qs| web_sys::UrlSearchParams::new_with_str(&qs).ok()?.get("store"));
        if let Some(url) = from_query {
            if !url.is_empty() {
                return url;
            }
        }
    }
    option_env!("SCRAPLINK_STORE_URL")
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STORE_URL)
        .to_string()
}

/// Publishable API key sent with every request. Authorization proper is
/// enforced by the store's row-level access rules, not by this layer.
fn store_key() -> &'static str {
    option_env!("SCRAPLINK_STORE_KEY").unwrap_or("dev-anon-key")
}

// ─── Request payloads ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SignInRequest<'a> {
    phone: &'a str,
    role: Role,
}

#[derive(Serialize)]
struct StatusPatch {
    status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_amount: Option<f64>,
}

#[derive(Serialize)]
struct EstimatePatch {
    estimated_amount: f64,
}

#[derive(Serialize)]
struct RatePatch {
    rate_per_kg: f64,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Store client. Only functional in WASM builds; native builds get stubs
/// so the crate still type-checks.
#[derive(Clone)]
pub struct StoreClient {
    base_url: String,
}

impl StoreClient {
    pub fn new() -> Self {
        Self {
            base_url: store_url(),
        }
    }

    /// Fetch exactly one order. An empty result set is a distinct
    /// not-found condition, not a transport failure.
    pub async fn fetch_order(&self, id: &OrderId) -> Result<Order, StoreError> {
        let path = format!("/rest/v1/orders?id=eq.{}&limit=1", id.0);
        let body = get_json(&self.base_url, &path).await?;
        let mut rows: Vec<Order> = parse_rows(&body)?;
        rows.pop().ok_or(StoreError::NotFound)
    }

    /// All orders owned by one user, newest first.
    pub async fn fetch_orders(&self, user_id: &UserId) -> Result<Vec<Order>, StoreError> {
        let path = format!(
            "/rest/v1/orders?user_id=eq.{}&order=created_at.desc",
            user_id.0
        );
        let body = get_json(&self.base_url, &path).await?;
        parse_rows(&body)
    }

    /// Every order in the store, newest first. Admin listing; the store's
    /// access rules decide who may actually read this.
    pub async fn fetch_all_orders(&self) -> Result<Vec<Order>, StoreError> {
        let body = get_json(&self.base_url, "/rest/v1/orders?order=created_at.desc").await?;
        parse_rows(&body)
    }

    /// Orders currently assigned to one partner, newest first.
    pub async fn fetch_assigned_orders(
        &self,
        partner_id: &PartnerId,
    ) -> Result<Vec<(Order, OrderAssignment)>, StoreError> {
        let path = format!(
            "/rest/v1/order_assignments?partner_id=eq.{}&order=created_at.desc",
            partner_id.0
        );
        let body = get_json(&self.base_url, &path).await?;
        let assignments: Vec<OrderAssignment> = parse_rows(&body)?;

        let mut out = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            match self.fetch_order(&assignment.order_id).await {
                Ok(order) => out.push((order, assignment)),
                // An assignment whose order vanished is skipped, not fatal.
                Err(StoreError::NotFound) => {
                    tracing::warn!("assignment {} points at a missing order", assignment.id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Assignment (with partner contact card) for one order, if any.
    pub async fn fetch_assignment(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<(OrderAssignment, PartnerProfile)>, StoreError> {
        let path = format!(
            "/rest/v1/order_assignments?order_id=eq.{}&limit=1",
            order_id.0
        );
        let body = get_json(&self.base_url, &path).await?;
        let mut rows: Vec<OrderAssignment> = parse_rows(&body)?;
        let Some(assignment) = rows.pop() else {
            return Ok(None);
        };

        let path = format!("/rest/v1/partners?id=eq.{}&limit=1", assignment.partner_id.0);
        let body = get_json(&self.base_url, &path).await?;
        let mut partners: Vec<PartnerProfile> = parse_rows(&body)?;
        let partner = partners.pop().ok_or(StoreError::NotFound)?;
        Ok(Some((assignment, partner)))
    }

    /// All registered pickup partners (admin assignment picker).
    pub async fn fetch_partners(&self) -> Result<Vec<PartnerProfile>, StoreError> {
        let body = get_json(&self.base_url, "/rest/v1/partners?order=name.asc").await?;
        parse_rows(&body)
    }

    /// Insert one new order and return the stored row with its issued id.
    pub async fn insert_order(&self, draft: &OrderDraft) -> Result<Order, StoreError> {
        let body = serde_json::to_string(draft)
            .map_err(|e| StoreError::Transport(format!("encode draft: {e}")))?;
        let resp = post_json(&self.base_url, "/rest/v1/orders", &body).await?;
        let mut rows: Vec<Order> = parse_rows(&resp)?;
        rows.pop()
            .ok_or_else(|| StoreError::Transport("insert returned no row".into()))
    }

    /// Proxy a status transition to the store (partner/admin action).
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        final_amount: Option<f64>,
    ) -> Result<Order, StoreError> {
        let body = serde_json::to_string(&StatusPatch {
            status,
            final_amount,
        })
        .map_err(|e| StoreError::Transport(format!("encode patch: {e}")))?;
        let path = format!("/rest/v1/orders?id=eq.{}", id.0);
        let resp = patch_json(&self.base_url, &path, &body).await?;
        let mut rows: Vec<Order> = parse_rows(&resp)?;
        rows.pop().ok_or(StoreError::NotFound)
    }

    /// Record the admin's estimate for an order.
    pub async fn update_estimate(&self, id: &OrderId, amount: f64) -> Result<Order, StoreError> {
        let body = serde_json::to_string(&EstimatePatch {
            estimated_amount: amount,
        })
        .map_err(|e| StoreError::Transport(format!("encode patch: {e}")))?;
        let path = format!("/rest/v1/orders?id=eq.{}", id.0);
        let resp = patch_json(&self.base_url, &path, &body).await?;
        let mut rows: Vec<Order> = parse_rows(&resp)?;
        rows.pop().ok_or(StoreError::NotFound)
    }

    /// Manually assign a partner to an order (admin action).
    pub async fn assign_partner(&self, draft: &AssignmentDraft) -> Result<(), StoreError> {
        let body = serde_json::to_string(draft)
            .map_err(|e| StoreError::Transport(format!("encode assignment: {e}")))?;
        post_json(&self.base_url, "/rest/v1/order_assignments", &body).await?;
        Ok(())
    }

    /// Current buy rates for every scrap category.
    pub async fn fetch_rates(&self) -> Result<Vec<ScrapRate>, StoreError> {
        let body = get_json(&self.base_url, "/rest/v1/scrap_rates?order=scrap_type.asc").await?;
        parse_rows(&body)
    }

    /// Write a new per-kilogram rate for one category (admin action).
    pub async fn update_rate(
        &self,
        scrap: ScrapType,
        rate_per_kg: f64,
    ) -> Result<ScrapRate, StoreError> {
        let body = serde_json::to_string(&RatePatch { rate_per_kg })
            .map_err(|e| StoreError::Transport(format!("encode patch: {e}")))?;
        let path = format!("/rest/v1/scrap_rates?scrap_type=eq.{}", scrap.wire_name());
        let resp = patch_json(&self.base_url, &path, &body).await?;
        let mut rows: Vec<ScrapRate> = parse_rows(&resp)?;
        rows.pop().ok_or(StoreError::NotFound)
    }

    /// Record the customer's rating for a completed order.
    pub async fn submit_rating(&self, draft: &RatingDraft) -> Result<OrderRating, StoreError> {
        let body = serde_json::to_string(draft)
            .map_err(|e| StoreError::Transport(format!("encode rating: {e}")))?;
        let resp = post_json(&self.base_url, "/rest/v1/order_ratings", &body).await?;
        let mut rows: Vec<OrderRating> = parse_rows(&resp)?;
        rows.pop()
            .ok_or_else(|| StoreError::Transport("insert returned no row".into()))
    }

    /// Rating already left on one order, if any.
    pub async fn fetch_rating(&self, order_id: &OrderId) -> Result<Option<OrderRating>, StoreError> {
        let path = format!("/rest/v1/order_ratings?order_id=eq.{}&limit=1", order_id.0);
        let body = get_json(&self.base_url, &path).await?;
        let mut rows: Vec<OrderRating> = parse_rows(&body)?;
        Ok(rows.pop())
    }

    /// Every rating in the store, newest first (admin feedback board).
    pub async fn fetch_ratings(&self) -> Result<Vec<OrderRating>, StoreError> {
        let body = get_json(&self.base_url, "/rest/v1/order_ratings?order=created_at.desc").await?;
        parse_rows(&body)
    }

    /// Upload one image to object storage and return its public URL.
    pub async fn upload_image(
        &self,
        user_id: &UserId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let object_path = format!("{}/{stamp}-{file_name}", user_id.0);
        let path = format!("/storage/v1/object/scrap-images/{object_path}");
        post_bytes(&self.base_url, &path, bytes).await?;
        Ok(format!(
            "{}/storage/v1/object/public/scrap-images/{object_path}",
            self.base_url
        ))
    }

    /// Exchange a phone number for the authenticated identity.
    pub async fn sign_in(&self, phone: &str, role: Role) -> Result<Session, StoreError> {
        let body = serde_json::to_string(&SignInRequest { phone, role })
            .map_err(|e| StoreError::Transport(format!("encode sign-in: {e}")))?;
        let resp = post_json(&self.base_url, "/auth/v1/sign-in", &body).await?;
        serde_json::from_str(&resp)
            .map_err(|e| StoreError::Transport(format!("parse session: {e}")))
    }
}

impl Default for StoreClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_rows<T: serde::de::DeserializeOwned>(body: &str) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Transport(format!("parse rows: {e}")))
}

// ─── HTTP helpers (WASM) ─────────────────────────────────────────────────────

#[cfg(target_family = "wasm")]
async fn get_json(base_url: &str, path: &str) -> Result<String, StoreError> {
    fetch(&format!("{base_url}{path}"), "GET", Body::None).await
}

#[cfg(target_family = "wasm")]
async fn post_json(base_url: &str, path: &str, body: &str) -> Result<String, StoreError> {
    fetch(&format!("{base_url}{path}"), "POST", Body::Json(body.to_string())).await
}

#[cfg(target_family = "wasm")]
async fn patch_json(base_url: &str, path: &str, body: &str) -> Result<String, StoreError> {
    fetch(&format!("{base_url}{path}"), "PATCH", Body::Json(body.to_string())).await
}

#[cfg(target_family = "wasm")]
async fn post_bytes(base_url: &str, path: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
    fetch(&format!("{base_url}{path}"), "POST", Body::Bytes(bytes)).await
}

#[cfg(target_family = "wasm")]
enum Body {
    None,
    Json(String),
    Bytes(Vec<u8>),
}

#[cfg(target_family = "wasm")]
async fn fetch(url: &str, method: &str, body: Body) -> Result<String, StoreError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let transport = |msg: String| StoreError::Transport(msg);

    let opts = web_sys::RequestInit::new();
    opts.set_method(method);
    opts.set_mode(web_sys::RequestMode::Cors);

    match &body {
        Body::None => {}
        Body::Json(json) => {
            opts.set_body(&wasm_bindgen::JsValue::from_str(json));
        }
        Body::Bytes(bytes) => {
            let array = js_sys::Uint8Array::from(bytes.as_slice());
            opts.set_body(&array.into());
        }
    }

    let request = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| transport(format!("create request: {e:?}")))?;

    let headers = request.headers();
    headers
        .set("apikey", store_key())
        .map_err(|e| transport(format!("set header: {e:?}")))?;
    if let Body::Json(_) = body {
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| transport(format!("set header: {e:?}")))?;
        // Mutations return the stored row so the UI can echo it.
        headers
            .set("Prefer", "return=representation")
            .map_err(|e| transport(format!("set header: {e:?}")))?;
    }

    let window = web_sys::window().ok_or_else(|| transport("no window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| transport(format!("fetch failed: {e:?}")))?;

    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|_| transport("response is not a Response object".into()))?;

    let text = JsFuture::from(resp.text().map_err(|e| transport(format!("get text: {e:?}")))?)
        .await
        .map_err(|e| transport(format!("read body: {e:?}")))?;
    let text = text
        .as_string()
        .ok_or_else(|| transport("response body is not a string".into()))?;

    match resp.status() {
        404 | 406 => Err(StoreError::NotFound),
        status if status >= 400 => Err(transport(format!("HTTP {status} from {url}: {text}"))),
        _ => Ok(text),
    }
}

// Non-WASM stubs for type checking
#[cfg(not(target_family = "wasm"))]
async fn get_json(_base_url: &str, _path: &str) -> Result<String, StoreError> {
    Err(StoreError::Transport(
        "store client only available in WASM".into(),
    ))
}

#[cfg(not(target_family = "wasm"))]
async fn post_json(_base_url: &str, _path: &str, _body: &str) -> Result<String, StoreError> {
    Err(StoreError::Transport(
        "store client only available in WASM".into(),
    ))
}

#[cfg(not(target_family = "wasm"))]
async fn patch_json(_base_url: &str, _path: &str, _body: &str) -> Result<String, StoreError> {
    Err(StoreError::Transport(
        "store client only available in WASM".into(),
    ))
}

#[cfg(not(target_family = "wasm"))]
async fn post_bytes(_base_url: &str, _path: &str, _bytes: Vec<u8>) -> Result<String, StoreError> {
    Err(StoreError::Transport(
        "store client only available in WASM".into(),
    ))
}
