//! Integration test harness for Mercadito.
//!
//! Runs an in-process mock of the remote store API (axum on an ephemeral
//! port) and builds real `mercadito_client` instances against it. The mock
//! issues genuine-looking (unsigned) JWTs and honors exactly one access
//! token at a time, so token expiry, refresh, and 401-replay behavior can be
//! observed end to end.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mercadito-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use mercadito_client::session::MemoryStore;
use mercadito_client::{ApiClient, ClientConfig, Session};

/// User id embedded in every token the mock issues.
pub const MOCK_USER_ID: i32 = 41;
/// Vendor id embedded in every token the mock issues.
pub const MOCK_VENDOR_ID: i32 = 7;
/// The one password the mock accepts.
pub const MOCK_PASSWORD: &str = "correct-horse";
/// The one coupon code the mock accepts.
pub const MOCK_COUPON: &str = "VERANO20";

/// Mint an unsigned JWT with the given claims.
#[must_use]
pub fn make_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.unsigned")
}

fn token_with_exp(exp: i64, token_type: &str) -> String {
    make_token(&json!({
        "token_type": token_type,
        "exp": exp,
        "user_id": MOCK_USER_ID,
        "vendor_id": MOCK_VENDOR_ID,
        "full_name": "Ana Torres",
        "email": "ana@example.com",
    }))
}

#[derive(Debug, Clone, Deserialize)]
struct StoredLine {
    product_id: i32,
    qty: i32,
    price: Decimal,
    shipping_amount: Decimal,
    size: String,
    color: String,
    cart_id: String,
    #[serde(default)]
    #[allow(dead_code)]
    user_id: String,
    #[serde(default)]
    #[allow(dead_code)]
    country: String,
}

#[derive(Debug, Default)]
struct OrderRecord {
    total: Decimal,
    coupon_applied: bool,
}

/// Shared state of the mock API.
#[derive(Default)]
pub struct MockState {
    /// The access token the server currently honors.
    honored_access: Mutex<Option<String>>,
    /// The refresh token the server currently honors.
    honored_refresh: Mutex<Option<String>>,
    /// When false, every refresh attempt is rejected with 401.
    refresh_enabled: AtomicBool,
    /// When true, the protected endpoint 401s even for the honored token.
    protected_always_401: AtomicBool,
    /// Number of refresh calls served (accepted or rejected).
    pub refresh_calls: AtomicUsize,
    /// Number of product list fetches served.
    pub product_calls: AtomicUsize,
    /// Number of hits on the protected order-history endpoint.
    pub protected_calls: AtomicUsize,
    cart: Mutex<Vec<StoredLine>>,
    orders: Mutex<HashMap<String, OrderRecord>>,
    order_seq: AtomicUsize,
}

impl MockState {
    /// Issue a fresh credential pair and make it the honored one.
    pub fn issue_pair(&self) -> (String, String) {
        let now = chrono::Utc::now().timestamp();
        let access = token_with_exp(now + 3_600, "access");
        let refresh = token_with_exp(now + 7 * 86_400, "refresh");

        *self.honored_access.lock().expect("lock") = Some(access.clone());
        *self.honored_refresh.lock().expect("lock") = Some(refresh.clone());

        (access, refresh)
    }

    /// An access token whose `exp` claim is an hour in the past.
    #[must_use]
    pub fn expired_access_token(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        token_with_exp(now - 3_600, "access")
    }

    /// An access token with a valid `exp` that the server does not honor
    /// (as if it were revoked server-side).
    #[must_use]
    pub fn unhonored_access_token(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        make_token(&json!({
            "token_type": "access",
            "exp": now + 3_600,
            "user_id": MOCK_USER_ID,
            "vendor_id": MOCK_VENDOR_ID,
            "revoked": true,
        }))
    }

    /// Allow or reject subsequent refresh attempts.
    pub fn set_refresh_enabled(&self, enabled: bool) {
        self.refresh_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Make the protected endpoint reject every request, honored token or
    /// not.
    pub fn set_protected_always_401(&self, always: bool) {
        self.protected_always_401.store(always, Ordering::SeqCst);
    }

    fn is_honored(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.honored_access.lock().expect("lock").clone() else {
            return false;
        };
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|value| value == format!("Bearer {expected}"))
    }
}

/// A running mock API plus factories for clients pointed at it.
pub struct TestApi {
    pub state: Arc<MockState>,
    base_url: String,
}

impl TestApi {
    /// Bind the mock API to an ephemeral port and start serving it.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound (test environment failure).
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            refresh_enabled: AtomicBool::new(true),
            ..MockState::default()
        });

        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock API listener");
        let addr = listener.local_addr().expect("mock API local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock API serve");
        });

        Self {
            state,
            base_url: format!("http://{addr}/api/v1/"),
        }
    }

    /// Base URL of the mock API (with trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a real client with an in-memory session store.
    ///
    /// # Panics
    ///
    /// Panics if the base URL cannot be parsed (test environment failure).
    #[must_use]
    pub fn client(&self) -> ApiClient {
        let config = ClientConfig::for_api_url(
            &self.base_url,
            std::env::temp_dir().join("mercadito-test-unused.json"),
        )
        .expect("mock API config");

        let session = Session::new(&config, Box::new(MemoryStore::new()));
        ApiClient::new(&config, session)
    }

    /// Number of refresh calls the mock has served so far.
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    /// Number of hits on the protected order-history endpoint.
    #[must_use]
    pub fn protected_calls(&self) -> usize {
        self.state.protected_calls.load(Ordering::SeqCst)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Router & handlers
// ─────────────────────────────────────────────────────────────────────────────

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/v1/user/token/", post(issue_token))
        .route("/api/v1/user/token/refresh", post(refresh_token))
        .route("/api/v1/products/", get(list_products))
        .route("/api/v1/products/{slug}/", get(product_detail))
        .route("/api/v1/category/", get(list_categories))
        .route("/api/v1/cart-view/", post(cart_view))
        .route("/api/v1/cart-list/{cart_id}/", get(cart_list))
        .route("/api/v1/cart-list/{cart_id}/{user_id}/", get(cart_list_user))
        .route("/api/v1/cart-detail/{cart_id}/", get(cart_detail))
        .route(
            "/api/v1/cart-detail/{cart_id}/{user_id}/",
            get(cart_detail_user),
        )
        .route(
            "/api/v1/cart-delete/{cart_id}/{item_id}/",
            delete(cart_delete),
        )
        .route(
            "/api/v1/cart-delete/{cart_id}/{item_id}/{user_id}",
            delete(cart_delete_user),
        )
        .route("/api/v1/create-order/", post(create_order))
        .route("/api/v1/checkout/{oid}/", get(checkout))
        .route("/api/v1/coupon/", post(apply_coupon))
        .route("/api/v1/customer/orders/{user_id}/", get(customer_orders))
        .route("/api/v1/user/profile/{user_id}/", get(user_profile))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn issue_token(
    State(state): State<Arc<MockState>>,
    Json(body): Json<LoginBody>,
) -> Response {
    if body.password != MOCK_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response();
    }

    let _ = body.email;
    let (access, refresh) = state.issue_pair();
    Json(json!({"access": access, "refresh": refresh})).into_response()
}

#[derive(Deserialize)]
struct RefreshBody {
    refresh: String,
}

async fn refresh_token(
    State(state): State<Arc<MockState>>,
    Json(body): Json<RefreshBody>,
) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let honored = state.honored_refresh.lock().expect("lock").clone();
    let enabled = state.refresh_enabled.load(Ordering::SeqCst);

    if !enabled || honored.as_deref() != Some(body.refresh.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
        )
            .into_response();
    }

    let (access, refresh) = state.issue_pair();
    Json(json!({"access": access, "refresh": refresh})).into_response()
}

fn product_json(id: i32, title: &str, slug: &str, price: &str, in_stock: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "slug": slug,
        "price": price,
        "oldPrice": "79.90",
        "shipping_amount": "5.00",
        "stock_qty": 12,
        "in_stock": in_stock,
        "status": "published",
        "featured": true,
        "category": {"id": 1, "title": "Clothing", "slug": "clothing"},
        "gallery": [],
        "specification": [{"title": "Material", "content": "Alpaca wool"}],
        "size": [{"name": "M", "price": price}],
        "color": [{"name": "Natural", "color_code": "#f5f0e8"}],
    })
}

fn fixtures() -> Vec<serde_json::Value> {
    vec![
        product_json(1, "Alpaca Sweater", "alpaca-sweater", "59.90", true),
        product_json(2, "Ceramic Mug", "ceramic-mug", "12.50", false),
    ]
}

async fn list_products(State(state): State<Arc<MockState>>) -> Response {
    state.product_calls.fetch_add(1, Ordering::SeqCst);
    Json(fixtures()).into_response()
}

async fn product_detail(
    State(state): State<Arc<MockState>>,
    Path(slug): Path<String>,
) -> Response {
    state.product_calls.fetch_add(1, Ordering::SeqCst);
    match fixtures().into_iter().find(|p| p["slug"] == slug.as_str()) {
        Some(product) => Json(product).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Not found."})),
        )
            .into_response(),
    }
}

async fn list_categories() -> Response {
    Json(json!([
        {"id": 1, "title": "Clothing", "slug": "clothing"},
        {"id": 2, "title": "Kitchen", "slug": "kitchen"},
    ]))
    .into_response()
}

async fn cart_view(
    State(state): State<Arc<MockState>>,
    Form(line): Form<StoredLine>,
) -> Response {
    let mut cart = state.cart.lock().expect("lock");

    // The server upserts on (product, variant) per cart.
    if let Some(existing) = cart.iter_mut().find(|l| {
        l.cart_id == line.cart_id
            && l.product_id == line.product_id
            && l.size == line.size
            && l.color == line.color
    }) {
        existing.qty = line.qty;
        return Json(json!({"message": "Cart updated successfully"})).into_response();
    }

    cart.push(line);
    Json(json!({"message": "Added to cart successfully"})).into_response()
}

fn cart_items_json(state: &MockState, cart_id: &str) -> Vec<serde_json::Value> {
    let cart = state.cart.lock().expect("lock");
    cart.iter()
        .filter(|line| line.cart_id == cart_id)
        .enumerate()
        .map(|(index, line)| {
            let index = i32::try_from(index).unwrap_or(i32::MAX);
            let sub_total = line.price * Decimal::from(line.qty);
            json!({
                "id": index + 1,
                "product": fixtures()
                    .into_iter()
                    .find(|p| p["id"] == line.product_id)
                    .unwrap_or_else(|| product_json(line.product_id, "Unknown", "unknown", "0.00", true)),
                "qty": line.qty,
                "price": line.price.to_string(),
                "sub_total": sub_total.to_string(),
                "shipping_amount": (line.shipping_amount * Decimal::from(line.qty)).to_string(),
                "size": line.size,
                "color": line.color,
            })
        })
        .collect()
}

async fn cart_list(
    State(state): State<Arc<MockState>>,
    Path(cart_id): Path<String>,
) -> Response {
    Json(cart_items_json(&state, &cart_id)).into_response()
}

async fn cart_list_user(
    State(state): State<Arc<MockState>>,
    Path((cart_id, _user_id)): Path<(String, String)>,
) -> Response {
    Json(cart_items_json(&state, &cart_id)).into_response()
}

fn cart_summary_json(state: &MockState, cart_id: &str) -> serde_json::Value {
    let cart = state.cart.lock().expect("lock");
    let mut sub_total = Decimal::ZERO;
    let mut shipping = Decimal::ZERO;

    for line in cart.iter().filter(|line| line.cart_id == cart_id) {
        sub_total += line.price * Decimal::from(line.qty);
        shipping += line.shipping_amount * Decimal::from(line.qty);
    }

    let service_fee = sub_total * Decimal::new(5, 2); // 5%
    let total = sub_total + shipping + service_fee;

    json!({
        "shipping": shipping.to_string(),
        "tax": "0.00",
        "service_fee": service_fee.to_string(),
        "sub_total": sub_total.to_string(),
        "total": total.to_string(),
    })
}

async fn cart_detail(
    State(state): State<Arc<MockState>>,
    Path(cart_id): Path<String>,
) -> Response {
    Json(cart_summary_json(&state, &cart_id)).into_response()
}

async fn cart_detail_user(
    State(state): State<Arc<MockState>>,
    Path((cart_id, _user_id)): Path<(String, String)>,
) -> Response {
    Json(cart_summary_json(&state, &cart_id)).into_response()
}

fn remove_line(state: &MockState, cart_id: &str, item_id: i32) {
    let mut cart = state.cart.lock().expect("lock");
    let mut index = 0_i32;
    cart.retain(|line| {
        if line.cart_id == cart_id {
            index += 1;
            index != item_id
        } else {
            true
        }
    });
}

async fn cart_delete(
    State(state): State<Arc<MockState>>,
    Path((cart_id, item_id)): Path<(String, i32)>,
) -> Response {
    remove_line(&state, &cart_id, item_id);
    Json(json!({"message": "Item removed from cart"})).into_response()
}

async fn cart_delete_user(
    State(state): State<Arc<MockState>>,
    Path((cart_id, item_id, _user_id)): Path<(String, i32, String)>,
) -> Response {
    remove_line(&state, &cart_id, item_id);
    Json(json!({"message": "Item removed from cart"})).into_response()
}

#[derive(Deserialize)]
struct CreateOrderBody {
    cart_id: String,
    #[serde(default)]
    #[allow(dead_code)]
    full_name: String,
    #[serde(default)]
    #[allow(dead_code)]
    user_id: String,
}

async fn create_order(
    State(state): State<Arc<MockState>>,
    Form(body): Form<CreateOrderBody>,
) -> Response {
    let summary = cart_summary_json(&state, &body.cart_id);
    let total: Decimal = summary["total"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let seq = state.order_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let oid = format!("ORD{seq:06}");

    state.orders.lock().expect("lock").insert(
        oid.clone(),
        OrderRecord {
            total,
            coupon_applied: false,
        },
    );

    Json(json!({"message": "Order created successfully", "order_oid": oid})).into_response()
}

async fn checkout(State(state): State<Arc<MockState>>, Path(oid): Path<String>) -> Response {
    let orders = state.orders.lock().expect("lock");
    let Some(record) = orders.get(&oid) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Order not found"})),
        )
            .into_response();
    };

    let (total, saved) = if record.coupon_applied {
        let saved = record.total * Decimal::new(20, 2); // 20% coupon
        (record.total - saved, saved)
    } else {
        (record.total, Decimal::ZERO)
    };

    Json(json!({
        "oid": oid,
        "full_name": "Ana Torres",
        "sub_total": record.total.to_string(),
        "shipping_amount": "0.00",
        "tax_fee": "0.00",
        "service_fee": "0.00",
        "total": total.to_string(),
        "saved": saved.to_string(),
        "order_status": "pending",
        "payment_status": "processing",
        "orderitem": [],
    }))
    .into_response()
}

#[derive(Deserialize)]
struct CouponBody {
    order_oid: String,
    coupon_code: String,
}

async fn apply_coupon(
    State(state): State<Arc<MockState>>,
    Form(body): Form<CouponBody>,
) -> Response {
    let mut orders = state.orders.lock().expect("lock");
    let Some(record) = orders.get_mut(&body.order_oid) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Order not found"})),
        )
            .into_response();
    };

    if body.coupon_code != MOCK_COUPON {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Coupon does not exist", "icon": "error"})),
        )
            .into_response();
    }

    if record.coupon_applied {
        return Json(json!({"message": "Coupon already activated", "icon": "warning"}))
            .into_response();
    }

    record.coupon_applied = true;
    Json(json!({"message": "Coupon activated", "icon": "success"})).into_response()
}

async fn user_profile(
    State(state): State<Arc<MockState>>,
    Path(_user_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !state.is_honored(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        )
            .into_response();
    }

    Json(json!({
        "full_name": "Ana Torres",
        "adress": "Av. Siempre Viva 742",
        "city": "Lima",
        "country": "PE",
    }))
    .into_response()
}

async fn customer_orders(
    State(state): State<Arc<MockState>>,
    Path(_user_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.protected_calls.fetch_add(1, Ordering::SeqCst);

    if state.protected_always_401.load(Ordering::SeqCst) || !state.is_honored(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        )
            .into_response();
    }

    Json(json!([{
        "oid": "ORD000001",
        "total": "59.90",
        "order_status": "fulfilled",
        "payment_status": "paid",
        "orderitem": [],
    }]))
    .into_response()
}
