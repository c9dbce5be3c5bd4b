//! Typed views of the store API's JSON responses.
//!
//! Field names follow the wire format exactly (including the API's historic
//! `adress` spelling on profiles); money arrives as decimal strings and maps
//! to `rust_decimal::Decimal`.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;
pub mod vendor;

pub use cart::{CartItem, CartMutation, CartSummary, cart_count};
pub use order::{AppliedCoupon, CreatedOrder, Order, OrderItem, PaymentResult};
pub use product::{
    Category, Gallery, Product, ProductColor, ProductSize, Review, ReviewUser, Specification,
};
pub use user::{Notification, Profile, ProfileUpdate, WishlistItem, WishlistToggle};
pub use vendor::{
    Coupon, CouponPayload, CouponStats, EarningSummary, MonthlyEarning, NewProduct,
    NotificationSummary, OrdersChartPoint, ProductsChartPoint, ShopUpdate, VendorStats,
};
