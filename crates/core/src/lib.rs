//! Puja Samagri Core - Shared types and the shopper state engine.
//!
//! This crate provides everything the storefront computes, independent of
//! how it is served:
//! - `storefront` - Public-facing puja kit shop (axum + askama)
//! - `integration-tests` - HTTP-level tests driving the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types, pure logic and traits - no network,
//! no database, no HTTP. Persistence goes through the [`storage::KeyValueStore`]
//! trait so the same engine runs against an in-memory map in tests and
//! against the visitor's session in the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails and statuses
//! - [`catalog`] - Read-only kit catalog with lookup, search and filters
//! - [`cart`] - Cart lines and derived totals
//! - [`coupon`] - Fixed coupon table
//! - [`order`] - Order summary (delivery fee, payable total)
//! - [`wishlist`] - Saved-for-later set
//! - [`checkout`] - Address → payment → confirmation state machine
//! - [`toast`] - Transient notifications
//! - [`storage`] - Key-value persistence collaborator
//! - [`shopper`] - The per-visitor service object tying it all together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod coupon;
pub mod order;
pub mod shopper;
pub mod storage;
pub mod toast;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartItem, CartLine};
pub use catalog::{Catalog, CatalogError, Category, KitItem, Package, PackageQuery, SortOrder};
pub use checkout::{
    AddressChoice, AddressForm, Checkout, CheckoutError, CheckoutStep, DeliveryAddress,
    PENDING_ORDER_TIMEOUT_SECONDS, PaymentDetails, PaymentForm, PaymentMethod, PendingOrder,
    SavedAddress, TransitionError, ValidationError,
};
pub use coupon::{CouponCode, InvalidCouponError};
pub use order::OrderSummary;
pub use shopper::ShopperSession;
pub use storage::{KeyValueStore, MemoryStore};
pub use toast::{Toast, ToastKind, ToastQueue};
pub use types::*;
pub use wishlist::{Wishlist, WishlistEntry};
