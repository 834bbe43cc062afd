//! Per-visitor shopper state.
//!
//! [`ShopperSession`] owns one visitor's cart, wishlist, checkout progress
//! and toasts, together with the [`KeyValueStore`] they persist to. It
//! hydrates from the store when opened and writes the affected keys back
//! after every mutation, so the store always reflects the last action.

use chrono::{DateTime, Duration, Utc};

use crate::cart::{Cart, CartItem, CartLine};
use crate::checkout::{
    AddressChoice, Checkout, CheckoutError, CheckoutStep, DeliveryAddress, PaymentDetails,
    PaymentForm, TransitionError,
};
use crate::coupon::{CouponCode, InvalidCouponError};
use crate::order::OrderSummary;
use crate::storage::{KeyValueStore, keys, load_json, save_json};
use crate::toast::{Toast, ToastKind, ToastQueue};
use crate::types::{OrderId, ToastId};
use crate::wishlist::{Wishlist, WishlistEntry};

/// One visitor's state plus the store it lives in.
#[derive(Debug)]
pub struct ShopperSession<S: KeyValueStore> {
    store: S,
    cart: Cart,
    wishlist: Wishlist,
    checkout: Checkout,
    toasts: ToastQueue,
}

impl<S: KeyValueStore> ShopperSession<S> {
    /// Hydrate from `store`. Missing or malformed values start empty.
    pub fn open(store: S) -> Self {
        let lines: Vec<CartLine> = load_json(&store, keys::CART).unwrap_or_default();
        let coupon = store
            .get(keys::COUPON)
            .and_then(|code| match CouponCode::parse(&code) {
                Ok(coupon) => Some(coupon),
                Err(e) => {
                    tracing::warn!(code, error = %e, "Discarding stored coupon");
                    None
                }
            });
        let wishlist = load_json(&store, keys::WISHLIST)
            .map(Wishlist::from_entries)
            .unwrap_or_default();
        let checkout = load_json(&store, keys::CHECKOUT).unwrap_or_default();
        let toasts = load_json(&store, keys::TOASTS).unwrap_or_default();

        Self {
            store,
            cart: Cart::from_parts(lines, coupon),
            wishlist,
            checkout,
            toasts,
        }
    }

    /// Lifetime for toasts created from now on.
    #[must_use]
    pub fn with_toast_ttl(mut self, ttl: Duration) -> Self {
        self.toasts = self.toasts.with_ttl(ttl);
        self
    }

    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub const fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Cart totals with delivery.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        self.cart.summary()
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The store, for draining writes mid-request.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give the store back, e.g. to flush it somewhere else.
    pub fn into_store(self) -> S {
        self.store
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    pub fn add_to_cart(&mut self, item: CartItem, quantity: u32) {
        tracing::debug!(line = %item.id, quantity, "Adding to cart");
        self.cart.add_item(item, quantity);
        self.persist_cart();
    }

    pub fn remove_from_cart(&mut self, id: &str) -> bool {
        let removed = self.cart.remove_item(id);
        if removed {
            self.persist_cart();
        }
        removed
    }

    /// Set a line's quantity; below 1 removes the line.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        self.cart.set_quantity(id, quantity);
        self.persist_cart();
    }

    /// Empty the cart and drop the coupon.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist_cart();
    }

    /// Activate a coupon. The cart and store are untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCouponError`] for blank or unknown codes.
    pub fn apply_coupon(&mut self, code: &str) -> Result<CouponCode, InvalidCouponError> {
        let coupon = self.cart.apply_coupon(code)?.clone();
        self.persist_cart();
        Ok(coupon)
    }

    pub fn remove_coupon(&mut self) -> bool {
        let removed = self.cart.remove_coupon();
        if removed {
            self.persist_cart();
        }
        removed
    }

    // -------------------------------------------------------------------------
    // Wishlist
    // -------------------------------------------------------------------------

    pub fn add_to_wishlist(&mut self, entry: WishlistEntry) -> bool {
        let added = self.wishlist.add(entry);
        if added {
            self.persist_wishlist();
        }
        added
    }

    pub fn remove_from_wishlist(&mut self, id: &str) -> bool {
        let removed = self.wishlist.remove(id);
        if removed {
            self.persist_wishlist();
        }
        removed
    }

    /// Flip membership. Returns whether the entry is now saved.
    pub fn toggle_wishlist(&mut self, entry: WishlistEntry) -> bool {
        let saved = self.wishlist.toggle(entry);
        self.persist_wishlist();
        saved
    }

    pub fn clear_wishlist(&mut self) {
        self.wishlist.clear();
        self.persist_wishlist();
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Enter checkout.
    ///
    /// A finished checkout is restarted when the cart has been refilled;
    /// otherwise the confirmation stays visible.
    ///
    /// # Errors
    ///
    /// [`TransitionError::EmptyCart`] when there is nothing to check out
    /// and no confirmation to show.
    pub fn begin_checkout(&mut self) -> Result<CheckoutStep, TransitionError> {
        if self.checkout.is_confirmed() {
            if !self.cart.is_empty() {
                self.checkout.restart();
                self.persist_checkout();
            }
            return Ok(self.checkout.step());
        }
        if self.cart.is_empty() {
            return Err(TransitionError::EmptyCart);
        }
        Ok(self.checkout.step())
    }

    /// Address → Payment.
    ///
    /// # Errors
    ///
    /// See [`Checkout::submit_address`]; also fails with
    /// [`TransitionError::EmptyCart`].
    pub fn submit_address(
        &mut self,
        choice: AddressChoice,
    ) -> Result<DeliveryAddress, CheckoutError> {
        self.require_items()?;
        let address = self.checkout.submit_address(choice)?.clone();
        self.persist_checkout();
        Ok(address)
    }

    /// Payment → Address.
    ///
    /// # Errors
    ///
    /// See [`Checkout::back`].
    pub fn back_to_address(&mut self) -> Result<(), TransitionError> {
        self.checkout.back()?;
        self.persist_checkout();
        Ok(())
    }

    /// Validate payment input before submitting the order.
    ///
    /// # Errors
    ///
    /// See [`Checkout::authorize_payment`]; also fails with
    /// [`TransitionError::EmptyCart`].
    pub fn authorize_payment(&self, form: &PaymentForm) -> Result<PaymentDetails, CheckoutError> {
        self.require_items()?;
        self.checkout.authorize_payment(form)
    }

    /// Record that `order_id` is being submitted.
    ///
    /// # Errors
    ///
    /// See [`Checkout::begin_order`]; also fails with
    /// [`TransitionError::EmptyCart`].
    pub fn begin_order(
        &mut self,
        order_id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.require_items()?;
        self.checkout.begin_order(order_id, now)?;
        self.persist_checkout();
        Ok(())
    }

    /// Forget a pending order whose submission failed.
    pub fn abandon_order(&mut self) {
        if self.checkout.abandon_order() {
            self.persist_checkout();
        }
    }

    /// Payment → Confirmation. Empties the cart.
    ///
    /// # Errors
    ///
    /// See [`Checkout::confirm`].
    pub fn complete_order(
        &mut self,
        payment: PaymentDetails,
        order_id: OrderId,
        placed_at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.checkout.confirm(payment, order_id, placed_at)?;
        self.cart.clear();
        self.persist_checkout();
        self.persist_cart();
        Ok(())
    }

    fn require_items(&self) -> Result<(), TransitionError> {
        if self.cart.is_empty() {
            Err(TransitionError::EmptyCart)
        } else {
            Ok(())
        }
    }

    // -------------------------------------------------------------------------
    // Toasts
    // -------------------------------------------------------------------------

    pub fn notify(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        now: DateTime<Utc>,
    ) -> ToastId {
        let id = self.toasts.push(message, kind, now);
        self.persist_toasts();
        id
    }

    /// Dismiss a toast. A toast that already expired is a no-op.
    pub fn dismiss_toast(&mut self, id: &str) -> bool {
        let dismissed = self.toasts.dismiss(id);
        if dismissed {
            self.persist_toasts();
        }
        dismissed
    }

    /// Sweep expired toasts and return the rest.
    pub fn visible_toasts(&mut self, now: DateTime<Utc>) -> Vec<Toast> {
        if self.toasts.expire(now) > 0 {
            self.persist_toasts();
        }
        self.toasts.active(now).cloned().collect()
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    fn persist_cart(&mut self) {
        save_json(&mut self.store, keys::CART, self.cart.lines());
        match self.cart.coupon() {
            Some(coupon) => self.store.set(keys::COUPON, coupon.to_string()),
            None => self.store.remove(keys::COUPON),
        }
    }

    fn persist_wishlist(&mut self) {
        save_json(&mut self.store, keys::WISHLIST, self.wishlist.entries());
    }

    fn persist_checkout(&mut self) {
        if self.checkout == Checkout::default() {
            self.store.remove(keys::CHECKOUT);
        } else {
            save_json(&mut self.store, keys::CHECKOUT, &self.checkout);
        }
    }

    fn persist_toasts(&mut self) {
        if self.toasts.is_empty() {
            self.store.remove(keys::TOASTS);
        } else {
            save_json(&mut self.store, keys::TOASTS, &self.toasts);
        }
    }
}
