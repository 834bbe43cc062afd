//! Layout data every page needs: header badges and pending toasts.

use puja_samagri_core::Toast;

/// One toast ready for rendering.
#[derive(Debug, Clone)]
pub struct ToastView {
    pub id: String,
    pub message: String,
    /// `success`, `error` or `info`.
    pub kind: &'static str,
}

impl From<&Toast> for ToastView {
    fn from(toast: &Toast) -> Self {
        Self {
            id: toast.id.to_string(),
            message: toast.message.clone(),
            kind: toast.kind.as_str(),
        }
    }
}

/// Data the base layout renders on every page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Sum of cart quantities, for the header badge.
    pub cart_count: u32,
    pub wishlist_count: usize,
    pub toasts: Vec<ToastView>,
    /// Path and query of the current page, used as the return target of
    /// forms rendered by the layout.
    pub current_path: String,
}

impl PageContext {
    /// Whether the cart badge should show.
    #[must_use]
    pub const fn has_cart_items(&self) -> bool {
        self.cart_count > 0
    }
}
