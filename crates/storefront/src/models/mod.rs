//! View models shared by several pages.
//!
//! Route modules own the view structs only they render; anything used by
//! more than one template lives here.

pub mod account;
pub mod cart;
pub mod package;
pub mod page;

pub use account::{MockOrder, MockOrderItem, MockUser, mock_orders, mock_user};
pub use cart::{CartLineView, SelectedOption, SummaryView};
pub use package::{CategoryView, PackageCard};
pub use page::{PageContext, ToastView};
