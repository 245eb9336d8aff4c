//! Namespace tree model — pure views over the flat record collections.

pub mod breadcrumb;
pub mod view;

pub use breadcrumb::{Breadcrumb, Crumb};
pub use view::TreeView;
