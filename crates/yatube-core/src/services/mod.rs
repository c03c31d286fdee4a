//! Services - the business rules of the blog, written against the ports.

mod accounts;
mod groups;
mod posts;

pub use accounts::{AccountService, SignupInput};
pub use groups::{GroupInput, GroupService};
pub use posts::{PostDetail, PostInput, PostService, PostView};

const REQUIRED: &str = "This field is required.";
