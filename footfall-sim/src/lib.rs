pub mod error;
pub mod graph;
pub mod identity;
pub mod site;
pub mod walk;

pub use error::SimError;
pub use graph::{Method, Page, PageId, SiteGraph, Transition};
pub use identity::{Identity, IdentityPool};
pub use site::{LinkSpec, PageSpec, SiteSpec, load_site};
pub use walk::{Customer, StepOutcome, Visit, WalkEnd, Walker};
