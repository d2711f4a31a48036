pub mod document;
pub mod engine;
pub mod pdf;
pub mod prompt;
pub mod requester;

pub use crate::domain::model::{PlanDocument, PlanForm, PlanRequest, RenderedDocument};
pub use crate::domain::ports::{PlanRequester, Storage};
pub use crate::utils::error::Result;
