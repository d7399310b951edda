//! # liftdoc Advisor
//!
//! Turns ranked manual passages into safety-first remediation advice.
//!
//! The fault description is sorted into an issue category by a priority
//! ordered keyword table (door > noise > movement > error code > general),
//! and each category maps to fixed remediation steps. Nothing is generated:
//! the manual excerpt and the steps are assembled from a static template.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Query    │────>│  Retriever  │────>│   Advisor   │
//! │ (fault text)│     │ (top-k)     │     │ (template)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌──────┴──────┐
//!                                         │   Advice    │
//!                                         │ + sources   │
//!                                         └─────────────┘
//! ```

pub mod advice;
pub mod assistant;
pub mod category;

pub use advice::{Advice, Advisor, DEFAULT_EXCERPT_CHARS, FALLBACK_ADVICE, SAFETY_BANNER};
pub use assistant::Assistant;
pub use category::{categorize, CategoryRule, IssueCategory, CATEGORY_RULES};
