//! # nonceward form
//!
//! Carries a nonce through an HTML form as a single field whose value is
//! `name:value`.
//!
//! A [`NonceForm`] wraps a [`NoncesManager`](nonceward_core::NoncesManager),
//! the field name and the submitted [`FormInput`]. On a rendering request it
//! issues the nonce to embed; on a submission it consumes the submitted one.
//!
//! ```rust
//! use nonceward_core::{MemoryStorage, NoncesManager};
//! use nonceward_form::{FormInput, NonceForm};
//!
//! # tokio_test::block_on(async {
//! let manager = NoncesManager::new(MemoryStorage::new());
//! let body = b"amount=10&token=x%3Ay";
//!
//! let mut form = NonceForm::new("token", manager, FormInput::from_body(body));
//! assert_eq!(form.submitted_name(), Some("x"));
//! assert_eq!(form.submitted_value(), Some("y"));
//!
//! // no nonce named "x" was ever issued
//! assert!(form.is_submitted_invalid().await?);
//! # Ok::<(), nonceward_core::NonceError>(())
//! # }).unwrap();
//! ```

pub mod form;
pub mod input;

pub use form::{FIELD_SEPARATOR, NonceForm};
pub use input::FormInput;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::form::NonceForm;
    pub use crate::input::FormInput;
}
