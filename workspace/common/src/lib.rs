//! Form payloads and server-side validation shared by the services and
//! the HTTP handlers.
//!
//! Every form arrives as raw strings (the way a browser posts it) and is
//! turned into a typed input by its `parse` method. Failures are collected
//! per field into [`FormErrors`] so they can be shown next to the input
//! that caused them.

mod errors;
mod forms;
pub mod validators;

pub use errors::FormErrors;
pub use forms::{
    BarcodeLookupForm, BarcodeScanForm, BarcodeScanInput, CategoryForm, CategoryInput,
    CustomerForm, CustomerInput, GoodsForm, GoodsInput, LoginForm, ScanRejection, SignupForm, SignupInput,
};
