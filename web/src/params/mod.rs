//! This module holds typed parameters for various endpoint inputs.
//!
//! The purpose of this module is to define and manage the parameters that are used as inputs
//! for different endpoints in the web application. By using typed parameters, we can ensure
//! that the inputs are validated (by type) and correctly formatted before they are processed by the
//! application logic.
//!
//! Browser forms post every field as a string and omit fields that were left
//! out entirely, so form parameters are all optional here and converted into
//! domain types before any business rule is applied.

pub(crate) mod news;
