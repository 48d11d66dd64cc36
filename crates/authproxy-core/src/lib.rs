//! Domain logic for the auth proxy companion.
//!
//! Layout: [`models`] (the data), [`repository`] (typed store access),
//! [`validators`] (pre-mutation checks), [`interactors`] (CRUD + cascade
//! services), [`auth`] (the decision engine), [`archiver`] (expiry sweep),
//! [`token`] (session token generation), [`error`] (the taxonomy everything
//! narrows to).

pub mod archiver;
pub mod auth;
pub mod error;
pub mod interactors;
pub mod models;
pub mod repository;
pub mod token;
pub mod validators;

pub use archiver::Archiver;
pub use auth::{AuthEngine, Verdict};
pub use interactors::{PoliciesInteractor, ResourcesInteractor, SessionsInteractor};
