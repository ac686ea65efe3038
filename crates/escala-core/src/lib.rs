//! Core types and algorithms for the escala rotation schedule.
//!
//! The two pure operations everything else is built around:
//!
//! - [`rotation::generate`] turns a [`config::ScheduleConfig`] into the
//!   year's regular events.
//! - [`merge::merge`] layers the user's [`event::ExceptionEvent`]s on top.
//!
//! This crate is free of HTTP and database dependencies. Persistence goes
//! through the [`store::KeyValueStore`] trait, implemented by backends such
//! as `escala-store-sqlite`.

// Native `async fn` in traits; the `Send` bound is spelled out on the trait.
#![allow(async_fn_in_trait)]

pub mod calendar;
pub mod config;
pub mod date;
pub mod document;
pub mod error;
pub mod etag;
pub mod event;
pub mod exceptions;
pub mod merge;
pub mod ministry;
pub mod rotation;
pub mod store;
pub mod weekday;

pub use error::{Error, Result};
pub use merge::merge;
pub use rotation::generate;
