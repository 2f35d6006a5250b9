//! RapidWoo
//!
//! A client-side storefront engine: a cart and pricing engine, a product
//! catalog resolved through a prioritised chain of data sources, an image
//! upload pipeline, and the persisted state behind the product editor.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod editor;
pub mod prefs;
pub mod storage;
pub mod upload;
pub mod util;
