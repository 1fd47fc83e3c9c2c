//! Types shared between the admin frontend and the store's REST API,
//! plus the pure logic that does not need a browser.

pub mod domain;
pub mod shared;
pub mod system;
pub mod usecases;
