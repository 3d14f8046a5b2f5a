// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic the engine emits is a small message struct with a
//! `Display` implementation and a [`messages::StructuredLog`] implementation,
//! so wording lives in one place and log fields stay consistent between the
//! router, the finalizer and the service loop.
//!
//! # Usage
//!
//! ```rust
//! use the_stitcher::observability::messages::{router::PageAccumulated, StructuredLog};
//!
//! PageAccumulated {
//!     endpoint: "/list_other",
//!     record_kind: "records",
//!     page_items: 40,
//!     total_items: 120,
//!     pages: 3,
//!     quiet_period: std::time::Duration::from_secs(5),
//! }
//! .log();
//! ```

pub mod messages;
